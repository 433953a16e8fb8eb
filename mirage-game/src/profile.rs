//! Durable player profile record, onboarding parameters, and schema backfill.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::GameError;
use crate::constants::{USERNAME_MAX_CHARS, USERNAME_MIN_CHARS};

/// The two consumable hint mechanisms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AidKind {
    /// Textual hint for the current question.
    Reveal,
    /// Eliminates two incorrect options.
    Narrow,
}

/// Spendable aid credits carried on the profile between rounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AidInventory {
    #[serde(default)]
    pub reveal: u32,
    #[serde(default)]
    pub narrow: u32,
}

impl AidInventory {
    /// Remaining credits for the given kind.
    #[must_use]
    pub const fn count(&self, kind: AidKind) -> u32 {
        match kind {
            AidKind::Reveal => self.reveal,
            AidKind::Narrow => self.narrow,
        }
    }

    /// Grant one credit of the given kind.
    pub const fn grant(&mut self, kind: AidKind) {
        match kind {
            AidKind::Reveal => self.reveal += 1,
            AidKind::Narrow => self.narrow += 1,
        }
    }

    /// Spend one credit; returns false without change when none remain.
    pub const fn spend(&mut self, kind: AidKind) -> bool {
        match kind {
            AidKind::Reveal => {
                if self.reveal == 0 {
                    return false;
                }
                self.reveal -= 1;
            }
            AidKind::Narrow => {
                if self.narrow == 0 {
                    return false;
                }
                self.narrow -= 1;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interests {
    Science,
    Culture,
    Arts,
    #[default]
    Mixed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearningGoals {
    Education,
    Entertainment,
    #[default]
    Mixed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CulturalDepth {
    Minimal,
    #[default]
    Moderate,
    Rich,
}

/// Parameters used to personalize question generation for a player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingProfile {
    pub experience_level: ExperienceLevel,
    pub interests: Interests,
    pub learning_goals: LearningGoals,
    pub cultural_depth: CulturalDepth,
    #[serde(default)]
    pub personalized_note: String,
}

const fn default_true() -> bool {
    true
}

/// Durable player record.
///
/// Owned by the persistence layer as an opaque blob and mutated only by
/// the progression engine. Fields added after the first release carry
/// `#[serde(default)]` so older blobs deserialize; [`PlayerProfile::migrate`]
/// finishes the backfill before any engine operation runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    /// Immutable after creation, 3-15 characters.
    pub username: String,
    pub level: u32,
    pub xp: u32,
    /// Date of the last completed round; drives the daily gate.
    pub last_played_date: Option<NaiveDate>,
    /// Consecutive-day completion count.
    pub streak: u32,
    /// Monotonic high-water mark of `streak`.
    #[serde(default)]
    pub longest_streak: u32,
    #[serde(default)]
    pub games_played: u32,
    #[serde(default)]
    pub total_correct_answers: u32,
    #[serde(default)]
    pub aids: AidInventory,
    #[serde(default)]
    pub onboarding: Option<OnboardingProfile>,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
}

impl PlayerProfile {
    /// Create a fresh level-1 profile for a validated username.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Validation`] when the username falls outside
    /// the 3-15 character range.
    pub fn new(username: &str, initial_aids: AidInventory) -> Result<Self, GameError> {
        validate_username(username)?;
        Ok(Self {
            username: username.to_string(),
            level: 1,
            xp: 0,
            last_played_date: None,
            streak: 0,
            longest_streak: 0,
            games_played: 0,
            total_correct_answers: 0,
            aids: initial_aids,
            onboarding: Some(OnboardingProfile::default()),
            sound_enabled: true,
        })
    }

    /// One-time backfill applied after deserializing an older blob.
    ///
    /// Restores the `longest_streak >= streak` invariant (the field did not
    /// exist in early saves) and guarantees a usable level floor.
    pub fn migrate(&mut self) {
        if self.longest_streak < self.streak {
            self.longest_streak = self.streak;
        }
        if self.level == 0 {
            self.level = 1;
        }
    }

    /// Lifetime questions answered, derived from completed rounds.
    #[must_use]
    pub const fn total_questions_answered(&self, round_size: usize) -> u64 {
        self.games_played as u64 * round_size as u64
    }

    /// Lifetime accuracy percentage, rounded to the nearest point.
    #[must_use]
    pub fn lifetime_accuracy(&self, round_size: usize) -> u32 {
        let total = self.total_questions_answered(round_size);
        if total == 0 {
            return 0;
        }
        let pct = f64::from(self.total_correct_answers) / total as f64 * 100.0;
        pct.round() as u32
    }

    /// Average score per completed round, rounded to the nearest point.
    #[must_use]
    pub fn average_score(&self) -> u32 {
        if self.games_played == 0 {
            return 0;
        }
        let avg = f64::from(self.total_correct_answers) / f64::from(self.games_played);
        avg.round() as u32
    }
}

/// Validate a username against the 3-15 character constraint.
///
/// # Errors
///
/// Returns [`GameError::Validation`] with an inline-displayable message.
pub fn validate_username(username: &str) -> Result<(), GameError> {
    let chars = username.trim().chars().count();
    if chars < USERNAME_MIN_CHARS || chars > USERNAME_MAX_CHARS {
        return Err(GameError::Validation(format!(
            "username must be {USERNAME_MIN_CHARS}-{USERNAME_MAX_CHARS} characters, got {chars}"
        )));
    }
    Ok(())
}
