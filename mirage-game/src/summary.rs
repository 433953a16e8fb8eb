//! Round summary: accuracy rank titles and shareable result text.

use serde::{Deserialize, Serialize};

use crate::constants::{
    RANK_HUNTER_MIN, RANK_INVESTIGATOR_MIN, RANK_ORACLE_MIN, RANK_SEEKER_MIN,
};
use crate::profile::PlayerProfile;
use crate::progression::RoundCompletion;
use crate::round::{AnswerMark, RoundState};

/// Accuracy-banded title shown on the completion screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    /// 95%+
    Oracle,
    /// 80%+
    IllusionHunter,
    /// 60%+
    SharpInvestigator,
    /// 40%+
    TruthSeeker,
    /// Everything below.
    Apprentice,
}

impl Rank {
    /// Rank for a round accuracy percentage.
    #[must_use]
    pub const fn for_accuracy(accuracy: u32) -> Self {
        if accuracy >= RANK_ORACLE_MIN {
            Self::Oracle
        } else if accuracy >= RANK_HUNTER_MIN {
            Self::IllusionHunter
        } else if accuracy >= RANK_INVESTIGATOR_MIN {
            Self::SharpInvestigator
        } else if accuracy >= RANK_SEEKER_MIN {
            Self::TruthSeeker
        } else {
            Self::Apprentice
        }
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let title = match self {
            Self::Oracle => "Unveiler of Secrets",
            Self::IllusionHunter => "Hunter of Illusions",
            Self::SharpInvestigator => "Sharp Investigator",
            Self::TruthSeeker => "Seeker of Truth",
            Self::Apprentice => "Apprentice",
        };
        write!(f, "{title}")
    }
}

/// Everything the completion screen needs in one place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundReport {
    pub score: u32,
    pub round_size: usize,
    pub accuracy: u32,
    pub rank: Rank,
    pub xp_earned: u32,
    pub did_level_up: bool,
    pub new_level: u32,
    pub day_streak: u32,
}

impl RoundReport {
    /// Build a report from a finished round and its committed result.
    #[must_use]
    pub fn new(round: &RoundState, completion: &RoundCompletion) -> Self {
        Self {
            score: round.score,
            round_size: round.len(),
            accuracy: round.accuracy,
            rank: Rank::for_accuracy(round.accuracy),
            xp_earned: completion.xp_earned,
            did_level_up: completion.did_level_up,
            new_level: completion.new_level,
            day_streak: completion.new_streak,
        }
    }
}

/// Shareable result text: day streak, score line, and a glyph run of the
/// answer history.
#[must_use]
pub fn share_text(profile: &PlayerProfile, round: &RoundState) -> String {
    let glyphs: String = round
        .answer_history
        .iter()
        .map(|mark| match mark {
            AnswerMark::Correct => '🟩',
            AnswerMark::Incorrect => '🟥',
        })
        .collect();
    format!(
        "Mirage | Day {}\nMy result: {}/{}\n\n{}\n\n#MirageDaily",
        profile.streak,
        round.score,
        round.len(),
        glyphs
    )
}
