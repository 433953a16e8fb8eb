//! Mirage Game Engine
//!
//! Platform-agnostic core logic for Mirage, the daily "spot the
//! fabricated statement" trivia game. This crate provides the progression
//! engine, session state machine, and question batch lifecycle without UI
//! or platform-specific dependencies; platform shells supply storage,
//! content generation, leaderboard, and notification implementations
//! through the trait seams.

use thiserror::Error;

pub mod config;
pub mod constants;
pub mod content;
pub mod leaderboard;
pub mod profile;
pub mod progression;
pub mod question;
pub mod reminders;
pub mod round;
pub mod session;
pub mod storage;
pub mod summary;

// Re-export commonly used types
pub use config::{AidCosts, GameConfig, LevelTier, XpConfig};
pub use content::{BatchRequest, ContentProvider, DailyContent};
pub use leaderboard::{LeaderboardClient, LeaderboardEntry, MockLeaderboard};
pub use profile::{
    AidInventory, AidKind, CulturalDepth, ExperienceLevel, Interests, LearningGoals,
    OnboardingProfile, PlayerProfile, validate_username,
};
pub use progression::{
    RoundCompletion, claim_aid_reward, complete_round, create_player, daily_gate_check,
    time_until_next_unlock, use_aid,
};
pub use question::{Question, shuffle_batch, shuffle_question};
pub use reminders::{NullScheduler, PermissionStatus, ReminderScheduler};
pub use round::{AnswerMark, AnswerResolution, RoundState, accuracy_pct};
pub use session::{GamePhase, SessionController};
pub use storage::{MemoryStore, ProfileStore, daily_content_key, profile_key};
pub use summary::{Rank, RoundReport, share_text};

/// Error taxonomy for the game core.
///
/// Operations that the design treats as silent precondition checks return
/// `bool`/`Option` instead of this type; everything else degrades to a
/// local default (provider failures) or surfaces one of these variants.
#[derive(Debug, Error)]
pub enum GameError {
    /// Bad user input, surfaced inline without mutating state.
    #[error("validation failed: {0}")]
    Validation(String),
    /// Generative backend or leaderboard failure, recoverable by retry.
    #[error("provider failure: {0}")]
    Provider(String),
    /// Blob store read/write failure, fatal for the affected operation.
    #[error("persistence failure")]
    Persistence(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// Operation invoked in a phase that does not permit it.
    #[error("precondition violated: {0}")]
    Precondition(&'static str),
}

impl GameError {
    /// Wrap a storage backend error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Box::new(err))
    }
}
