//! Centralized balance and tuning constants for Mirage game logic.
//!
//! These values define the deterministic math for the daily challenge loop.
//! Keeping them together ensures that gameplay can only be adjusted via
//! code changes reviewed in version control, rather than through external
//! JSON assets.

// Storage keys -------------------------------------------------------------
pub(crate) const PLAYER_PROFILE_KEY: &str = "MIRAGE_PLAYER_PROFILE";
pub(crate) const DAILY_CONTENT_KEY_PREFIX: &str = "MIRAGE_DAILY_CONTENT_";

// Profile validation -------------------------------------------------------
pub(crate) const USERNAME_MIN_CHARS: usize = 3;
pub(crate) const USERNAME_MAX_CHARS: usize = 15;

// Question shape -----------------------------------------------------------
pub(crate) const STATEMENTS_PER_QUESTION: usize = 4;
pub(crate) const NARROW_DISABLE_COUNT: usize = 2;

// Round and XP tuning ------------------------------------------------------
pub(crate) const DEFAULT_ROUND_SIZE: usize = 8;
pub(crate) const DEFAULT_XP_PER_GAME: u32 = 50;
pub(crate) const DEFAULT_XP_PER_CORRECT: u32 = 10;
pub(crate) const DEFAULT_AID_COST_REVEAL: u32 = 15;
pub(crate) const DEFAULT_AID_COST_NARROW: u32 = 25;
pub(crate) const DEFAULT_STREAK_MILESTONE_INTERVAL: u32 = 5;
pub(crate) const INITIAL_REVEAL_AIDS: u32 = 1;
pub(crate) const INITIAL_NARROW_AIDS: u32 = 1;

// Theme rotation -----------------------------------------------------------
pub(crate) const DEFAULT_THEME_ROTATION_DAYS: u32 = 14;

// Rank thresholds (accuracy percent) ---------------------------------------
pub(crate) const RANK_ORACLE_MIN: u32 = 95;
pub(crate) const RANK_HUNTER_MIN: u32 = 80;
pub(crate) const RANK_INVESTIGATOR_MIN: u32 = 60;
pub(crate) const RANK_SEEKER_MIN: u32 = 40;

// Fallback copy ------------------------------------------------------------
pub(crate) const HINT_FALLBACK: &str =
    "Look for the statement that sounds plausible but overreaches its claim.";
pub(crate) const TAKEAWAY_FALLBACK: &str =
    "A confident voice is not the same thing as a true one.";
pub(crate) const DEEPER_DIVE_FALLBACK: &str =
    "Generated text can weave one invented detail between three real ones. \
     The skill you practiced today is noticing which detail has no source.";
