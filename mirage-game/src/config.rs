//! Tunable balance configuration for the daily challenge loop.
//!
//! Everything the balance team tunes lives here: round size, XP bonuses,
//! aid costs, the level schedule, and the biweekly theme rotation.
//! Defaults come from `constants`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_AID_COST_NARROW, DEFAULT_AID_COST_REVEAL, DEFAULT_ROUND_SIZE,
    DEFAULT_STREAK_MILESTONE_INTERVAL, DEFAULT_THEME_ROTATION_DAYS, DEFAULT_XP_PER_CORRECT,
    DEFAULT_XP_PER_GAME, INITIAL_NARROW_AIDS, INITIAL_REVEAL_AIDS,
};
use crate::profile::{AidInventory, AidKind};

/// XP awarded at round completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpConfig {
    /// Flat bonus for finishing a round, regardless of score.
    pub per_game: u32,
    /// Bonus per correctly answered question.
    pub per_correct: u32,
}

/// XP cost of spending each aid kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AidCosts {
    pub reveal: u32,
    pub narrow: u32,
}

impl AidCosts {
    /// Cost of one use of the given aid kind.
    #[must_use]
    pub const fn cost(&self, kind: AidKind) -> u32 {
        match kind {
            AidKind::Reveal => self.reveal,
            AidKind::Narrow => self.narrow,
        }
    }
}

/// One entry of the ordered level schedule.
///
/// `xp_required` is cumulative: a player is at level `level` once their
/// lifetime XP reaches it. The theme doubles as the biweekly challenge
/// topic in the rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelTier {
    pub level: u32,
    pub theme: String,
    pub xp_required: u32,
}

/// Complete tuning surface for the game core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Questions per daily round.
    pub round_size: usize,
    pub xp: XpConfig,
    pub aid_costs: AidCosts,
    /// In-round correct streak length that earns a bonus aid.
    pub streak_milestone_interval: u32,
    /// Aids granted to a freshly created player.
    pub initial_aids: AidInventory,
    /// Ordered, ascending by `xp_required`, starting at level 1 with 0 XP.
    pub level_schedule: Vec<LevelTier>,
    /// Anchor date for the theme rotation.
    pub launch_date: NaiveDate,
    /// Days each theme stays active before rotating.
    pub theme_rotation_days: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        let themes: [(&str, u32); 10] = [
            ("Lost civilizations", 0),
            ("Space exploration", 100),
            ("The deep ocean", 250),
            ("Inventions and inventors", 450),
            ("World mythology", 700),
            ("The human body", 1_000),
            ("Natural wonders", 1_400),
            ("Art and artists", 1_900),
            ("Computing history", 2_500),
            ("Food and cuisine", 3_200),
        ];
        let level_schedule = themes
            .iter()
            .enumerate()
            .map(|(i, (theme, xp_required))| LevelTier {
                level: u32::try_from(i).unwrap_or(0) + 1,
                theme: (*theme).to_string(),
                xp_required: *xp_required,
            })
            .collect();
        Self {
            round_size: DEFAULT_ROUND_SIZE,
            xp: XpConfig {
                per_game: DEFAULT_XP_PER_GAME,
                per_correct: DEFAULT_XP_PER_CORRECT,
            },
            aid_costs: AidCosts {
                reveal: DEFAULT_AID_COST_REVEAL,
                narrow: DEFAULT_AID_COST_NARROW,
            },
            streak_milestone_interval: DEFAULT_STREAK_MILESTONE_INTERVAL,
            initial_aids: AidInventory {
                reveal: INITIAL_REVEAL_AIDS,
                narrow: INITIAL_NARROW_AIDS,
            },
            level_schedule,
            launch_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap_or_default(),
            theme_rotation_days: DEFAULT_THEME_ROTATION_DAYS,
        }
    }
}

impl GameConfig {
    /// Schedule entry for an exact level, if present.
    #[must_use]
    pub fn tier(&self, level: u32) -> Option<&LevelTier> {
        self.level_schedule.iter().find(|t| t.level == level)
    }

    /// Highest scheduled level whose cumulative XP requirement is met.
    ///
    /// The scan covers the whole table, so one large award can span
    /// several thresholds in a single round.
    #[must_use]
    pub fn level_for_xp(&self, xp: u32) -> u32 {
        self.level_schedule
            .iter()
            .filter(|t| xp >= t.xp_required)
            .map(|t| t.level)
            .max()
            .unwrap_or(1)
    }

    /// Active theme tier for a calendar date, rotating every
    /// `theme_rotation_days` since `launch_date`.
    ///
    /// Dates before launch clamp to the first entry.
    #[must_use]
    pub fn global_theme(&self, today: NaiveDate) -> Option<&LevelTier> {
        if self.level_schedule.is_empty() {
            return None;
        }
        let days = (today - self.launch_date).num_days().max(0);
        let period = i64::from(self.theme_rotation_days.max(1));
        let idx = usize::try_from(days / period).unwrap_or(0) % self.level_schedule.len();
        self.level_schedule.get(idx)
    }
}
