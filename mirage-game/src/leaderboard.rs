//! Daily leaderboard client seam and the illustrative mock backend.
//!
//! Scores are not validated server-side; the mock exists so the locked
//! screen has something to show and is explicitly not authoritative.

use std::convert::Infallible;

use serde::{Deserialize, Serialize};

/// One ranked row of the daily board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub username: String,
    pub score: u32,
    #[serde(default)]
    pub is_current_user: bool,
}

/// Client seam for the daily leaderboard.
pub trait LeaderboardClient {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Submit a finished round's score. Fire-and-forget from the
    /// session's point of view.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend rejects or cannot receive the
    /// submission.
    fn submit_score(
        &mut self,
        username: &str,
        score: u32,
        elapsed_secs: f32,
    ) -> Result<(), Self::Error>;

    /// Fetch today's board, ordered by rank.
    ///
    /// # Errors
    ///
    /// Returns an error when the board cannot be fetched.
    fn fetch_daily(&mut self, current_user: &str) -> Result<Vec<LeaderboardEntry>, Self::Error>;
}

/// Deterministic mock backend: a fixed field of opponents merged with the
/// current player's submitted score, ranked by score descending.
#[derive(Debug, Clone, Default)]
pub struct MockLeaderboard {
    submitted: Option<(String, u32)>,
}

const MOCK_FIELD: &[(&str, u32)] = &[
    ("IllusionLord", 8),
    ("FactFinder", 8),
    ("MorningStar", 7),
    ("Seeker_99", 7),
    ("ShadowOfTruth", 6),
    ("DesertFalcon", 5),
    ("Noor", 5),
    ("TheDetective", 4),
    ("TimeTraveler", 3),
];

impl MockLeaderboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LeaderboardClient for MockLeaderboard {
    type Error = Infallible;

    fn submit_score(
        &mut self,
        username: &str,
        score: u32,
        _elapsed_secs: f32,
    ) -> Result<(), Self::Error> {
        self.submitted = Some((username.to_string(), score));
        Ok(())
    }

    fn fetch_daily(&mut self, current_user: &str) -> Result<Vec<LeaderboardEntry>, Self::Error> {
        let mut rows: Vec<(String, u32, bool)> = MOCK_FIELD
            .iter()
            .map(|(name, score)| ((*name).to_string(), *score, false))
            .collect();
        if let Some((name, score)) = &self.submitted
            && name == current_user
        {
            rows.push((name.clone(), *score, true));
        }
        // Stable sort keeps the fixed field's order among score ties.
        rows.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(rows
            .into_iter()
            .enumerate()
            .map(|(i, (username, score, is_current_user))| LeaderboardEntry {
                rank: u32::try_from(i).unwrap_or(u32::MAX).saturating_add(1),
                username,
                score,
                is_current_user,
            })
            .collect())
    }
}
