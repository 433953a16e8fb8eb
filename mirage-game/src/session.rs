//! Session controller: phase transitions and the question batch
//! lifecycle.
//!
//! One controller owns one player session. All game-logic mutation flows
//! through it on a single event stream, so double-submission and
//! aid-spend races reduce to silent precondition rejections. The durable
//! profile is committed at exactly two points: player creation and round
//! completion; abandoning a round in progress discards it without
//! committing partial progress.

use chrono::NaiveDate;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::GameError;
use crate::config::GameConfig;
use crate::constants::HINT_FALLBACK;
use crate::content::{BatchRequest, ContentProvider, DailyContent};
use crate::leaderboard::{LeaderboardClient, LeaderboardEntry};
use crate::profile::{AidKind, PlayerProfile};
use crate::progression::{self, RoundCompletion};
use crate::question::{Question, shuffle_batch};
use crate::reminders::{PermissionStatus, ReminderScheduler};
use crate::round::{AnswerResolution, RoundState};
use crate::storage::ProfileStore;
use crate::summary::RoundReport;

/// Screen-level phase of the session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GamePhase {
    /// No profile yet; waiting for a username.
    Onboarding,
    /// Profile exists, today's round not played; batch may still be
    /// in flight or failed.
    ReadyToStart,
    Playing,
    RoundComplete,
    /// Today's round is done; gate reopens at midnight.
    DailyLocked,
    Leaderboard,
    PersonalStats,
}

/// Orchestrates the progression engine, shuffler, providers, and storage
/// for one player session.
pub struct SessionController<S, P>
where
    S: ProfileStore,
    P: ContentProvider,
{
    storage: S,
    provider: P,
    config: GameConfig,
    rng: SmallRng,
    phase: GamePhase,
    profile: Option<PlayerProfile>,
    round: Option<RoundState>,
    batch: Vec<Question>,
    current_topic: String,
    daily_content: Option<DailyContent>,
    leaderboard_rows: Option<Vec<LeaderboardEntry>>,
    last_result: Option<RoundCompletion>,
}

impl<S, P> SessionController<S, P>
where
    S: ProfileStore,
    P: ContentProvider,
{
    /// Create a controller with an entropy-seeded shuffle RNG.
    #[must_use]
    pub fn new(storage: S, provider: P, config: GameConfig) -> Self {
        Self::with_rng(storage, provider, config, SmallRng::from_entropy())
    }

    /// Create a controller with a caller-provided RNG (deterministic
    /// shuffles for tests and the tester harness).
    #[must_use]
    pub fn with_rng(storage: S, provider: P, config: GameConfig, rng: SmallRng) -> Self {
        Self {
            storage,
            provider,
            config,
            rng,
            phase: GamePhase::Onboarding,
            profile: None,
            round: None,
            batch: Vec::new(),
            current_topic: String::new(),
            daily_content: None,
            leaderboard_rows: None,
            last_result: None,
        }
    }

    /// Resolve the starting phase on app (re)start.
    ///
    /// No profile puts the session in onboarding; a profile gated for
    /// `today` restores the cached daily content and locks; otherwise a
    /// batch prefetch is attempted and the session is ready to start.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Persistence`] when the profile blob cannot be
    /// read. Batch and content-cache failures are recovered locally.
    pub fn startup(&mut self, today: NaiveDate) -> Result<GamePhase, GameError> {
        match self
            .storage
            .load_profile()
            .map_err(GameError::persistence)?
        {
            None => {
                self.phase = GamePhase::Onboarding;
            }
            Some(mut profile) => {
                profile.migrate();
                let gated = progression::daily_gate_check(&profile, today);
                self.profile = Some(profile);
                if gated {
                    self.daily_content = self
                        .storage
                        .load_daily_content(today)
                        .unwrap_or_else(|err| {
                            log::warn!("daily content cache unreadable: {err}");
                            None
                        });
                    self.phase = GamePhase::DailyLocked;
                } else {
                    self.prefetch_batch(today);
                    self.phase = GamePhase::ReadyToStart;
                }
            }
        }
        log::debug!("startup resolved phase {:?}", self.phase);
        Ok(self.phase)
    }

    /// Create the player profile and move to the ready screen, kicking
    /// off the initial batch prefetch.
    ///
    /// # Errors
    ///
    /// [`GameError::Validation`] for a bad username (no state change),
    /// [`GameError::Precondition`] outside the onboarding phase, and
    /// [`GameError::Persistence`] when the profile cannot be written.
    pub fn create_player(&mut self, username: &str, today: NaiveDate) -> Result<(), GameError> {
        if self.phase != GamePhase::Onboarding {
            return Err(GameError::Precondition("player already exists"));
        }
        let profile = progression::create_player(username, &self.config)?;
        self.storage
            .save_profile(&profile)
            .map_err(GameError::persistence)?;
        log::info!("player created: {}", profile.username);
        self.profile = Some(profile);
        self.phase = GamePhase::ReadyToStart;
        self.prefetch_batch(today);
        Ok(())
    }

    /// Fetch and shuffle today's batch. Provider failure or an empty
    /// result leaves the batch empty; `ReadyToStart` surfaces that as a
    /// retry affordance rather than an error.
    pub fn prefetch_batch(&mut self, today: NaiveDate) {
        let Some(profile) = &self.profile else {
            return;
        };
        let Some(tier) = self.config.global_theme(today) else {
            return;
        };
        let onboarding = profile.onboarding.clone().unwrap_or_default();
        let request = BatchRequest {
            topic: &tier.theme,
            theme: &tier.theme,
            level: profile.level,
            streak: profile.streak,
            batch_size: self.config.round_size,
            onboarding: &onboarding,
        };
        let raw = self.provider.generate_batch(&request).unwrap_or_else(|err| {
            log::warn!("batch generation failed, continuing with empty batch: {err}");
            Vec::new()
        });
        self.current_topic = tier.theme.clone();
        self.batch = shuffle_batch(&mut self.rng, &raw);
        log::debug!(
            "batch prefetch: topic={} size={}",
            self.current_topic,
            self.batch.len()
        );
    }

    /// Whether a non-empty batch is staged for play.
    #[must_use]
    pub fn batch_ready(&self) -> bool {
        !self.batch.is_empty()
    }

    /// Begin the daily round over the staged batch.
    ///
    /// # Errors
    ///
    /// [`GameError::Precondition`] outside `ReadyToStart`;
    /// [`GameError::Provider`] when the batch is empty, leaving the
    /// session in `ReadyToStart` so the caller can retry the prefetch.
    pub fn start_round(&mut self) -> Result<(), GameError> {
        if self.phase != GamePhase::ReadyToStart {
            return Err(GameError::Precondition("round can only start when ready"));
        }
        if self.batch.is_empty() {
            return Err(GameError::Provider(
                "questions are not ready yet; retry the fetch".to_string(),
            ));
        }
        let questions = std::mem::take(&mut self.batch);
        log::info!(
            "round started: topic={} questions={}",
            self.current_topic,
            questions.len()
        );
        self.round = Some(RoundState::new(questions));
        self.last_result = None;
        self.phase = GamePhase::Playing;
        Ok(())
    }

    /// Record the player's answer selection. Silent no-op when not
    /// playing or an answer is already pending.
    pub fn select_answer(&mut self, answer_index: usize, elapsed_secs: f32) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.round
            .as_mut()
            .is_some_and(|round| round.select_answer(answer_index, elapsed_secs))
    }

    /// Resolve the pending selection after the acknowledgement delay.
    pub fn resolve_answer(&mut self) -> Option<AnswerResolution> {
        if self.phase != GamePhase::Playing {
            return None;
        }
        let interval = self.config.streak_milestone_interval;
        self.round.as_mut()?.resolve_answer(interval)
    }

    /// Spend an aid on the current question. Silent no-op on any failed
    /// precondition. A successful reveal populates the round's hint from
    /// the provider, with canned text on provider failure.
    pub fn use_aid(&mut self, kind: AidKind) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        let (Some(profile), Some(round)) = (self.profile.as_mut(), self.round.as_mut()) else {
            return false;
        };
        if !progression::use_aid(kind, profile, round, &self.config, &mut self.rng) {
            return false;
        }
        if kind == AidKind::Reveal {
            let topic = self.current_topic.clone();
            let hint = round
                .current_question()
                .cloned()
                .and_then(|q| self.provider.hint(&q, &topic).ok())
                .unwrap_or_else(|| HINT_FALLBACK.to_string());
            round.hint = Some(hint);
        }
        true
    }

    /// Claim a pending milestone aid reward and advance to the next
    /// question. Silent no-op when no reward is pending.
    pub fn claim_aid_reward(&mut self, kind: AidKind) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        let (Some(profile), Some(round)) = (self.profile.as_mut(), self.round.as_mut()) else {
            return false;
        };
        if !progression::claim_aid_reward(kind, profile, round) {
            return false;
        }
        round.advance();
        true
    }

    /// Acknowledge the resolved answer and move the round forward.
    ///
    /// With questions remaining (and no unclaimed milestone reward) the
    /// cursor advances. When the player finishes early (`finish_now`) or
    /// the round size is reached, the round is committed: progression
    /// update, profile save, post-round content (with fallback), content
    /// cache write.
    ///
    /// # Errors
    ///
    /// [`GameError::Precondition`] when not playing or the current answer
    /// is unresolved; [`GameError::Persistence`] when the profile commit
    /// fails (the phase is left unchanged).
    pub fn acknowledge(&mut self, finish_now: bool, today: NaiveDate) -> Result<GamePhase, GameError> {
        if self.phase != GamePhase::Playing {
            return Err(GameError::Precondition("no round in progress"));
        }
        let Some(round) = self.round.as_ref() else {
            return Err(GameError::Precondition("no round in progress"));
        };
        if !round.is_answer_resolved() {
            return Err(GameError::Precondition("current answer is unresolved"));
        }

        if finish_now || round.is_complete() {
            return self.complete_round(today);
        }
        if round.pending_aid_reward {
            // Wait for the claim before advancing.
            return Ok(GamePhase::Playing);
        }
        if let Some(round) = self.round.as_mut() {
            round.advance();
        }
        Ok(GamePhase::Playing)
    }

    fn complete_round(&mut self, today: NaiveDate) -> Result<GamePhase, GameError> {
        let (Some(profile), Some(round)) = (self.profile.as_mut(), self.round.as_ref()) else {
            return Err(GameError::Precondition("no round in progress"));
        };
        let completion = progression::complete_round(profile, round, today, &self.config);
        self.storage
            .save_profile(profile)
            .map_err(GameError::persistence)?;

        let onboarding = profile.onboarding.clone().unwrap_or_default();
        let topic = self.current_topic.clone();
        let content = self
            .provider
            .post_round_summary(&topic, &topic, &onboarding)
            .unwrap_or_else(|err| {
                log::warn!("post-round content failed, using fallback: {err}");
                DailyContent::fallback(&topic)
            });
        if let Err(err) = self.storage.save_daily_content(today, &content) {
            log::warn!("daily content cache write failed: {err}");
        }
        self.daily_content = Some(content);
        self.last_result = Some(completion);
        self.phase = GamePhase::RoundComplete;
        Ok(self.phase)
    }

    /// Submit the finished round's score. Fire-and-forget: client
    /// failures are logged, never surfaced.
    pub fn submit_score<L: LeaderboardClient>(&self, client: &mut L) {
        let (Some(profile), Some(round)) = (&self.profile, &self.round) else {
            return;
        };
        if self.phase != GamePhase::RoundComplete {
            return;
        }
        if let Err(err) =
            client.submit_score(&profile.username, round.score, round.total_time_secs())
        {
            log::warn!("score submission failed: {err}");
        }
    }

    /// Post-round notification hookup: permission is requested after the
    /// first completed game, and the daily reminder re-scheduled with the
    /// current streak. Never blocks.
    pub fn schedule_reminder<N: ReminderScheduler>(&self, scheduler: &mut N) {
        let Some(profile) = &self.profile else {
            return;
        };
        if profile.games_played == 1
            && scheduler.request_permission() == PermissionStatus::Denied
        {
            return;
        }
        scheduler.schedule_reminder(profile.streak);
    }

    /// Leave the completion screen; today's round is locked in.
    ///
    /// # Errors
    ///
    /// [`GameError::Precondition`] outside `RoundComplete`.
    pub fn finish_session(&mut self) -> Result<GamePhase, GameError> {
        if self.phase != GamePhase::RoundComplete {
            return Err(GameError::Precondition("no completed round to finish"));
        }
        self.round = None;
        self.phase = GamePhase::DailyLocked;
        Ok(self.phase)
    }

    /// Discard an in-progress round without committing anything (app
    /// backgrounded, navigation away). Silent no-op when not playing.
    pub fn abandon_round(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        log::info!("round abandoned; in-round state discarded");
        self.round = None;
        self.phase = GamePhase::ReadyToStart;
    }

    /// Fetch and show the daily leaderboard. Read-only side branch off
    /// the locked screen.
    ///
    /// # Errors
    ///
    /// [`GameError::Precondition`] outside `DailyLocked`;
    /// [`GameError::Provider`] when the fetch fails (phase unchanged).
    pub fn view_leaderboard<L: LeaderboardClient>(
        &mut self,
        client: &mut L,
    ) -> Result<&[LeaderboardEntry], GameError> {
        if self.phase != GamePhase::DailyLocked {
            return Err(GameError::Precondition(
                "leaderboard is reachable only from the locked screen",
            ));
        }
        let username = self.profile.as_ref().map_or("", |p| p.username.as_str());
        let rows = client
            .fetch_daily(username)
            .map_err(|err| GameError::Provider(err.to_string()))?;
        self.leaderboard_rows = Some(rows);
        self.phase = GamePhase::Leaderboard;
        Ok(self.leaderboard_rows.as_deref().unwrap_or_default())
    }

    /// Show lifetime stats. Side branch off the locked screen.
    ///
    /// # Errors
    ///
    /// [`GameError::Precondition`] outside `DailyLocked`.
    pub fn view_stats(&mut self) -> Result<GamePhase, GameError> {
        if self.phase != GamePhase::DailyLocked {
            return Err(GameError::Precondition(
                "stats are reachable only from the locked screen",
            ));
        }
        self.phase = GamePhase::PersonalStats;
        Ok(self.phase)
    }

    /// Return from a side branch to the locked screen. Silent no-op
    /// elsewhere.
    pub fn back_to_locked(&mut self) {
        if matches!(self.phase, GamePhase::Leaderboard | GamePhase::PersonalStats) {
            self.phase = GamePhase::DailyLocked;
        }
    }

    /// Toggle the persisted sound preference.
    ///
    /// # Errors
    ///
    /// [`GameError::Precondition`] without a profile;
    /// [`GameError::Persistence`] when the write fails.
    pub fn toggle_sound(&mut self) -> Result<bool, GameError> {
        let Some(profile) = self.profile.as_mut() else {
            return Err(GameError::Precondition("no profile"));
        };
        profile.sound_enabled = !profile.sound_enabled;
        self.storage
            .save_profile(profile)
            .map_err(GameError::persistence)?;
        Ok(profile.sound_enabled)
    }

    /// Wipe the profile and return to onboarding.
    ///
    /// # Errors
    ///
    /// [`GameError::Persistence`] when the blob cannot be removed.
    pub fn reset_progress(&mut self) -> Result<(), GameError> {
        self.storage
            .remove_profile()
            .map_err(GameError::persistence)?;
        self.profile = None;
        self.round = None;
        self.batch.clear();
        self.daily_content = None;
        self.leaderboard_rows = None;
        self.last_result = None;
        self.phase = GamePhase::Onboarding;
        Ok(())
    }

    /// Completion-screen report for the just-finished round, if any.
    #[must_use]
    pub fn round_report(&self) -> Option<RoundReport> {
        let round = self.round.as_ref()?;
        let completion = self.last_result.as_ref()?;
        Some(RoundReport::new(round, completion))
    }

    #[must_use]
    pub const fn phase(&self) -> GamePhase {
        self.phase
    }

    #[must_use]
    pub const fn profile(&self) -> Option<&PlayerProfile> {
        self.profile.as_ref()
    }

    #[must_use]
    pub const fn round(&self) -> Option<&RoundState> {
        self.round.as_ref()
    }

    #[must_use]
    pub fn current_topic(&self) -> &str {
        &self.current_topic
    }

    #[must_use]
    pub const fn daily_content(&self) -> Option<&DailyContent> {
        self.daily_content.as_ref()
    }

    #[must_use]
    pub const fn last_result(&self) -> Option<&RoundCompletion> {
        self.last_result.as_ref()
    }

    #[must_use]
    pub fn leaderboard_rows(&self) -> Option<&[LeaderboardEntry]> {
        self.leaderboard_rows.as_deref()
    }

    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::MockLeaderboard;
    use crate::storage::MemoryStore;
    use std::io;

    /// Scripted provider: serves a fixed batch, optionally failing the
    /// first N batch calls.
    struct FixtureProvider {
        fail_batches: u32,
        batch_size: usize,
    }

    impl FixtureProvider {
        fn new(batch_size: usize) -> Self {
            Self {
                fail_batches: 0,
                batch_size,
            }
        }

        fn flaky(batch_size: usize, failures: u32) -> Self {
            Self {
                fail_batches: failures,
                batch_size,
            }
        }
    }

    impl ContentProvider for FixtureProvider {
        type Error = io::Error;

        fn generate_batch(
            &mut self,
            request: &BatchRequest<'_>,
        ) -> Result<Vec<Question>, Self::Error> {
            if self.fail_batches > 0 {
                self.fail_batches -= 1;
                return Err(io::Error::other("backend unavailable"));
            }
            Ok((0..self.batch_size.min(request.batch_size))
                .map(|i| Question {
                    statements: (0..4).map(|s| format!("q{i} statement {s}")).collect(),
                    correct_answer: i % 4,
                    explanation: format!("q{i} explanation"),
                })
                .collect())
        }

        fn post_round_summary(
            &mut self,
            topic: &str,
            _theme: &str,
            _onboarding: &crate::profile::OnboardingProfile,
        ) -> Result<DailyContent, Self::Error> {
            Ok(DailyContent {
                topic: topic.to_string(),
                key_takeaway: "takeaway".to_string(),
                deeper_dive: "dive".to_string(),
                keywords: vec!["one".to_string()],
            })
        }

        fn hint(&mut self, _question: &Question, _topic: &str) -> Result<String, Self::Error> {
            Ok("scripted hint".to_string())
        }
    }

    fn controller(
        provider: FixtureProvider,
    ) -> SessionController<MemoryStore, FixtureProvider> {
        SessionController::with_rng(
            MemoryStore::new(),
            provider,
            GameConfig::default(),
            SmallRng::seed_from_u64(42),
        )
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 27).unwrap()
    }

    fn answer_current(session: &mut SessionController<MemoryStore, FixtureProvider>, correct: bool) {
        let question = session.round().unwrap().current_question().unwrap();
        let pick = if correct {
            question.correct_answer
        } else {
            (question.correct_answer + 1) % 4
        };
        assert!(session.select_answer(pick, 1.5));
        session.resolve_answer().unwrap();
    }

    #[test]
    fn fresh_install_lands_in_onboarding() {
        let mut session = controller(FixtureProvider::new(8));
        assert_eq!(session.startup(today()).unwrap(), GamePhase::Onboarding);
        assert!(session.profile().is_none());
    }

    #[test]
    fn create_player_prefetches_and_readies() {
        let mut session = controller(FixtureProvider::new(8));
        session.startup(today()).unwrap();
        session.create_player("Sara", today()).unwrap();
        assert_eq!(session.phase(), GamePhase::ReadyToStart);
        assert!(session.batch_ready());
        assert!(!session.current_topic().is_empty());
    }

    #[test]
    fn bad_username_leaves_state_untouched() {
        let mut session = controller(FixtureProvider::new(8));
        session.startup(today()).unwrap();
        let err = session.create_player("ab", today()).unwrap_err();
        assert!(matches!(err, GameError::Validation(_)));
        assert_eq!(session.phase(), GamePhase::Onboarding);
        assert!(session.profile().is_none());
    }

    #[test]
    fn empty_batch_blocks_start_until_retry_succeeds() {
        let mut session = controller(FixtureProvider::flaky(8, 1));
        session.startup(today()).unwrap();
        session.create_player("Sara", today()).unwrap();
        assert!(!session.batch_ready());

        let err = session.start_round().unwrap_err();
        assert!(matches!(err, GameError::Provider(_)));
        assert_eq!(session.phase(), GamePhase::ReadyToStart);

        session.prefetch_batch(today());
        assert!(session.batch_ready());
        session.start_round().unwrap();
        assert_eq!(session.phase(), GamePhase::Playing);
    }

    #[test]
    fn full_round_commits_profile_and_locks() {
        let mut session = controller(FixtureProvider::new(8));
        session.startup(today()).unwrap();
        session.create_player("Sara", today()).unwrap();
        session.start_round().unwrap();

        for i in 0..8 {
            answer_current(&mut session, i < 6);
            if session.round().unwrap().pending_aid_reward {
                assert!(session.claim_aid_reward(AidKind::Narrow));
            } else {
                session.acknowledge(false, today()).unwrap();
            }
        }
        assert_eq!(session.phase(), GamePhase::RoundComplete);

        let result = session.last_result().unwrap();
        let cfg = session.config();
        assert_eq!(result.xp_earned, cfg.xp.per_game + 6 * cfg.xp.per_correct);
        let profile = session.profile().unwrap();
        assert_eq!(profile.streak, 1);
        assert_eq!(profile.games_played, 1);
        assert_eq!(profile.total_correct_answers, 6);

        let report = session.round_report().unwrap();
        assert_eq!(report.score, 6);
        assert_eq!(report.accuracy, 75);

        session.finish_session().unwrap();
        assert_eq!(session.phase(), GamePhase::DailyLocked);
        assert!(session.round().is_none());
    }

    #[test]
    fn unresolved_answer_blocks_acknowledge() {
        let mut session = controller(FixtureProvider::new(8));
        session.startup(today()).unwrap();
        session.create_player("Sara", today()).unwrap();
        session.start_round().unwrap();
        let err = session.acknowledge(false, today()).unwrap_err();
        assert!(matches!(err, GameError::Precondition(_)));
    }

    #[test]
    fn milestone_reward_holds_advancement_until_claimed() {
        let mut session = controller(FixtureProvider::new(8));
        session.startup(today()).unwrap();
        session.create_player("Sara", today()).unwrap();
        session.start_round().unwrap();

        for _ in 0..5 {
            answer_current(&mut session, true);
            if !session.round().unwrap().pending_aid_reward {
                session.acknowledge(false, today()).unwrap();
            }
        }
        let round = session.round().unwrap();
        assert!(round.pending_aid_reward);
        assert_eq!(round.current_index, 5);

        // Continue without claiming: the cursor must not move.
        session.acknowledge(false, today()).unwrap();
        assert_eq!(session.round().unwrap().current_index, 5);

        assert!(session.claim_aid_reward(AidKind::Reveal));
        assert_eq!(session.round().unwrap().current_index, 6);
        assert_eq!(session.profile().unwrap().aids.reveal, 2);
    }

    #[test]
    fn reveal_aid_surfaces_a_hint() {
        let mut session = controller(FixtureProvider::new(8));
        session.startup(today()).unwrap();
        session.create_player("Sara", today()).unwrap();
        // Seed enough XP to afford the aid.
        {
            let mut profile = session.profile().unwrap().clone();
            profile.xp = 100;
            session.profile = Some(profile);
        }
        session.start_round().unwrap();
        assert!(session.use_aid(AidKind::Reveal));
        assert_eq!(
            session.round().unwrap().hint.as_deref(),
            Some("scripted hint")
        );
        assert_eq!(session.profile().unwrap().aids.reveal, 0);
    }

    #[test]
    fn finish_now_commits_a_partial_round() {
        let mut session = controller(FixtureProvider::new(8));
        session.startup(today()).unwrap();
        session.create_player("Sara", today()).unwrap();
        session.start_round().unwrap();

        answer_current(&mut session, true);
        let phase = session.acknowledge(true, today()).unwrap();
        assert_eq!(phase, GamePhase::RoundComplete);
        let profile = session.profile().unwrap();
        assert_eq!(profile.total_correct_answers, 1);
        assert_eq!(profile.games_played, 1);
    }

    #[test]
    fn abandoning_a_round_discards_progress() {
        let mut session = controller(FixtureProvider::new(8));
        session.startup(today()).unwrap();
        session.create_player("Sara", today()).unwrap();
        session.start_round().unwrap();
        answer_current(&mut session, true);
        session.acknowledge(false, today()).unwrap();

        session.abandon_round();
        assert_eq!(session.phase(), GamePhase::ReadyToStart);
        assert!(session.round().is_none());
        let profile = session.profile().unwrap();
        assert_eq!(profile.games_played, 0);
        assert_eq!(profile.xp, 0);
        assert!(profile.last_played_date.is_none());
    }

    #[test]
    fn side_branches_only_open_from_the_locked_screen() {
        let mut session = controller(FixtureProvider::new(8));
        session.startup(today()).unwrap();
        session.create_player("Sara", today()).unwrap();
        let mut board = MockLeaderboard::new();
        assert!(session.view_leaderboard(&mut board).is_err());
        assert!(session.view_stats().is_err());

        session.start_round().unwrap();
        answer_current(&mut session, true);
        session.acknowledge(true, today()).unwrap();
        session.submit_score(&mut board);
        session.finish_session().unwrap();

        let rows = session.view_leaderboard(&mut board).unwrap();
        assert!(rows.iter().any(|r| r.is_current_user));
        assert_eq!(session.phase(), GamePhase::Leaderboard);
        session.back_to_locked();
        assert_eq!(session.phase(), GamePhase::DailyLocked);

        session.view_stats().unwrap();
        assert_eq!(session.phase(), GamePhase::PersonalStats);
        session.back_to_locked();
        assert_eq!(session.phase(), GamePhase::DailyLocked);
    }

    #[test]
    fn gated_restart_restores_cached_content() {
        let store = MemoryStore::new();
        let mut session = SessionController::with_rng(
            store,
            FixtureProvider::new(8),
            GameConfig::default(),
            SmallRng::seed_from_u64(7),
        );
        session.startup(today()).unwrap();
        session.create_player("Sara", today()).unwrap();
        session.start_round().unwrap();
        answer_current(&mut session, true);
        session.acknowledge(true, today()).unwrap();
        session.finish_session().unwrap();

        // Same storage, fresh controller: simulates an app restart.
        let SessionController { storage, .. } = session;
        let mut restarted = SessionController::with_rng(
            storage,
            FixtureProvider::new(8),
            GameConfig::default(),
            SmallRng::seed_from_u64(8),
        );
        assert_eq!(restarted.startup(today()).unwrap(), GamePhase::DailyLocked);
        assert!(restarted.daily_content().is_some());

        // Next day the gate reopens.
        let tomorrow = today() + chrono::Days::new(1);
        assert_eq!(
            restarted.startup(tomorrow).unwrap(),
            GamePhase::ReadyToStart
        );
        assert!(restarted.batch_ready());
    }

    #[test]
    fn reset_progress_returns_to_onboarding() {
        let mut session = controller(FixtureProvider::new(8));
        session.startup(today()).unwrap();
        session.create_player("Sara", today()).unwrap();
        session.reset_progress().unwrap();
        assert_eq!(session.phase(), GamePhase::Onboarding);
        assert!(session.profile().is_none());
        assert_eq!(session.startup(today()).unwrap(), GamePhase::Onboarding);
    }
}
