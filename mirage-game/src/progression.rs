//! Progression engine: XP, levels, daily streaks, the daily gate, and
//! aid spending.
//!
//! Every operation takes the profile and round explicitly; there is no
//! hidden session state. Precondition failures (double spend, not enough
//! XP) are silent no-ops per the error design, while username validation
//! surfaces a [`GameError::Validation`].

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::GameError;
use crate::config::GameConfig;
use crate::constants::NARROW_DISABLE_COUNT;
use crate::profile::{AidKind, PlayerProfile};
use crate::round::RoundState;

/// Result of committing a completed round to the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundCompletion {
    pub xp_earned: u32,
    pub did_level_up: bool,
    pub new_level: u32,
    pub new_streak: u32,
}

/// Create a fresh profile for a new player.
///
/// # Errors
///
/// Returns [`GameError::Validation`] when the username is outside the
/// allowed length range. No state is touched on failure.
pub fn create_player(username: &str, cfg: &GameConfig) -> Result<PlayerProfile, GameError> {
    PlayerProfile::new(username, cfg.initial_aids)
}

/// True iff the player already completed today's round.
#[must_use]
pub fn daily_gate_check(profile: &PlayerProfile, today: NaiveDate) -> bool {
    profile.last_played_date == Some(today)
}

/// Time remaining until the next local midnight, when the daily gate
/// reopens. Pure; the presentation layer polls it for the countdown.
#[must_use]
pub fn time_until_next_unlock(now: NaiveDateTime) -> Duration {
    now.date()
        .succ_opt()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map_or_else(Duration::zero, |midnight| midnight - now)
}

/// Commit a finished round: daily streak, XP, level, lifetime counters.
///
/// The daily streak extends only when the previous completion was exactly
/// yesterday; any gap resets it to 1. The level scan walks the whole
/// threshold table, so one large award can advance multiple levels.
pub fn complete_round(
    profile: &mut PlayerProfile,
    round: &RoundState,
    today: NaiveDate,
    cfg: &GameConfig,
) -> RoundCompletion {
    let yesterday = today.pred_opt();
    let new_streak = if profile.last_played_date.is_some() && profile.last_played_date == yesterday
    {
        profile.streak + 1
    } else {
        1
    };

    let xp_earned = cfg.xp.per_game + round.score * cfg.xp.per_correct;
    profile.xp = profile.xp.saturating_add(xp_earned);

    let new_level = cfg.level_for_xp(profile.xp).max(profile.level);
    let did_level_up = new_level > profile.level;
    profile.level = new_level;

    profile.last_played_date = Some(today);
    profile.streak = new_streak;
    profile.longest_streak = profile.longest_streak.max(new_streak);
    profile.games_played += 1;
    profile.total_correct_answers += round.score;

    log::info!(
        "round complete: player={} score={}/{} xp=+{xp_earned} level={} streak={new_streak}",
        profile.username,
        round.score,
        round.len(),
        profile.level,
    );

    RoundCompletion {
        xp_earned,
        did_level_up,
        new_level,
        new_streak,
    }
}

/// Spend an aid for the current question.
///
/// Fails silently (returns false, no state change) when the player lacks
/// the XP cost or has no credits of that kind, or when the current
/// question already has an answer pending. On success the XP cost is
/// deducted and the credit consumed; `narrow` additionally disables two
/// random incorrect options, never the fabricated statement and never an
/// already-selected index. `reveal` leaves the hint fetch to the caller.
pub fn use_aid<R: Rng + ?Sized>(
    kind: AidKind,
    profile: &mut PlayerProfile,
    round: &mut RoundState,
    cfg: &GameConfig,
    rng: &mut R,
) -> bool {
    if round.selected_answer.is_some() {
        return false;
    }
    let cost = cfg.aid_costs.cost(kind);
    if profile.xp < cost || profile.aids.count(kind) == 0 {
        return false;
    }
    let Some(question) = round.current_question() else {
        return false;
    };

    if kind == AidKind::Narrow {
        let mut candidates: Vec<usize> = (0..question.statements.len())
            .filter(|&i| i != question.correct_answer && Some(i) != round.selected_answer)
            .collect();
        candidates.shuffle(rng);
        candidates.truncate(NARROW_DISABLE_COUNT);
        for idx in candidates {
            if !round.disabled_answers.contains(&idx) {
                round.disabled_answers.push(idx);
            }
        }
    }

    profile.xp -= cost;
    profile.aids.spend(kind);
    log::debug!(
        "aid used: kind={kind:?} cost={cost} xp_left={} remaining={}",
        profile.xp,
        profile.aids.count(kind),
    );
    true
}

/// Claim a milestone aid reward: one bonus credit, signal cleared.
///
/// Silent no-op when no reward is pending.
pub fn claim_aid_reward(kind: AidKind, profile: &mut PlayerProfile, round: &mut RoundState) -> bool {
    if !round.pending_aid_reward {
        return false;
    }
    profile.aids.grant(kind);
    round.clear_aid_reward();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::Question;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn cfg() -> GameConfig {
        GameConfig::default()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn finished_round(correct: u32, total: usize) -> RoundState {
        let questions: Vec<Question> = (0..total)
            .map(|_| Question {
                statements: (0..4).map(|i| format!("s{i}")).collect(),
                correct_answer: 2,
                explanation: String::new(),
            })
            .collect();
        let mut round = RoundState::new(questions);
        for i in 0..total {
            let pick = if (i as u32) < correct { 2 } else { 0 };
            round.select_answer(pick, 1.0);
            round.resolve_answer(0);
            round.advance();
        }
        round
    }

    #[test]
    fn first_round_sets_streak_one_and_awards_xp() {
        let cfg = cfg();
        let mut sara = create_player("Sara", &cfg).unwrap();
        let round = finished_round(6, 8);
        let today = date(2026, 8, 27);

        let result = complete_round(&mut sara, &round, today, &cfg);
        assert_eq!(sara.streak, 1);
        assert_eq!(result.xp_earned, cfg.xp.per_game + 6 * cfg.xp.per_correct);
        assert_eq!(sara.xp, result.xp_earned);
        assert_eq!(sara.games_played, 1);
        assert_eq!(sara.total_correct_answers, 6);
        assert_eq!(sara.last_played_date, Some(today));
    }

    #[test]
    fn next_day_completion_extends_the_streak() {
        let cfg = cfg();
        let mut p = create_player("Sara", &cfg).unwrap();
        p.streak = 3;
        p.longest_streak = 3;
        p.last_played_date = Some(date(2026, 8, 26));

        let result = complete_round(&mut p, &finished_round(5, 8), date(2026, 8, 27), &cfg);
        assert_eq!(result.new_streak, 4);
        assert_eq!(p.streak, 4);
        assert_eq!(p.longest_streak, 4);
    }

    #[test]
    fn a_missed_day_resets_the_streak_to_one() {
        let cfg = cfg();
        let mut p = create_player("Sara", &cfg).unwrap();
        p.streak = 9;
        p.longest_streak = 9;
        p.last_played_date = Some(date(2026, 8, 25));

        complete_round(&mut p, &finished_round(8, 8), date(2026, 8, 27), &cfg);
        assert_eq!(p.streak, 1);
        assert_eq!(p.longest_streak, 9, "high-water mark never regresses");
    }

    #[test]
    fn longest_streak_is_nondecreasing_across_rounds() {
        let cfg = cfg();
        let mut p = create_player("Sara", &cfg).unwrap();
        let mut prior = 0;
        let mut day = date(2026, 1, 1);
        for gap in [1i64, 1, 3, 1, 1, 1, 10, 1] {
            day += Duration::days(gap);
            complete_round(&mut p, &finished_round(4, 8), day, &cfg);
            assert!(p.longest_streak >= prior);
            assert!(p.longest_streak >= p.streak);
            prior = p.longest_streak;
        }
    }

    #[test]
    fn level_up_can_span_multiple_thresholds() {
        let mut cfg = cfg();
        // Inflate the per-correct bonus so one round jumps two tiers.
        cfg.xp.per_correct = 40;
        let mut p = create_player("Sara", &cfg).unwrap();
        let result = complete_round(&mut p, &finished_round(8, 8), date(2026, 8, 27), &cfg);
        // 50 + 8*40 = 370 XP: past level 2 (100) and level 3 (250).
        assert_eq!(result.xp_earned, 370);
        assert!(result.did_level_up);
        assert_eq!(p.level, 3);
    }

    #[test]
    fn level_never_regresses_below_a_migrated_value() {
        let cfg = cfg();
        let mut p = create_player("Sara", &cfg).unwrap();
        p.level = 5;
        p.xp = 0;
        let result = complete_round(&mut p, &finished_round(0, 8), date(2026, 8, 27), &cfg);
        assert!(!result.did_level_up);
        assert_eq!(p.level, 5);
    }

    #[test]
    fn daily_gate_is_idempotent() {
        let cfg = cfg();
        let mut p = create_player("Sara", &cfg).unwrap();
        let today = date(2026, 8, 27);
        assert!(!daily_gate_check(&p, today));
        assert!(!daily_gate_check(&p, today));
        complete_round(&mut p, &finished_round(3, 8), today, &cfg);
        assert!(daily_gate_check(&p, today));
        assert!(daily_gate_check(&p, today));
        assert!(!daily_gate_check(&p, date(2026, 8, 28)));
    }

    #[test]
    fn unlock_countdown_reaches_midnight() {
        let now = date(2026, 8, 27).and_hms_opt(22, 30, 0).unwrap();
        assert_eq!(time_until_next_unlock(now), Duration::minutes(90));
        let midnight = date(2026, 8, 27).and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(time_until_next_unlock(midnight), Duration::hours(24));
    }

    #[test]
    fn narrow_never_disables_the_fabricated_statement() {
        let cfg = cfg();
        let mut p = create_player("Sara", &cfg).unwrap();
        p.xp = 500;
        for seed in 0..64 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut round = RoundState::new(vec![Question {
                statements: (0..4).map(|i| format!("s{i}")).collect(),
                correct_answer: 2,
                explanation: String::new(),
            }]);
            p.aids.narrow = 1;
            assert!(use_aid(AidKind::Narrow, &mut p, &mut round, &cfg, &mut rng));
            assert_eq!(round.disabled_answers.len(), NARROW_DISABLE_COUNT);
            assert!(!round.disabled_answers.contains(&2));
            assert!(round.disabled_answers.iter().all(|&i| [0, 1, 3].contains(&i)));
        }
    }

    #[test]
    fn aid_spend_fails_silently_without_xp_or_credits() {
        let cfg = cfg();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut p = create_player("Sara", &cfg).unwrap();
        let mut round = RoundState::new(vec![Question {
            statements: (0..4).map(|i| format!("s{i}")).collect(),
            correct_answer: 0,
            explanation: String::new(),
        }]);

        // No XP yet.
        assert!(!use_aid(AidKind::Reveal, &mut p, &mut round, &cfg, &mut rng));
        assert_eq!(p.aids.reveal, 1);

        // XP but no credits.
        p.xp = 500;
        p.aids.reveal = 0;
        assert!(!use_aid(AidKind::Reveal, &mut p, &mut round, &cfg, &mut rng));
        assert_eq!(p.xp, 500);

        // Answer already pending.
        p.aids.reveal = 1;
        round.select_answer(1, 1.0);
        assert!(!use_aid(AidKind::Reveal, &mut p, &mut round, &cfg, &mut rng));
        assert_eq!(p.xp, 500);
    }

    #[test]
    fn claim_grants_exactly_one_credit() {
        let cfg = cfg();
        let mut p = create_player("Sara", &cfg).unwrap();
        let mut round = finished_round(0, 1);
        assert!(!claim_aid_reward(AidKind::Narrow, &mut p, &mut round));
        round.pending_aid_reward = true;
        assert!(claim_aid_reward(AidKind::Narrow, &mut p, &mut round));
        assert_eq!(p.aids.narrow, 2);
        assert!(!round.pending_aid_reward);
        assert!(!claim_aid_reward(AidKind::Narrow, &mut p, &mut round));
        assert_eq!(p.aids.narrow, 2);
    }
}
