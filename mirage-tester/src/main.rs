mod scripted;

use anyhow::{Context, Result, bail, ensure};
use chrono::{Days, NaiveDate};
use clap::Parser;
use colored::Colorize;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;

use mirage_game::{
    AidKind, GameConfig, GamePhase, MemoryStore, MockLeaderboard, NullScheduler, RoundReport,
    SessionController, share_text,
};
use scripted::ScriptedProvider;

#[derive(Debug, Parser)]
#[command(name = "mirage-tester", version = "0.1.0")]
#[command(about = "Automated QA testing for the Mirage game core - scripted multi-day sessions")]
struct Args {
    /// Seeds to run (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Simulated calendar days per seed
    #[arg(long, default_value_t = 10)]
    days: u32,

    /// Percent chance each answer is correct
    #[arg(long, default_value_t = 75)]
    accuracy: u32,

    /// Percent chance a day is skipped (exercises streak resets)
    #[arg(long, default_value_t = 15)]
    skip_chance: u32,

    /// Drop the first batch fetch to exercise the empty-batch retry path
    #[arg(long)]
    flaky_provider: bool,

    /// Username for the simulated player
    #[arg(long, default_value = "qa-runner")]
    username: String,

    /// First simulated date (YYYY-MM-DD)
    #[arg(long, default_value = "2026-01-01")]
    start_date: NaiveDate,

    /// Print every question outcome
    #[arg(short, long)]
    verbose: bool,
}

type Session = SessionController<MemoryStore, ScriptedProvider>;

struct DayOutcome {
    date: NaiveDate,
    report: RoundReport,
}

struct SeedOutcome {
    seed: u64,
    days_played: usize,
    days_skipped: usize,
    final_xp: u32,
    final_level: u32,
    longest_streak: u32,
    share_preview: String,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    ensure!(args.accuracy <= 100, "--accuracy is a percentage (0-100)");
    ensure!(
        args.skip_chance < 100,
        "--skip-chance must leave some days playable"
    );
    ensure!(args.days >= 1, "--days must be at least 1");

    announce_banner(&args);
    let start_time = Instant::now();

    let seeds = parse_seeds(&args.seeds)?;
    let mut outcomes = Vec::with_capacity(seeds.len());
    for seed in seeds {
        outcomes.push(run_seed(&args, seed)?);
    }

    print_summary(&outcomes, start_time.elapsed().as_secs_f64());
    Ok(())
}

fn announce_banner(args: &Args) {
    println!("{}", "=== Mirage QA Tester ===".bold().cyan());
    println!(
        "days per seed: {}  accuracy: {}%  skip chance: {}%  flaky provider: {}",
        args.days, args.accuracy, args.skip_chance, args.flaky_provider
    );
    println!();
}

fn parse_seeds(csv: &str) -> Result<Vec<u64>> {
    csv.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<u64>()
                .with_context(|| format!("invalid seed '{token}'"))
        })
        .collect()
}

/// Drive one full multi-day simulation and check the progression
/// invariants after every committed round.
fn run_seed(args: &Args, seed: u64) -> Result<SeedOutcome> {
    println!("{}", format!("--- seed {seed} ---").bold());

    let mut provider = ScriptedProvider::new(seed);
    if args.flaky_provider {
        provider.arm_failure();
    }
    let mut session = SessionController::with_rng(
        MemoryStore::new(),
        provider,
        GameConfig::default(),
        SmallRng::seed_from_u64(seed),
    );
    // Separate stream for answer decisions so shuffle consumption does
    // not shift the play script.
    let mut policy = SmallRng::seed_from_u64(seed.wrapping_add(0x9E37_79B9));
    let mut board = MockLeaderboard::new();
    let mut scheduler = NullScheduler;

    let mut days = Vec::new();
    let mut days_skipped = 0usize;
    let mut last_played: Option<NaiveDate> = None;
    let mut expected_streak = 0u32;
    let mut xp_floor = 0u32;
    let mut share_preview = String::new();

    for offset in 0..args.days {
        let today = args.start_date + Days::new(u64::from(offset));
        let first_day = days.is_empty() && days_skipped == 0;
        if !first_day && policy.gen_range(0..100) < args.skip_chance {
            println!("  {} {}", today, "skipped".dimmed());
            days_skipped += 1;
            continue;
        }

        let outcome = play_day(args, &mut session, &mut policy, today)?;
        session.submit_score(&mut board);
        session.schedule_reminder(&mut scheduler);
        share_preview = share_text(
            session.profile().context("profile missing after round")?,
            session.round().context("round missing after round")?,
        );
        session.finish_session()?;

        expected_streak = match last_played {
            Some(prev) if prev + Days::new(1) == today => expected_streak + 1,
            _ => 1,
        };
        last_played = Some(today);
        check_invariants(&session, &outcome, expected_streak, xp_floor)?;
        let profile = session.profile().context("profile missing")?;
        xp_floor = profile.xp;

        let level_note = if outcome.report.did_level_up {
            format!(" level up -> {}", outcome.report.new_level)
                .yellow()
                .to_string()
        } else {
            String::new()
        };
        println!(
            "  {} {} {}/{} ({}%) {} +{} xp, streak {}{}",
            today,
            "played".green(),
            outcome.report.score,
            outcome.report.round_size,
            outcome.report.accuracy,
            outcome.report.rank,
            outcome.report.xp_earned,
            outcome.report.day_streak,
            level_note
        );
        days.push(outcome);
    }

    verify_locked_screen(&mut session, &mut board, args, last_played)?;

    let profile = session.profile().context("profile missing at end")?;
    ensure!(
        profile.games_played as usize == days.len(),
        "games_played {} disagrees with rounds driven {}",
        profile.games_played,
        days.len()
    );
    println!(
        "  {} {} played, {} skipped, xp {}, level {}, longest streak {}",
        "seed ok:".green().bold(),
        days.len(),
        days_skipped,
        profile.xp,
        profile.level,
        profile.longest_streak
    );
    println!();

    Ok(SeedOutcome {
        seed,
        days_played: days.len(),
        days_skipped,
        final_xp: profile.xp,
        final_level: profile.level,
        longest_streak: profile.longest_streak,
        share_preview,
    })
}

/// Start up for the day, onboard if needed, and play the round to
/// completion with the scripted answer policy.
fn play_day(
    args: &Args,
    session: &mut Session,
    policy: &mut SmallRng,
    today: NaiveDate,
) -> Result<DayOutcome> {
    match session.startup(today)? {
        GamePhase::Onboarding => {
            session.create_player(&args.username, today)?;
        }
        GamePhase::ReadyToStart => {}
        other => bail!("unexpected startup phase {other:?} on {today}"),
    }

    // The flaky provider drops the first fetch; the ready screen's
    // affordance is to fetch again.
    for attempt in 0..3 {
        if session.batch_ready() {
            break;
        }
        log::warn!("batch not ready on {today} (attempt {attempt}), refetching");
        session.prefetch_batch(today);
    }
    ensure!(session.batch_ready(), "batch never became ready on {today}");
    session.start_round()?;

    let size = session.round().context("no round after start")?.len();
    for index in 0..size {
        let question = session
            .round()
            .context("round vanished mid-play")?
            .current_question()
            .context("no current question")?
            .clone();
        let answer_right = policy.gen_range(0..100) < args.accuracy;
        let pick = if answer_right {
            question.correct_answer
        } else {
            (question.correct_answer + 1) % question.statements.len()
        };
        let elapsed = policy.gen_range(1.5_f32..9.0);
        ensure!(
            session.select_answer(pick, elapsed),
            "answer selection rejected on question {index}"
        );
        let resolution = session
            .resolve_answer()
            .context("answer resolution missing")?;
        ensure!(
            resolution.correct == answer_right,
            "resolution disagrees with the scripted pick on question {index}"
        );
        if args.verbose {
            let mark = if resolution.correct {
                "✓".green()
            } else {
                "✗".red()
            };
            println!("    q{index} {mark} pick={pick} ({elapsed:.1}s)");
        }

        let reward_pending = session
            .round()
            .context("round vanished mid-play")?
            .pending_aid_reward;
        if reward_pending && index + 1 < size {
            ensure!(
                session.claim_aid_reward(AidKind::Narrow),
                "milestone reward claim rejected on question {index}"
            );
        } else {
            session.acknowledge(false, today)?;
        }
    }
    ensure!(
        session.phase() == GamePhase::RoundComplete,
        "round did not complete after {size} answers"
    );

    let report = session.round_report().context("round report missing")?;
    Ok(DayOutcome { date: today, report })
}

fn check_invariants(
    session: &Session,
    outcome: &DayOutcome,
    expected_streak: u32,
    xp_floor: u32,
) -> Result<()> {
    let profile = session.profile().context("profile missing")?;
    ensure!(
        profile.streak == expected_streak,
        "{}: streak {} but consecutive-day history says {}",
        outcome.date,
        profile.streak,
        expected_streak
    );
    ensure!(
        profile.longest_streak >= profile.streak,
        "{}: longest streak {} fell below current {}",
        outcome.date,
        profile.longest_streak,
        profile.streak
    );
    ensure!(
        profile.xp >= xp_floor,
        "{}: xp regressed from {} to {}",
        outcome.date,
        xp_floor,
        profile.xp
    );
    ensure!(
        profile.xp == xp_floor + outcome.report.xp_earned,
        "{}: xp {} does not equal prior {} plus earned {}",
        outcome.date,
        profile.xp,
        xp_floor,
        outcome.report.xp_earned
    );
    ensure!(
        profile.level == outcome.report.new_level,
        "{}: profile level {} disagrees with report {}",
        outcome.date,
        profile.level,
        outcome.report.new_level
    );
    ensure!(
        profile.last_played_date == Some(outcome.date),
        "{}: last played date not committed",
        outcome.date
    );
    Ok(())
}

/// After the last committed round: the same-day gate must hold, and the
/// leaderboard and stats branches must open and close cleanly.
fn verify_locked_screen(
    session: &mut Session,
    board: &mut MockLeaderboard,
    args: &Args,
    last_played: Option<NaiveDate>,
) -> Result<()> {
    let Some(today) = last_played else {
        bail!("no day was ever played; raise --days or lower --skip-chance");
    };
    ensure!(
        session.startup(today)? == GamePhase::DailyLocked,
        "same-day restart did not lock"
    );
    ensure!(
        session.start_round().is_err(),
        "daily gate allowed a second round"
    );

    let rows = session.view_leaderboard(board)?;
    let me = rows
        .iter()
        .find(|row| row.is_current_user)
        .context("current player missing from the leaderboard")?;
    ensure!(
        me.username == args.username,
        "leaderboard row carries the wrong username"
    );
    if args.verbose {
        for row in rows.iter().take(3) {
            println!("    #{} {} {}", row.rank, row.username, row.score);
        }
    }
    session.back_to_locked();

    session.view_stats()?;
    let profile = session.profile().context("profile missing")?;
    let round_size = session.config().round_size;
    ensure!(
        profile.lifetime_accuracy(round_size) <= 100,
        "lifetime accuracy out of range"
    );
    session.back_to_locked();
    ensure!(
        session.phase() == GamePhase::DailyLocked,
        "side branches did not return to the locked screen"
    );
    Ok(())
}

fn print_summary(outcomes: &[SeedOutcome], elapsed_secs: f64) {
    println!("{}", "=== Summary ===".bold().cyan());
    for outcome in outcomes {
        println!(
            "seed {:>10}: {} played / {} skipped, xp {}, level {}, longest streak {}",
            outcome.seed,
            outcome.days_played,
            outcome.days_skipped,
            outcome.final_xp,
            outcome.final_level,
            outcome.longest_streak
        );
    }
    if let Some(last) = outcomes.last() {
        println!("\nlast share card:\n{}", last.share_preview.dimmed());
    }
    println!(
        "\n{} {} seed(s) in {:.2}s",
        "PASS".green().bold(),
        outcomes.len(),
        elapsed_secs
    );
}
