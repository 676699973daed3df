use anyhow::{Result, ensure};
use dreamstory_game::{ScoreTier, SessionConfig};

use crate::logic::{
    GameplayStrategy, HourOutcome, SimulationPlan, SimulationSummary, TestScenario,
};

/// Every key `all` expands to, in run order.
pub const ALL_SCENARIO_KEYS: [&str; 8] = [
    "smoke",
    "wellness-routine",
    "couch-potato",
    "random-walk",
    "outing-heavy",
    "streak-bonus",
    "day-rollover",
    "stats-boundaries",
];

pub fn get_scenario(name: &str) -> Option<TestScenario> {
    let scenario = match name.to_lowercase().as_str() {
        "smoke" => TestScenario::simulation(
            "Smoke Test",
            common_plan(GameplayStrategy::Wellness)
                .with_days(1)
                .with_expectation(smoke_expectation),
        ),
        "wellness-routine" | "wellness" => TestScenario::simulation(
            "Wellness Routine",
            common_plan(GameplayStrategy::Wellness).with_expectation(wellness_expectation),
        ),
        "couch-potato" | "couch" => TestScenario::simulation(
            "Couch Potato",
            common_plan(GameplayStrategy::Couch).with_expectation(couch_expectation),
        ),
        "random-walk" | "random" => TestScenario::simulation(
            "Random Walk",
            common_plan(GameplayStrategy::Random).with_expectation(random_walk_expectation),
        ),
        "outing-heavy" => TestScenario::simulation(
            "Outing Heavy",
            common_plan(GameplayStrategy::Wellness)
                .with_config(always_outing_config())
                .with_expectation(outing_heavy_expectation),
        ),
        "streak-bonus" => TestScenario::simulation(
            "Streak Bonus",
            common_plan(GameplayStrategy::Wellness)
                .with_days(1)
                .with_expectation(streak_bonus_expectation),
        ),
        "day-rollover" => TestScenario::simulation(
            "Day Rollover",
            common_plan(GameplayStrategy::Couch)
                .with_days(4)
                .with_expectation(day_rollover_expectation),
        ),
        "stats-boundaries" => TestScenario::simulation(
            "Stats Boundaries",
            common_plan(GameplayStrategy::Random).with_days(7),
        ),
        _ => return None,
    };
    Some(scenario)
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    vec![
        ("smoke", "Smoke Test"),
        ("wellness-routine", "Wellness Routine"),
        ("couch-potato", "Couch Potato"),
        ("random-walk", "Random Walk"),
        ("outing-heavy", "Outing Heavy"),
        ("streak-bonus", "Streak Bonus"),
        ("day-rollover", "Day Rollover"),
        ("stats-boundaries", "Stats Boundaries"),
    ]
}

fn common_plan(strategy: GameplayStrategy) -> SimulationPlan {
    SimulationPlan::new(strategy).with_expectation(core_invariants)
}

fn always_outing_config() -> SessionConfig {
    let mut config = SessionConfig::default();
    config.outing.branch_chance = 1.0;
    config
}

/// Checks every scenario shares: bounded stats, floored score, clean rollovers.
fn core_invariants(summary: &SimulationSummary) -> Result<()> {
    ensure!(!summary.hours.is_empty(), "Simulation produced no hours");
    ensure!(
        summary.stat_violations.is_empty(),
        "Stats left their bounds: {}",
        summary.stat_violations.join(", ")
    );
    ensure!(
        summary.streak_violations == 0,
        "Good and bad streaks were both non-zero {} times",
        summary.streak_violations
    );

    let snapshot = &summary.final_snapshot;
    ensure!(
        snapshot.score == summary.expected_score,
        "Score drifted from replayed feedback: observed {}, expected {}",
        snapshot.score,
        summary.expected_score
    );
    ensure!(
        snapshot.day == summary.expected_day(),
        "Clock shows day {}, expected {}",
        snapshot.day,
        summary.expected_day()
    );

    let stale = summary
        .rollovers
        .iter()
        .find(|check| !check.ledger_cleared);
    if let Some(check) = stale {
        anyhow::bail!("Ledger not cleared when day {} began", check.day);
    }
    Ok(())
}

fn smoke_expectation(summary: &SimulationSummary) -> Result<()> {
    let resolved = summary.count(|outcome| matches!(outcome, HourOutcome::Resolved { .. }));
    ensure!(resolved > 0, "Smoke run resolved no actions");
    ensure!(
        summary.final_snapshot.score > 0,
        "Smoke run should finish with a positive score"
    );
    Ok(())
}

fn wellness_expectation(summary: &SimulationSummary) -> Result<()> {
    let rejected = summary.count(|outcome| matches!(outcome, HourOutcome::Rejected));
    ensure!(
        rejected == 0,
        "Wellness policy only picks unused actions, yet {rejected} were rejected"
    );
    ensure!(
        summary.final_snapshot.score_tier == ScoreTier::High,
        "Wellness routine should reach the high tier, observed {} points",
        summary.final_snapshot.score
    );
    ensure!(
        summary.max_bad_streak == 0,
        "Wellness routine should never start a bad streak"
    );
    Ok(())
}

fn couch_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.final_snapshot.score == 0,
        "Only negative actions were taken, score should stay floored at 0 (got {})",
        summary.final_snapshot.score
    );
    ensure!(
        summary.max_bad_streak >= 3,
        "Bad streak should carry across days, peaked at {}",
        summary.max_bad_streak
    );
    ensure!(
        summary.max_good_streak == 0,
        "Couch run should never build a good streak"
    );
    Ok(())
}

fn random_walk_expectation(summary: &SimulationSummary) -> Result<()> {
    let busy = summary.count(|outcome| matches!(outcome, HourOutcome::Busy));
    ensure!(
        busy == 0,
        "Each hour settles its own request, yet {busy} requests found the resolver busy"
    );
    Ok(())
}

fn outing_heavy_expectation(summary: &SimulationSummary) -> Result<()> {
    let days = summary.rollovers.len();
    ensure!(
        summary.outings() == days,
        "Expected one outing per completed day ({days}), observed {}",
        summary.outings()
    );
    Ok(())
}

fn streak_bonus_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.max_good_streak >= 3,
        "Good streak peaked at {}",
        summary.max_good_streak
    );
    ensure!(
        summary.bonus_resolutions() > 0,
        "No resolution carried the streak bonus"
    );
    Ok(())
}

fn day_rollover_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.rollovers.len() == 4,
        "Four simulated days should cross midnight four times, observed {}",
        summary.rollovers.len()
    );
    // eat and watchTV come back every morning
    let resolved = summary.count(|outcome| matches!(outcome, HourOutcome::Resolved { .. }));
    ensure!(
        resolved == 2 * 5,
        "Expected two couch actions on each of five calendar days, observed {resolved}"
    );
    Ok(())
}
