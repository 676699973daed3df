use anyhow::{Context, Result};
use chrono::{NaiveDateTime, TimeDelta};
use std::sync::Arc;

use dreamstory_game::constants::STREAK_BONUS_SUFFIX;
use dreamstory_game::numbers::add_signed_floor_zero;
use dreamstory_game::{
    AckOutcome, ConfirmOutcome, GameSession, OutingOutcome, RequestOutcome, SessionConfig,
    SessionSnapshot,
};

use crate::logic::policy::GameplayStrategy;

/// Number of in-game days simulated when a plan does not say otherwise.
pub const DEFAULT_SIM_DAYS: u32 = 3;

/// What happened during one simulated hour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HourOutcome {
    Idle,
    Resolved { points: i32, bonus: bool },
    Cancelled,
    Rejected,
    Outing(OutingOutcome),
    Busy,
}

#[derive(Debug, Clone)]
pub struct HourRecord {
    pub day: u32,
    pub time: String,
    pub action_id: Option<String>,
    pub rationale: Option<String>,
    pub outcome: HourOutcome,
    pub score: u32,
}

/// Ledger state observed right after a date change.
#[derive(Debug, Clone, Copy)]
pub struct RolloverCheck {
    pub day: u32,
    pub ledger_cleared: bool,
}

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub strategy: GameplayStrategy,
    pub days: u32,
    pub config: SessionConfig,
    pub expectations: Vec<SimulationExpectation>,
}

impl SimulationPlan {
    #[must_use]
    pub fn new(strategy: GameplayStrategy) -> Self {
        Self {
            strategy,
            days: DEFAULT_SIM_DAYS,
            config: SessionConfig::default(),
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_days(mut self, days: u32) -> Self {
        self.days = days;
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<SimulationExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }
}

/// Assertion hook run after a simulation completes.
type SimulationExpectationFn =
    Arc<dyn Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct SimulationExpectation(SimulationExpectationFn);

impl std::fmt::Debug for SimulationExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationExpectation").finish()
    }
}

impl SimulationExpectation {
    pub fn evaluate(&self, summary: &SimulationSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for SimulationExpectation
where
    F: Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

/// Complete record of a simulation run.
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub seed: u64,
    pub strategy: GameplayStrategy,
    pub start: NaiveDateTime,
    pub tick_minutes: u32,
    pub ticks: u32,
    pub hours: Vec<HourRecord>,
    pub rollovers: Vec<RolloverCheck>,
    pub stat_violations: Vec<String>,
    pub streak_violations: usize,
    pub max_good_streak: u32,
    pub max_bad_streak: u32,
    /// Score replayed from feedback points alone.
    pub expected_score: u32,
    pub final_snapshot: SessionSnapshot,
}

impl SimulationSummary {
    pub fn count(&self, pred: impl Fn(&HourOutcome) -> bool) -> usize {
        self.hours.iter().filter(|hour| pred(&hour.outcome)).count()
    }

    #[must_use]
    pub fn outings(&self) -> usize {
        self.count(|outcome| matches!(outcome, HourOutcome::Outing(_)))
    }

    #[must_use]
    pub fn bonus_resolutions(&self) -> usize {
        self.count(|outcome| matches!(outcome, HourOutcome::Resolved { bonus: true, .. }))
    }

    /// Day the clock should show after `ticks` quanta from `start`.
    #[must_use]
    pub fn expected_day(&self) -> u32 {
        let elapsed = TimeDelta::minutes(i64::from(self.ticks) * i64::from(self.tick_minutes));
        let end = self.start + elapsed;
        let days = (end.date() - self.start.date()).num_days();
        u32::try_from(days).unwrap_or(u32::MAX).saturating_add(1)
    }
}

/// Headless deterministic runner for the simulation engine.
#[derive(Debug, Clone, Copy)]
pub struct GameTester {
    verbose: bool,
}

impl GameTester {
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Play `plan.days` in-game days hour by hour.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan's session config is invalid.
    pub fn run_plan(&self, plan: &SimulationPlan, seed: u64) -> Result<SimulationSummary> {
        let mut session = GameSession::with_config(plan.config.clone(), seed)
            .context("simulation plan carries an invalid session config")?;
        let mut policy = plan.strategy.create_policy(seed);
        let tick_minutes = plan.config.tick_minutes;
        let ticks_per_hour = (60 / tick_minutes).max(1);
        let total_hours = plan.days.saturating_mul(24);

        let mut summary = SimulationSummary {
            seed,
            strategy: plan.strategy,
            start: session.clock().now(),
            tick_minutes,
            ticks: 0,
            hours: Vec::with_capacity(usize::try_from(total_hours).unwrap_or_default()),
            rollovers: Vec::new(),
            stat_violations: Vec::new(),
            streak_violations: 0,
            max_good_streak: 0,
            max_bad_streak: 0,
            expected_score: 0,
            final_snapshot: session.snapshot(),
        };

        for _ in 0..total_hours {
            let day = session.clock().day();
            let time = session.clock().time_label();
            let decision = policy.choose(&session);
            let outcome = match &decision {
                None => HourOutcome::Idle,
                Some(decision) => match session.request_action(&decision.action_id) {
                    RequestOutcome::AwaitingConfirmation(prompt) => {
                        let accepted = policy.confirm(&prompt);
                        match session.confirm_pending(accepted) {
                            ConfirmOutcome::Resolved(feedback) => HourOutcome::Resolved {
                                points: feedback.points,
                                bonus: feedback.message.ends_with(STREAK_BONUS_SUFFIX),
                            },
                            ConfirmOutcome::Cancelled => HourOutcome::Cancelled,
                            ConfirmOutcome::NothingPending => HourOutcome::Busy,
                        }
                    }
                    RequestOutcome::EventRevealed(event) => match session.acknowledge_event() {
                        AckOutcome::Resolved(_) => HourOutcome::Outing(event.outcome),
                        AckOutcome::NothingPending => HourOutcome::Busy,
                    },
                    RequestOutcome::Rejected(_) => HourOutcome::Rejected,
                    RequestOutcome::Busy => HourOutcome::Busy,
                },
            };

            let delta = match &outcome {
                HourOutcome::Resolved { points, .. } => *points,
                HourOutcome::Outing(OutingOutcome::Good) => plan.config.outing.good_points,
                HourOutcome::Outing(OutingOutcome::Bad) => plan.config.outing.bad_points,
                _ => 0,
            };
            summary.expected_score = add_signed_floor_zero(summary.expected_score, delta);
            self.observe(&session, &mut summary);

            if self.verbose {
                println!(
                    "  day {day} {time} {:<12} {outcome:?} score {}",
                    decision.as_ref().map_or("-", |d| d.action_id.as_str()),
                    session.score()
                );
            }
            summary.hours.push(HourRecord {
                day,
                time,
                action_id: decision.as_ref().map(|d| d.action_id.clone()),
                rationale: decision.and_then(|d| d.rationale),
                outcome,
                score: session.score(),
            });

            for _ in 0..ticks_per_hour {
                let tick = session.tick();
                summary.ticks += 1;
                if tick.rolled_over {
                    summary.rollovers.push(RolloverCheck {
                        day: tick.day,
                        ledger_cleared: session.ledger().used_count() == 0,
                    });
                }
            }
        }

        log::debug!(
            "{} seed {seed}: {} hours, final score {}",
            policy.name(),
            summary.hours.len(),
            session.score()
        );
        summary.final_snapshot = session.snapshot();
        Ok(summary)
    }

    fn observe(&self, session: &GameSession, summary: &mut SimulationSummary) {
        for (attribute, value) in session.stats().iter() {
            if !(0..=100).contains(&value) {
                summary
                    .stat_violations
                    .push(format!("{attribute} = {value} on day {}", session.clock().day()));
            }
        }

        let streak = session.streak();
        if streak.consecutive_good_actions > 0 && streak.consecutive_bad_actions > 0 {
            summary.streak_violations += 1;
        }
        summary.max_good_streak = summary.max_good_streak.max(streak.consecutive_good_actions);
        summary.max_bad_streak = summary.max_bad_streak.max(streak.consecutive_bad_actions);
    }
}
