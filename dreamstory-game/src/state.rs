//! Mutable life state owned by a session.
use serde::Serialize;

use crate::catalog::{ActionCatalog, ActionId, RoomId};
use crate::clock::{ClockTick, GameClock};
use crate::config::SessionConfig;
use crate::constants::{SCORE_HIGH_MIN, SCORE_MID_MIN};
use crate::ledger::DailyLedger;
use crate::numbers::add_signed_floor_zero;
use crate::stats::{Attribute, CharacterStats};
use crate::streak::StreakState;

/// Coarse score bracket used for colouring the score display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreTier {
    High,
    Mid,
    Low,
}

impl ScoreTier {
    #[must_use]
    pub const fn from_score(score: u32) -> Self {
        if score >= SCORE_HIGH_MIN {
            Self::High
        } else if score >= SCORE_MID_MIN {
            Self::Mid
        } else {
            Self::Low
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Mid => "mid",
            Self::Low => "low",
        }
    }
}

/// Everything a session mutates: attributes, score, streak, ledger, clock
/// and Alex's whereabouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifeState {
    pub stats: CharacterStats,
    pub score: u32,
    pub streak: StreakState,
    pub ledger: DailyLedger,
    pub clock: GameClock,
    pub current_room: RoomId,
    pub last_action: Option<ActionId>,
}

impl LifeState {
    /// Fresh state: neutral stats, zero score, day one, empty ledger.
    #[must_use]
    pub fn fresh(catalog: &ActionCatalog, config: &SessionConfig) -> Self {
        Self {
            stats: CharacterStats::default(),
            score: 0,
            streak: StreakState::default(),
            ledger: DailyLedger::for_catalog(catalog),
            clock: GameClock::new(config.start, config.tick_minutes),
            current_room: config.start_room,
            last_action: None,
        }
    }

    /// Add a signed point delta; the score never drops below zero.
    pub fn add_points(&mut self, points: i32) {
        self.score = add_signed_floor_zero(self.score, points);
    }

    /// Clamp-apply attribute deltas and refresh the mood once.
    pub fn apply_deltas<I>(&mut self, deltas: I)
    where
        I: IntoIterator<Item = (Attribute, i32)>,
    {
        self.stats.apply_deltas(deltas);
    }

    /// Advance the clock; a date change clears the ledger and nothing else.
    pub fn tick(&mut self) -> ClockTick {
        let tick = self.clock.tick();
        if tick.rolled_over {
            self.ledger.reset();
        }
        tick
    }

    #[must_use]
    pub const fn score_tier(&self) -> ScoreTier {
        ScoreTier::from_score(self.score)
    }
}
