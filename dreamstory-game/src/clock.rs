//! In-game calendar. Each tick advances a fixed quantum of simulated minutes
//! and reports when the calendar date changed.
use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};

use crate::constants::{START_DAY, START_HOUR, START_MONTH, START_YEAR, TICK_MINUTES};

/// Session start timestamp: 2024-01-01 07:00.
#[must_use]
pub fn default_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(START_YEAR, START_MONTH, START_DAY)
        .and_then(|date| date.and_hms_opt(START_HOUR, 0, 0))
        .unwrap_or_default()
}

/// Result of a single clock tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTick {
    pub now: NaiveDateTime,
    pub day: u32,
    pub rolled_over: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameClock {
    now: NaiveDateTime,
    day: u32,
    quantum_minutes: u32,
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new(default_start(), TICK_MINUTES)
    }
}

impl GameClock {
    #[must_use]
    pub const fn new(start: NaiveDateTime, quantum_minutes: u32) -> Self {
        Self {
            now: start,
            day: 1,
            quantum_minutes,
        }
    }

    /// Advance by one quantum. The day counter increments whenever the date
    /// component of the timestamp changes.
    pub fn tick(&mut self) -> ClockTick {
        let previous = self.now.date();
        let step = TimeDelta::minutes(i64::from(self.quantum_minutes));
        self.now = self.now.checked_add_signed(step).unwrap_or(self.now);
        let rolled_over = self.now.date() != previous;
        if rolled_over {
            self.day = self.day.saturating_add(1);
        }
        ClockTick {
            now: self.now,
            day: self.day,
            rolled_over,
        }
    }

    #[must_use]
    pub const fn now(&self) -> NaiveDateTime {
        self.now
    }

    #[must_use]
    pub const fn day(&self) -> u32 {
        self.day
    }

    #[must_use]
    pub const fn quantum_minutes(&self) -> u32 {
        self.quantum_minutes
    }

    /// Minutes elapsed since midnight of the current date.
    #[must_use]
    pub fn minute_of_day(&self) -> u32 {
        self.now.hour() * 60 + self.now.minute()
    }

    /// 24-hour `HH:MM` label.
    #[must_use]
    pub fn time_label(&self) -> String {
        format!("{:02}:{:02}", self.now.hour(), self.now.minute())
    }

    #[must_use]
    pub fn date_label(&self) -> String {
        format!(
            "{:04}-{:02}-{:02}",
            self.now.year(),
            self.now.month(),
            self.now.day()
        )
    }
}
