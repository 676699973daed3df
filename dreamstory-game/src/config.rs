//! Session tunables with serde defaults and validation.
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::catalog::RoomId;
use crate::clock::default_start;
use crate::constants::{
    ACHIEVEMENT_POINTS, FEEDBACK_DISPLAY_MS, OUTING_BAD_POINTS, OUTING_BRANCH_CHANCE,
    OUTING_GOOD_CHANCE, OUTING_GOOD_POINTS, STREAK_MULTIPLIER, STREAK_THRESHOLD, TICK_MINUTES,
};
use crate::streak::StreakBonus;

/// Errors raised when session configuration invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum SessionConfigError {
    #[error("{field} must be between 0 and 1 (got {value:.2})")]
    Probability { field: &'static str, value: f32 },
    #[error("tick quantum must be at least one minute")]
    ZeroTick,
    #[error("tick quantum of {0} minutes exceeds a full day")]
    TickTooLong(u32),
    #[error("streak threshold must be at least 1")]
    ZeroStreakThreshold,
    #[error("streak multiplier must be finite and at least 1.0 (got {0:.2})")]
    StreakMultiplier(f64),
    #[error("good outing must award points (got {0})")]
    GoodOutingPoints(i32),
    #[error("bad outing must cost points (got {0})")]
    BadOutingPoints(i32),
    #[error("session config JSON is malformed: {0}")]
    Parse(String),
}

/// Outing event numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutingConfig {
    /// Chance that requesting the branch action diverts into the outing.
    #[serde(default = "OutingConfig::default_branch_chance")]
    pub branch_chance: f32,
    /// Chance that an outing goes well.
    #[serde(default = "OutingConfig::default_good_chance")]
    pub good_chance: f32,
    #[serde(default = "OutingConfig::default_good_points")]
    pub good_points: i32,
    #[serde(default = "OutingConfig::default_bad_points")]
    pub bad_points: i32,
    /// Room the character ends up in after an outing.
    #[serde(default = "OutingConfig::default_return_room")]
    pub return_room: RoomId,
}

impl OutingConfig {
    const fn default_branch_chance() -> f32 {
        OUTING_BRANCH_CHANCE
    }

    const fn default_good_chance() -> f32 {
        OUTING_GOOD_CHANCE
    }

    const fn default_good_points() -> i32 {
        OUTING_GOOD_POINTS
    }

    const fn default_bad_points() -> i32 {
        OUTING_BAD_POINTS
    }

    const fn default_return_room() -> RoomId {
        RoomId::Living
    }

    fn validate(&self) -> Result<(), SessionConfigError> {
        validate_probability("outing.branch_chance", self.branch_chance)?;
        validate_probability("outing.good_chance", self.good_chance)?;
        if self.good_points <= 0 {
            return Err(SessionConfigError::GoodOutingPoints(self.good_points));
        }
        if self.bad_points >= 0 {
            return Err(SessionConfigError::BadOutingPoints(self.bad_points));
        }
        Ok(())
    }
}

impl Default for OutingConfig {
    fn default() -> Self {
        Self {
            branch_chance: Self::default_branch_chance(),
            good_chance: Self::default_good_chance(),
            good_points: Self::default_good_points(),
            bad_points: Self::default_bad_points(),
            return_room: Self::default_return_room(),
        }
    }
}

fn validate_probability(field: &'static str, value: f32) -> Result<(), SessionConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(SessionConfigError::Probability { field, value });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "SessionConfig::default_tick_minutes")]
    pub tick_minutes: u32,
    #[serde(default = "default_start")]
    pub start: NaiveDateTime,
    #[serde(default)]
    pub start_room: RoomId,
    #[serde(default = "SessionConfig::default_streak_threshold")]
    pub streak_threshold: u32,
    #[serde(default = "SessionConfig::default_streak_multiplier")]
    pub streak_multiplier: f64,
    #[serde(default = "SessionConfig::default_feedback_ms")]
    pub feedback_ms: u64,
    /// Resolutions worth at least this many points also cue the achievement sound.
    #[serde(default = "SessionConfig::default_achievement_points")]
    pub achievement_points: i32,
    #[serde(default)]
    pub outing: OutingConfig,
}

impl SessionConfig {
    const fn default_tick_minutes() -> u32 {
        TICK_MINUTES
    }

    const fn default_streak_threshold() -> u32 {
        STREAK_THRESHOLD
    }

    const fn default_streak_multiplier() -> f64 {
        STREAK_MULTIPLIER
    }

    const fn default_feedback_ms() -> u64 {
        FEEDBACK_DISPLAY_MS
    }

    const fn default_achievement_points() -> i32 {
        ACHIEVEMENT_POINTS
    }

    /// Parse overrides; absent fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or violates an invariant.
    pub fn from_json(json: &str) -> Result<Self, SessionConfigError> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|err| SessionConfigError::Parse(err.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns `SessionConfigError` when any field violates its bounds.
    pub fn validate(&self) -> Result<(), SessionConfigError> {
        if self.tick_minutes == 0 {
            return Err(SessionConfigError::ZeroTick);
        }
        if self.tick_minutes > 24 * 60 {
            return Err(SessionConfigError::TickTooLong(self.tick_minutes));
        }
        if self.streak_threshold == 0 {
            return Err(SessionConfigError::ZeroStreakThreshold);
        }
        if !self.streak_multiplier.is_finite() || self.streak_multiplier < 1.0 {
            return Err(SessionConfigError::StreakMultiplier(self.streak_multiplier));
        }
        self.outing.validate()
    }

    #[must_use]
    pub const fn streak_bonus(&self) -> StreakBonus {
        StreakBonus {
            threshold: self.streak_threshold,
            multiplier: self.streak_multiplier,
        }
    }

    #[must_use]
    pub const fn feedback_duration(&self) -> Duration {
        Duration::from_millis(self.feedback_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_minutes: Self::default_tick_minutes(),
            start: default_start(),
            start_room: RoomId::default(),
            streak_threshold: Self::default_streak_threshold(),
            streak_multiplier: Self::default_streak_multiplier(),
            feedback_ms: Self::default_feedback_ms(),
            achievement_points: Self::default_achievement_points(),
            outing: OutingConfig::default(),
        }
    }
}
