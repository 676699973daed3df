//! Consecutive good/bad action tracking and the streak bonus.
use serde::{Deserialize, Serialize};

use crate::constants::{STREAK_MULTIPLIER, STREAK_THRESHOLD};
use crate::numbers::floor_f64_to_i32;

/// Run lengths of same-signed resolutions. At most one counter is non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StreakState {
    pub consecutive_good_actions: u32,
    pub consecutive_bad_actions: u32,
}

impl StreakState {
    /// Fold the signed point delta of a resolved action into the counters.
    /// Zero-point resolutions leave both counters untouched.
    pub fn record(&mut self, points: i32) {
        match points.signum() {
            1 => {
                self.consecutive_good_actions = self.consecutive_good_actions.saturating_add(1);
                self.consecutive_bad_actions = 0;
            }
            -1 => {
                self.consecutive_bad_actions = self.consecutive_bad_actions.saturating_add(1);
                self.consecutive_good_actions = 0;
            }
            _ => {}
        }
    }

    /// Active-streak indicator once either counter reaches `threshold`.
    #[must_use]
    pub const fn indicator(&self, threshold: u32) -> Option<StreakIndicator> {
        if self.consecutive_good_actions >= threshold {
            Some(StreakIndicator::Hot(self.consecutive_good_actions))
        } else if self.consecutive_bad_actions >= threshold {
            Some(StreakIndicator::Cold(self.consecutive_bad_actions))
        } else {
            None
        }
    }
}

/// Streak badge shown next to the stats panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "count")]
pub enum StreakIndicator {
    /// Consecutive positive resolutions; the bonus is active.
    Hot(u32),
    /// Consecutive negative resolutions.
    Cold(u32),
}

impl StreakIndicator {
    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::Hot(count) => format!("🔥 {count} positive actions in a row! Bonus active!"),
            Self::Cold(count) => format!("⚠️ {count} negative actions in a row! Careful!"),
        }
    }
}

/// Multiplier rule applied to positive actions during a good streak.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StreakBonus {
    pub threshold: u32,
    pub multiplier: f64,
}

impl Default for StreakBonus {
    fn default() -> Self {
        Self {
            threshold: STREAK_THRESHOLD,
            multiplier: STREAK_MULTIPLIER,
        }
    }
}

impl StreakBonus {
    #[must_use]
    pub const fn is_active(&self, streak: &StreakState) -> bool {
        streak.consecutive_good_actions >= self.threshold
    }

    /// Scale base points by the multiplier, flooring the result.
    #[must_use]
    pub fn apply(&self, points: i32) -> i32 {
        floor_f64_to_i32(f64::from(points) * self.multiplier)
    }
}
