//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Floor a f64 and clamp it to the i32 range, returning 0 for non-finite values.
#[must_use]
pub fn floor_f64_to_i32(value: f64) -> i32 {
    if !value.is_finite() {
        return 0;
    }
    let min = cast::<i32, f64>(i32::MIN).unwrap_or(f64::MIN);
    let max = cast::<i32, f64>(i32::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(min, max).floor();
    cast::<f64, i32>(clamped).unwrap_or(0)
}

/// Apply a signed delta to an unsigned total, flooring at zero.
#[must_use]
pub fn add_signed_floor_zero(total: u32, delta: i32) -> u32 {
    if delta >= 0 {
        total.saturating_add(delta.unsigned_abs())
    } else {
        total.saturating_sub(delta.unsigned_abs())
    }
}

/// Arithmetic mean of integer samples as f64; 0.0 for an empty slice.
#[must_use]
pub fn mean_i32(values: &[i32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: f64 = values.iter().copied().map(f64::from).sum();
    let count = cast::<usize, f64>(values.len()).unwrap_or(1.0);
    sum / count
}
