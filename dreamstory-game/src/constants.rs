//! Centralized balance and tuning constants for DreamStory game logic.
//!
//! These values seed the defaults of [`crate::config::SessionConfig`] and the
//! fixed numbers of the outing event. Attribute bounds and mood thresholds are
//! not configurable.

// Attribute model ----------------------------------------------------------
pub const STAT_MIN: i32 = 0;
pub const STAT_MAX: i32 = 100;
pub const STAT_DEFAULT: i32 = 50;

// Mood thresholds on the six-attribute mean, evaluated top-down.
pub const MOOD_ENERGETIC_MIN: i32 = 80;
pub const MOOD_HAPPY_MIN: i32 = 65;
pub const MOOD_RELAXED_MIN: i32 = 50;
pub const MOOD_TIRED_MIN: i32 = 35;
pub const MOOD_STRESSED_MIN: i32 = 20;

// Stat bands shown next to each attribute bar.
pub const BAND_EXCELLENT_MIN: i32 = 80;
pub const BAND_GOOD_MIN: i32 = 60;
pub const BAND_FAIR_MIN: i32 = 40;

// Score tiers.
pub const SCORE_HIGH_MIN: u32 = 200;
pub const SCORE_MID_MIN: u32 = 100;

// Clock --------------------------------------------------------------------
pub const TICK_MINUTES: u32 = 15;
pub const START_YEAR: i32 = 2024;
pub const START_MONTH: u32 = 1;
pub const START_DAY: u32 = 1;
pub const START_HOUR: u32 = 7;

// Streaks ------------------------------------------------------------------
pub const STREAK_THRESHOLD: u32 = 3;
pub const STREAK_MULTIPLIER: f64 = 1.5;
pub const STREAK_BONUS_SUFFIX: &str = " 🔥 Good-action streak! Bonus applied!";

// Outing event -------------------------------------------------------------
pub const OUTING_BRANCH_CHANCE: f32 = 0.3;
pub const OUTING_GOOD_CHANCE: f32 = 0.5;
pub const OUTING_GOOD_POINTS: i32 = 20;
pub const OUTING_BAD_POINTS: i32 = -15;
pub const OUTING_GOOD_RELATIONSHIPS: i32 = 20;
pub const OUTING_GOOD_HEALTH: i32 = 10;
pub const OUTING_GOOD_ENERGY: i32 = 5;
pub const OUTING_BAD_ENERGY: i32 = -20;
pub const OUTING_BAD_HEALTH: i32 = -10;
pub const OUTING_PROMPT: &str = "Alex decided to head out and meet friends at the park.";
pub const OUTING_GOOD_MESSAGE: &str =
    "Great! Alex made new friends and had fun outdoors! +20 points and better relationships!";
pub const OUTING_BAD_MESSAGE: &str = "Alex stayed out too long and got worn out. -15 points and lost energy.";

// Feedback -----------------------------------------------------------------
pub const FEEDBACK_DISPLAY_MS: u64 = 3_000;
pub const ACHIEVEMENT_POINTS: i32 = 25;
