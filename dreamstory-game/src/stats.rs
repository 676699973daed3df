//! Character attributes and the mood derived from them.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    BAND_EXCELLENT_MIN, BAND_FAIR_MIN, BAND_GOOD_MIN, MOOD_ENERGETIC_MIN, MOOD_HAPPY_MIN,
    MOOD_RELAXED_MIN, MOOD_STRESSED_MIN, MOOD_TIRED_MIN, STAT_DEFAULT, STAT_MAX, STAT_MIN,
};
use crate::numbers::mean_i32;

/// One of the eight bounded character attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Attribute {
    Health,
    Energy,
    SleepQuality,
    Relationships,
    Productivity,
    Hygiene,
    Nutrition,
    Fitness,
}

impl Attribute {
    pub const ALL: [Self; 8] = [
        Self::Health,
        Self::Energy,
        Self::SleepQuality,
        Self::Relationships,
        Self::Productivity,
        Self::Hygiene,
        Self::Nutrition,
        Self::Fitness,
    ];

    /// Attributes averaged into the mood. Relationships and productivity are
    /// intentionally left out.
    pub const MOOD_INPUTS: [Self; 6] = [
        Self::Health,
        Self::Energy,
        Self::SleepQuality,
        Self::Hygiene,
        Self::Nutrition,
        Self::Fitness,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Energy => "energy",
            Self::SleepQuality => "sleepQuality",
            Self::Relationships => "relationships",
            Self::Productivity => "productivity",
            Self::Hygiene => "hygiene",
            Self::Nutrition => "nutrition",
            Self::Fitness => "fitness",
        }
    }

    #[must_use]
    pub const fn counts_toward_mood(self) -> bool {
        !matches!(self, Self::Relationships | Self::Productivity)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Attribute {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|attr| attr.as_str() == s)
            .ok_or(())
    }
}

/// Qualitative mood derived from the attribute mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Energetic,
    #[default]
    Happy,
    Relaxed,
    Tired,
    Stressed,
    Sick,
}

impl Mood {
    /// Map a sum of the six mood inputs onto a mood band.
    ///
    /// Thresholds apply to the mean; comparing against `threshold * 6` keeps
    /// the band edges exact.
    #[must_use]
    pub fn from_mood_sum(sum: i32) -> Self {
        let count = i32::try_from(Attribute::MOOD_INPUTS.len()).unwrap_or(6);
        let at_least = |threshold: i32| sum >= threshold.saturating_mul(count);
        if at_least(MOOD_ENERGETIC_MIN) {
            Self::Energetic
        } else if at_least(MOOD_HAPPY_MIN) {
            Self::Happy
        } else if at_least(MOOD_RELAXED_MIN) {
            Self::Relaxed
        } else if at_least(MOOD_TIRED_MIN) {
            Self::Tired
        } else if at_least(MOOD_STRESSED_MIN) {
            Self::Stressed
        } else {
            Self::Sick
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Energetic => "energetic",
            Self::Happy => "happy",
            Self::Relaxed => "relaxed",
            Self::Tired => "tired",
            Self::Stressed => "stressed",
            Self::Sick => "sick",
        }
    }

    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Energetic => "⚡",
            Self::Happy => "😊",
            Self::Relaxed => "😌",
            Self::Tired => "😴",
            Self::Stressed => "😰",
            Self::Sick => "🤒",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse band used to color an attribute bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatBand {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl StatBand {
    #[must_use]
    pub const fn from_value(value: i32) -> Self {
        if value >= BAND_EXCELLENT_MIN {
            Self::Excellent
        } else if value >= BAND_GOOD_MIN {
            Self::Good
        } else if value >= BAND_FAIR_MIN {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

/// Alex's attributes. Every value stays within `[STAT_MIN, STAT_MAX]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterStats {
    health: i32,
    energy: i32,
    sleep_quality: i32,
    relationships: i32,
    productivity: i32,
    hygiene: i32,
    nutrition: i32,
    fitness: i32,
    mood: Mood,
}

impl Default for CharacterStats {
    /// Fresh-session stats. The starting mood is the fixed default, not the
    /// one the thresholds would derive; the first mutation recomputes it.
    fn default() -> Self {
        Self {
            health: STAT_DEFAULT,
            energy: STAT_DEFAULT,
            sleep_quality: STAT_DEFAULT,
            relationships: STAT_DEFAULT,
            productivity: STAT_DEFAULT,
            hygiene: STAT_DEFAULT,
            nutrition: STAT_DEFAULT,
            fitness: STAT_DEFAULT,
            mood: Mood::default(),
        }
    }
}

impl CharacterStats {
    /// Build stats from explicit values, clamping each and deriving the mood.
    #[must_use]
    pub fn from_values(values: [(Attribute, i32); 8]) -> Self {
        let mut stats = Self::default();
        for (attr, value) in values {
            *stats.slot_mut(attr) = value.clamp(STAT_MIN, STAT_MAX);
        }
        stats.recompute_mood();
        stats
    }

    #[must_use]
    pub const fn get(&self, attr: Attribute) -> i32 {
        match attr {
            Attribute::Health => self.health,
            Attribute::Energy => self.energy,
            Attribute::SleepQuality => self.sleep_quality,
            Attribute::Relationships => self.relationships,
            Attribute::Productivity => self.productivity,
            Attribute::Hygiene => self.hygiene,
            Attribute::Nutrition => self.nutrition,
            Attribute::Fitness => self.fitness,
        }
    }

    #[must_use]
    pub const fn mood(&self) -> Mood {
        self.mood
    }

    #[must_use]
    pub const fn band(&self, attr: Attribute) -> StatBand {
        StatBand::from_value(self.get(attr))
    }

    /// Mean of the six mood inputs, for display.
    #[must_use]
    pub fn mood_average(&self) -> f64 {
        let values = Attribute::MOOD_INPUTS.map(|attr| self.get(attr));
        mean_i32(&values)
    }

    /// Add `amount` to one attribute, clamp, and refresh the mood.
    pub fn apply_delta(&mut self, attr: Attribute, amount: i32) {
        self.shift(attr, amount);
        self.recompute_mood();
    }

    /// Apply several deltas, clamping each, then refresh the mood once.
    pub fn apply_deltas<I>(&mut self, deltas: I)
    where
        I: IntoIterator<Item = (Attribute, i32)>,
    {
        for (attr, amount) in deltas {
            self.shift(attr, amount);
        }
        self.recompute_mood();
    }

    /// Iterate `(attribute, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Attribute, i32)> + '_ {
        Attribute::ALL.into_iter().map(|attr| (attr, self.get(attr)))
    }

    fn shift(&mut self, attr: Attribute, amount: i32) {
        let slot = self.slot_mut(attr);
        *slot = slot.saturating_add(amount).clamp(STAT_MIN, STAT_MAX);
    }

    fn recompute_mood(&mut self) {
        let sum = Attribute::MOOD_INPUTS
            .iter()
            .map(|attr| self.get(*attr))
            .sum();
        self.mood = Mood::from_mood_sum(sum);
    }

    const fn slot_mut(&mut self, attr: Attribute) -> &mut i32 {
        match attr {
            Attribute::Health => &mut self.health,
            Attribute::Energy => &mut self.energy,
            Attribute::SleepQuality => &mut self.sleep_quality,
            Attribute::Relationships => &mut self.relationships,
            Attribute::Productivity => &mut self.productivity,
            Attribute::Hygiene => &mut self.hygiene,
            Attribute::Nutrition => &mut self.nutrition,
            Attribute::Fitness => &mut self.fitness,
        }
    }
}
