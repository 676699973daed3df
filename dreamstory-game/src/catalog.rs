//! Static action catalog and room layout.
//!
//! The table ships as an embedded JSON asset and is parsed once into an
//! immutable [`ActionCatalog`]. Every lookup goes through the catalog; there is
//! no per-action branching code.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

use crate::constants::{STAT_MAX, STREAK_BONUS_SUFFIX};
use crate::stats::Attribute;
use crate::streak::{StreakBonus, StreakState};

const DEFAULT_CATALOG_DATA: &str = include_str!("../assets/data/catalog.json");

/// Attribute deltas stored inline; no action touches more than four stats.
pub type EffectDeltas = SmallVec<[(Attribute, i32); 4]>;

/// Identifier of a catalog action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionId {
    Sleep,
    Eat,
    Exercise,
    Relax,
    DrinkWater,
    Shower,
    BrushTeeth,
    CookHealthy,
    ReadBook,
    #[serde(rename = "watchTV")]
    WatchTv,
    Meditation,
    WeightLifting,
}

impl ActionId {
    pub const ALL: [Self; 12] = [
        Self::Sleep,
        Self::Eat,
        Self::Exercise,
        Self::Relax,
        Self::DrinkWater,
        Self::Shower,
        Self::BrushTeeth,
        Self::CookHealthy,
        Self::ReadBook,
        Self::WatchTv,
        Self::Meditation,
        Self::WeightLifting,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sleep => "sleep",
            Self::Eat => "eat",
            Self::Exercise => "exercise",
            Self::Relax => "relax",
            Self::DrinkWater => "drinkWater",
            Self::Shower => "shower",
            Self::BrushTeeth => "brushTeeth",
            Self::CookHealthy => "cookHealthy",
            Self::ReadBook => "readBook",
            Self::WatchTv => "watchTV",
            Self::Meditation => "meditation",
            Self::WeightLifting => "weightLifting",
        }
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|id| id.as_str() == s).ok_or(())
    }
}

/// Qualitative tag on an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Valence {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl Valence {
    /// Category of a resolved point delta.
    #[must_use]
    pub const fn from_points(points: i32) -> Self {
        if points > 0 {
            Self::Positive
        } else if points < 0 {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

/// Rooms of Alex's home.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RoomId {
    #[default]
    Bedroom,
    Living,
    Kitchen,
    Gym,
    Bathroom,
}

impl RoomId {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bedroom => "bedroom",
            Self::Living => "living",
            Self::Kitchen => "kitchen",
            Self::Gym => "gym",
            Self::Bathroom => "bathroom",
        }
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable definition of one action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDef {
    pub id: ActionId,
    pub name: String,
    pub description: String,
    pub valence: Valence,
    pub points: i32,
    pub message: String,
    #[serde(default)]
    pub effects: BTreeMap<Attribute, i32>,
    #[serde(default)]
    pub consequences: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDef {
    pub id: RoomId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub actions: Vec<ActionId>,
}

/// Resolved effect of an action: points, feedback message and stat deltas.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActionEffects {
    pub points: i32,
    pub message: String,
    pub deltas: EffectDeltas,
    pub bonus_applied: bool,
}

impl ActionEffects {
    /// Zero-effect result used for identifiers the catalog does not know.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }
}

/// Problems found while loading or validating a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("action {0} is defined more than once")]
    DuplicateAction(ActionId),
    #[error("action {0} has no definition")]
    MissingAction(ActionId),
    #[error("room {room} references undefined action {action}")]
    UnknownRoomAction { room: RoomId, action: ActionId },
    #[error("room {0} is defined more than once")]
    DuplicateRoom(RoomId),
    #[error("room {0} has no actions")]
    EmptyRoom(RoomId),
    #[error("branch action {0} has no definition")]
    MissingBranchAction(ActionId),
    #[error("action {action} changes {attribute} by {delta}, beyond the attribute range")]
    DeltaOutOfRange {
        action: ActionId,
        attribute: Attribute,
        delta: i32,
    },
}

const fn default_branch_action() -> ActionId {
    ActionId::Relax
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCatalog {
    #[serde(default = "default_branch_action")]
    pub branch_action: ActionId,
    #[serde(default)]
    pub actions: Vec<ActionDef>,
    #[serde(default)]
    pub rooms: Vec<RoomDef>,
}

impl Default for ActionCatalog {
    fn default() -> Self {
        Self {
            branch_action: default_branch_action(),
            actions: Vec::new(),
            rooms: Vec::new(),
        }
    }
}

impl ActionCatalog {
    /// Parse the embedded catalog, falling back to an empty table.
    #[must_use]
    pub fn load_from_static() -> Self {
        Self::from_json(DEFAULT_CATALOG_DATA).unwrap_or_else(|err| {
            log::error!("embedded action catalog rejected: {err}");
            Self::default()
        })
    }

    #[must_use]
    pub fn default_catalog() -> &'static Self {
        static CATALOG: OnceLock<ActionCatalog> = OnceLock::new();
        CATALOG.get_or_init(Self::load_from_static)
    }

    /// Parse and validate a catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or the table is inconsistent.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check the table invariants: each action defined exactly once, rooms
    /// only reference defined actions, the branch action exists, and no delta
    /// exceeds the attribute range.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for def in &self.actions {
            if !seen.insert(def.id) {
                return Err(CatalogError::DuplicateAction(def.id));
            }
            if let Some((&attribute, &delta)) =
                def.effects.iter().find(|(_, delta)| delta.abs() > STAT_MAX)
            {
                return Err(CatalogError::DeltaOutOfRange {
                    action: def.id,
                    attribute,
                    delta,
                });
            }
        }
        if let Some(missing) = ActionId::ALL.into_iter().find(|id| !seen.contains(id)) {
            return Err(CatalogError::MissingAction(missing));
        }
        if !seen.contains(&self.branch_action) {
            return Err(CatalogError::MissingBranchAction(self.branch_action));
        }

        let mut rooms = HashSet::new();
        for room in &self.rooms {
            if !rooms.insert(room.id) {
                return Err(CatalogError::DuplicateRoom(room.id));
            }
            if room.actions.is_empty() {
                return Err(CatalogError::EmptyRoom(room.id));
            }
            if let Some(&action) = room.actions.iter().find(|id| !seen.contains(id)) {
                return Err(CatalogError::UnknownRoomAction {
                    room: room.id,
                    action,
                });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn get(&self, id: ActionId) -> Option<&ActionDef> {
        self.actions.iter().find(|def| def.id == id)
    }

    #[must_use]
    pub fn room(&self, id: RoomId) -> Option<&RoomDef> {
        self.rooms.iter().find(|room| room.id == id)
    }

    /// Room hosting an action, if any. The branch action lives in no room.
    #[must_use]
    pub fn room_of(&self, id: ActionId) -> Option<&RoomDef> {
        self.rooms.iter().find(|room| room.actions.contains(&id))
    }

    /// Identifiers defined by this catalog, in table order.
    pub fn ids(&self) -> impl Iterator<Item = ActionId> + '_ {
        self.actions.iter().map(|def| def.id)
    }

    /// Effects of resolving `id` under `valence` with the current streak.
    ///
    /// Only positive resolutions earn the streak multiplier. Unknown actions
    /// resolve to [`ActionEffects::none`].
    #[must_use]
    pub fn effects_for(
        &self,
        id: ActionId,
        valence: Valence,
        streak: &StreakState,
        bonus: &StreakBonus,
    ) -> ActionEffects {
        let Some(def) = self.get(id) else {
            return ActionEffects::none();
        };
        let mut effects = ActionEffects {
            points: def.points,
            message: def.message.clone(),
            deltas: def.effects.iter().map(|(attr, delta)| (*attr, *delta)).collect(),
            bonus_applied: false,
        };
        if valence == Valence::Positive && bonus.is_active(streak) {
            effects.points = bonus.apply(effects.points);
            effects.message.push_str(STREAK_BONUS_SUFFIX);
            effects.bonus_applied = true;
        }
        effects
    }
}
