//! DreamStory Game Engine
//!
//! Platform-agnostic simulation core for the DreamStory wellness life-sim.
//! This crate owns every rule of the game without UI, audio or platform dependencies.

pub mod catalog;
pub mod clock;
pub mod config;
pub mod constants;
pub mod ledger;
pub mod numbers;
pub mod resolver;
pub mod rng;
pub mod session;
pub mod state;
pub mod stats;
pub mod streak;

use std::sync::Arc;

// Re-export commonly used types
pub use catalog::{
    ActionCatalog, ActionDef, ActionEffects, ActionId, CatalogError, EffectDeltas, RoomDef, RoomId,
    Valence,
};
pub use clock::{ClockTick, GameClock};
pub use config::{OutingConfig, SessionConfig, SessionConfigError};
pub use ledger::DailyLedger;
pub use resolver::{
    AckOutcome, AudioCue, ConfirmOutcome, ConfirmationPrompt, EventResolver, FeedbackRecord,
    OutingEvent, OutingOutcome, RequestOutcome, ResolverPhase,
};
pub use rng::{CountingRng, EventDice, RngBundle, ScriptedDice};
pub use session::{GameSession, SessionSnapshot};
pub use state::{LifeState, ScoreTier};
pub use stats::{Attribute, CharacterStats, Mood, StatBand};
pub use streak::{StreakBonus, StreakIndicator, StreakState};

/// Trait for abstracting data loading operations
/// Platform-specific implementations should provide this
pub trait DataLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the action catalog from the platform-specific source
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or fails validation.
    fn load_catalog(&self) -> Result<ActionCatalog, Self::Error>;

    /// Load session tunables
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or parsed.
    fn load_config(&self) -> Result<SessionConfig, Self::Error>;
}

/// Loader backed by the catalog embedded in this crate and default tunables.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticDataLoader;

impl DataLoader for StaticDataLoader {
    type Error = CatalogError;

    fn load_catalog(&self) -> Result<ActionCatalog, Self::Error> {
        Ok(ActionCatalog::default_catalog().clone())
    }

    fn load_config(&self) -> Result<SessionConfig, Self::Error> {
        Ok(SessionConfig::default())
    }
}

/// Main game engine for creating sessions
pub struct GameEngine<L>
where
    L: DataLoader,
{
    data_loader: L,
}

impl<L> GameEngine<L>
where
    L: DataLoader,
{
    /// Create a new game engine with the provided data loader
    pub const fn new(data_loader: L) -> Self {
        Self { data_loader }
    }

    /// Construct a new session whose outing draws derive from `seed`.
    ///
    /// # Errors
    ///
    /// Returns an error if the loader fails, the catalog is inconsistent or
    /// the configuration violates its invariants.
    pub fn create_session(&self, seed: u64) -> Result<GameSession, anyhow::Error>
    where
        L::Error: Into<anyhow::Error>,
    {
        self.create_session_with_dice(RngBundle::from_user_seed(seed))
    }

    /// Construct a session drawing from caller-supplied dice.
    ///
    /// # Errors
    ///
    /// Returns an error if loading or validation fails.
    pub fn create_session_with_dice<D>(&self, dice: D) -> Result<GameSession<D>, anyhow::Error>
    where
        D: EventDice,
        L::Error: Into<anyhow::Error>,
    {
        let catalog = self.data_loader.load_catalog().map_err(Into::into)?;
        catalog.validate()?;
        let config = self.data_loader.load_config().map_err(Into::into)?;
        config.validate()?;
        Ok(GameSession::with_parts(Arc::new(catalog), config, dice))
    }
}
