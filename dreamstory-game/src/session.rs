//! Session wrapper binding the life state, resolver and dice together.
use serde::Serialize;
use std::sync::Arc;

use crate::catalog::{ActionCatalog, ActionId, RoomId};
use crate::clock::{ClockTick, GameClock};
use crate::config::{SessionConfig, SessionConfigError};
use crate::ledger::DailyLedger;
use crate::resolver::{
    AckOutcome, ConfirmOutcome, ConfirmationPrompt, EventResolver, FeedbackRecord, OutingEvent,
    RequestOutcome, ResolverPhase,
};
use crate::rng::{EventDice, RngBundle};
use crate::state::{LifeState, ScoreTier};
use crate::stats::{CharacterStats, Mood};
use crate::streak::{StreakIndicator, StreakState};

/// One player's in-memory game. Every mutation goes through a command.
#[derive(Debug, Clone)]
pub struct GameSession<D: EventDice = RngBundle> {
    catalog: Arc<ActionCatalog>,
    config: SessionConfig,
    state: LifeState,
    resolver: EventResolver,
    last_feedback: Option<FeedbackRecord>,
    dice: D,
}

impl GameSession<RngBundle> {
    /// Default catalog and configuration, outing draws seeded from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_parts(
            Arc::new(ActionCatalog::default_catalog().clone()),
            SessionConfig::default(),
            RngBundle::from_user_seed(seed),
        )
    }

    /// Session with custom tunables.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration fails validation.
    pub fn with_config(config: SessionConfig, seed: u64) -> Result<Self, SessionConfigError> {
        config.validate()?;
        Ok(Self::with_parts(
            Arc::new(ActionCatalog::default_catalog().clone()),
            config,
            RngBundle::from_user_seed(seed),
        ))
    }
}

impl<D: EventDice> GameSession<D> {
    /// Assemble a session from an already validated catalog and config.
    #[must_use]
    pub fn with_parts(catalog: Arc<ActionCatalog>, config: SessionConfig, dice: D) -> Self {
        let state = LifeState::fresh(&catalog, &config);
        Self {
            catalog,
            config,
            state,
            resolver: EventResolver::default(),
            last_feedback: None,
            dice,
        }
    }

    /// Default catalog and configuration with caller-supplied dice.
    #[must_use]
    pub fn with_dice(dice: D) -> Self {
        Self::with_parts(
            Arc::new(ActionCatalog::default_catalog().clone()),
            SessionConfig::default(),
            dice,
        )
    }

    // Commands -------------------------------------------------------------

    /// Request an action by its string identifier.
    pub fn request_action(&mut self, action_id: &str) -> RequestOutcome {
        let outcome = self.resolver.request(
            action_id,
            &self.state,
            &self.catalog,
            &self.config,
            &mut self.dice,
        );
        if let RequestOutcome::Rejected(notice) = &outcome {
            self.last_feedback = Some(notice.clone());
        }
        outcome
    }

    pub fn request(&mut self, action: ActionId) -> RequestOutcome {
        self.request_action(action.as_str())
    }

    /// Accept (`true`) or cancel (`false`) the pending confirmation.
    pub fn confirm_pending(&mut self, accepted: bool) -> ConfirmOutcome {
        let outcome =
            self.resolver
                .confirm(accepted, &mut self.state, &self.catalog, &self.config);
        if let ConfirmOutcome::Resolved(feedback) = &outcome {
            self.last_feedback = Some(feedback.clone());
        }
        outcome
    }

    /// Apply the revealed outing.
    pub fn acknowledge_event(&mut self) -> AckOutcome {
        let outcome = self
            .resolver
            .acknowledge(&mut self.state, &self.catalog, &self.config);
        if let AckOutcome::Resolved(feedback) = &outcome {
            self.last_feedback = Some(feedback.clone());
        }
        outcome
    }

    /// Replace the whole state with fresh defaults. The dice keep their
    /// position so a reset session does not replay the same outings.
    pub fn reset_session(&mut self) {
        log::info!(
            "session reset on day {} with score {}",
            self.state.clock.day(),
            self.state.score
        );
        self.state = LifeState::fresh(&self.catalog, &self.config);
        self.resolver.clear();
        self.last_feedback = None;
    }

    /// Advance the clock one quantum.
    pub fn tick(&mut self) -> ClockTick {
        let tick = self.state.tick();
        if tick.rolled_over {
            log::info!("day {} begins; daily ledger cleared", tick.day);
        }
        tick
    }

    // Queries --------------------------------------------------------------

    #[must_use]
    pub const fn stats(&self) -> &CharacterStats {
        &self.state.stats
    }

    #[must_use]
    pub const fn mood(&self) -> Mood {
        self.state.stats.mood()
    }

    #[must_use]
    pub const fn score(&self) -> u32 {
        self.state.score
    }

    #[must_use]
    pub const fn score_tier(&self) -> ScoreTier {
        self.state.score_tier()
    }

    #[must_use]
    pub const fn clock(&self) -> &GameClock {
        &self.state.clock
    }

    #[must_use]
    pub const fn ledger(&self) -> &DailyLedger {
        &self.state.ledger
    }

    #[must_use]
    pub const fn streak(&self) -> &StreakState {
        &self.state.streak
    }

    #[must_use]
    pub const fn streak_indicator(&self) -> Option<StreakIndicator> {
        self.state.streak.indicator(self.config.streak_threshold)
    }

    #[must_use]
    pub const fn current_room(&self) -> RoomId {
        self.state.current_room
    }

    #[must_use]
    pub const fn last_action(&self) -> Option<ActionId> {
        self.state.last_action
    }

    #[must_use]
    pub const fn last_feedback(&self) -> Option<&FeedbackRecord> {
        self.last_feedback.as_ref()
    }

    #[must_use]
    pub const fn phase(&self) -> &ResolverPhase {
        self.resolver.phase()
    }

    #[must_use]
    pub const fn pending_confirmation(&self) -> Option<&ConfirmationPrompt> {
        match self.resolver.phase() {
            ResolverPhase::PendingConfirmation(prompt) => Some(prompt),
            _ => None,
        }
    }

    #[must_use]
    pub const fn pending_event(&self) -> Option<&OutingEvent> {
        match self.resolver.phase() {
            ResolverPhase::PendingEventReveal(event) => Some(event),
            _ => None,
        }
    }

    /// Actions offered in the current room, in catalog order.
    #[must_use]
    pub fn room_actions(&self) -> Vec<ActionId> {
        self.catalog
            .room(self.state.current_room)
            .map(|room| room.actions.clone())
            .unwrap_or_default()
    }

    /// Move Alex to another room. Navigation never touches stats.
    pub fn enter_room(&mut self, room: RoomId) {
        log::debug!("Alex walks to the {room}");
        self.state.current_room = room;
    }

    #[must_use]
    pub fn catalog(&self) -> &ActionCatalog {
        &self.catalog
    }

    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Borrow the underlying life state.
    #[must_use]
    pub const fn state(&self) -> &LifeState {
        &self.state
    }

    #[must_use]
    pub const fn dice(&self) -> &D {
        &self.dice
    }

    /// Consume the session, returning the underlying life state.
    #[must_use]
    pub fn into_state(self) -> LifeState {
        self.state
    }

    /// Every query in one serializable bundle.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let clock = &self.state.clock;
        SessionSnapshot {
            day: clock.day(),
            date: clock.date_label(),
            time: clock.time_label(),
            stats: self.state.stats.clone(),
            mood_emoji: self.mood().emoji(),
            score: self.state.score,
            score_tier: self.score_tier(),
            streak: self.state.streak,
            streak_indicator: self.streak_indicator(),
            ledger: self.state.ledger.clone(),
            current_room: self.state.current_room,
            last_action: self.state.last_action,
            last_feedback: self.last_feedback.clone(),
            phase: self.resolver.phase().clone(),
        }
    }
}

/// Presentation-ready view of a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub day: u32,
    pub date: String,
    pub time: String,
    pub stats: CharacterStats,
    pub mood_emoji: &'static str,
    pub score: u32,
    pub score_tier: ScoreTier,
    pub streak: StreakState,
    pub streak_indicator: Option<StreakIndicator>,
    pub ledger: DailyLedger,
    pub current_room: RoomId,
    pub last_action: Option<ActionId>,
    pub last_feedback: Option<FeedbackRecord>,
    pub phase: ResolverPhase,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedDice;
    use crate::stats::Attribute;

    #[test]
    fn fresh_session_defaults() {
        let session = GameSession::new(1);
        assert_eq!(session.score(), 0);
        assert_eq!(session.mood(), Mood::Happy);
        assert_eq!(session.clock().day(), 1);
        assert_eq!(session.clock().time_label(), "07:00");
        assert_eq!(session.current_room(), RoomId::Bedroom);
        assert!(session.ledger().entries().all(|(_, used)| !used));
        assert!(session.stats().iter().all(|(_, value)| value == 50));
        assert_eq!(session.room_actions(), vec![ActionId::Sleep, ActionId::ReadBook]);
        assert!(session.last_feedback().is_none());
    }

    #[test]
    fn feedback_is_remembered() {
        let mut session = GameSession::with_dice(ScriptedDice::never_outing());
        session.request(ActionId::Sleep);
        session.confirm_pending(true);
        assert_eq!(session.last_feedback().map(|f| f.points), Some(25));
        assert_eq!(session.last_action(), Some(ActionId::Sleep));

        session.request(ActionId::Sleep);
        assert_eq!(session.last_feedback().map(|f| f.points), Some(0));
    }

    #[test]
    fn reset_restores_defaults() {
        let mut session = GameSession::with_dice(ScriptedDice::never_outing());
        session.request(ActionId::Exercise);
        session.confirm_pending(true);
        session.request(ActionId::Eat);
        for _ in 0..10 {
            session.tick();
        }
        session.reset_session();

        assert_eq!(session.score(), 0);
        assert_eq!(session.mood(), Mood::Happy);
        assert_eq!(session.stats().get(Attribute::Fitness), 50);
        assert_eq!(session.clock().time_label(), "07:00");
        assert_eq!(session.ledger().used_count(), 0);
        assert!(session.pending_confirmation().is_none());
        assert_eq!(session.streak(), &StreakState::default());
        assert_eq!(session.last_action(), None);
    }

    #[test]
    fn pending_queries_follow_the_phase() {
        let mut session = GameSession::with_dice(ScriptedDice::always_good_outing());
        session.request(ActionId::Relax);
        assert!(session.pending_event().is_some());
        assert!(session.pending_confirmation().is_none());
        session.acknowledge_event();
        assert!(session.pending_event().is_none());
        assert_eq!(session.current_room(), RoomId::Living);
    }

    #[test]
    fn scripted_draws_are_consumed_and_state_handed_back() {
        let mut session = GameSession::with_dice(ScriptedDice::new([0.1], [0.2]));
        assert_eq!(session.dice().remaining(), 2);
        session.request(ActionId::Relax);
        assert_eq!(session.dice().remaining(), 0);
        session.acknowledge_event();

        let state = session.into_state();
        assert!(state.ledger.is_used(ActionId::Relax));
        assert_eq!(state.score, 20);
        assert_eq!(state.current_room, RoomId::Living);
    }

    #[test]
    fn rejects_invalid_config() {
        let config = SessionConfig {
            streak_threshold: 0,
            ..SessionConfig::default()
        };
        assert!(matches!(
            GameSession::with_config(config, 3),
            Err(SessionConfigError::ZeroStreakThreshold)
        ));
    }

    #[test]
    fn snapshot_serializes_for_presentation() {
        let mut session = GameSession::with_dice(ScriptedDice::never_outing());
        session.enter_room(RoomId::Kitchen);
        session.request(ActionId::DrinkWater);
        session.confirm_pending(true);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.time, "07:00");
        assert_eq!(snapshot.score, 12);
        assert_eq!(snapshot.current_room, RoomId::Kitchen);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["ledger"]["drinkWater"], true);
        assert_eq!(json["stats"]["sleepQuality"], 50);
        assert_eq!(json["scoreTier"], "low");
        assert_eq!(json["phase"]["phase"], "idle");
        assert_eq!(json["currentRoom"], "kitchen");
    }
}
