//! Action resolution protocol.
//!
//! A request either opens a confirmation prompt or, for the branch action,
//! may divert into an outing that the player only acknowledges. Resolution
//! is the only place stats, score, streak and ledger change together.
use serde::Serialize;
use smallvec::{SmallVec, smallvec};
use std::mem;
use std::time::Duration;

use crate::catalog::{
    ActionCatalog, ActionDef, ActionEffects, ActionId, EffectDeltas, RoomId, Valence,
};
use crate::config::SessionConfig;
use crate::constants::{
    OUTING_BAD_ENERGY, OUTING_BAD_HEALTH, OUTING_BAD_MESSAGE, OUTING_GOOD_ENERGY,
    OUTING_GOOD_HEALTH, OUTING_GOOD_MESSAGE, OUTING_GOOD_RELATIONSHIPS, OUTING_PROMPT,
};
use crate::rng::EventDice;
use crate::state::LifeState;
use crate::stats::Attribute;

/// Sound presentation should play alongside a feedback record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioCue {
    Positive,
    Achievement,
    Negative,
}

/// Transient message shown after a request or resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackRecord {
    pub message: String,
    pub tone: Valence,
    pub points: i32,
    pub display_for: Duration,
    pub cues: SmallVec<[AudioCue; 2]>,
}

impl FeedbackRecord {
    /// Feedback for a confirmed action. Tone follows the sign of the points.
    #[must_use]
    pub fn resolution(effects: &ActionEffects, config: &SessionConfig) -> Self {
        let cues = if effects.points > 0 {
            let mut cues = smallvec![AudioCue::Positive];
            if effects.points >= config.achievement_points {
                cues.push(AudioCue::Achievement);
            }
            cues
        } else if effects.points < 0 {
            smallvec![AudioCue::Negative]
        } else {
            SmallVec::new()
        };
        Self {
            message: effects.message.clone(),
            tone: Valence::from_points(effects.points),
            points: effects.points,
            display_for: config.feedback_duration(),
            cues,
        }
    }

    /// Zero-point notice for an action already performed today.
    #[must_use]
    pub fn repeat_notice(def: &ActionDef, config: &SessionConfig) -> Self {
        Self {
            message: format!(
                "Alex already {} today! Try again tomorrow.",
                def.description.to_lowercase()
            ),
            tone: Valence::Negative,
            points: 0,
            display_for: config.feedback_duration(),
            cues: SmallVec::new(),
        }
    }

    fn outing(event: &OutingEvent, config: &SessionConfig) -> Self {
        Self {
            message: event.consequence.clone(),
            tone: Valence::from_points(event.points),
            points: event.points,
            display_for: config.feedback_duration(),
            cues: SmallVec::new(),
        }
    }
}

/// Details shown while a request waits for confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmationPrompt {
    /// Identifier as requested, kept verbatim for unknown actions.
    pub action_id: String,
    #[serde(skip)]
    pub action: Option<ActionId>,
    pub name: String,
    pub description: String,
    pub valence: Valence,
    pub consequences: Vec<String>,
    pub room: RoomId,
}

impl ConfirmationPrompt {
    fn for_action(def: &ActionDef, room: RoomId) -> Self {
        Self {
            action_id: def.id.as_str().to_string(),
            action: Some(def.id),
            name: def.name.clone(),
            description: def.description.clone(),
            valence: def.valence,
            consequences: def.consequences.clone(),
            room,
        }
    }

    fn for_unknown(raw: &str, room: RoomId) -> Self {
        Self {
            action_id: raw.to_string(),
            action: None,
            name: raw.to_string(),
            description: raw.to_string(),
            valence: Valence::Neutral,
            consequences: Vec::new(),
            room,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutingOutcome {
    Good,
    Bad,
}

impl OutingOutcome {
    /// Attribute changes applied when the outing is acknowledged.
    #[must_use]
    pub fn deltas(self) -> EffectDeltas {
        match self {
            Self::Good => smallvec![
                (Attribute::Relationships, OUTING_GOOD_RELATIONSHIPS),
                (Attribute::Health, OUTING_GOOD_HEALTH),
                (Attribute::Energy, OUTING_GOOD_ENERGY),
            ],
            Self::Bad => smallvec![
                (Attribute::Energy, OUTING_BAD_ENERGY),
                (Attribute::Health, OUTING_BAD_HEALTH),
            ],
        }
    }
}

/// Outing revealed in place of the branch action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutingEvent {
    pub outcome: OutingOutcome,
    pub message: String,
    pub consequence: String,
    pub points: i32,
}

impl OutingEvent {
    fn roll<D: EventDice>(dice: &mut D, config: &SessionConfig) -> Self {
        let outcome = if dice.roll_outcome() < config.outing.good_chance {
            OutingOutcome::Good
        } else {
            OutingOutcome::Bad
        };
        let (consequence, points) = match outcome {
            OutingOutcome::Good => (OUTING_GOOD_MESSAGE, config.outing.good_points),
            OutingOutcome::Bad => (OUTING_BAD_MESSAGE, config.outing.bad_points),
        };
        Self {
            outcome,
            message: OUTING_PROMPT.to_string(),
            consequence: consequence.to_string(),
            points,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "phase", content = "detail", rename_all = "snake_case")]
pub enum ResolverPhase {
    #[default]
    Idle,
    PendingConfirmation(ConfirmationPrompt),
    PendingEventReveal(OutingEvent),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Already used today; nothing changed.
    Rejected(FeedbackRecord),
    AwaitingConfirmation(ConfirmationPrompt),
    EventRevealed(OutingEvent),
    /// Another request is still outstanding; nothing changed.
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Resolved(FeedbackRecord),
    Cancelled,
    NothingPending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AckOutcome {
    Resolved(FeedbackRecord),
    NothingPending,
}

/// Sub-state machine sitting between a request and its effects.
#[derive(Debug, Clone, Default)]
pub struct EventResolver {
    phase: ResolverPhase,
}

impl EventResolver {
    #[must_use]
    pub const fn phase(&self) -> &ResolverPhase {
        &self.phase
    }

    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self.phase, ResolverPhase::Idle)
    }

    /// Drop whatever is outstanding.
    pub fn clear(&mut self) {
        self.phase = ResolverPhase::Idle;
    }

    /// Handle a request for `raw_id`. Never mutates the life state.
    pub fn request<D: EventDice>(
        &mut self,
        raw_id: &str,
        state: &LifeState,
        catalog: &ActionCatalog,
        config: &SessionConfig,
        dice: &mut D,
    ) -> RequestOutcome {
        if !self.is_idle() {
            log::warn!("request for {raw_id} ignored while another is outstanding");
            return RequestOutcome::Busy;
        }

        let def = raw_id
            .parse::<ActionId>()
            .ok()
            .and_then(|id| catalog.get(id));
        let Some(def) = def else {
            log::warn!("unknown action {raw_id}; resolving as a no-op");
            let prompt = ConfirmationPrompt::for_unknown(raw_id, state.current_room);
            self.phase = ResolverPhase::PendingConfirmation(prompt.clone());
            return RequestOutcome::AwaitingConfirmation(prompt);
        };

        if state.ledger.is_used(def.id) {
            log::debug!("{} already used on day {}", def.id, state.clock.day());
            return RequestOutcome::Rejected(FeedbackRecord::repeat_notice(def, config));
        }

        if def.id == catalog.branch_action && dice.roll_gate() < config.outing.branch_chance {
            let event = OutingEvent::roll(dice, config);
            log::debug!("{} diverted into a {:?} outing", def.id, event.outcome);
            self.phase = ResolverPhase::PendingEventReveal(event.clone());
            return RequestOutcome::EventRevealed(event);
        }

        let room = catalog
            .room_of(def.id)
            .map_or(state.current_room, |room| room.id);
        let prompt = ConfirmationPrompt::for_action(def, room);
        log::debug!("{} awaiting confirmation", def.id);
        self.phase = ResolverPhase::PendingConfirmation(prompt.clone());
        RequestOutcome::AwaitingConfirmation(prompt)
    }

    /// Accept or cancel the pending confirmation.
    pub fn confirm(
        &mut self,
        accepted: bool,
        state: &mut LifeState,
        catalog: &ActionCatalog,
        config: &SessionConfig,
    ) -> ConfirmOutcome {
        if !matches!(self.phase, ResolverPhase::PendingConfirmation(_)) {
            log::warn!("confirm({accepted}) with no confirmation pending");
            return ConfirmOutcome::NothingPending;
        }
        let ResolverPhase::PendingConfirmation(prompt) = mem::take(&mut self.phase) else {
            return ConfirmOutcome::NothingPending;
        };
        if !accepted {
            log::debug!("{} cancelled", prompt.action_id);
            return ConfirmOutcome::Cancelled;
        }

        let Some(id) = prompt.action else {
            log::warn!("{} confirmed but has no effects", prompt.action_id);
            let effects = ActionEffects::none();
            // No deltas, but the mood is still refreshed.
            state.apply_deltas(effects.deltas.iter().copied());
            return ConfirmOutcome::Resolved(FeedbackRecord::resolution(&effects, config));
        };

        let effects =
            catalog.effects_for(id, prompt.valence, &state.streak, &config.streak_bonus());
        state.apply_deltas(effects.deltas.iter().copied());
        state.add_points(effects.points);
        state.streak.record(effects.points);
        state.ledger.mark_used(id);
        state.last_action = Some(id);
        state.current_room = prompt.room;
        log::debug!(
            "{} resolved for {} points (bonus: {})",
            prompt.action_id,
            effects.points,
            effects.bonus_applied
        );
        ConfirmOutcome::Resolved(FeedbackRecord::resolution(&effects, config))
    }

    /// Apply the revealed outing.
    pub fn acknowledge(
        &mut self,
        state: &mut LifeState,
        catalog: &ActionCatalog,
        config: &SessionConfig,
    ) -> AckOutcome {
        if !matches!(self.phase, ResolverPhase::PendingEventReveal(_)) {
            log::warn!("acknowledge with no outing pending");
            return AckOutcome::NothingPending;
        }
        let ResolverPhase::PendingEventReveal(event) = mem::take(&mut self.phase) else {
            return AckOutcome::NothingPending;
        };

        state.apply_deltas(event.outcome.deltas());
        state.add_points(event.points);
        state.ledger.mark_used(catalog.branch_action);
        state.current_room = config.outing.return_room;
        log::debug!(
            "{:?} outing applied for {} points; Alex is now in the {}",
            event.outcome,
            event.points,
            state.current_room
        );
        AckOutcome::Resolved(FeedbackRecord::outing(&event, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedDice;
    use crate::stats::Mood;

    struct Fixture {
        resolver: EventResolver,
        state: LifeState,
        catalog: &'static ActionCatalog,
        config: SessionConfig,
    }

    impl Fixture {
        fn new() -> Self {
            let catalog = ActionCatalog::default_catalog();
            let config = SessionConfig::default();
            Self {
                resolver: EventResolver::default(),
                state: LifeState::fresh(catalog, &config),
                catalog,
                config,
            }
        }

        fn request(&mut self, id: &str, dice: &mut ScriptedDice) -> RequestOutcome {
            self.resolver
                .request(id, &self.state, self.catalog, &self.config, dice)
        }

        fn confirm(&mut self, accepted: bool) -> ConfirmOutcome {
            self.resolver
                .confirm(accepted, &mut self.state, self.catalog, &self.config)
        }

        fn acknowledge(&mut self) -> AckOutcome {
            self.resolver
                .acknowledge(&mut self.state, self.catalog, &self.config)
        }
    }

    #[test]
    fn confirm_applies_catalog_effects() {
        let mut fx = Fixture::new();
        let mut dice = ScriptedDice::never_outing();
        let RequestOutcome::AwaitingConfirmation(prompt) = fx.request("shower", &mut dice) else {
            panic!("expected a confirmation prompt");
        };
        assert_eq!(prompt.room, RoomId::Bathroom);
        assert_eq!(prompt.valence, Valence::Positive);
        assert!(!prompt.consequences.is_empty());

        let ConfirmOutcome::Resolved(feedback) = fx.confirm(true) else {
            panic!("expected resolution");
        };
        assert_eq!(feedback.points, 20);
        assert_eq!(feedback.tone, Valence::Positive);
        assert_eq!(feedback.display_for, Duration::from_millis(3_000));
        assert_eq!(feedback.cues.as_slice(), &[AudioCue::Positive]);
        assert_eq!(fx.state.score, 20);
        assert_eq!(fx.state.stats.get(Attribute::Hygiene), 80);
        assert!(fx.state.ledger.is_used(ActionId::Shower));
        assert_eq!(fx.state.current_room, RoomId::Bathroom);
        assert_eq!(fx.state.last_action, Some(ActionId::Shower));
        assert!(fx.resolver.is_idle());
    }

    #[test]
    fn cancel_changes_nothing() {
        let mut fx = Fixture::new();
        let before = fx.state.clone();
        let mut dice = ScriptedDice::never_outing();
        fx.request("eat", &mut dice);
        assert_eq!(fx.confirm(false), ConfirmOutcome::Cancelled);
        assert_eq!(fx.state, before);
        assert!(fx.resolver.is_idle());
    }

    #[test]
    fn achievement_and_negative_cues() {
        let mut fx = Fixture::new();
        let mut dice = ScriptedDice::never_outing();
        fx.request("cookHealthy", &mut dice);
        let ConfirmOutcome::Resolved(feedback) = fx.confirm(true) else {
            panic!("expected resolution");
        };
        assert_eq!(
            feedback.cues.as_slice(),
            &[AudioCue::Positive, AudioCue::Achievement]
        );

        fx.request("watchTV", &mut dice);
        let ConfirmOutcome::Resolved(feedback) = fx.confirm(true) else {
            panic!("expected resolution");
        };
        assert_eq!(feedback.tone, Valence::Negative);
        assert_eq!(feedback.cues.as_slice(), &[AudioCue::Negative]);
        assert_eq!(fx.state.streak.consecutive_bad_actions, 1);
        assert_eq!(fx.state.streak.consecutive_good_actions, 0);
    }

    #[test]
    fn repeat_request_is_rejected_without_mutation() {
        let mut fx = Fixture::new();
        let mut dice = ScriptedDice::never_outing();
        fx.request("drinkWater", &mut dice);
        fx.confirm(true);
        let before = fx.state.clone();

        let RequestOutcome::Rejected(notice) = fx.request("drinkWater", &mut dice) else {
            panic!("expected a repeat notice");
        };
        assert_eq!(notice.points, 0);
        assert_eq!(notice.tone, Valence::Negative);
        assert!(notice.message.starts_with("Alex already"));
        assert!(notice.message.ends_with("today! Try again tomorrow."));
        assert!(notice.cues.is_empty());
        assert_eq!(fx.state, before);
        assert!(fx.resolver.is_idle());
    }

    #[test]
    fn good_outing_applies_fixed_bonus() {
        let mut fx = Fixture::new();
        let mut dice = ScriptedDice::new([0.29], [0.49]);
        let RequestOutcome::EventRevealed(event) = fx.request("relax", &mut dice) else {
            panic!("expected an outing");
        };
        assert_eq!(event.outcome, OutingOutcome::Good);
        assert_eq!(event.points, 20);
        assert_eq!(event.message, OUTING_PROMPT);
        assert!(!fx.state.ledger.is_used(ActionId::Relax));

        let AckOutcome::Resolved(feedback) = fx.acknowledge() else {
            panic!("expected outing feedback");
        };
        assert_eq!(feedback.message, OUTING_GOOD_MESSAGE);
        assert_eq!(fx.state.score, 20);
        assert_eq!(fx.state.stats.get(Attribute::Relationships), 70);
        assert_eq!(fx.state.stats.get(Attribute::Health), 60);
        assert_eq!(fx.state.stats.get(Attribute::Energy), 55);
        assert!(fx.state.ledger.is_used(ActionId::Relax));
        assert_eq!(fx.state.current_room, RoomId::Living);
        assert_eq!(fx.state.streak, crate::streak::StreakState::default());
        assert_eq!(fx.state.last_action, None);
    }

    #[test]
    fn gate_above_threshold_takes_the_normal_path() {
        let mut fx = Fixture::new();
        let mut dice = ScriptedDice::new([0.3], []);
        let outcome = fx.request("relax", &mut dice);
        assert!(matches!(outcome, RequestOutcome::AwaitingConfirmation(_)));
        assert_eq!(dice.remaining(), 0);

        let ConfirmOutcome::Resolved(feedback) = fx.confirm(true) else {
            panic!("expected resolution");
        };
        assert_eq!(feedback.points, 15);
        assert_eq!(fx.state.stats.get(Attribute::Relationships), 65);
    }

    #[test]
    fn non_branch_actions_never_draw() {
        let mut fx = Fixture::new();
        let mut dice = ScriptedDice::new([0.0], [0.0]);
        fx.request("sleep", &mut dice);
        assert_eq!(dice.remaining(), 2);
    }

    #[test]
    fn outstanding_requests_block_and_mismatched_commands_are_noops() {
        let mut fx = Fixture::new();
        let mut dice = ScriptedDice::always_good_outing();
        assert_eq!(fx.confirm(true), ConfirmOutcome::NothingPending);
        assert_eq!(fx.acknowledge(), AckOutcome::NothingPending);

        fx.request("relax", &mut dice);
        assert_eq!(fx.request("sleep", &mut dice), RequestOutcome::Busy);
        assert_eq!(fx.confirm(true), ConfirmOutcome::NothingPending);
        assert!(matches!(
            fx.resolver.phase(),
            ResolverPhase::PendingEventReveal(_)
        ));
        assert!(matches!(fx.acknowledge(), AckOutcome::Resolved(_)));

        fx.request("sleep", &mut dice);
        assert_eq!(fx.acknowledge(), AckOutcome::NothingPending);
        assert!(matches!(
            fx.resolver.phase(),
            ResolverPhase::PendingConfirmation(_)
        ));
    }

    #[test]
    fn unknown_action_confirms_without_effects() {
        let mut fx = Fixture::new();
        let before = fx.state.clone();
        let mut dice = ScriptedDice::never_outing();
        let RequestOutcome::AwaitingConfirmation(prompt) = fx.request("juggle", &mut dice) else {
            panic!("unknown actions still prompt");
        };
        assert_eq!(prompt.action, None);
        assert_eq!(prompt.description, "juggle");
        assert_eq!(prompt.valence, Valence::Neutral);

        let ConfirmOutcome::Resolved(feedback) = fx.confirm(true) else {
            panic!("expected resolution");
        };
        assert_eq!(feedback.points, 0);
        assert!(feedback.message.is_empty());
        assert_eq!(feedback.tone, Valence::Neutral);
        // Fresh stats average 50, so the default mood settles to relaxed.
        assert_eq!(before.stats.mood(), Mood::Happy);
        assert_eq!(fx.state.stats.mood(), Mood::Relaxed);
        assert_eq!(fx.state.score, before.score);
        assert_eq!(fx.state.streak, before.streak);
        assert_eq!(fx.state.ledger, before.ledger);
        assert_eq!(fx.state.last_action, None);
        assert!(fx.resolver.is_idle());
    }
}
