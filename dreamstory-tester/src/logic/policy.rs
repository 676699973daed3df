use std::fmt;
use std::str::FromStr;

use dreamstory_game::{ActionDef, ActionId, ConfirmationPrompt, GameSession, Valence};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Identifier the random policy occasionally sends to exercise the unknown-action path.
pub const BOGUS_ACTION_ID: &str = "juggleFlamingTorches";

/// Decision returned by a [`PlayerPolicy`]
#[derive(Debug, Clone)]
pub struct PolicyDecision {
    pub action_id: String,
    pub rationale: Option<String>,
}

impl PolicyDecision {
    #[must_use]
    pub fn new(action_id: impl Into<String>, rationale: Option<String>) -> Self {
        Self {
            action_id: action_id.into(),
            rationale,
        }
    }
}

/// Policy interface for automated play strategies.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Pick the next action to request, or `None` to idle this hour.
    fn choose(&mut self, session: &GameSession) -> Option<PolicyDecision>;

    /// Answer a confirmation prompt.
    fn confirm(&mut self, _prompt: &ConfirmationPrompt) -> bool {
        true
    }
}

/// Built-in gameplay strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameplayStrategy {
    Wellness,
    Couch,
    Random,
}

impl GameplayStrategy {
    pub const ALL: [Self; 3] = [Self::Wellness, Self::Couch, Self::Random];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Wellness => "Wellness",
            Self::Couch => "Couch",
            Self::Random => "Random",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn PlayerPolicy + Send> {
        match self {
            Self::Wellness => Box::new(WellnessPolicy),
            Self::Couch => Box::new(CouchPolicy),
            Self::Random => Box::new(RandomPolicy::new(seed)),
        }
    }
}

impl fmt::Display for GameplayStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GameplayStrategy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.label().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

struct WellnessPolicy;
struct CouchPolicy;

struct RandomPolicy {
    rng: ChaCha20Rng,
    cancel_chance: f64,
    bogus_chance: f64,
}

impl RandomPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            cancel_chance: 0.1,
            bogus_chance: 0.05,
        }
    }
}

fn available(session: &GameSession) -> impl Iterator<Item = &ActionDef> + '_ {
    session
        .catalog()
        .actions
        .iter()
        .filter(|def| !session.ledger().is_used(def.id))
}

impl PlayerPolicy for WellnessPolicy {
    fn name(&self) -> &'static str {
        "Wellness"
    }

    fn choose(&mut self, session: &GameSession) -> Option<PolicyDecision> {
        let best = available(session)
            .filter(|def| def.valence == Valence::Positive)
            .max_by_key(|def| def.points)?;
        Some(PolicyDecision::new(
            best.id.as_str(),
            Some(format!("best remaining +{}", best.points)),
        ))
    }
}

impl PlayerPolicy for CouchPolicy {
    fn name(&self) -> &'static str {
        "Couch"
    }

    fn choose(&mut self, session: &GameSession) -> Option<PolicyDecision> {
        let worst = available(session)
            .filter(|def| def.valence == Valence::Negative)
            .min_by_key(|def| def.points)?;
        Some(PolicyDecision::new(
            worst.id.as_str(),
            Some(format!("couch pick {}", worst.points)),
        ))
    }
}

impl PlayerPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn choose(&mut self, _session: &GameSession) -> Option<PolicyDecision> {
        if self.rng.gen_bool(self.bogus_chance) {
            return Some(PolicyDecision::new(
                BOGUS_ACTION_ID,
                Some("unknown id".to_string()),
            ));
        }
        // Used actions stay in the pool so repeat requests get exercised.
        let idx = self.rng.gen_range(0..ActionId::ALL.len());
        let action = ActionId::ALL[idx];
        Some(PolicyDecision::new(action.as_str(), None))
    }

    fn confirm(&mut self, _prompt: &ConfirmationPrompt) -> bool {
        !self.rng.gen_bool(self.cancel_chance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dreamstory_game::{ConfirmOutcome, RequestOutcome};

    fn session() -> GameSession {
        GameSession::new(9)
    }

    #[test]
    fn wellness_prefers_highest_positive() {
        let mut policy = GameplayStrategy::Wellness.create_policy(1);
        let decision = policy.choose(&session()).unwrap();
        assert_eq!(decision.action_id, "cookHealthy");
    }

    #[test]
    fn couch_prefers_worst_negative_then_idles() {
        let mut policy = GameplayStrategy::Couch.create_policy(1);
        let mut session = session();
        let mut picks = Vec::new();
        while let Some(decision) = policy.choose(&session) {
            picks.push(decision.action_id.clone());
            let outcome = session.request_action(&decision.action_id);
            assert!(matches!(outcome, RequestOutcome::AwaitingConfirmation(_)));
            assert!(matches!(
                session.confirm_pending(true),
                ConfirmOutcome::Resolved(_)
            ));
        }
        assert_eq!(picks, vec!["eat".to_string(), "watchTV".to_string()]);
    }

    #[test]
    fn random_policy_is_seeded() {
        let session = session();
        let mut a = GameplayStrategy::Random.create_policy(77);
        let mut b = GameplayStrategy::Random.create_policy(77);
        for _ in 0..32 {
            let left = a.choose(&session).map(|d| d.action_id);
            let right = b.choose(&session).map(|d| d.action_id);
            assert_eq!(left, right);
        }
    }

    #[test]
    fn strategies_parse_from_labels() {
        assert_eq!("wellness".parse(), Ok(GameplayStrategy::Wellness));
        assert_eq!("COUCH".parse(), Ok(GameplayStrategy::Couch));
        assert!("speedrun".parse::<GameplayStrategy>().is_err());
    }
}
