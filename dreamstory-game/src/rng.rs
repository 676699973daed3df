//! Seeded randomness for the outing event.
use hmac::{Hmac, Mac};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use sha2::Sha256;
use std::cell::{RefCell, RefMut};
use std::collections::VecDeque;

/// Source of the two uniform draws the outing event needs.
///
/// Each draw is a value in `[0, 1)`.
pub trait EventDice {
    /// Draw deciding whether the branch action diverts into an outing.
    fn roll_gate(&mut self) -> f32;
    /// Draw deciding how the outing goes.
    fn roll_outcome(&mut self) -> f32;
}

/// Deterministic bundle of RNG streams segregated by event domain.
#[derive(Debug, Clone)]
pub struct RngBundle {
    outing_gate: RefCell<CountingRng<SmallRng>>,
    outing_outcome: RefCell<CountingRng<SmallRng>>,
}

impl RngBundle {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            outing_gate: RefCell::new(CountingRng::new(derive_stream_seed(seed, b"outing_gate"))),
            outing_outcome: RefCell::new(CountingRng::new(derive_stream_seed(
                seed,
                b"outing_outcome",
            ))),
        }
    }

    #[must_use]
    pub fn outing_gate(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.outing_gate.borrow_mut()
    }

    #[must_use]
    pub fn outing_outcome(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.outing_outcome.borrow_mut()
    }

    /// Total draws across every stream.
    #[must_use]
    pub fn draws(&self) -> u64 {
        self.outing_gate().draws() + self.outing_outcome().draws()
    }
}

impl EventDice for RngBundle {
    fn roll_gate(&mut self) -> f32 {
        self.outing_gate().gen_range(0.0..1.0)
    }

    fn roll_outcome(&mut self) -> f32 {
        self.outing_outcome().gen_range(0.0..1.0)
    }
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<SmallRng> {
    fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: rand::RngCore> CountingRng<R> {
    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: rand::RngCore> rand::RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    // HMAC accepts keys of any length, so the fallback is unreachable.
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        return user_seed;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0_u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}

/// Replays a fixed sequence of draws. Once a queue runs dry the fallback
/// value is returned.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    gates: VecDeque<f32>,
    outcomes: VecDeque<f32>,
    fallback: f32,
}

impl ScriptedDice {
    #[must_use]
    pub fn new<G, O>(gates: G, outcomes: O) -> Self
    where
        G: IntoIterator<Item = f32>,
        O: IntoIterator<Item = f32>,
    {
        Self {
            gates: gates.into_iter().collect(),
            outcomes: outcomes.into_iter().collect(),
            fallback: 0.99,
        }
    }

    /// Dice that always divert the branch action into a good outing.
    #[must_use]
    pub fn always_good_outing() -> Self {
        Self::new([], []).with_fallback(0.0)
    }

    /// Dice that never divert the branch action.
    #[must_use]
    pub fn never_outing() -> Self {
        Self::new([], [])
    }

    #[must_use]
    pub const fn with_fallback(mut self, fallback: f32) -> Self {
        self.fallback = fallback;
        self
    }

    /// Draws still queued, gate and outcome combined.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.gates.len() + self.outcomes.len()
    }
}

impl EventDice for ScriptedDice {
    fn roll_gate(&mut self) -> f32 {
        self.gates.pop_front().unwrap_or(self.fallback)
    }

    fn roll_outcome(&mut self) -> f32 {
        self.outcomes.pop_front().unwrap_or(self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streams_are_deterministic_per_seed() {
        let mut a = RngBundle::from_user_seed(0xD2EA);
        let mut b = RngBundle::from_user_seed(0xD2EA);
        for _ in 0..16 {
            assert_eq!(a.roll_gate().to_bits(), b.roll_gate().to_bits());
            assert_eq!(a.roll_outcome().to_bits(), b.roll_outcome().to_bits());
        }
        assert_eq!(a.draws(), b.draws());
        assert!(a.draws() >= 32);
    }

    #[test]
    fn domains_get_distinct_seeds() {
        assert_ne!(
            derive_stream_seed(7, b"outing_gate"),
            derive_stream_seed(7, b"outing_outcome")
        );
        assert_ne!(
            derive_stream_seed(7, b"outing_gate"),
            derive_stream_seed(8, b"outing_gate")
        );
    }

    #[test]
    fn draws_stay_in_unit_interval() {
        let mut dice = RngBundle::from_user_seed(42);
        for _ in 0..1_000 {
            let gate = dice.roll_gate();
            assert!((0.0..1.0).contains(&gate));
            let outcome = dice.roll_outcome();
            assert!((0.0..1.0).contains(&outcome));
        }
    }

    #[test]
    fn scripted_dice_replay_then_fall_back() {
        let mut dice = ScriptedDice::new([0.1, 0.8], [0.6]);
        assert_eq!(dice.remaining(), 3);
        assert!((dice.roll_gate() - 0.1).abs() < f32::EPSILON);
        assert!((dice.roll_gate() - 0.8).abs() < f32::EPSILON);
        assert!((dice.roll_outcome() - 0.6).abs() < f32::EPSILON);
        assert!((dice.roll_gate() - 0.99).abs() < f32::EPSILON);

        let mut good = ScriptedDice::always_good_outing();
        assert!(good.roll_gate().abs() < f32::EPSILON);
        assert!(good.roll_outcome().abs() < f32::EPSILON);
    }
}
