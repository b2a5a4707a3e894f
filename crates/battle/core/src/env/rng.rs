//! Injected randomness for every roll the battle makes.
//!
//! The session owns exactly one [`BattleRng`] and draws speed rolls, hit
//! checks, counter/reflection chances, drops and escape odds from it in a
//! fixed order. Seeding the generator therefore fixes the whole battle.

use std::collections::VecDeque;

/// Source of uniform random numbers.
///
/// Implementations must be deterministic for a given seed so battles can be
/// replayed.
pub trait BattleRng {
    /// Next raw 32-bit value.
    fn next_u32(&mut self) -> u32;

    /// Uniform float in `[0, 1)`.
    fn random(&mut self) -> f64 {
        f64::from(self.next_u32()) / (f64::from(u32::MAX) + 1.0)
    }

    /// Uniform integer in `[0, max)`; `0` when `max <= 0`.
    fn random_int(&mut self, max: i32) -> i32 {
        if max <= 0 {
            return 0;
        }
        (f64::from(max) * self.random()).floor() as i32
    }
}

/// Rolls `chance` against the generator.
///
/// Degenerate probabilities (`<= 0` or `>= 1`) are decided without drawing,
/// so a battle with no counter or reflection traits consumes no extra values.
pub fn roll(rng: &mut dyn BattleRng, chance: f64) -> bool {
    if chance <= 0.0 {
        false
    } else if chance >= 1.0 {
        true
    } else {
        rng.random() < chance
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// PCG-XSH-RR: 64-bit LCG state, 32-bit output through a xorshift followed
/// by a state-dependent rotation.
///
/// # References
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PcgRng {
    state: u64,
}

impl PcgRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    pub fn new(seed: u64) -> Self {
        Self {
            state: Self::pcg_step(seed.wrapping_add(Self::INCREMENT)),
        }
    }

    /// `state' = (state * multiplier + increment) mod 2^64`
    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn pcg_output(state: u64) -> u32 {
        // XOR upper bits with lower bits, shift right
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;

        // Use upper bits to determine rotation amount
        let rot = (state >> 59) as u32;

        xorshifted.rotate_right(rot)
    }
}

impl BattleRng for PcgRng {
    fn next_u32(&mut self) -> u32 {
        let output = Self::pcg_output(self.state);
        self.state = Self::pcg_step(self.state);
        output
    }
}

/// Scripted generator for tests: returns queued values, then `fallback`.
///
/// Values are the floats `random()` yields; integer rolls derive from them
/// exactly like they would from a real generator.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SequenceRng {
    values: VecDeque<f64>,
    fallback: f64,
    drawn: usize,
}

impl SequenceRng {
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            values: values.into_iter().collect(),
            fallback: 0.0,
            drawn: 0,
        }
    }

    /// Value returned once the script runs out.
    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn push(&mut self, value: f64) {
        self.values.push_back(value);
    }

    /// Number of values handed out so far.
    pub fn drawn(&self) -> usize {
        self.drawn
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl BattleRng for SequenceRng {
    fn next_u32(&mut self) -> u32 {
        (self.random() * (f64::from(u32::MAX) + 1.0)) as u32
    }

    fn random(&mut self) -> f64 {
        self.drawn += 1;
        self.values.pop_front().unwrap_or(self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pcg_is_deterministic_per_seed() {
        let mut a = PcgRng::new(42);
        let mut b = PcgRng::new(42);
        let mut c = PcgRng::new(43);

        let first: Vec<u32> = (0..8).map(|_| a.next_u32()).collect();
        let second: Vec<u32> = (0..8).map(|_| b.next_u32()).collect();
        let other: Vec<u32> = (0..8).map(|_| c.next_u32()).collect();

        assert_eq!(first, second);
        assert_ne!(first, other);
    }

    #[test]
    fn random_stays_in_unit_interval() {
        let mut rng = PcgRng::new(7);
        for _ in 0..1_000 {
            let value = rng.random();
            assert!((0.0..1.0).contains(&value));
        }
    }

    #[test]
    fn random_int_floors_scaled_value() {
        let mut rng = SequenceRng::new([0.0, 0.5, 0.99]);
        assert_eq!(rng.random_int(10), 0);
        assert_eq!(rng.random_int(10), 5);
        assert_eq!(rng.random_int(10), 9);
        assert_eq!(rng.random_int(0), 0);
    }

    #[test]
    fn degenerate_rolls_do_not_draw() {
        let mut rng = SequenceRng::new([0.3]);
        assert!(!roll(&mut rng, 0.0));
        assert!(roll(&mut rng, 1.0));
        assert_eq!(rng.drawn(), 0);

        assert!(roll(&mut rng, 0.5));
        assert_eq!(rng.drawn(), 1);
    }

    #[test]
    fn sequence_falls_back_when_exhausted() {
        let mut rng = SequenceRng::new([0.25]).with_fallback(0.75);
        assert_eq!(rng.random(), 0.25);
        assert_eq!(rng.random(), 0.75);
        assert_eq!(rng.remaining(), 0);
    }
}
