//! Woodcutter yield sampling.
//!
//! Every woodcutter rolls one six-sided die per harvest. The sampler is a
//! trait so tests can replace the die with a scripted sequence.

use rand::{Rng, SeedableRng, rngs::StdRng};
use std::{collections::VecDeque, fmt};

use super::entities::Trees;

/// Largest yield a single woodcutter can produce.
pub const MAX_YIELD: Trees = 2;

/// Source of per-woodcutter harvest yields.
pub trait HarvestSampler: fmt::Debug + Send {
    /// Trees produced by one woodcutter, in `0..=MAX_YIELD`.
    fn sample(&mut self) -> Trees;
}

/// Maps a d6 roll to a yield: 5-6 gives 2, 2-4 gives 1, 1 gives nothing.
#[must_use]
pub const fn yield_for_roll(roll: u8) -> Trees {
    match roll {
        5..=u8::MAX => 2,
        2..=4 => 1,
        _ => 0,
    }
}

/// Uniform die roll sampler backed by a `rand` generator.
#[derive(Debug)]
pub struct DieSampler<R = StdRng> {
    rng: R,
}

impl DieSampler<StdRng> {
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible dice for simulations and tests.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R> DieSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl Default for DieSampler<StdRng> {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl<R: Rng + fmt::Debug + Send> HarvestSampler for DieSampler<R> {
    fn sample(&mut self) -> Trees {
        yield_for_roll(self.rng.random_range(1..=6))
    }
}

/// Deterministic sampler that replays a fixed list of yields.
///
/// Once the script runs out every further sample returns `fallback`.
#[derive(Clone, Debug, Default)]
pub struct ScriptedSampler {
    yields: VecDeque<Trees>,
    fallback: Trees,
}

impl ScriptedSampler {
    pub fn new(yields: impl IntoIterator<Item = Trees>) -> Self {
        Self {
            yields: yields.into_iter().collect(),
            fallback: 0,
        }
    }

    /// Every woodcutter always yields `value`.
    #[must_use]
    pub fn constant(value: Trees) -> Self {
        Self {
            yields: VecDeque::new(),
            fallback: value.min(MAX_YIELD),
        }
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: Trees) -> Self {
        self.fallback = fallback.min(MAX_YIELD);
        self
    }

    pub fn remaining(&self) -> usize {
        self.yields.len()
    }
}

impl HarvestSampler for ScriptedSampler {
    fn sample(&mut self) -> Trees {
        self.yields
            .pop_front()
            .map_or(self.fallback, |value| value.min(MAX_YIELD))
    }
}
