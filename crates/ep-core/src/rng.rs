//! The engine's single deterministic random source.
//!
//! # Determinism strategy
//!
//! Every stochastic decision in a run (seeding, transmission rolls,
//! compliance rolls, course sampling, vaccination order, …) draws from one
//! `SimRng` owned by the engine.  Two runs with the same seed and the same
//! inputs therefore make the same draws in the same order and produce
//! byte-identical histories.
//!
//! The generator is `ChaCha8Rng` rather than a small non-cryptographic RNG
//! because its stream position can be read and restored exactly
//! ([`SimRng::state`] / [`SimRng::from_state`]).  That is what lets a saved
//! snapshot resume mid-run and continue bit-identically.
//!
//! Independent instances (ensembles) get seeds from [`derive_seed`], which
//! spreads consecutive run indices across the seed space with the 64-bit
//! fractional golden-ratio constant.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Seed for the `index`-th independent run derived from a base seed.
#[inline]
pub fn derive_seed(base: u64, index: u64) -> u64 {
    base ^ index.wrapping_add(1).wrapping_mul(MIXING_CONSTANT)
}

// ── RngState ─────────────────────────────────────────────────────────────────

/// Serializable position of a [`SimRng`].
///
/// The 128-bit word position is split into two `u64` halves so the state
/// round-trips through any serde format.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed:        [u8; 32],
    pub stream:      u64,
    pub word_pos_hi: u64,
    pub word_pos_lo: u64,
}

// ── SimRng ───────────────────────────────────────────────────────────────────

/// Simulation-level RNG.  Used only from the single thread that owns the
/// engine; parallel ensembles give each instance its own `SimRng`.
#[derive(Clone, Debug)]
pub struct SimRng(ChaCha8Rng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Rebuild a generator at exactly the position captured by `state`.
    pub fn from_state(state: &RngState) -> Self {
        let mut rng = ChaCha8Rng::from_seed(state.seed);
        rng.set_stream(state.stream);
        let word_pos = ((state.word_pos_hi as u128) << 64) | state.word_pos_lo as u128;
        rng.set_word_pos(word_pos);
        SimRng(rng)
    }

    /// Capture the current position.
    pub fn state(&self) -> RngState {
        let word_pos = self.0.get_word_pos();
        RngState {
            seed:        self.0.get_seed(),
            stream:      self.0.get_stream(),
            word_pos_hi: (word_pos >> 64) as u64,
            word_pos_lo: word_pos as u64,
        }
    }

    /// Derive a child `SimRng` with a different seed offset.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(ChaCha8Rng::seed_from_u64(child_seed))
    }

    /// Expose the inner generator for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut ChaCha8Rng {
        &mut self.0
    }

    /// Sample a uniformly distributed value of any `Standard`-distributed type.
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]; NaN counts as 0).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
        self.0.gen_bool(p)
    }

    /// One draw from Normal(`mean`, `std`).
    ///
    /// A negative or non-finite `std` degenerates to returning `mean`
    /// without consuming randomness.
    pub fn normal(&mut self, mean: f64, std: f64) -> f64 {
        match Normal::new(mean, std) {
            Ok(dist) if std >= 0.0 && std.is_finite() && mean.is_finite() => dist.sample(&mut self.0),
            _ => mean,
        }
    }

    /// Shuffle a mutable slice in-place (Fisher-Yates).
    #[inline]
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.0);
    }

    /// Choose a random element; `None` if the slice is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        slice.choose(&mut self.0)
    }

    /// Up to `amount` distinct elements, sampled without replacement.
    pub fn sample<T: Copy>(&mut self, slice: &[T], amount: usize) -> Vec<T> {
        slice.choose_multiple(&mut self.0, amount).copied().collect()
    }
}
