//! Seeded random streams for reproducible runs.
//!
//! A run has one master seed.  Every entity's movement draws from its own
//! stream, derived from the master seed and a stream number handed out in
//! registration order:
//!
//!   stream_seed = master ^ (stream * GOLDEN_GAMMA)
//!
//! Adding an entity therefore never shifts the numbers another entity sees.
//! Run-wide decisions (which entity drops offline) use a separate [`SimRng`].

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// 2^64 / φ, the SplitMix64 increment.  Spreads consecutive stream numbers
/// across the seed space.
const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

fn stream_seed(master: u64, stream: u64) -> u64 {
    master ^ stream.wrapping_mul(GOLDEN_GAMMA)
}

// ── EntityRng ─────────────────────────────────────────────────────────────────

/// One entity's movement stream.
pub struct EntityRng(SmallRng);

impl EntityRng {
    pub fn new(master_seed: u64, stream: u64) -> Self {
        EntityRng(SmallRng::seed_from_u64(stream_seed(master_seed, stream)))
    }

    /// Uniform step in `[-width/2, width/2)`.
    #[inline]
    pub fn jitter(&mut self, width: f64) -> f64 {
        (self.0.r#gen::<f64>() - 0.5) * width
    }

    /// A value of any `Standard`-distributed type.
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Run-wide stream for decisions that are not tied to one entity.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Split off an independent stream.  Two parents with the same seed
    /// split identical children for the same `stream`.
    pub fn child(&mut self, stream: u64) -> SimRng {
        let master = self.0.r#gen::<u64>();
        SimRng(SmallRng::seed_from_u64(stream_seed(master, stream)))
    }

    /// `true` with probability `p`, clamped to `[0, 1]`.
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Uniform pick.  `None` if `items` is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.0)
    }

    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }
}
