//! Random sources for event sampling

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;
use uuid::Uuid;

/// Uniform randomness consumed by the generator
///
/// Implementations must draw every value uniformly over its domain.
pub trait RandomSource {
    /// Uniform index in `0..len`; `len` is never zero
    fn index(&mut self, len: usize) -> usize;

    /// Uniform integer in `range` (both ends inclusive)
    fn integer(&mut self, range: RangeInclusive<u32>) -> u32;

    /// A fresh version-4 UUID
    fn uuid(&mut self) -> Uuid;
}

/// Pick one element of `options` uniformly
pub fn pick<S, T>(source: &mut S, options: &[T]) -> T
where
    S: RandomSource + ?Sized,
    T: Copy,
{
    options[source.index(options.len())]
}

/// `RandomSource` backed by any `rand` generator
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl RngSource<StdRng> {
    /// Source seeded from the operating system
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Deterministic source for tests and reproducible runs
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RngSource<R> {
    /// Wrap an existing generator
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    fn integer(&mut self, range: RangeInclusive<u32>) -> u32 {
        self.rng.gen_range(range)
    }

    fn uuid(&mut self) -> Uuid {
        uuid::Builder::from_random_bytes(self.rng.gen()).into_uuid()
    }
}
