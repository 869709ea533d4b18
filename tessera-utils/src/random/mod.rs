//! Deterministic random sources.
//!
//! Every source here is fully determined by its seed, which is what makes world
//! replays reproducible. Nothing in the engine reads a thread-local RNG.

mod legacy_random;
mod xoroshiro;

pub use legacy_random::LegacyRandom;
pub use xoroshiro::Xoroshiro;

/// A seedable random number source.
pub trait Random {
    /// Splits off an independent source.
    #[must_use]
    fn fork(&mut self) -> Self
    where
        Self: Sized;

    /// Next uniformly distributed `i32`.
    fn next_i32(&mut self) -> i32;

    /// Next value in `0..bound`. `bound` must be positive.
    fn next_i32_bounded(&mut self, bound: i32) -> i32;

    /// Next value in `min..=max`.
    fn next_i32_between(&mut self, min: i32, max: i32) -> i32 {
        self.next_i32_bounded(max - min + 1) + min
    }

    /// Next uniformly distributed `i64`.
    fn next_i64(&mut self) -> i64;

    /// Next value in `0.0..1.0`.
    fn next_f32(&mut self) -> f32;

    /// Next value in `0.0..1.0`.
    fn next_f64(&mut self) -> f64;

    /// Next fair coin flip.
    fn next_bool(&mut self) -> bool;
}

/// A random source picked at runtime.
pub enum RandomSource {
    /// Xoroshiro128++.
    Xoroshiro(Xoroshiro),
    /// Java's 48-bit linear congruential generator.
    Legacy(LegacyRandom),
}

impl Random for RandomSource {
    fn fork(&mut self) -> Self {
        match self {
            Self::Xoroshiro(r) => Self::Xoroshiro(r.fork()),
            Self::Legacy(r) => Self::Legacy(r.fork()),
        }
    }

    fn next_i32(&mut self) -> i32 {
        match self {
            Self::Xoroshiro(r) => r.next_i32(),
            Self::Legacy(r) => r.next_i32(),
        }
    }

    fn next_i32_bounded(&mut self, bound: i32) -> i32 {
        match self {
            Self::Xoroshiro(r) => r.next_i32_bounded(bound),
            Self::Legacy(r) => r.next_i32_bounded(bound),
        }
    }

    fn next_i64(&mut self) -> i64 {
        match self {
            Self::Xoroshiro(r) => r.next_i64(),
            Self::Legacy(r) => r.next_i64(),
        }
    }

    fn next_f32(&mut self) -> f32 {
        match self {
            Self::Xoroshiro(r) => r.next_f32(),
            Self::Legacy(r) => r.next_f32(),
        }
    }

    fn next_f64(&mut self) -> f64 {
        match self {
            Self::Xoroshiro(r) => r.next_f64(),
            Self::Legacy(r) => r.next_f64(),
        }
    }

    fn next_bool(&mut self) -> bool {
        match self {
            Self::Xoroshiro(r) => r.next_bool(),
            Self::Legacy(r) => r.next_bool(),
        }
    }
}
