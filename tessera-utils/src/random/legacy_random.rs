use super::Random;

/// Java's `java.util.Random` linear congruential generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyRandom {
    seed: i64,
}

const MULTIPLIER: i64 = 0x5_DEEC_E66D;
const MASK: i64 = 0xFFFF_FFFF_FFFF;

impl LegacyRandom {
    /// Creates a source from a seed, scrambled the way Java does it.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed: (seed as i64 ^ MULTIPLIER) & MASK,
        }
    }

    fn next(&mut self, bits: u64) -> i32 {
        (self.next_random() >> (48 - bits)) as i32
    }

    fn next_random(&mut self) -> i64 {
        let m = self.seed.wrapping_mul(MULTIPLIER).wrapping_add(0xB) & MASK;
        self.seed = m;
        m
    }
}

impl Random for LegacyRandom {
    fn fork(&mut self) -> Self {
        Self::from_seed(self.next_i64() as u64)
    }

    fn next_i32(&mut self) -> i32 {
        self.next(32)
    }

    fn next_i32_bounded(&mut self, bound: i32) -> i32 {
        debug_assert!(bound > 0, "bound must be positive");
        if bound & bound.wrapping_sub(1) == 0 {
            (i64::from(bound).wrapping_mul(i64::from(self.next(31))) >> 31) as i32
        } else {
            loop {
                let i = self.next(31);
                let j = i % bound;
                if i.wrapping_sub(j).wrapping_add(bound.wrapping_sub(1)) >= 0 {
                    return j;
                }
            }
        }
    }

    fn next_i64(&mut self) -> i64 {
        let i = self.next_i32();
        let j = self.next_i32();
        (i64::from(i) << 32).wrapping_add(i64::from(j))
    }

    fn next_f32(&mut self) -> f32 {
        self.next(24) as f32 * 5.960_464_5e-8_f32
    }

    fn next_f64(&mut self) -> f64 {
        ((u64::from(self.next(26) as u32) << 27) | u64::from(self.next(27) as u32)) as f64
            * f64::from(1.110_223e-16_f32)
    }

    fn next_bool(&mut self) -> bool {
        self.next(1) != 0
    }
}
