//! Seedable uniform random source.
//!
//! Randomness only feeds particle sizes and the procedural fallback shapes,
//! so a small deterministic generator is enough. The same seed yields the
//! same particles on every platform.

/// Uniform random numbers in a half-open range.
pub trait RandomSource {
    /// Returns a value uniformly distributed in `[lo, hi)`.
    fn range(&mut self, lo: f64, hi: f64) -> f64;
}

/// Xorshift64 generator with shifts (13, 7, 17).
#[derive(Debug, Clone)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    /// Replaces a zero seed, which is a fixed point of xorshift.
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Uniform in [0, 1) from the upper 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

impl RandomSource for Xorshift64 {
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }
}
