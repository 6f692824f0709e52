//! RNG module - deterministic pseudo-random numbers
//!
//! Level generation, speckle sampling and particle jitter all draw from a
//! seeded LCG so that the same seed always produces the same level.

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Seed derived from a level number, so every level has its own speckle pattern.
    pub fn for_level(level: u32) -> Self {
        Self::new(level.wrapping_mul(0x9E37_79B9) ^ 0x5EED_1A7E)
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Top `bits` bits of the next value. The low bits of an LCG are weak.
    pub fn next_bits(&mut self, bits: u32) -> u32 {
        debug_assert!(bits > 0 && bits <= 32);
        self.next_u32() >> (32 - bits)
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Uniform integer in `[lo, hi]`.
    pub fn range_inclusive(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        lo + self.next_range((hi - lo + 1) as u32) as i32
    }

    /// Uniform float in `[0, 1)`.
    pub fn next_f32(&mut self) -> f32 {
        self.next_bits(24) as f32 / (1u32 << 24) as f32
    }

    /// Uniform float in `[-0.5, 0.5)`.
    pub fn jitter(&mut self) -> f32 {
        self.next_f32() - 0.5
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}
