// Fast random number generator based on a PCG-LCG with RXS-M-XS output
// permutation. A single u64 of state keeps it cheap enough for the hot
// sampling path, and the RngCore impl lets it plug into rand_distr.
//
// Reference: Melissa E. O'Neill, "PCG: A Family of Simple Fast
// Space-Efficient Statistically Good Algorithms for Random Number
// Generation"

use rand::{Rng, RngCore, SeedableRng};
use rand_distr::{Cauchy, Distribution, Normal};

/// Multiplier of the underlying LCG step.
const PRN_MULT: u64 = 6364136223846793005;
/// Increment of the underlying LCG step.
const PRN_ADD: u64 = 1442695040888963407;

#[derive(Clone, Copy, Debug)]
pub struct FastRng {
    seed: u64,
}

impl FastRng {
    /// Seed a fresh generator.
    #[inline]
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Next uniform draw in [0, 1).
    #[inline(always)]
    pub fn random(&mut self) -> f64 {
        self.seed = PRN_MULT.wrapping_mul(self.seed).wrapping_add(PRN_ADD);

        // Output permutation (RXS-M-XS).
        let word = ((self.seed >> ((self.seed >> 59) + 5)) ^ self.seed)
            .wrapping_mul(12605985483714917081);
        let result = (word >> 43) ^ word;

        // Scale the full 64-bit word by 2^-64.
        (result as f64) * 5.421010862427522e-20
    }

    /// Restart the stream, one seed per trajectory.
    #[inline]
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
    }
}

impl SeedableRng for FastRng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self {
            seed: u64::from_le_bytes(seed),
        }
    }
}

impl RngCore for FastRng {
    #[inline(always)]
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    #[inline(always)]
    fn next_u64(&mut self) -> u64 {
        self.seed = PRN_MULT.wrapping_mul(self.seed).wrapping_add(PRN_ADD);

        let word = ((self.seed >> ((self.seed >> 59) + 5)) ^ self.seed)
            .wrapping_mul(12605985483714917081);
        (word >> 43) ^ word
    }

    #[inline]
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut left = dest;
        while left.len() >= 8 {
            let bytes = self.next_u64().to_le_bytes();
            left[..8].copy_from_slice(&bytes);
            left = &mut left[8..];
        }
        if !left.is_empty() {
            let bytes = self.next_u64().to_le_bytes();
            left.copy_from_slice(&bytes[..left.len()]);
        }
    }

    #[inline]
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Uniform draw in (0, 1], for use in logarithms and denominators.
#[inline]
pub fn uniform_pos<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    loop {
        let u: f64 = rng.gen();
        if u > 0.0 {
            return u;
        }
    }
}

/// Sample from a Voigt profile centred on `mean` with Gaussian sigma
/// `sigma` and Lorentzian half-width `gamma`, as the sum of a normal
/// and a Cauchy deviate.
pub fn random_voigt<R: Rng + ?Sized>(rng: &mut R, mean: f64, sigma: f64, gamma: f64) -> f64 {
    let mut x = mean;
    if sigma > 0.0 {
        if let Ok(normal) = Normal::new(0.0, sigma) {
            x += normal.sample(rng);
        }
    }
    if gamma > 0.0 {
        if let Ok(cauchy) = Cauchy::new(0.0, gamma) {
            x += cauchy.sample(rng);
        }
    }
    x
}
