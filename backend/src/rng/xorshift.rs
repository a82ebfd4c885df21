//! xorshift64* random stream
//!
//! # Algorithm
//!
//! xorshift64* passes TestU01's BigCrush with 64 bits of state, which is
//! plenty for a reference generator whose job is reproducibility rather than
//! physics precision.
//!
//! # Determinism
//!
//! Same seed → same sequence. The stream position only ever advances, and the
//! full position is the 64-bit state, so [`RandomStream::from_state`] resumes
//! a sequence exactly.

use serde::{Deserialize, Serialize};

/// Deterministic random stream using xorshift64*
///
/// # Example
/// ```
/// use generator_adapter_core_rs::RandomStream;
///
/// let mut rng = RandomStream::new(12345);
/// let u = rng.next_f64();
/// assert!(u > 0.0 && u < 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomStream {
    state: u64,
}

impl RandomStream {
    /// Create a stream from a seed. The seed goes through one splitmix64
    /// step, a bijection, so distinct seeds (0 included) start from distinct
    /// states.
    pub fn new(seed: u64) -> Self {
        Self::from_state(splitmix64(seed))
    }

    /// Resume a stream from a previously captured [`state`](Self::state).
    /// An all-zero xorshift state never leaves zero, so zero is mapped to 1.
    pub fn from_state(state: u64) -> Self {
        let state = if state == 0 { 1 } else { state };
        Self { state }
    }

    /// Current stream position.
    pub fn state(&self) -> u64 {
        self.state
    }

    /// Next raw 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Uniform draw in the open interval (0, 1).
    ///
    /// Both endpoints are excluded so the result is always safe to pass to
    /// `ln`.
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.next_u64() >> 11;
        (bits as f64 + 0.5) * (1.0 / ((1u64 << 53) as f64))
    }

    /// Exponential draw with the given slope: density ∝ exp(-slope · x), x ≥ 0.
    ///
    /// # Panics
    /// Panics if `slope` is not positive.
    pub fn exponential(&mut self, slope: f64) -> f64 {
        assert!(slope > 0.0, "slope must be positive");
        -self.next_f64().ln() / slope
    }

    /// Draw distributed as 1/x on [min, max].
    ///
    /// # Panics
    /// Panics unless 0 < min < max.
    pub fn log_uniform(&mut self, min: f64, max: f64) -> f64 {
        assert!(min > 0.0 && min < max, "log_uniform requires 0 < min < max");
        min * (max / min).powf(self.next_f64())
    }

    /// Pick an index with probability proportional to `weights[i]`.
    ///
    /// Returns `None` when every weight is zero (or the slice is empty).
    /// Negative weights are treated as zero.
    pub fn choose_weighted(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().map(|w| w.max(0.0)).sum();
        if total <= 0.0 {
            return None;
        }
        let mut target = self.next_f64() * total;
        let mut last_positive = None;
        for (index, weight) in weights.iter().enumerate() {
            let weight = weight.max(0.0);
            if weight == 0.0 {
                continue;
            }
            last_positive = Some(index);
            if target < weight {
                return Some(index);
            }
            target -= weight;
        }
        // Floating-point leftovers land on the last eligible slot.
        last_positive
    }
}

fn splitmix64(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_seed_converted_to_nonzero() {
        let rng = RandomStream::new(0);
        assert_ne!(rng.state(), 0, "Zero seed must not give a zero state");
    }

    #[test]
    fn test_zero_and_one_seeds_differ() {
        let mut zero = RandomStream::new(0);
        let mut one = RandomStream::new(1);
        assert_ne!(zero.state(), one.state());
        assert_ne!(zero.next_u64(), one.next_u64());
    }

    #[test]
    fn test_zero_state_resumes_nonzero() {
        assert_eq!(RandomStream::from_state(0).state(), 1);
    }

    #[test]
    fn test_next_f64_open_interval() {
        let mut rng = RandomStream::new(12345);
        for _ in 0..10_000 {
            let u = rng.next_f64();
            assert!(u > 0.0 && u < 1.0, "next_f64() produced {} outside (0, 1)", u);
        }
    }

    #[test]
    #[should_panic(expected = "slope must be positive")]
    fn test_exponential_rejects_zero_slope() {
        RandomStream::new(1).exponential(0.0);
    }

    #[test]
    fn test_log_uniform_bounds() {
        let mut rng = RandomStream::new(7);
        for _ in 0..1000 {
            let x = rng.log_uniform(1e-4, 0.5);
            assert!((1e-4..=0.5).contains(&x));
        }
    }

    #[test]
    fn test_choose_weighted_skips_zero_weights() {
        let mut rng = RandomStream::new(99);
        for _ in 0..500 {
            let picked = rng.choose_weighted(&[0.0, 3.0, 0.0, 1.0]).unwrap();
            assert!(picked == 1 || picked == 3);
        }
    }

    #[test]
    fn test_choose_weighted_all_zero_is_none() {
        let mut rng = RandomStream::new(99);
        assert_eq!(rng.choose_weighted(&[0.0, 0.0]), None);
        assert_eq!(rng.choose_weighted(&[]), None);
    }
}
