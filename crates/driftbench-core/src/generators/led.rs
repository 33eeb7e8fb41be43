//! Seven-segment LED digit generator.
//!
//! Each sample is a digit drawn uniformly from 0-9 and encoded as the seven
//! segments of an LED display. Every segment is flipped independently with
//! probability `noise_percentage`, and with `has_noise` set the sample is
//! padded with 17 uniformly random binary attributes that carry no signal.

use super::ConceptGenerator;
use crate::data::Matrix;
use crate::error::{DriftError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Segment patterns of the digits 0-9.
const SEGMENTS: [[u8; 7]; 10] = [
    [1, 1, 1, 0, 1, 1, 1],
    [0, 0, 1, 0, 0, 1, 0],
    [1, 0, 1, 1, 1, 0, 1],
    [1, 0, 1, 1, 0, 1, 1],
    [0, 1, 1, 1, 0, 1, 0],
    [1, 1, 0, 1, 0, 1, 1],
    [1, 1, 0, 1, 1, 1, 1],
    [1, 0, 1, 0, 0, 1, 0],
    [1, 1, 1, 1, 1, 1, 1],
    [1, 1, 1, 1, 0, 1, 1],
];

/// Number of segment attributes.
pub const RELEVANT_ATTRIBUTES: usize = 7;

/// Number of random attributes appended when noise is enabled.
pub const IRRELEVANT_ATTRIBUTES: usize = 17;

/// LED digit generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedGenerator {
    noise_percentage: f64,
    has_noise: bool,
}

impl LedGenerator {
    /// # Errors
    ///
    /// Returns `DriftError::Configuration` if `noise_percentage` is outside
    /// `[0, 1]`.
    pub fn new(noise_percentage: f64, has_noise: bool) -> Result<Self> {
        if !(0.0..=1.0).contains(&noise_percentage) {
            return Err(DriftError::config(format!(
                "noise_percentage must be in [0, 1], got {noise_percentage}"
            )));
        }
        Ok(Self {
            noise_percentage,
            has_noise,
        })
    }

    pub fn noise_percentage(&self) -> f64 {
        self.noise_percentage
    }
}

impl ConceptGenerator for LedGenerator {
    fn dims(&self) -> usize {
        if self.has_noise {
            RELEVANT_ATTRIBUTES + IRRELEVANT_ATTRIBUTES
        } else {
            RELEVANT_ATTRIBUTES
        }
    }

    fn generate(&self, seed: u64, n: usize) -> Result<Matrix> {
        let dims = self.dims();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut data = Vec::with_capacity(n * dims);
        for _ in 0..n {
            let digit = rng.gen_range(0..SEGMENTS.len());
            for &segment in &SEGMENTS[digit] {
                // Offset keeps a tiny noise level from ever flipping a segment
                let flip = 0.01 + rng.gen::<f64>() <= self.noise_percentage;
                let value = if flip { 1 - segment } else { segment };
                data.push(f64::from(value));
            }
            if self.has_noise {
                data.extend((0..IRRELEVANT_ATTRIBUTES).map(|_| f64::from(rng.gen_range(0..2u8))));
            }
        }
        Matrix::from_vec(n, dims, data)
    }
}
