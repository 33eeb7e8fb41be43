//! Seeded synthetic concept generators.
//!
//! Purely synthetic streams build every concept from one generator run with
//! a fixed seed, so a stream can be rebuilt bit for bit. Concepts differ by
//! the generator's model seed (random RBF) or its parameters (LED noise).
//!
//! # Presets
//!
//! - [`gradual_rbf`] - one random RBF model per concept, optionally extended
//!   with drift-free dimensions from a reserved seed
//! - [`gradual_led`] - seven-segment digits whose attribute noise alternates
//!   between concepts
//!
//! # Example
//!
//! ```
//! use driftbench_core::config::RbfStreamConfig;
//! use driftbench_core::generators::gradual_rbf;
//!
//! let config = RbfStreamConfig {
//!     num_concepts: 3,
//!     n_per_concept: 100,
//!     drift_length: 20,
//!     dims: 5,
//!     ..Default::default()
//! };
//! let stream = gradual_rbf(&config).unwrap();
//! assert_eq!(stream.true_change_points().len(), 2);
//! assert_eq!(stream.dims(), 10); // 5 drifting + 5 drift-free
//! ```

mod led;
mod presets;
mod rbf;

pub use led::LedGenerator;
pub use presets::{gradual_led, gradual_rbf};
pub use rbf::RandomRbfGenerator;

use crate::data::{Dataset, Label, Matrix};
use crate::error::Result;

/// A deterministic source of feature vectors.
///
/// Two calls with the same seed and count return identical matrices.
pub trait ConceptGenerator {
    /// Dimensionality of generated samples.
    fn dims(&self) -> usize;

    /// Generates `n` samples using `seed`.
    fn generate(&self, seed: u64, n: usize) -> Result<Matrix>;
}

/// Builds a dataset of `num_concepts` generated blocks, labelling the rows of
/// block `i` with `i`.
///
/// `make(i)` produces the feature block of concept `i`.
pub fn concept_blocks<F>(num_concepts: usize, mut make: F) -> Result<Dataset>
where
    F: FnMut(usize) -> Result<Matrix>,
{
    let parts = (0..num_concepts)
        .map(|i| Ok(Dataset::with_constant_label(make(i)?, i as Label)))
        .collect::<Result<Vec<_>>>()?;
    Dataset::concat(&parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concept_blocks_labels_by_index() {
        let dataset = concept_blocks(3, |i| Ok(Matrix::zeros(i + 1, 2))).unwrap();
        assert_eq!(dataset.labels(), &[0, 1, 1, 2, 2, 2]);
        assert_eq!(dataset.dims(), 2);
    }

    #[test]
    fn test_concept_blocks_propagates_errors() {
        let result = concept_blocks(2, |i| {
            if i == 1 {
                Err(crate::DriftError::config("boom"))
            } else {
                Ok(Matrix::zeros(1, 1))
            }
        });
        assert!(result.is_err());
    }
}
