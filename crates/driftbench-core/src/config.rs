//! Default parameters and serializable stream configurations.
//!
//! Nothing here is process-wide state: every builder receives its settings
//! as explicit parameters or through one of the config structs below, which
//! can be deserialized from JSON by a harness.
//!
//! # Usage
//!
//! ```
//! use driftbench_core::config::{RbfStreamConfig, DEFAULT_DRIFT_LENGTH};
//!
//! let config = RbfStreamConfig {
//!     num_concepts: 5,
//!     n_per_concept: 200,
//!     ..Default::default()
//! };
//! assert_eq!(config.drift_length, DEFAULT_DRIFT_LENGTH);
//! ```

use serde::{Deserialize, Serialize};

// =============================================================================
// Stream Construction
// =============================================================================

/// Number of concepts in a preset stream.
pub const DEFAULT_NUM_CONCEPTS: usize = 100;

/// Nominal width (in samples) of each gradual transition.
pub const DEFAULT_DRIFT_LENGTH: usize = 100;

/// Samples generated per concept by the synthetic presets.
pub const DEFAULT_N_PER_CONCEPT: usize = 2000;

/// Feature dimensionality of the random RBF preset.
pub const DEFAULT_RBF_DIMS: usize = 100;

/// Number of centroids per random RBF model.
pub const DEFAULT_RBF_CENTROIDS: usize = 10;

/// Minimum absolute difference of per-coordinate means for a coordinate to
/// count as part of a change region.
pub const DEFAULT_REGION_THRESHOLD: f64 = 1e-6;

// =============================================================================
// Scoring
// =============================================================================

/// Matching window: a reported change point within `< DEFAULT_TOLERANCE`
/// samples of a true one counts as a hit.
pub const DEFAULT_TOLERANCE: usize = 10;

/// Beta of the F-beta score (1.0 = F1).
pub const DEFAULT_BETA: f64 = 1.0;

// =============================================================================
// Preset Configurations
// =============================================================================

/// Configuration of the gradual random-RBF stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RbfStreamConfig {
    pub num_concepts: usize,
    pub n_per_concept: usize,
    pub drift_length: usize,
    pub stretch: bool,
    pub dims: usize,
    pub n_centroids: usize,
    /// Append a drift-free block of `dims` dimensions to every sample
    pub add_dims_without_drift: bool,
    /// Min-max scale the features before partitioning
    pub normalize: bool,
    /// Seed of the transition draws
    pub seed: u64,
}

impl Default for RbfStreamConfig {
    fn default() -> Self {
        Self {
            num_concepts: DEFAULT_NUM_CONCEPTS,
            n_per_concept: DEFAULT_N_PER_CONCEPT,
            drift_length: DEFAULT_DRIFT_LENGTH,
            stretch: true,
            dims: DEFAULT_RBF_DIMS,
            n_centroids: DEFAULT_RBF_CENTROIDS,
            add_dims_without_drift: true,
            normalize: false,
            seed: 0,
        }
    }
}

/// Configuration of the gradual LED stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedStreamConfig {
    pub num_concepts: usize,
    pub n_per_concept: usize,
    pub drift_length: usize,
    pub stretch: bool,
    /// Enables attribute noise and the 17 irrelevant attributes
    pub has_noise: bool,
    pub seed: u64,
}

impl Default for LedStreamConfig {
    fn default() -> Self {
        Self {
            num_concepts: DEFAULT_NUM_CONCEPTS,
            n_per_concept: DEFAULT_N_PER_CONCEPT,
            drift_length: DEFAULT_DRIFT_LENGTH,
            stretch: true,
            has_noise: true,
            seed: 0,
        }
    }
}
