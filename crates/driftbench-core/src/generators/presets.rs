//! Ready-made synthetic gradual drift streams.

use super::{concept_blocks, ConceptGenerator, LedGenerator, RandomRbfGenerator};
use crate::config::{LedStreamConfig, RbfStreamConfig};
use crate::data::{MinMaxScaler, Preprocess};
use crate::error::Result;
use crate::stream::{GradualStreamBuilder, PartitionStrategy, Region, RegionalDrift, Stream};
use tracing::{debug, instrument};

/// Gradual stream over random RBF concepts.
///
/// Concept `i` samples the RBF model with model seed `i`. With
/// `add_dims_without_drift`, every sample is extended by `dims` coordinates
/// from a model seeded with `num_concepts`, which no concept uses, so those
/// coordinates never change across a change point.
///
/// # Errors
///
/// Returns `DriftError::Configuration` for zero `dims`, `n_centroids`,
/// `num_concepts` or `drift_length`, and `DriftError::InsufficientData` when
/// `n_per_concept` is 0.
#[instrument(skip_all, fields(num_concepts = config.num_concepts, dims = config.dims))]
pub fn gradual_rbf(config: &RbfStreamConfig) -> Result<Stream> {
    let generator = RandomRbfGenerator::new(config.dims, config.n_centroids)?;
    let dataset = concept_blocks(config.num_concepts, |i| {
        generator.generate(i as u64, config.n_per_concept)
    })?;

    let mut builder = GradualStreamBuilder::new(dataset, config.num_concepts)
        .with_drift_length(config.drift_length)
        .with_stretch(config.stretch)
        .with_strategy(PartitionStrategy::Sequential)
        .with_seed(config.seed);

    if config.add_dims_without_drift {
        let mut noise = generator.generate(config.num_concepts as u64, config.n_per_concept)?;
        if config.normalize {
            noise = MinMaxScaler.apply(&noise)?;
        }
        debug!(noise_dims = noise.n_cols(), "appending drift-free dimensions");
        builder = builder.with_region(RegionalDrift::new(Region::Full, noise)?);
    }
    if config.normalize {
        builder = builder.with_preprocess(MinMaxScaler);
    }
    builder.build()
}

/// Gradual stream over LED digit concepts.
///
/// Every concept draws the same digit sequence. Odd concepts `i` flip
/// segments with probability `(i + 1) / num_concepts` while even concepts are
/// noise-free, so each change point toggles the noise level.
///
/// # Errors
///
/// Returns `DriftError::Configuration` for zero `num_concepts` or
/// `drift_length`, and `DriftError::InsufficientData` when `n_per_concept`
/// is 0.
#[instrument(skip_all, fields(num_concepts = config.num_concepts, has_noise = config.has_noise))]
pub fn gradual_led(config: &LedStreamConfig) -> Result<Stream> {
    let num_concepts = config.num_concepts;
    let dataset = concept_blocks(num_concepts, |i| {
        let generator = LedGenerator::new(led_noise(i, num_concepts), config.has_noise)?;
        debug!(concept = i, noise = generator.noise_percentage(), "generating LED concept");
        generator.generate(0, config.n_per_concept)
    })?;

    GradualStreamBuilder::new(dataset, num_concepts)
        .with_drift_length(config.drift_length)
        .with_stretch(config.stretch)
        .with_strategy(PartitionStrategy::Sequential)
        .with_seed(config.seed)
        .build()
}

fn led_noise(concept: usize, num_concepts: usize) -> f64 {
    if concept % 2 == 1 {
        (concept + 1) as f64 / num_concepts as f64
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_rbf() -> RbfStreamConfig {
        RbfStreamConfig {
            num_concepts: 4,
            n_per_concept: 60,
            drift_length: 10,
            dims: 3,
            n_centroids: 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_rbf_stream_shape() {
        let stream = gradual_rbf(&small_rbf()).unwrap();
        assert_eq!(stream.num_concepts(), 4);
        assert_eq!(stream.dims(), 6);
        assert_eq!(stream.true_change_points().len(), 3);
        // Equal concepts: no stretching, each concept loses its reserve rows
        assert_eq!(stream.drift_lengths(), &[10, 10, 10]);
        assert_eq!(stream.true_change_points()[0], 50);
    }

    #[test]
    fn test_rbf_drift_free_dims_never_change() {
        let stream = gradual_rbf(&small_rbf()).unwrap();
        for region in stream.change_regions() {
            assert!(region.iter().all(|&c| c < 3), "noise coordinate in {region:?}");
        }
        // Noise block is identical at matching offsets of consecutive concepts
        let a = stream.get(0).unwrap();
        let b = stream.get(60).unwrap();
        assert_eq!(a.features[3..], b.features[3..]);
    }

    #[test]
    fn test_rbf_without_noise_dims() {
        let config = RbfStreamConfig {
            add_dims_without_drift: false,
            ..small_rbf()
        };
        let stream = gradual_rbf(&config).unwrap();
        assert_eq!(stream.dims(), 3);
    }

    #[test]
    fn test_rbf_normalize_bounds_features() {
        let config = RbfStreamConfig {
            normalize: true,
            ..small_rbf()
        };
        let stream = gradual_rbf(&config).unwrap();
        for sample in stream.iter() {
            assert!(sample.features.iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }

    #[test]
    fn test_rbf_is_reproducible() {
        let a = gradual_rbf(&small_rbf()).unwrap().to_dataset().unwrap();
        let b = gradual_rbf(&small_rbf()).unwrap().to_dataset().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rbf_rejects_zero_dims() {
        let config = RbfStreamConfig {
            dims: 0,
            ..small_rbf()
        };
        assert!(gradual_rbf(&config).is_err());
    }

    #[test]
    fn test_led_noise_schedule() {
        assert_eq!(led_noise(0, 4), 0.0);
        assert_eq!(led_noise(1, 4), 0.5);
        assert_eq!(led_noise(2, 4), 0.0);
        assert_eq!(led_noise(3, 4), 1.0);
    }

    #[test]
    fn test_led_generator_carries_schedule() {
        let generator = LedGenerator::new(led_noise(3, 8), true).unwrap();
        assert_eq!(generator.noise_percentage(), 0.5);
    }

    #[test]
    fn test_led_stream() {
        let config = LedStreamConfig {
            num_concepts: 3,
            n_per_concept: 50,
            drift_length: 10,
            ..Default::default()
        };
        let stream = gradual_led(&config).unwrap();
        assert_eq!(stream.dims(), 24);
        assert_eq!(stream.true_change_points().len(), 2);
        assert!(stream
            .iter()
            .all(|s| s.features.iter().all(|&v| v == 0.0 || v == 1.0)));
    }

    #[test]
    fn test_led_without_noise_attributes() {
        let config = LedStreamConfig {
            num_concepts: 2,
            n_per_concept: 20,
            drift_length: 4,
            has_noise: false,
            ..Default::default()
        };
        assert_eq!(gradual_led(&config).unwrap().dims(), 7);
    }
}
