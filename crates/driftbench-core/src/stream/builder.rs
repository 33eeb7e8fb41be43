//! Gradual drift stream construction.
//!
//! # Algorithm
//!
//! 1. Optionally preprocess the features, then partition the dataset into
//!    `num_concepts` ordered concepts.
//! 2. Compute the length of every transition (fixed or stretched), clipped to
//!    half of the smaller neighbouring concept.
//! 3. Emit concept `i` front to back until only its transition reserve is left.
//! 4. At transition position `t` of length `L`, draw the next unconsumed row of
//!    concept `i + 1` with probability `t / L`, otherwise of concept `i`. This
//!    is a discrete choice per position: every emitted sample is an unmodified
//!    dataset row.
//! 5. Record the stream index of the first transition position as a true
//!    change point and continue with concept `i + 1`.
//!
//! Rows of a concept's reserve that were not drawn are dropped, so no row is
//! ever emitted twice and no concept reads outside its own block.

use super::partition::{partition, Concept, PartitionStrategy};
use super::region::{differing_means, RegionalDrift};
use super::{Projection, Stream};
use crate::config::{DEFAULT_DRIFT_LENGTH, DEFAULT_REGION_THRESHOLD};
use crate::data::{Dataset, Matrix, Preprocess};
use crate::error::{DriftError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, instrument};

/// Builds a [`Stream`] with gradual transitions between concepts.
///
/// # Example
///
/// ```
/// use driftbench_core::data::{Dataset, Matrix};
/// use driftbench_core::stream::GradualStreamBuilder;
///
/// let features = Matrix::zeros(300, 2);
/// let labels = (0..300).map(|i| (i / 100) as u32).collect();
/// let dataset = Dataset::new(features, labels).unwrap();
///
/// let stream = GradualStreamBuilder::new(dataset, 3)
///     .with_drift_length(20)
///     .build()
///     .unwrap();
/// assert_eq!(stream.true_change_points().len(), 2);
/// ```
pub struct GradualStreamBuilder {
    dataset: Dataset,
    num_concepts: usize,
    drift_length: usize,
    stretch: bool,
    strategy: PartitionStrategy,
    preprocess: Option<Box<dyn Preprocess>>,
    region: Option<RegionalDrift>,
    region_threshold: f64,
    seed: u64,
}

impl GradualStreamBuilder {
    /// Creates a builder with a fixed drift length of
    /// [`DEFAULT_DRIFT_LENGTH`], label-sorted partitioning and seed 0.
    pub fn new(dataset: Dataset, num_concepts: usize) -> Self {
        Self {
            dataset,
            num_concepts,
            drift_length: DEFAULT_DRIFT_LENGTH,
            stretch: false,
            strategy: PartitionStrategy::default(),
            preprocess: None,
            region: None,
            region_threshold: DEFAULT_REGION_THRESHOLD,
            seed: 0,
        }
    }

    /// Nominal width of every transition, in samples.
    pub fn with_drift_length(mut self, drift_length: usize) -> Self {
        self.drift_length = drift_length;
        self
    }

    /// Scale each transition by the sizes of its two neighbouring concepts.
    pub fn with_stretch(mut self, stretch: bool) -> Self {
        self.stretch = stretch;
        self
    }

    pub fn with_strategy(mut self, strategy: PartitionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Transform applied to the features before partitioning.
    pub fn with_preprocess(mut self, preprocess: impl Preprocess + 'static) -> Self {
        self.preprocess = Some(Box::new(preprocess));
        self
    }

    /// Confine drift to a region and append drift-free dimensions.
    pub fn with_region(mut self, region: RegionalDrift) -> Self {
        self.region = Some(region);
        self
    }

    /// Minimum mean difference for a coordinate to count as changed.
    pub fn with_region_threshold(mut self, threshold: f64) -> Self {
        self.region_threshold = threshold;
        self
    }

    /// Seed of the transition draws. Transition `i` uses `seed + i`.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Builds the stream.
    ///
    /// # Errors
    ///
    /// - `DriftError::Configuration` if `drift_length` or `num_concepts` is 0,
    ///   or the partition strategy cannot produce `num_concepts` concepts.
    /// - `DriftError::InsufficientData` if a concept ends up empty.
    /// - `DriftError::DimensionMismatch` if the preprocess changes the row
    ///   count or the region does not fit the feature dimensionality.
    #[instrument(skip_all, fields(num_concepts = self.num_concepts, drift_length = self.drift_length, stretch = self.stretch))]
    pub fn build(self) -> Result<Stream> {
        if self.drift_length == 0 {
            return Err(DriftError::config("drift_length must be greater than 0"));
        }
        if self.num_concepts == 0 {
            return Err(DriftError::config("num_concepts must be at least 1"));
        }

        let dataset = match &self.preprocess {
            Some(preprocess) => {
                let features = preprocess.apply(self.dataset.features())?;
                self.dataset.with_features(features)?
            }
            None => self.dataset,
        };

        let concepts = partition(&dataset, self.num_concepts, self.strategy)?;
        let sizes: Vec<usize> = concepts.iter().map(Concept::len).collect();
        let drift_lengths = transition_lengths(&sizes, self.drift_length, self.stretch);

        let (plan, true_change_points) = plan_stream(&concepts, &drift_lengths, self.seed);

        let projection = match self.region {
            Some(region) => {
                let coordinates = region.region().coordinates(dataset.dims())?;
                Some(Projection {
                    coordinates,
                    drift: region,
                })
            }
            None => None,
        };

        let change_regions = change_regions(
            dataset.features(),
            &concepts,
            projection.as_ref().map(|p| p.coordinates.as_slice()),
            self.region_threshold,
        );

        let (features, labels) = dataset.into_parts();
        let stream = Stream {
            features,
            labels,
            plan,
            true_change_points,
            drift_lengths,
            drift_length: self.drift_length,
            num_concepts: self.num_concepts,
            change_regions,
            projection,
        };

        info!(
            length = stream.len(),
            dims = stream.dims(),
            change_points = stream.true_change_points().len(),
            "built gradual drift stream"
        );
        Ok(stream)
    }
}

/// Effective length of every transition between adjacent concepts.
///
/// Stretched lengths scale `drift_length` by the mean size of the two
/// neighbours relative to the mean concept size. Every length is clipped to
/// half of the smaller neighbour so that a concept can feed both of its
/// transitions from its own rows.
pub(crate) fn transition_lengths(sizes: &[usize], drift_length: usize, stretch: bool) -> Vec<usize> {
    if sizes.is_empty() {
        return Vec::new();
    }
    let mean_size = sizes.iter().sum::<usize>() as f64 / sizes.len() as f64;

    sizes
        .windows(2)
        .enumerate()
        .map(|(i, pair)| {
            let nominal = if stretch {
                let pair_mean = (pair[0] + pair[1]) as f64 / 2.0;
                (drift_length as f64 * pair_mean / mean_size).round() as usize
            } else {
                drift_length
            };
            let cap = pair[0].min(pair[1]) / 2;
            if nominal > cap {
                debug!(
                    transition = i,
                    nominal, cap, "clipping transition to neighbouring concept size"
                );
            }
            nominal.min(cap)
        })
        .collect()
}

/// Orders dataset rows into the stream and records the change points.
fn plan_stream(concepts: &[Concept], drift_lengths: &[usize], seed: u64) -> (Vec<usize>, Vec<usize>) {
    let total: usize = concepts.iter().map(Concept::len).sum();
    let mut plan = Vec::with_capacity(total);
    let mut change_points = Vec::with_capacity(drift_lengths.len());
    let mut cursors = vec![0usize; concepts.len()];

    for (i, concept) in concepts.iter().enumerate() {
        let reserve = drift_lengths.get(i).copied().unwrap_or(0);
        let end = concept.len() - reserve;
        plan.extend_from_slice(&concept.rows[cursors[i]..end]);
        cursors[i] = end;

        let Some(&window) = drift_lengths.get(i) else {
            break;
        };
        change_points.push(plan.len());

        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(i as u64));
        for t in 0..window {
            let p_next = t as f64 / window as f64;
            let source = if rng.gen::<f64>() < p_next { i + 1 } else { i };
            plan.push(concepts[source].rows[cursors[source]]);
            cursors[source] += 1;
        }
    }

    (plan, change_points)
}

/// Coordinates that differ between each pair of adjacent concepts, in the
/// coordinate space of emitted samples (appended noise dimensions excluded).
fn change_regions(
    features: &Matrix,
    concepts: &[Concept],
    coordinates: Option<&[usize]>,
    threshold: f64,
) -> Vec<Vec<usize>> {
    let means: Vec<Vec<f64>> = concepts
        .iter()
        .map(|concept| {
            let block = features.select_rows(&concept.rows);
            let means = block.column_means();
            match coordinates {
                Some(coords) => coords.iter().map(|&c| means[c]).collect(),
                None => means,
            }
        })
        .collect();

    means
        .windows(2)
        .map(|pair| differing_means(&pair[0], &pair[1], threshold))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Label, MinMaxScaler};
    use crate::stream::region::{GridShape, Region};

    /// `per_concept` rows for each of `k` labels. Feature 0 holds the row
    /// index, feature 1 the label.
    fn blocks(k: usize, per_concept: usize) -> Dataset {
        let n = k * per_concept;
        let rows: Vec<Vec<f64>> = (0..n)
            .map(|i| vec![i as f64, (i / per_concept) as f64])
            .collect();
        let labels: Vec<Label> = (0..n).map(|i| (i / per_concept) as Label).collect();
        Dataset::new(Matrix::from_rows(&rows).unwrap(), labels).unwrap()
    }

    #[test]
    fn test_change_point_count_and_bounds() {
        for (k, drift) in [(2, 10), (3, 50), (5, 1), (4, 500)] {
            let stream = GradualStreamBuilder::new(blocks(k, 100), k)
                .with_drift_length(drift)
                .build()
                .unwrap();
            let cps = stream.true_change_points();
            assert_eq!(cps.len(), k - 1, "k={k}, drift={drift}");
            assert!(cps.iter().all(|&cp| cp > 0 && cp < stream.len()));
            assert!(cps.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_change_points_at_transition_start() {
        let stream = GradualStreamBuilder::new(blocks(3, 100), 3)
            .with_drift_length(20)
            .build()
            .unwrap();
        // Concept 0 emits 80 rows before its transition begins
        assert_eq!(stream.true_change_points()[0], 80);
        assert_eq!(stream.drift_lengths(), &[20, 20]);

        let first: Vec<Label> = stream.iter().take(80).map(|s| s.label).collect();
        assert!(first.iter().all(|&l| l == 0));
    }

    #[test]
    fn test_transition_is_gradual() {
        let stream = GradualStreamBuilder::new(blocks(2, 1000), 2)
            .with_drift_length(400)
            .with_seed(3)
            .build()
            .unwrap();
        let cp = stream.true_change_points()[0];
        let window: Vec<Label> = stream
            .iter()
            .skip(cp)
            .take(400)
            .map(|s| s.label)
            .collect();

        // The first position always draws the old concept
        assert_eq!(window[0], 0);
        let early_new = window[..100].iter().filter(|&&l| l == 1).count();
        let late_new = window[300..].iter().filter(|&&l| l == 1).count();
        assert!(early_new < late_new, "{early_new} vs {late_new}");
        // After the window only the new concept remains
        assert!(stream.iter().skip(cp + 400).all(|s| s.label == 1));
    }

    #[test]
    fn test_samples_are_unmodified_and_unique() {
        let dataset = blocks(3, 50);
        let stream = GradualStreamBuilder::new(dataset.clone(), 3)
            .with_drift_length(30)
            .build()
            .unwrap();

        let mut seen = Vec::new();
        for sample in &stream {
            let row = sample.features[0] as usize;
            assert_eq!(sample.features.as_slice(), dataset.features().row(row));
            assert_eq!(sample.label, dataset.labels()[row]);
            seen.push(row);
        }
        let before = seen.len();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), before, "a row was emitted twice");
    }

    #[test]
    fn test_drift_length_clipped_to_half_of_smaller_concept() {
        let mut labels: Vec<Label> = vec![0; 100];
        labels.extend(vec![1; 10]);
        labels.extend(vec![2; 100]);
        let dataset = Dataset::new(Matrix::zeros(210, 1), labels).unwrap();

        let stream = GradualStreamBuilder::new(dataset, 3)
            .with_drift_length(50)
            .build()
            .unwrap();
        assert_eq!(stream.drift_lengths(), &[5, 5]);
        assert_eq!(stream.drift_length(), 50);
    }

    #[test]
    fn test_single_sample_concepts_change_abruptly() {
        let dataset = Dataset::new(Matrix::zeros(3, 1), vec![0, 1, 2]).unwrap();
        let stream = GradualStreamBuilder::new(dataset, 3).build().unwrap();
        assert_eq!(stream.drift_lengths(), &[0, 0]);
        assert_eq!(stream.true_change_points(), &[1, 2]);
        assert_eq!(stream.len(), 3);
    }

    #[test]
    fn test_stretch_scales_with_neighbour_sizes() {
        assert_eq!(transition_lengths(&[100, 100, 100], 20, true), vec![20, 20]);
        // Mean size 200: first pair mean 100 -> 10, second pair mean 250 -> 25
        assert_eq!(
            transition_lengths(&[100, 100, 400], 20, true),
            vec![10, 25]
        );
        assert_eq!(transition_lengths(&[100, 100, 400], 20, false), vec![20, 20]);
        assert!(transition_lengths(&[100], 20, true).is_empty());
    }

    #[test]
    fn test_zero_drift_length_rejected() {
        let result = GradualStreamBuilder::new(blocks(2, 10), 2)
            .with_drift_length(0)
            .build();
        assert!(matches!(result, Err(DriftError::Configuration(_))));
    }

    #[test]
    fn test_single_concept_has_no_change_points() {
        let stream = GradualStreamBuilder::new(blocks(1, 10), 1).build().unwrap();
        assert!(stream.true_change_points().is_empty());
        assert_eq!(stream.len(), 10);
    }

    #[test]
    fn test_preprocess_applied_before_partitioning() {
        let stream = GradualStreamBuilder::new(blocks(2, 10), 2)
            .with_drift_length(2)
            .with_preprocess(MinMaxScaler)
            .build()
            .unwrap();
        assert!(stream
            .iter()
            .all(|s| s.features.iter().all(|&v| (0.0..=1.0).contains(&v))));
    }

    #[test]
    fn test_preprocess_must_keep_row_count() {
        let drop_rows = |m: &Matrix| m.select_rows(&[0]);
        let result = GradualStreamBuilder::new(blocks(2, 10), 2)
            .with_preprocess(drop_rows)
            .build();
        assert!(matches!(result, Err(DriftError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_regional_drift_appends_noise() {
        // 2x2 grid samples: concept 1 only differs in the top-left pixel
        let mut rows = vec![vec![0.0, 1.0, 1.0, 1.0]; 20];
        rows.extend(vec![vec![5.0, 1.0, 1.0, 1.0]; 20]);
        let mut labels: Vec<Label> = vec![0; 20];
        labels.extend(vec![1; 20]);
        let dataset = Dataset::new(Matrix::from_rows(&rows).unwrap(), labels).unwrap();

        let region = Region::quadrant(GridShape::new(2, 2), 0).unwrap();
        let noise = Matrix::from_rows(&[vec![7.0, 8.0], vec![9.0, 10.0]]).unwrap();
        let stream = GradualStreamBuilder::new(dataset, 2)
            .with_drift_length(4)
            .with_region(RegionalDrift::new(region, noise).unwrap())
            .build()
            .unwrap();

        assert_eq!(stream.dims(), 3);
        let first = stream.get(0).unwrap();
        assert_eq!(first.features, vec![0.0, 7.0, 8.0]);
        let second = stream.get(1).unwrap();
        assert_eq!(&second.features[1..], &[9.0, 10.0]);
        assert_eq!(stream.change_regions(), &[vec![0]]);
    }

    #[test]
    fn test_region_threshold_filters_small_changes() {
        // Concept means differ by 100 in feature 0 and by 1 in feature 1
        let default = GradualStreamBuilder::new(blocks(2, 100), 2)
            .with_drift_length(10)
            .build()
            .unwrap();
        assert_eq!(default.change_regions(), &[vec![0, 1]]);

        let mid = GradualStreamBuilder::new(blocks(2, 100), 2)
            .with_drift_length(10)
            .with_region_threshold(10.0)
            .build()
            .unwrap();
        assert_eq!(mid.change_regions(), &[vec![0]]);

        let coarse = GradualStreamBuilder::new(blocks(2, 100), 2)
            .with_drift_length(10)
            .with_region_threshold(1000.0)
            .build()
            .unwrap();
        assert_eq!(coarse.change_regions().len(), 1);
        assert!(coarse.change_regions()[0].is_empty());
    }

    #[test]
    fn test_region_shape_mismatch() {
        let region = Region::quadrant(GridShape::new(3, 3), 0).unwrap();
        let result = GradualStreamBuilder::new(blocks(2, 10), 2)
            .with_region(RegionalDrift::region_only(region))
            .build();
        assert!(matches!(result, Err(DriftError::DimensionMismatch { .. })));
    }
}
