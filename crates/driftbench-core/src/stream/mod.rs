//! Drift streams with known change points.
//!
//! A [`Stream`] is a finite, fully materializable sequence of labeled samples
//! assembled from ordered concepts with gradual transitions between them.
//! The stream index at which each transition begins is recorded as a true
//! change point.
//!
//! # Components
//!
//! - [`partition`] - groups dataset rows into concepts
//! - [`region`] - confines drift to part of a structured sample
//! - [`builder`] - sequences concepts and blends the transitions
//!
//! # Example
//!
//! ```
//! use driftbench_core::data::{Dataset, Matrix};
//! use driftbench_core::stream::GradualStreamBuilder;
//!
//! let rows: Vec<Vec<f64>> = (0..200).map(|i| vec![(i / 100) as f64]).collect();
//! let labels = (0..200).map(|i| (i / 100) as u32).collect();
//! let dataset = Dataset::new(Matrix::from_rows(&rows).unwrap(), labels).unwrap();
//!
//! let stream = GradualStreamBuilder::new(dataset, 2)
//!     .with_drift_length(10)
//!     .build()
//!     .unwrap();
//!
//! for sample in stream.iter() {
//!     // feed sample.features into a detector
//!     let _ = (sample.position, sample.label);
//! }
//! assert_eq!(stream.true_change_points(), &[90]);
//! ```

pub mod builder;
pub mod partition;
pub mod region;

pub use builder::GradualStreamBuilder;
pub use partition::{partition, Concept, PartitionStrategy};
pub use region::{changed_coordinates, GridShape, Region, RegionalDrift};

use crate::data::{Dataset, Label, Matrix};
use crate::error::Result;

/// One emitted sample.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamSample {
    /// Stream index (0-based)
    pub position: usize,
    pub features: Vec<f64>,
    pub label: Label,
}

/// Region coordinates resolved against the feature dimensionality.
#[derive(Debug, Clone)]
pub(crate) struct Projection {
    pub(crate) coordinates: Vec<usize>,
    pub(crate) drift: RegionalDrift,
}

/// An ordered stream of samples with its true change points.
///
/// Immutable once built. Samples are produced lazily from the stored row
/// plan, and [`Stream::iter`] always restarts at position 0, so reading the
/// stream twice yields the identical sequence.
#[derive(Debug, Clone)]
pub struct Stream {
    pub(crate) features: Matrix,
    pub(crate) labels: Vec<Label>,
    /// Dataset row emitted at each stream position
    pub(crate) plan: Vec<usize>,
    pub(crate) true_change_points: Vec<usize>,
    pub(crate) drift_lengths: Vec<usize>,
    pub(crate) drift_length: usize,
    pub(crate) num_concepts: usize,
    pub(crate) change_regions: Vec<Vec<usize>>,
    pub(crate) projection: Option<Projection>,
}

impl Stream {
    /// Total number of samples.
    pub fn len(&self) -> usize {
        self.plan.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plan.is_empty()
    }

    /// Stream indices at which transitions begin, ascending.
    /// Holds `num_concepts - 1` entries.
    pub fn true_change_points(&self) -> &[usize] {
        &self.true_change_points
    }

    /// Effective length of each transition after stretching and clipping.
    pub fn drift_lengths(&self) -> &[usize] {
        &self.drift_lengths
    }

    /// Nominal transition length the stream was configured with.
    pub fn drift_length(&self) -> usize {
        self.drift_length
    }

    pub fn num_concepts(&self) -> usize {
        self.num_concepts
    }

    /// Dimensionality of emitted samples.
    pub fn dims(&self) -> usize {
        match &self.projection {
            Some(p) => p.coordinates.len() + p.drift.noise().n_cols(),
            None => self.features.n_cols(),
        }
    }

    /// For each true change point, the sample coordinates whose concept
    /// means differ across it. Appended drift-free dimensions never appear.
    pub fn change_regions(&self) -> &[Vec<usize>] {
        &self.change_regions
    }

    /// Sample at `position`, or `None` past the end.
    pub fn get(&self, position: usize) -> Option<StreamSample> {
        let &row = self.plan.get(position)?;
        let source = self.features.row(row);
        let features = match &self.projection {
            Some(p) => p
                .coordinates
                .iter()
                .map(|&c| source[c])
                .chain(p.drift.noise_row(position).iter().copied())
                .collect(),
            None => source.to_vec(),
        };
        Some(StreamSample {
            position,
            features,
            label: self.labels[row],
        })
    }

    /// Forward iterator starting at position 0.
    pub fn iter(&self) -> StreamIter<'_> {
        StreamIter {
            stream: self,
            position: 0,
        }
    }

    /// Materializes the whole stream as a dataset in stream order.
    pub fn to_dataset(&self) -> Result<Dataset> {
        let mut data = Vec::with_capacity(self.len() * self.dims());
        let mut labels = Vec::with_capacity(self.len());
        for sample in self.iter() {
            data.extend_from_slice(&sample.features);
            labels.push(sample.label);
        }
        let features = Matrix::from_vec(self.len(), self.dims(), data)?;
        Dataset::new(features, labels)
    }
}

/// Forward-only iterator over a [`Stream`].
#[derive(Debug, Clone)]
pub struct StreamIter<'a> {
    stream: &'a Stream,
    position: usize,
}

impl Iterator for StreamIter<'_> {
    type Item = StreamSample;

    fn next(&mut self) -> Option<Self::Item> {
        let sample = self.stream.get(self.position)?;
        self.position += 1;
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.stream.len().saturating_sub(self.position);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for StreamIter<'_> {}

impl<'a> IntoIterator for &'a Stream {
    type Item = StreamSample;
    type IntoIter = StreamIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
