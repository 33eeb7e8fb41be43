//! Concept partitioning.
//!
//! Splits a labeled dataset into the ordered groups of rows ("concepts")
//! that become the segments of a drift stream. Samples sharing a label end
//! up in the same concept whenever the strategy allows it.

use crate::data::{Dataset, Label};
use crate::error::{DriftError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// How rows are grouped into concepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionStrategy {
    /// Labels in ascending order; adjacent labels are merged when fewer
    /// concepts than labels are requested.
    #[default]
    ByLabel,
    /// One concept per label, in order of first appearance. Used for
    /// datasets with a natural concept sequence (one generator run per concept).
    Sequential,
    /// Cycle through the sorted labels, splitting each label's shuffled rows
    /// into disjoint chunks so that any number of concepts can be produced.
    Resample {
        /// Seed of the per-label shuffle
        seed: u64,
    },
}

/// One regime of the stream: an ordered block of dataset rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Concept {
    /// Position in the concept sequence (0..num_concepts)
    pub id: usize,
    /// Labels whose rows make up this concept
    pub labels: Vec<Label>,
    /// Dataset row indices, in emission order
    pub rows: Vec<usize>,
}

impl Concept {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Partitions `dataset` into `num_concepts` ordered concepts.
///
/// # Errors
///
/// - `DriftError::Configuration` if `num_concepts` is 0, or exceeds the number
///   of distinct labels for [`PartitionStrategy::ByLabel`], or differs from it
///   for [`PartitionStrategy::Sequential`].
/// - `DriftError::InsufficientData` if the dataset is empty or a resampled
///   concept receives no rows.
pub fn partition(
    dataset: &Dataset,
    num_concepts: usize,
    strategy: PartitionStrategy,
) -> Result<Vec<Concept>> {
    if num_concepts == 0 {
        return Err(DriftError::config("num_concepts must be at least 1"));
    }
    if dataset.is_empty() {
        return Err(DriftError::insufficient("dataset has no samples"));
    }

    let concepts = match strategy {
        PartitionStrategy::ByLabel => by_label(dataset, num_concepts)?,
        PartitionStrategy::Sequential => sequential(dataset, num_concepts)?,
        PartitionStrategy::Resample { seed } => resample(dataset, num_concepts, seed)?,
    };

    if let Some(empty) = concepts.iter().find(|c| c.is_empty()) {
        return Err(DriftError::insufficient(format!(
            "concept {} has no samples",
            empty.id
        )));
    }

    debug!(
        num_concepts,
        ?strategy,
        smallest = concepts.iter().map(Concept::len).min().unwrap_or(0),
        "partitioned dataset into concepts"
    );
    Ok(concepts)
}

/// Assigns rows to groups of labels, keeping dataset order inside each group.
fn group_rows(dataset: &Dataset, groups: Vec<Vec<Label>>) -> Vec<Concept> {
    let group_of: HashMap<Label, usize> = groups
        .iter()
        .enumerate()
        .flat_map(|(g, labels)| labels.iter().map(move |&l| (l, g)))
        .collect();

    let mut concepts: Vec<Concept> = groups
        .into_iter()
        .enumerate()
        .map(|(id, labels)| Concept {
            id,
            labels,
            rows: Vec::new(),
        })
        .collect();

    for (row, label) in dataset.labels().iter().enumerate() {
        if let Some(&g) = group_of.get(label) {
            concepts[g].rows.push(row);
        }
    }
    concepts
}

fn by_label(dataset: &Dataset, num_concepts: usize) -> Result<Vec<Concept>> {
    let labels = dataset.distinct_labels();
    if num_concepts > labels.len() {
        return Err(DriftError::config(format!(
            "num_concepts ({num_concepts}) exceeds the {} distinct labels; \
             use a resampling strategy",
            labels.len()
        )));
    }

    // The first `extra` groups take one additional label
    let base = labels.len() / num_concepts;
    let extra = labels.len() % num_concepts;
    let mut groups = Vec::with_capacity(num_concepts);
    let mut remaining = labels.as_slice();
    for g in 0..num_concepts {
        let take = base + usize::from(g < extra);
        let (head, tail) = remaining.split_at(take);
        groups.push(head.to_vec());
        remaining = tail;
    }

    Ok(group_rows(dataset, groups))
}

fn sequential(dataset: &Dataset, num_concepts: usize) -> Result<Vec<Concept>> {
    let mut order: Vec<Label> = Vec::new();
    for &label in dataset.labels() {
        if !order.contains(&label) {
            order.push(label);
        }
    }
    if order.len() != num_concepts {
        return Err(DriftError::config(format!(
            "sequential partitioning needs one label per concept: \
             {num_concepts} concepts requested, {} labels present",
            order.len()
        )));
    }

    Ok(group_rows(
        dataset,
        order.into_iter().map(|l| vec![l]).collect(),
    ))
}

fn resample(dataset: &Dataset, num_concepts: usize, seed: u64) -> Result<Vec<Concept>> {
    let labels = dataset.distinct_labels();
    let n_labels = labels.len();
    let by_label = group_rows(dataset, labels.iter().map(|&l| vec![l]).collect());

    let mut rng = StdRng::seed_from_u64(seed);
    let mut chunks: Vec<Vec<Vec<usize>>> = Vec::with_capacity(n_labels);
    for (li, concept) in by_label.into_iter().enumerate() {
        // Number of concepts cycling back to this label
        let users = num_concepts / n_labels + usize::from(li < num_concepts % n_labels);
        let mut rows = concept.rows;
        rows.shuffle(&mut rng);
        let len = rows.len();
        chunks.push(
            (0..users)
                .map(|c| rows[c * len / users.max(1)..(c + 1) * len / users.max(1)].to_vec())
                .collect(),
        );
    }

    Ok((0..num_concepts)
        .map(|id| {
            let li = id % n_labels;
            Concept {
                id,
                labels: vec![labels[li]],
                rows: std::mem::take(&mut chunks[li][id / n_labels]),
            }
        })
        .collect())
}
