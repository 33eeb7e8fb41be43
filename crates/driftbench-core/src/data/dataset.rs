use super::Matrix;
use crate::error::{DriftError, Result};
use std::collections::BTreeSet;

/// Label-encoded class of a sample.
pub type Label = u32;

/// Feature matrix paired with one label per row.
///
/// Invariant: `features.n_rows() == labels.len()`. Enforced by [`Dataset::new`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    features: Matrix,
    labels: Vec<Label>,
}

impl Dataset {
    /// Creates a dataset.
    ///
    /// # Errors
    ///
    /// Returns `DriftError::DimensionMismatch` if the feature row count and
    /// label count differ.
    pub fn new(features: Matrix, labels: Vec<Label>) -> Result<Self> {
        if features.n_rows() != labels.len() {
            return Err(DriftError::dimension(
                format!("{} labels", features.n_rows()),
                format!("{} labels", labels.len()),
            ));
        }
        Ok(Self { features, labels })
    }

    /// Creates a dataset where every row carries the same label.
    pub fn with_constant_label(features: Matrix, label: Label) -> Self {
        let labels = vec![label; features.n_rows()];
        Self { features, labels }
    }

    pub fn features(&self) -> &Matrix {
        &self.features
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Feature dimensionality.
    pub fn dims(&self) -> usize {
        self.features.n_cols()
    }

    /// Distinct labels in ascending order.
    pub fn distinct_labels(&self) -> Vec<Label> {
        self.labels
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Replaces the feature matrix, keeping the labels.
    ///
    /// # Errors
    ///
    /// Returns `DriftError::DimensionMismatch` if the new matrix has a different
    /// row count.
    pub fn with_features(self, features: Matrix) -> Result<Self> {
        Self::new(features, self.labels)
    }

    /// Stacks datasets vertically, preserving order.
    ///
    /// # Errors
    ///
    /// Returns `DriftError::DimensionMismatch` if dimensionalities differ.
    pub fn concat(parts: &[Dataset]) -> Result<Self> {
        let mut features = Matrix::default();
        let mut labels = Vec::with_capacity(parts.iter().map(Dataset::len).sum());
        for part in parts {
            features = features.vstack(&part.features)?;
            labels.extend_from_slice(&part.labels);
        }
        Ok(Self { features, labels })
    }

    /// Splits into the feature matrix and labels.
    pub fn into_parts(self) -> (Matrix, Vec<Label>) {
        (self.features, self.labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_label_mismatch() {
        let features = Matrix::zeros(3, 2);
        let result = Dataset::new(features, vec![0, 1]);
        assert!(matches!(result, Err(DriftError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_distinct_labels_sorted() {
        let dataset = Dataset::new(Matrix::zeros(5, 1), vec![3, 1, 3, 0, 1]).unwrap();
        assert_eq!(dataset.distinct_labels(), vec![0, 1, 3]);
        assert_eq!(dataset.len(), 5);
        assert_eq!(dataset.dims(), 1);
    }

    #[test]
    fn test_concat_preserves_order() {
        let a = Dataset::with_constant_label(Matrix::zeros(2, 3), 0);
        let b = Dataset::with_constant_label(Matrix::zeros(1, 3), 7);
        let joined = Dataset::concat(&[a, b]).unwrap();
        assert_eq!(joined.labels(), &[0, 0, 7]);
        assert_eq!(joined.features().n_rows(), 3);
    }

    #[test]
    fn test_concat_rejects_mixed_dims() {
        let a = Dataset::with_constant_label(Matrix::zeros(2, 3), 0);
        let b = Dataset::with_constant_label(Matrix::zeros(2, 4), 1);
        assert!(Dataset::concat(&[a, b]).is_err());
    }
}
