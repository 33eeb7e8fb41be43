//! Pure feature transforms applied before a dataset is segmented into concepts.

use super::Matrix;
use crate::error::{DriftError, Result};

/// A pure transform of the feature matrix.
///
/// Implementations must keep the row count; the stream builder checks this
/// and rejects transforms that drop or add samples. Closures of type
/// `Fn(&Matrix) -> Matrix` implement this trait directly.
pub trait Preprocess {
    /// Transforms the feature matrix.
    fn apply(&self, features: &Matrix) -> Result<Matrix>;
}

impl<F> Preprocess for F
where
    F: Fn(&Matrix) -> Matrix,
{
    fn apply(&self, features: &Matrix) -> Result<Matrix> {
        Ok(self(features))
    }
}

/// Scales every column to [0, 1]. Constant columns map to 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinMaxScaler;

impl Preprocess for MinMaxScaler {
    fn apply(&self, features: &Matrix) -> Result<Matrix> {
        let n_cols = features.n_cols();
        let mut min = vec![f64::INFINITY; n_cols];
        let mut max = vec![f64::NEG_INFINITY; n_cols];
        for row in features.rows() {
            for (c, &v) in row.iter().enumerate() {
                min[c] = min[c].min(v);
                max[c] = max[c].max(v);
            }
        }

        let mut out = features.clone();
        for i in 0..out.n_rows() {
            for (c, v) in out.row_mut(i).iter_mut().enumerate() {
                let range = max[c] - min[c];
                *v = if range > 0.0 { (*v - min[c]) / range } else { 0.0 };
            }
        }
        Ok(out)
    }
}

/// Centres every column and scales it to unit variance.
///
/// Zero-variance columns are only centred.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardScaler;

impl Preprocess for StandardScaler {
    fn apply(&self, features: &Matrix) -> Result<Matrix> {
        if features.is_empty() {
            return Err(DriftError::insufficient(
                "cannot standardize a matrix without rows",
            ));
        }
        let means = features.column_means();
        let n = features.n_rows() as f64;
        let mut variances = vec![0.0; features.n_cols()];
        for row in features.rows() {
            for (c, &v) in row.iter().enumerate() {
                variances[c] += (v - means[c]).powi(2);
            }
        }
        let stds: Vec<f64> = variances.into_iter().map(|s| (s / n).sqrt()).collect();

        let mut out = features.clone();
        for i in 0..out.n_rows() {
            for (c, v) in out.row_mut(i).iter_mut().enumerate() {
                let centred = *v - means[c];
                *v = if stds[c] > 0.0 {
                    centred / stds[c]
                } else {
                    centred
                };
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Matrix {
        Matrix::from_rows(&[vec![0.0, 5.0], vec![5.0, 5.0], vec![10.0, 5.0]]).unwrap()
    }

    #[test]
    fn test_min_max_scaler() {
        let scaled = MinMaxScaler.apply(&sample()).unwrap();
        assert_eq!(scaled.as_slice(), &[0.0, 0.0, 0.5, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_standard_scaler_zero_mean() {
        let scaled = StandardScaler.apply(&sample()).unwrap();
        let means = scaled.column_means();
        assert!(means[0].abs() < 1e-12);
        assert!(means[1].abs() < 1e-12);
        // Population std of [0, 5, 10] is sqrt(50/3)
        let expected = 5.0 / (50.0f64 / 3.0).sqrt();
        assert!((scaled.get(2, 0) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_standard_scaler_rejects_empty() {
        assert!(StandardScaler.apply(&Matrix::default()).is_err());
    }

    #[test]
    fn test_closure_preprocess() {
        let double = |m: &Matrix| {
            let data = m.as_slice().iter().map(|v| v * 2.0).collect();
            Matrix::from_vec(m.n_rows(), m.n_cols(), data).unwrap()
        };
        let out = double.apply(&sample()).unwrap();
        assert_eq!(out.get(2, 0), 20.0);
    }
}
