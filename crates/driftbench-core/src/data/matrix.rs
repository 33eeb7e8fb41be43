use crate::error::{DriftError, Result};
use serde::{Deserialize, Serialize};

/// Dense row-major feature matrix.
///
/// Each row is one sample; every row has the same number of columns.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawMatrix")]
pub struct Matrix {
    data: Vec<f64>,
    n_rows: usize,
    n_cols: usize,
}

/// Unchecked wire form; deserialized matrices go through [`Matrix::from_vec`].
#[derive(Deserialize)]
struct RawMatrix {
    data: Vec<f64>,
    n_rows: usize,
    n_cols: usize,
}

impl TryFrom<RawMatrix> for Matrix {
    type Error = DriftError;

    fn try_from(raw: RawMatrix) -> Result<Self> {
        Matrix::from_vec(raw.n_rows, raw.n_cols, raw.data)
    }
}

impl Matrix {
    /// Creates a matrix from row-major data.
    ///
    /// # Errors
    ///
    /// Returns `DriftError::DimensionMismatch` if `data.len() != n_rows * n_cols`.
    pub fn from_vec(n_rows: usize, n_cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != n_rows * n_cols {
            return Err(DriftError::dimension(
                format!("{} values ({n_rows}x{n_cols})", n_rows * n_cols),
                format!("{} values", data.len()),
            ));
        }
        Ok(Self {
            data,
            n_rows,
            n_cols,
        })
    }

    /// Creates a matrix from a list of rows.
    ///
    /// An empty list yields a 0×0 matrix.
    ///
    /// # Errors
    ///
    /// Returns `DriftError::DimensionMismatch` if the rows differ in length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let n_cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * n_cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n_cols {
                return Err(DriftError::dimension(
                    format!("{n_cols} columns"),
                    format!("{} columns in row {i}", row.len()),
                ));
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            data,
            n_rows: rows.len(),
            n_cols,
        })
    }

    /// Creates a matrix filled with zeros.
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        Self {
            data: vec![0.0; n_rows * n_cols],
            n_rows,
            n_cols,
        }
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// Returns row `i` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `i >= n_rows`.
    pub fn row(&self, i: usize) -> &[f64] {
        let start = i * self.n_cols;
        &self.data[start..start + self.n_cols]
    }

    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        let start = i * self.n_cols;
        &mut self.data[start..start + self.n_cols]
    }

    /// Iterates over rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.n_rows).map(move |i| self.row(i))
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.n_cols + col]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Returns a new matrix containing the given rows, in the given order.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of range.
    pub fn select_rows(&self, indices: &[usize]) -> Matrix {
        let mut data = Vec::with_capacity(indices.len() * self.n_cols);
        for &i in indices {
            data.extend_from_slice(self.row(i));
        }
        Matrix {
            data,
            n_rows: indices.len(),
            n_cols: self.n_cols,
        }
    }

    /// Returns a new matrix containing the given columns of every row.
    ///
    /// # Errors
    ///
    /// Returns `DriftError::DimensionMismatch` if a column is out of range.
    pub fn select_columns(&self, columns: &[usize]) -> Result<Matrix> {
        if let Some(&bad) = columns.iter().find(|&&c| c >= self.n_cols) {
            return Err(DriftError::dimension(
                format!("column < {}", self.n_cols),
                format!("column {bad}"),
            ));
        }
        let mut data = Vec::with_capacity(self.n_rows * columns.len());
        for row in self.rows() {
            data.extend(columns.iter().map(|&c| row[c]));
        }
        Ok(Matrix {
            data,
            n_rows: self.n_rows,
            n_cols: columns.len(),
        })
    }

    /// Stacks matrices vertically (rows of `self` first).
    ///
    /// # Errors
    ///
    /// Returns `DriftError::DimensionMismatch` if column counts differ.
    /// An empty matrix on either side is accepted regardless of width.
    pub fn vstack(&self, other: &Matrix) -> Result<Matrix> {
        if self.is_empty() {
            return Ok(other.clone());
        }
        if other.is_empty() {
            return Ok(self.clone());
        }
        if self.n_cols != other.n_cols {
            return Err(DriftError::dimension(
                format!("{} columns", self.n_cols),
                format!("{} columns", other.n_cols),
            ));
        }
        let mut data = self.data.clone();
        data.extend_from_slice(&other.data);
        Ok(Matrix {
            data,
            n_rows: self.n_rows + other.n_rows,
            n_cols: self.n_cols,
        })
    }

    /// Concatenates matrices horizontally (columns of `self` first).
    ///
    /// # Errors
    ///
    /// Returns `DriftError::DimensionMismatch` if row counts differ.
    pub fn hstack(&self, other: &Matrix) -> Result<Matrix> {
        if self.n_rows != other.n_rows {
            return Err(DriftError::dimension(
                format!("{} rows", self.n_rows),
                format!("{} rows", other.n_rows),
            ));
        }
        let n_cols = self.n_cols + other.n_cols;
        let mut data = Vec::with_capacity(self.n_rows * n_cols);
        for i in 0..self.n_rows {
            data.extend_from_slice(self.row(i));
            data.extend_from_slice(other.row(i));
        }
        Ok(Matrix {
            data,
            n_rows: self.n_rows,
            n_cols,
        })
    }

    /// Mean of every column. Returns an empty vector for a matrix without rows.
    pub fn column_means(&self) -> Vec<f64> {
        if self.n_rows == 0 {
            return Vec::new();
        }
        let mut sums = vec![0.0; self.n_cols];
        for row in self.rows() {
            for (sum, &value) in sums.iter_mut().zip(row) {
                *sum += value;
            }
        }
        let n = self.n_rows as f64;
        sums.into_iter().map(|s| s / n).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Matrix {
        Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap()
    }

    #[test]
    fn test_from_vec_rejects_wrong_length() {
        let result = Matrix::from_vec(2, 3, vec![0.0; 5]);
        assert!(matches!(result, Err(DriftError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_deserialize_checks_shape() {
        let bad = serde_json::from_str::<Matrix>(r#"{"data":[1.0],"n_rows":2,"n_cols":1}"#);
        assert!(bad.is_err(), "2x1 matrix with one value must be rejected");

        let m = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let json = serde_json::to_string(&m).unwrap();
        let back: Matrix = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
        assert_eq!(back.row(1), &[3.0, 4.0]);
    }

    #[test]
    fn test_from_rows_rejects_ragged_rows() {
        let result = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]);
        assert!(matches!(result, Err(DriftError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_select_rows_and_columns() {
        let m = sample();
        let rows = m.select_rows(&[2, 0]);
        assert_eq!(rows.row(0), &[5.0, 6.0]);
        assert_eq!(rows.row(1), &[1.0, 2.0]);

        let cols = m.select_columns(&[1]).unwrap();
        assert_eq!(cols.n_cols(), 1);
        assert_eq!(cols.as_slice(), &[2.0, 4.0, 6.0]);

        assert!(m.select_columns(&[2]).is_err());
    }

    #[test]
    fn test_stacking() {
        let m = sample();
        let wide = m.hstack(&m).unwrap();
        assert_eq!(wide.n_cols(), 4);
        assert_eq!(wide.row(1), &[3.0, 4.0, 3.0, 4.0]);

        let tall = m.vstack(&m).unwrap();
        assert_eq!(tall.n_rows(), 6);
        assert_eq!(tall.row(3), &[1.0, 2.0]);

        let short = Matrix::zeros(1, 2);
        assert!(m.hstack(&short).is_err());
        assert_eq!(Matrix::default().vstack(&m).unwrap(), m);
    }

    #[test]
    fn test_column_means() {
        assert_eq!(sample().column_means(), vec![3.0, 4.0]);
        assert!(Matrix::default().column_means().is_empty());
    }
}
