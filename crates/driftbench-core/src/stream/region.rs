//! Regional drift: confining a change to part of each sample.
//!
//! For structured samples (flattened images, or synthetic vectors extended
//! with drift-free dimensions) a change should touch only a subset of the
//! coordinates. A [`RegionalDrift`] selects the drifting coordinates of each
//! concept sample and appends dimensions drawn from a shared, drift-free
//! noise source, so the appended block looks identical in every concept.
//!
//! [`changed_coordinates`] answers the inverse question: which coordinates
//! actually differ between two concepts. The stream builder uses it to record
//! the ground-truth region of every change point.

use crate::data::Matrix;
use crate::error::{DriftError, Result};
use serde::{Deserialize, Serialize};

/// 2-D layout of a flattened sample (row-major).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    pub height: usize,
    pub width: usize,
}

impl GridShape {
    pub fn new(height: usize, width: usize) -> Self {
        Self { height, width }
    }

    /// Number of coordinates covered by the grid.
    pub fn len(&self) -> usize {
        self.height.saturating_mul(self.width)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks that a flattened sample of `dims` coordinates has this shape.
    ///
    /// # Errors
    ///
    /// Returns `DriftError::DimensionMismatch` if `height * width != dims`.
    pub fn validate(&self, dims: usize) -> Result<()> {
        if self.height.checked_mul(self.width) != Some(dims) {
            return Err(DriftError::dimension(
                format!("{}x{} = {} dims", self.height, self.width, self.len()),
                format!("{dims} dims"),
            ));
        }
        Ok(())
    }
}

/// Coordinates of a sample that carry a concept's drift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    /// Every coordinate drifts
    Full,
    /// Explicit flat coordinate indices, in output order
    Dims(Vec<usize>),
    /// Rectangular patch of a grid-shaped sample
    Window {
        shape: GridShape,
        top: usize,
        left: usize,
        height: usize,
        width: usize,
    },
}

impl Region {
    /// One of the four quadrants of a grid: 0 top-left, 1 top-right,
    /// 2 bottom-left, 3 bottom-right. Odd sizes give the extra row/column
    /// to the bottom/right quadrants.
    ///
    /// # Errors
    ///
    /// Returns `DriftError::Configuration` if `quadrant > 3`.
    pub fn quadrant(shape: GridShape, quadrant: usize) -> Result<Self> {
        if quadrant > 3 {
            return Err(DriftError::config(format!(
                "quadrant must be in 0..4, got {quadrant}"
            )));
        }
        let half_h = shape.height / 2;
        let half_w = shape.width / 2;
        let (top, height) = if quadrant < 2 {
            (0, half_h)
        } else {
            (half_h, shape.height - half_h)
        };
        let (left, width) = if quadrant % 2 == 0 {
            (0, half_w)
        } else {
            (half_w, shape.width - half_w)
        };
        Ok(Region::Window {
            shape,
            top,
            left,
            height,
            width,
        })
    }

    /// Resolves the region to flat coordinate indices of a `dims`-wide sample.
    ///
    /// # Errors
    ///
    /// Returns `DriftError::DimensionMismatch` if a coordinate is out of range,
    /// the grid does not match `dims`, or the window does not fit the grid.
    pub fn coordinates(&self, dims: usize) -> Result<Vec<usize>> {
        match self {
            Region::Full => Ok((0..dims).collect()),
            Region::Dims(coords) => {
                if let Some(&bad) = coords.iter().find(|&&c| c >= dims) {
                    return Err(DriftError::dimension(
                        format!("coordinate < {dims}"),
                        format!("coordinate {bad}"),
                    ));
                }
                Ok(coords.clone())
            }
            Region::Window {
                shape,
                top,
                left,
                height,
                width,
            } => {
                shape.validate(dims)?;
                let bottom = top.checked_add(*height).filter(|&b| b <= shape.height);
                let right = left.checked_add(*width).filter(|&r| r <= shape.width);
                let (Some(bottom), Some(right)) = (bottom, right) else {
                    return Err(DriftError::dimension(
                        format!("window inside {}x{}", shape.height, shape.width),
                        format!("{height}x{width} window at ({top}, {left})"),
                    ));
                };
                Ok((*top..bottom)
                    .flat_map(|r| (*left..right).map(move |c| r * shape.width + c))
                    .collect())
            }
        }
    }
}

/// Region selection plus a shared drift-free noise source.
///
/// A stream built with a `RegionalDrift` emits, at stream position `p`,
/// the region coordinates of the chosen concept row followed by row
/// `p mod noise.n_rows()` of `noise`.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionalDrift {
    region: Region,
    noise: Matrix,
}

impl RegionalDrift {
    /// Creates a regional drift.
    ///
    /// `noise` may have zero columns (pure region selection) but must have at
    /// least one row.
    ///
    /// # Errors
    ///
    /// Returns `DriftError::InsufficientData` if `noise` has no rows.
    pub fn new(region: Region, noise: Matrix) -> Result<Self> {
        if noise.is_empty() {
            return Err(DriftError::insufficient(
                "drift-free noise source has no rows",
            ));
        }
        Ok(Self { region, noise })
    }

    /// Region selection without appended noise dimensions.
    pub fn region_only(region: Region) -> Self {
        Self {
            region,
            noise: Matrix::zeros(1, 0),
        }
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn noise(&self) -> &Matrix {
        &self.noise
    }

    /// Drift-free values appended at stream position `position`.
    pub fn noise_row(&self, position: usize) -> &[f64] {
        self.noise.row(position % self.noise.n_rows())
    }
}

/// Coordinates whose mean differs between two concepts by more than `threshold`.
///
/// # Errors
///
/// - `DriftError::DimensionMismatch` if the matrices differ in width.
/// - `DriftError::InsufficientData` if either matrix has no rows.
pub fn changed_coordinates(before: &Matrix, after: &Matrix, threshold: f64) -> Result<Vec<usize>> {
    if before.n_cols() != after.n_cols() {
        return Err(DriftError::dimension(
            format!("{} dims", before.n_cols()),
            format!("{} dims", after.n_cols()),
        ));
    }
    if before.is_empty() || after.is_empty() {
        return Err(DriftError::insufficient(
            "cannot compare concepts without samples",
        ));
    }
    Ok(differing_means(
        &before.column_means(),
        &after.column_means(),
        threshold,
    ))
}

pub(crate) fn differing_means(before: &[f64], after: &[f64], threshold: f64) -> Vec<usize> {
    before
        .iter()
        .zip(after)
        .enumerate()
        .filter(|(_, (a, b))| (*a - *b).abs() > threshold)
        .map(|(i, _)| i)
        .collect()
}
