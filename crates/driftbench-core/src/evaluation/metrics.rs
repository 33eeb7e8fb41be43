//! Change-point detection metrics.
//!
//! All functions take the true and the reported change points as ascending
//! stream indices. Callers must sort both sequences first; unsorted input
//! gives unspecified (but memory-safe) results.
//!
//! Matching is greedy and one-to-one. Every function works on a private copy
//! of its input and consumes matched points from that copy, so the caller's
//! slices are never touched and repeated calls return the same value.
//!
//! Undefined ratios (a zero denominator, or no detection to measure a delay
//! from) are returned as `NaN`, not as errors.

use crate::config::{DEFAULT_BETA, DEFAULT_TOLERANCE};
use crate::error::{DriftError, Result};
use serde::{Deserialize, Serialize};

// ============================================================================
// Detection Rate and Delay
// ============================================================================

/// Number of reported change points as a percentage of true change points.
///
/// This is a plain ratio, not a true-positive rate: spurious reports count
/// too, so the value exceeds 100 when a detector over-reports. Returns `NaN`
/// when there are no true change points.
pub fn percent_detected(true_cps: &[usize], reported_cps: &[usize]) -> f64 {
    if true_cps.is_empty() {
        return f64::NAN;
    }
    100.0 * reported_cps.len() as f64 / true_cps.len() as f64
}

/// Mean number of samples between a true change point and its detection.
///
/// Each true change point is matched with the earliest unmatched report
/// strictly after it and strictly before the next true change point (no
/// upper bound for the last one). Returns `NaN` if nothing was matched.
///
/// # Example
///
/// ```
/// use driftbench_core::evaluation::mean_detection_delay;
///
/// let delay = mean_detection_delay(&[100, 200], &[101, 150, 160, 180, 210]);
/// assert_eq!(delay, 5.5);
/// ```
pub fn mean_detection_delay(true_cps: &[usize], reported_cps: &[usize]) -> f64 {
    let mut unmatched = reported_cps.to_vec();
    let mut total_delay = 0usize;
    let mut detections = 0usize;

    for (i, &cp) in true_cps.iter().enumerate() {
        let next = true_cps.get(i + 1).copied();
        let hit = unmatched
            .iter()
            .position(|&r| r > cp && next.map_or(true, |n| r < n));
        if let Some(idx) = hit {
            total_delay += unmatched.remove(idx) - cp;
            detections += 1;
        }
    }

    if detections == 0 {
        f64::NAN
    } else {
        total_delay as f64 / detections as f64
    }
}

// ============================================================================
// Match Counts
// ============================================================================

/// First index in `candidates` within `< tolerance` of `point`.
fn first_within(candidates: &[usize], point: usize, tolerance: usize) -> Option<usize> {
    candidates
        .iter()
        .position(|&c| c.abs_diff(point) < tolerance)
}

/// Reported change points that hit a true one.
///
/// Reports are visited in order, and each claims the first unmatched true
/// change point closer than `tolerance`. First-reported-first-matched, not
/// an optimal assignment.
pub fn true_positive_count(true_cps: &[usize], reported_cps: &[usize], tolerance: usize) -> usize {
    let mut unmatched = true_cps.to_vec();
    let mut hits = 0;
    for &reported in reported_cps {
        if let Some(idx) = first_within(&unmatched, reported, tolerance) {
            unmatched.remove(idx);
            hits += 1;
        }
    }
    hits
}

/// Reported change points that hit nothing.
pub fn false_positive_count(true_cps: &[usize], reported_cps: &[usize], tolerance: usize) -> usize {
    reported_cps.len() - true_positive_count(true_cps, reported_cps, tolerance)
}

/// True change points that no report hit.
///
/// Runs its own greedy match with the true change points as the outer loop.
/// Because the two matches run in opposite directions, this count is not
/// always `len(true_cps) - true_positive_count(..)`.
pub fn false_negative_count(true_cps: &[usize], reported_cps: &[usize], tolerance: usize) -> usize {
    let mut unmatched = reported_cps.to_vec();
    let mut missed = true_cps.len();
    for &cp in true_cps {
        if let Some(idx) = first_within(&unmatched, cp, tolerance) {
            unmatched.remove(idx);
            missed -= 1;
        }
    }
    missed
}

// ============================================================================
// Precision, Recall, F-beta
// ============================================================================

/// `tp / (tp + fp)`, or `NaN` when nothing was reported.
pub fn precision(tp: usize, fp: usize, _fn: usize) -> f64 {
    ratio(tp, tp + fp)
}

/// `tp / (tp + fn)`, or `NaN` when the denominator is 0.
pub fn recall(tp: usize, _fp: usize, fn_: usize) -> f64 {
    ratio(tp, tp + fn_)
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        f64::NAN
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Weighted harmonic mean of precision and recall.
fn combine_f_beta(precision: f64, recall: f64, beta: f64) -> f64 {
    let b2 = beta * beta;
    (1.0 + b2) * precision * recall / (b2 * precision + recall)
}

/// F-beta score of the reported change points.
///
/// `NaN` propagates from an undefined precision or recall, and a detector
/// with zero precision and recall also scores `NaN` (0/0).
///
/// # Example
///
/// ```
/// use driftbench_core::evaluation::f_beta_score;
///
/// // tp = 1, fp = 2, fn = 0
/// let f1 = f_beta_score(&[102], &[50, 100, 101], 10, 1.0);
/// assert!((f1 - 0.5).abs() < 1e-12);
/// ```
pub fn f_beta_score(true_cps: &[usize], reported_cps: &[usize], tolerance: usize, beta: f64) -> f64 {
    let tp = true_positive_count(true_cps, reported_cps, tolerance);
    let fp = false_positive_count(true_cps, reported_cps, tolerance);
    let fn_ = false_negative_count(true_cps, reported_cps, tolerance);
    combine_f_beta(precision(tp, fp, fn_), recall(tp, fp, fn_), beta)
}

// ============================================================================
// Aggregated Report
// ============================================================================

/// Matching parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// A report within `< tolerance` samples of a true change point is a hit
    pub tolerance: usize,
    /// Weight of recall against precision in the F-beta score
    pub beta: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            beta: DEFAULT_BETA,
        }
    }
}

impl ScoringConfig {
    /// # Errors
    ///
    /// Returns `DriftError::Configuration` if `tolerance` is 0 or `beta` is
    /// not a finite positive number.
    pub fn new(tolerance: usize, beta: f64) -> Result<Self> {
        let config = Self { tolerance, beta };
        config.validate()?;
        Ok(config)
    }

    /// Checks a config obtained without [`ScoringConfig::new`], e.g. from JSON.
    pub fn validate(&self) -> Result<()> {
        if self.tolerance == 0 {
            return Err(DriftError::config("tolerance must be greater than 0"));
        }
        if !self.beta.is_finite() || self.beta <= 0.0 {
            return Err(DriftError::config(format!(
                "beta must be a finite positive number, got {}",
                self.beta
            )));
        }
        Ok(())
    }
}

/// All metrics for one detector run.
///
/// `NaN` fields serialize as `null`.
///
/// # Example
///
/// ```
/// use driftbench_core::evaluation::{ChangePointReport, ScoringConfig};
///
/// let config = ScoringConfig::new(10, 1.0).unwrap();
/// let report = ChangePointReport::compute(&[100, 300], &[95, 105], &config);
/// assert_eq!(report.true_positives, 1);
/// assert_eq!(report.false_positives, 1);
/// assert_eq!(report.false_negatives, 1);
/// assert_eq!(report.precision, 0.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChangePointReport {
    /// Reports matched to a true change point, reports taken in order
    pub true_positives: usize,
    /// Reports that matched no true change point
    pub false_positives: usize,
    /// True change points left unmatched, true change points taken in order
    pub false_negatives: usize,
    #[serde(with = "nan_as_null")]
    pub precision: f64,
    #[serde(with = "nan_as_null")]
    pub recall: f64,
    #[serde(with = "nan_as_null")]
    pub f_beta: f64,
    /// Reported count as a percentage of the true count
    #[serde(with = "nan_as_null")]
    pub percent_detected: f64,
    /// Mean samples from a true change point to its detection
    #[serde(with = "nan_as_null")]
    pub mean_delay: f64,
}

impl ChangePointReport {
    /// Scores `reported_cps` against `true_cps`. Both must be sorted.
    pub fn compute(true_cps: &[usize], reported_cps: &[usize], config: &ScoringConfig) -> Self {
        let tp = true_positive_count(true_cps, reported_cps, config.tolerance);
        let fp = false_positive_count(true_cps, reported_cps, config.tolerance);
        let fn_ = false_negative_count(true_cps, reported_cps, config.tolerance);
        let precision = precision(tp, fp, fn_);
        let recall = recall(tp, fp, fn_);
        Self {
            true_positives: tp,
            false_positives: fp,
            false_negatives: fn_,
            precision,
            recall,
            f_beta: combine_f_beta(precision, recall, config.beta),
            percent_detected: percent_detected(true_cps, reported_cps),
            mean_delay: mean_detection_delay(true_cps, reported_cps),
        }
    }

    /// Aggregates several runs (e.g. one per seed).
    ///
    /// Counts are summed. Ratios are averaged over the runs where they are
    /// defined, and stay `NaN` if no run defines them.
    pub fn mean(reports: &[ChangePointReport]) -> Self {
        let avg = |field: fn(&ChangePointReport) -> f64| {
            let defined: Vec<f64> = reports.iter().map(field).filter(|v| !v.is_nan()).collect();
            if defined.is_empty() {
                f64::NAN
            } else {
                defined.iter().sum::<f64>() / defined.len() as f64
            }
        };
        Self {
            true_positives: reports.iter().map(|r| r.true_positives).sum(),
            false_positives: reports.iter().map(|r| r.false_positives).sum(),
            false_negatives: reports.iter().map(|r| r.false_negatives).sum(),
            precision: avg(|r| r.precision),
            recall: avg(|r| r.recall),
            f_beta: avg(|r| r.f_beta),
            percent_detected: avg(|r| r.percent_detected),
            mean_delay: avg(|r| r.mean_delay),
        }
    }
}

mod nan_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_nan() {
            serializer.serialize_none()
        } else {
            serializer.serialize_f64(*value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
    }
}
