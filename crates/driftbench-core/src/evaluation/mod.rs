//! Scoring of detected change points against ground truth.
//!
//! A detector run over a [`Stream`](crate::stream::Stream) reports the stream
//! indices at which it believes a change began. This module compares those
//! reports with the stream's true change points.
//!
//! # Example
//!
//! ```
//! use driftbench_core::evaluation::{ChangePointReport, ScoringConfig};
//!
//! let true_cps = [99, 200, 400];
//! let reported = [100, 150, 200, 250, 300, 400, 500];
//!
//! let report = ChangePointReport::compute(&true_cps, &reported, &ScoringConfig::default());
//! assert_eq!(report.true_positives, 3);
//! assert_eq!(report.false_positives, 4);
//! ```
//!
//! # Metrics Reference
//!
//! | Metric | Description |
//! |--------|-------------|
//! | TP | Reports within the tolerance of a not yet matched true change point |
//! | FP | Reports minus TP |
//! | FN | True change points without a report within the tolerance |
//! | Precision | TP / (TP + FP) |
//! | Recall | TP / (TP + FN) |
//! | F-beta | Weighted harmonic mean of precision and recall |
//! | Percent detected | 100 * reports / true change points (unbounded) |
//! | Mean delay | Average distance from a change to its first later report |

pub mod metrics;

pub use metrics::{
    f_beta_score, false_negative_count, false_positive_count, mean_detection_delay,
    percent_detected, precision, recall, true_positive_count, ChangePointReport, ScoringConfig,
};
