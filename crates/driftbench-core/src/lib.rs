//! # Driftbench Core
//!
//! Platform-independent library for building labeled data streams with known,
//! programmatically injected concept drift, and for scoring change-point
//! detectors against the recorded ground truth.
//!
//! The two halves never call each other at runtime. They meet in an
//! evaluation loop owned by the caller: a stream is built, fed sample by
//! sample into an external detector, and the detector's reported change
//! points are compared against [`stream::Stream::true_change_points`].
//!
//! ## Modules
//!
//! - [`data`] - Feature matrix, labeled dataset and preprocessing transforms
//! - [`stream`] - Concept partitioning, regional drift and the gradual stream builder
//! - [`generators`] - Seeded synthetic concept generators (random RBF, LED)
//! - [`evaluation`] - Change-point scoring (precision, recall, F-beta, delay)
//! - [`config`] - Default parameters and serializable configuration structs
//! - [`error`] - Error types for stream construction and configuration

#![forbid(unsafe_code)]

pub mod config;
pub mod data;
pub mod error;
pub mod evaluation;
pub mod generators;
pub mod stream;

pub use error::{DriftError, Result};
