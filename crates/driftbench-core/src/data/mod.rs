//! In-memory labeled data.
//!
//! The core never loads raw data. Image corpora, CSV files and generator
//! libraries are handled by callers, which hand over a materialized
//! [`Dataset`]: an N×D feature [`Matrix`] and N label-encoded [`Label`]s.

mod dataset;
mod matrix;
mod preprocess;

pub use dataset::{Dataset, Label};
pub use matrix::Matrix;
pub use preprocess::{MinMaxScaler, Preprocess, StandardScaler};
