//! Dataset loading for tsprompt.
//!
//! A dataset is a CSV file with `date` and `value` columns. Benchmarks cut
//! it into an input window and the readings that follow it.

pub mod dataset;
pub mod error;

pub use dataset::{Dataset, DatasetSlice, VALUE_DECIMALS};
pub use error::DataError;
