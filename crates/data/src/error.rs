use chrono::NaiveDate;
use std::path::PathBuf;

/// Dataset loading and slicing errors.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Dataset is empty")]
    EmptyDataset,

    #[error("Start date {start} is after end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Row {row}: cannot read a date from {value:?}")]
    MalformedDate { row: usize, value: String },

    #[error("No rows between {start} and {end}")]
    EmptyWindow { start: NaiveDate, end: NaiveDate },

    #[error("No rows after {end} to compare a forecast against")]
    EmptyTruth { end: NaiveDate },
}
