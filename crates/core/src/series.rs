//! Timestamped readings, the unit every codec renders and parses.

use serde::{Deserialize, Serialize};

/// A single reading. The timestamp is opaque text and is never interpreted
/// as a calendar date by the codecs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeseriesPoint {
    pub timestamp: String,
    pub value: f64,
}

impl TimeseriesPoint {
    pub fn new(timestamp: impl Into<String>, value: f64) -> Self {
        Self {
            timestamp: timestamp.into(),
            value,
        }
    }
}

impl<S: Into<String>> From<(S, f64)> for TimeseriesPoint {
    fn from((timestamp, value): (S, f64)) -> Self {
        Self::new(timestamp, value)
    }
}

/// An ordered, chronological run of readings.
pub type TimeseriesWindow = Vec<TimeseriesPoint>;

/// The values of a window, in order.
pub fn values(window: &[TimeseriesPoint]) -> Vec<f64> {
    window.iter().map(|p| p.value).collect()
}
