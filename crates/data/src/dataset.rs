//! CSV datasets and date-range slicing.

use crate::error::DataError;
use chrono::NaiveDate;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};
use tsprompt_core::{TimeseriesPoint, series};

/// Decimal places every loaded reading is rounded to.
pub const VALUE_DECIMALS: i32 = 3;

#[derive(Debug, Deserialize)]
struct Row {
    date: String,
    value: f64,
}

fn round_value(value: f64) -> f64 {
    let scale = 10f64.powi(VALUE_DECIMALS);
    (value * scale).round() / scale
}

/// Calendar date at the start of a `YYYY-MM-DD[ HH:MM:SS]` timestamp.
fn calendar_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// A loaded dataset: readings in file order, each with its calendar date.
#[derive(Debug, Clone)]
pub struct Dataset {
    rows: Vec<(NaiveDate, TimeseriesPoint)>,
}

impl Dataset {
    /// Load a dataset file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading dataset");
        let file = std::fs::File::open(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Load a dataset from CSV text with a `date,value` header.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DataError> {
        let mut reader = csv::Reader::from_reader(reader);
        let mut rows = Vec::new();
        for (i, record) in reader.deserialize::<Row>().enumerate() {
            let row = record?;
            let date = calendar_date(&row.date).ok_or_else(|| DataError::MalformedDate {
                row: i + 1,
                value: row.date.clone(),
            })?;
            rows.push((date, TimeseriesPoint::new(row.date, round_value(row.value))));
        }
        if rows.is_empty() {
            return Err(DataError::EmptyDataset);
        }
        debug!(rows = rows.len(), "Dataset parsed");
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First and last calendar dates in file order.
    pub fn span(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.rows.first()?.0, self.rows.last()?.0))
    }

    /// Cut a window of rows dated `start..=end` and the first `horizon` rows after `end`.
    pub fn select(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        horizon: usize,
    ) -> Result<DatasetSlice, DataError> {
        if start > end {
            return Err(DataError::InvalidRange { start, end });
        }

        let window: Vec<TimeseriesPoint> = self
            .rows
            .iter()
            .filter(|(date, _)| (start..=end).contains(date))
            .map(|(_, point)| point.clone())
            .collect();
        let truth: Vec<TimeseriesPoint> = self
            .rows
            .iter()
            .filter(|(date, _)| *date > end)
            .take(horizon)
            .map(|(_, point)| point.clone())
            .collect();

        if window.is_empty() {
            return Err(DataError::EmptyWindow { start, end });
        }
        if truth.is_empty() {
            return Err(DataError::EmptyTruth { end });
        }

        info!(
            %start,
            %end,
            window = window.len(),
            truth = truth.len(),
            "Selected dataset slice"
        );
        Ok(DatasetSlice { window, truth })
    }
}

/// An input window and the readings that follow it.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSlice {
    pub window: Vec<TimeseriesPoint>,
    pub truth: Vec<TimeseriesPoint>,
}

impl DatasetSlice {
    /// Load `path` and cut it in one step.
    pub fn select(
        path: impl AsRef<Path>,
        start: NaiveDate,
        end: NaiveDate,
        horizon: usize,
    ) -> Result<Self, DataError> {
        Dataset::from_path(path)?.select(start, end, horizon)
    }

    pub fn truth_values(&self) -> Vec<f64> {
        series::values(&self.truth)
    }

    pub fn window_values(&self) -> Vec<f64> {
        series::values(&self.window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn daily_csv(days: u32) -> String {
        let mut text = String::from("date,value\n");
        for d in 1..=days {
            text.push_str(&format!("2016-07-{d:02},{}.12345\n", d * 10));
        }
        text
    }

    #[test]
    fn selects_inclusive_window_and_following_truth() {
        let dataset = Dataset::from_reader(daily_csv(10).as_bytes()).unwrap();
        let slice = dataset.select(date("2016-07-02"), date("2016-07-05"), 3).unwrap();

        let stamps: Vec<&str> = slice.window.iter().map(|p| p.timestamp.as_str()).collect();
        assert_eq!(stamps, ["2016-07-02", "2016-07-03", "2016-07-04", "2016-07-05"]);
        assert_eq!(slice.truth_values(), vec![60.123, 70.123, 80.123]);
    }

    #[test]
    fn values_round_to_three_decimals() {
        let dataset = Dataset::from_reader("date,value\n2016-07-01,3.66249\n2016-07-02,1.2346\n2016-07-03,2\n".as_bytes()).unwrap();
        let slice = dataset.select(date("2016-07-01"), date("2016-07-02"), 5).unwrap();
        assert_eq!(slice.window_values(), vec![3.662, 1.235]);
        assert_eq!(slice.truth_values(), vec![2.0]);
    }

    #[test]
    fn hourly_rows_compare_on_calendar_date() {
        let mut text = String::from("date,value\n");
        for day in 1..=3 {
            for hour in 0..24 {
                text.push_str(&format!("2016-07-{day:02} {hour:02}:00:00,{hour}\n"));
            }
        }
        let dataset = Dataset::from_reader(text.as_bytes()).unwrap();
        let slice = dataset.select(date("2016-07-01"), date("2016-07-02"), 24).unwrap();
        assert_eq!(slice.window.len(), 48);
        assert_eq!(slice.window[0].timestamp, "2016-07-01 00:00:00");
        assert_eq!(slice.truth.len(), 24);
        assert_eq!(slice.truth[0].timestamp, "2016-07-03 00:00:00");
    }

    #[test]
    fn truth_is_truncated_at_end_of_data() {
        let dataset = Dataset::from_reader(daily_csv(5).as_bytes()).unwrap();
        let slice = dataset.select(date("2016-07-01"), date("2016-07-03"), 24).unwrap();
        assert_eq!(slice.truth.len(), 2);
    }

    #[test]
    fn rejects_reversed_range() {
        let dataset = Dataset::from_reader(daily_csv(5).as_bytes()).unwrap();
        let err = dataset.select(date("2016-07-04"), date("2016-07-01"), 1).unwrap_err();
        assert!(matches!(err, DataError::InvalidRange { .. }));
    }

    #[test]
    fn rejects_empty_window_and_truth() {
        let dataset = Dataset::from_reader(daily_csv(5).as_bytes()).unwrap();
        assert!(matches!(
            dataset.select(date("2017-01-01"), date("2017-01-02"), 1),
            Err(DataError::EmptyWindow { .. })
        ));
        assert!(matches!(
            dataset.select(date("2016-07-01"), date("2016-07-05"), 1),
            Err(DataError::EmptyTruth { .. })
        ));
    }

    #[test]
    fn rejects_malformed_dates() {
        let err = Dataset::from_reader("date,value\n07/01/2016,1.0\n".as_bytes()).unwrap_err();
        match err {
            DataError::MalformedDate { row, value } => {
                assert_eq!(row, 1);
                assert_eq!(value, "07/01/2016");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_header_only_file() {
        let err = Dataset::from_reader("date,value\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::EmptyDataset));
    }

    #[test]
    fn rejects_non_numeric_values() {
        let err = Dataset::from_reader("date,value\n2016-07-01,high\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::Csv(_)));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", daily_csv(6)).unwrap();
        let slice = DatasetSlice::select(file.path(), date("2016-07-01"), date("2016-07-04"), 2).unwrap();
        assert_eq!(slice.window.len(), 4);
        assert_eq!(slice.truth_values(), vec![50.123, 60.123]);

        let dataset = Dataset::from_path(file.path()).unwrap();
        assert_eq!(dataset.len(), 6);
        assert_eq!(dataset.span(), Some((date("2016-07-01"), date("2016-07-06"))));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Dataset::from_path("/nonexistent/ettm.csv").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/ettm.csv"));
    }
}
