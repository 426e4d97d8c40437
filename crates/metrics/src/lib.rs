//! Forecast accuracy metrics.
//!
//! Scores a predicted series against the true one. Every score is rounded
//! the way benchmark result tables report it: sMAPE, MAE and RMSE to two
//! decimals, SEM to four.

use serde::{Deserialize, Serialize};

/// Added to the sMAPE denominator so an all-zero pair scores 0 instead of NaN.
pub const SMAPE_EPSILON: f64 = 1e-10;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetricsError {
    #[error("Truth has {truth} values but prediction has {prediction}")]
    LengthMismatch { truth: usize, prediction: usize },

    #[error("Cannot score an empty series")]
    Empty,

    #[error("Standard error needs at least 2 samples, got {0}")]
    TooFewSamples(usize),
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let n = values.len() as f64;
    values.sum::<f64>() / n
}

/// A truth/prediction pair of equal, non-zero length.
#[derive(Debug, Clone)]
pub struct Metrics<'a> {
    y_true: &'a [f64],
    y_pred: &'a [f64],
}

impl<'a> Metrics<'a> {
    pub fn new(y_true: &'a [f64], y_pred: &'a [f64]) -> Result<Self, MetricsError> {
        if y_true.len() != y_pred.len() {
            return Err(MetricsError::LengthMismatch {
                truth: y_true.len(),
                prediction: y_pred.len(),
            });
        }
        if y_true.is_empty() {
            return Err(MetricsError::Empty);
        }
        Ok(Self { y_true, y_pred })
    }

    pub fn len(&self) -> usize {
        self.y_true.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y_true.is_empty()
    }

    fn pairs(&self) -> impl ExactSizeIterator<Item = (f64, f64)> + '_ {
        self.y_true.iter().copied().zip(self.y_pred.iter().copied())
    }

    /// `|t - p|` per step.
    pub fn absolute_errors(&self) -> Vec<f64> {
        self.pairs().map(|(t, p)| (t - p).abs()).collect()
    }

    /// Symmetric mean absolute percentage error, in percent.
    pub fn smape(&self) -> f64 {
        let ratios = self
            .pairs()
            .map(|(t, p)| (t - p).abs() / ((t.abs() + p.abs()) / 2.0 + SMAPE_EPSILON));
        round_to(mean(ratios) * 100.0, 2)
    }

    pub fn mae(&self) -> f64 {
        round_to(mean(self.pairs().map(|(t, p)| (t - p).abs())), 2)
    }

    pub fn rmse(&self) -> f64 {
        round_to(mean(self.pairs().map(|(t, p)| (t - p).powi(2))).sqrt(), 2)
    }

    /// Standard error of the mean of `errors` (sample standard deviation over √n).
    pub fn sem(errors: &[f64]) -> Result<f64, MetricsError> {
        let n = errors.len();
        if n < 2 {
            return Err(MetricsError::TooFewSamples(n));
        }
        let avg = mean(errors.iter().copied());
        let variance = errors.iter().map(|e| (e - avg).powi(2)).sum::<f64>() / (n - 1) as f64;
        Ok(round_to(variance.sqrt() / (n as f64).sqrt(), 4))
    }

    pub fn report(&self) -> MetricsReport {
        MetricsReport {
            smape: self.smape(),
            mae: self.mae(),
            rmse: self.rmse(),
        }
    }
}

/// The scores recorded for one forecast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    pub smape: f64,
    pub mae: f64,
    pub rmse: f64,
}

impl MetricsReport {
    /// Score `y_pred` against `y_true`.
    pub fn compute(y_true: &[f64], y_pred: &[f64]) -> Result<Self, MetricsError> {
        Ok(Metrics::new(y_true, y_pred)?.report())
    }
}
