//! End-to-end benchmark runs.
//!
//! One run assembles a prompt from a dataset slice, asks a provider for a
//! forecast, parses the reply back into numbers and scores it against the
//! readings that actually followed the window.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use tsprompt_codec::SeriesCodec;
use tsprompt_core::{
    PromptError, PromptType, Provider, ProviderError, ProviderRequest, TsFormat, TsType, Usage,
    strip_reasoning,
};
use tsprompt_data::DatasetSlice;
use tsprompt_metrics::{Metrics, MetricsError, MetricsReport};
use tsprompt_prompt::PromptAssembler;

/// Failures that stop a run before a reply exists.
#[derive(Debug, thiserror::Error)]
pub enum BenchmarkError {
    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Everything recorded about one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    pub started_at: DateTime<Utc>,
    pub provider: String,
    pub model: String,
    pub strategy: PromptType,
    pub format: TsFormat,
    #[serde(rename = "type")]
    pub ts_type: TsType,
    pub horizon: usize,
    pub temperature: f32,
    pub prompt: String,
    /// Reply exactly as the provider returned it
    pub raw_reply: String,
    pub predictions: Vec<f64>,
    pub truth: Vec<f64>,
    pub used_fallback: bool,
    /// Predictions and truth differed in length and were cut to the shorter
    pub truncated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<MetricsReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    pub elapsed_secs: f64,
}

/// Aggregate scores over repeated runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkSummary {
    pub runs: usize,
    pub scored: usize,
    pub mean_smape: f64,
    pub mean_mae: f64,
    pub mean_rmse: f64,
    /// Standard error of the per-run sMAPE; absent with fewer than 2 scored runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smape_sem: Option<f64>,
}

impl BenchmarkSummary {
    /// `None` when no run produced a score.
    pub fn from_records(records: &[BenchmarkRecord]) -> Option<Self> {
        let reports: Vec<MetricsReport> = records.iter().filter_map(|r| r.metrics).collect();
        if reports.is_empty() {
            return None;
        }
        let mean = |f: fn(&MetricsReport) -> f64| {
            let avg = reports.iter().map(f).sum::<f64>() / reports.len() as f64;
            (avg * 100.0).round() / 100.0
        };
        let smapes: Vec<f64> = reports.iter().map(|r| r.smape).collect();
        Some(Self {
            runs: records.len(),
            scored: reports.len(),
            mean_smape: mean(|r: &MetricsReport| r.smape),
            mean_mae: mean(|r: &MetricsReport| r.mae),
            mean_rmse: mean(|r: &MetricsReport| r.rmse),
            smape_sem: Metrics::sem(&smapes).ok(),
        })
    }
}

/// A configured run: prompt assembly, a provider and the sampling settings.
pub struct BenchmarkRun {
    assembler: PromptAssembler,
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl BenchmarkRun {
    pub fn new(
        assembler: PromptAssembler,
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            assembler,
            provider,
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    fn codec(&self) -> SeriesCodec {
        self.assembler.codec()
    }

    /// Run once against `slice`, asking for `horizon` readings.
    ///
    /// Prompt and provider failures are errors. A reply that cannot be
    /// parsed or scored still yields a record, with `parse_error` set.
    pub async fn execute(
        &self,
        slice: &DatasetSlice,
        horizon: usize,
    ) -> Result<BenchmarkRecord, BenchmarkError> {
        let started_at = Utc::now();
        let prompt = self.assembler.assemble(&slice.window, horizon)?;

        let mut request = ProviderRequest::new(&self.model, &prompt.text)
            .with_temperature(self.temperature);
        if let Some(max_tokens) = self.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        info!(provider = self.provider.name(), model = %self.model, "Requesting forecast");
        let response = self.provider.complete(request).await?;

        let truth = slice.truth_values();
        let mut record = BenchmarkRecord {
            started_at,
            provider: self.provider.name().to_string(),
            model: response.model.clone(),
            strategy: prompt.strategy,
            format: prompt.codec.format,
            ts_type: prompt.codec.ty,
            horizon,
            temperature: self.temperature,
            prompt: prompt.text,
            raw_reply: response.text.clone(),
            predictions: Vec::new(),
            truth,
            used_fallback: false,
            truncated: false,
            parse_error: None,
            metrics: None,
            usage: response.usage,
            elapsed_secs: response.elapsed_secs,
        };

        let parsed = match self.codec().parse_detailed(strip_reasoning(&response.text)) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(error = %err, "Reply could not be parsed");
                record.parse_error = Some(err.to_string());
                return Ok(record);
            }
        };
        record.predictions = parsed.values;
        record.used_fallback = parsed.used_fallback;

        match score(&record.truth, &record.predictions) {
            Ok((report, truncated)) => {
                record.metrics = Some(report);
                record.truncated = truncated;
                info!(
                    smape = report.smape,
                    mae = report.mae,
                    rmse = report.rmse,
                    truncated,
                    "Forecast scored"
                );
            }
            Err(err) => {
                warn!(error = %err, "Forecast could not be scored");
                record.parse_error = Some(err.to_string());
            }
        }
        Ok(record)
    }
}

/// Score the overlapping prefix of `truth` and `predictions`.
fn score(truth: &[f64], predictions: &[f64]) -> Result<(MetricsReport, bool), MetricsError> {
    let n = truth.len().min(predictions.len());
    let truncated = truth.len() != predictions.len();
    if truncated {
        warn!(
            truth = truth.len(),
            predictions = predictions.len(),
            "Prediction length differs from truth, scoring the first {n}"
        );
    }
    let report = Metrics::new(&truth[..n], &predictions[..n])?.report();
    Ok((report, truncated))
}
