//! Offline provider that answers every prompt with a random forecast.
//!
//! The reply is laid out in the benchmark's format and type, so the whole
//! pipeline (assemble, complete, parse, score) can run without a model.

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use tracing::debug;
use tsprompt_codec::SeriesCodec;
use tsprompt_core::error::ProviderError;
use tsprompt_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use tsprompt_core::{TimeseriesPoint, TsFormat, TsType};

/// Upper bound (exclusive) of generated readings.
pub const MOCK_VALUE_MAX: f64 = 500.0;

fn first_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2018, 1, 1).unwrap_or_default()
}

pub struct MockProvider {
    horizon: usize,
    codec: SeriesCodec,
    rng: Mutex<StdRng>,
}

impl MockProvider {
    /// A mock seeded from the OS.
    pub fn new(horizon: usize, format: TsFormat, ty: TsType) -> Self {
        Self::with_rng(horizon, format, ty, StdRng::from_os_rng())
    }

    /// A mock whose replies repeat for the same seed.
    pub fn seeded(horizon: usize, format: TsFormat, ty: TsType, seed: u64) -> Self {
        Self::with_rng(horizon, format, ty, StdRng::seed_from_u64(seed))
    }

    fn with_rng(horizon: usize, format: TsFormat, ty: TsType, rng: StdRng) -> Self {
        Self {
            horizon,
            codec: SeriesCodec::new(format, ty),
            rng: Mutex::new(rng),
        }
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// `horizon` daily readings from 2018-01-01, uniform in `[0, 500)`, four decimals.
    pub fn sample_window(&self) -> Vec<TimeseriesPoint> {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        (0..self.horizon)
            .map(|i| {
                let day = first_day() + Days::new(i as u64);
                let value = (rng.random_range(0.0..MOCK_VALUE_MAX) * 1e4).round() / 1e4;
                TimeseriesPoint::new(day.format("%Y-%m-%d").to_string(), value)
            })
            .collect()
    }

    fn sample_usage(&self) -> (Usage, f64) {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        let prompt_tokens = rng.random_range(10..=500);
        let completion_tokens = rng.random_range(10..=500);
        let elapsed_secs = (rng.random_range(0.5..2.5) * 100.0_f64).round() / 100.0;
        let usage = Usage {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        };
        (usage, elapsed_secs)
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError> {
        let text = self.codec.format(&self.sample_window());
        let (usage, elapsed_secs) = self.sample_usage();
        debug!(
            model = %request.model,
            format = %self.codec.format,
            ty = %self.codec.ty,
            points = self.horizon,
            "Mock reply generated"
        );
        Ok(ProviderResponse {
            text,
            model: request.model,
            usage: Some(usage),
            elapsed_secs,
        })
    }
}
