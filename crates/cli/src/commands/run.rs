//! `tsprompt run`: prompt a model with a dataset slice and score the forecast.

use super::{
    CodecArgs, CommandResult, PromptArgs, SliceArgs, build_assembler, effective_settings,
    load_config, load_slice,
};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tsprompt::{BenchmarkRun, BenchmarkSummary};
use tsprompt_core::Provider;
use tsprompt_providers::{MOCK_PROVIDER, MockProvider, ProviderRouter};

/// Flags specific to `run`.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub repeat: usize,
    pub seed: Option<u64>,
    pub output: Option<PathBuf>,
}

pub async fn run(
    config_path: Option<&Path>,
    slice: &SliceArgs,
    codec: &CodecArgs,
    prompt: &PromptArgs,
    options: RunOptions,
) -> CommandResult {
    let config = load_config(config_path)?;
    let settings = effective_settings(&config, Some(slice), codec, prompt)?;
    let data = load_slice(&settings, slice)?;

    let router = ProviderRouter::from_config(&config, &settings);
    let provider_name = options
        .provider
        .clone()
        .unwrap_or_else(|| router.default_name().to_string());
    let provider: Arc<dyn Provider> = match (provider_name.as_str(), options.seed) {
        (MOCK_PROVIDER, Some(seed)) => Arc::new(MockProvider::seeded(
            settings.horizon,
            settings.format,
            settings.ts_type,
            seed,
        )),
        (name, _) if options.provider.is_none() => router
            .default()
            .ok_or_else(|| format!("Default provider '{name}' is not configured"))?,
        (name, _) => router
            .get(name)
            .ok_or_else(|| format!("Provider '{name}' is not configured"))?,
    };
    let model = options
        .model
        .clone()
        .unwrap_or_else(|| config.model_for(&provider_name).to_string());

    let runner = BenchmarkRun::new(build_assembler(&config, &settings)?, provider, &model)
        .with_temperature(options.temperature.unwrap_or(config.default_temperature))
        .with_max_tokens(config.default_max_tokens);

    let repeat = options.repeat.max(1);
    let mut records = Vec::with_capacity(repeat);
    for i in 0..repeat {
        info!(run = i + 1, of = repeat, provider = %provider_name, %model, "Benchmark run");
        records.push(runner.execute(&data, settings.horizon).await?);
    }

    let report = if repeat == 1 {
        serde_json::to_value(&records[0])?
    } else {
        json!({
            "records": records,
            "summary": BenchmarkSummary::from_records(&records),
        })
    };
    let text = serde_json::to_string_pretty(&report)?;

    if let Some(path) = &options.output {
        std::fs::write(path, &text)?;
        info!(path = %path.display(), "Results written");
    }
    println!("{text}");
    Ok(())
}
