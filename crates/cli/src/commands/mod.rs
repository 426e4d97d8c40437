//! Subcommand implementations and the arguments they share.

pub mod config_cmd;
pub mod format;
pub mod formats;
pub mod parse;
pub mod prompt;
pub mod providers;
pub mod run;

use chrono::NaiveDate;
use clap::Args;
use std::path::Path;
use tsprompt_config::{AppConfig, BenchmarkConfig};
use tsprompt_core::{PromptType, TsFormat, TsType};
use tsprompt_data::DatasetSlice;
use tsprompt_prompt::{PromptAssembler, PromptTemplate, validate_horizon};

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Which part of which dataset to use.
#[derive(Args, Debug, Clone)]
pub struct SliceArgs {
    /// Dataset CSV: a path, or a file name inside the configured data directory
    #[arg(short, long)]
    pub dataset: String,

    /// First day of the input window (YYYY-MM-DD)
    #[arg(long)]
    pub start: NaiveDate,

    /// Last day of the input window (YYYY-MM-DD)
    #[arg(long)]
    pub end: NaiveDate,

    /// Readings to forecast
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    pub horizon: Option<i64>,
}

/// Format and value type of the serialized series.
#[derive(Args, Debug, Clone, Default)]
pub struct CodecArgs {
    /// ARRAY, CUSTOM, TSV, PLAIN, JSON, MARKDOWN, CONTEXT, SYMBOL or CSV
    #[arg(short, long)]
    pub format: Option<TsFormat>,

    /// NUMERIC or TEXTUAL
    #[arg(long = "type")]
    pub ts_type: Option<TsType>,
}

/// Prompt strategy settings.
#[derive(Args, Debug, Clone, Default)]
pub struct PromptArgs {
    /// ZERO_SHOT, FEW_SHOT, COT or COT_FEW
    #[arg(short, long)]
    pub strategy: Option<PromptType>,

    /// Unit word for one step of the series (hour, day, ...)
    #[arg(long)]
    pub timestamp_label: Option<String>,
}

pub fn load_config(path: Option<&Path>) -> Result<AppConfig, tsprompt_config::ConfigError> {
    match path {
        Some(path) => AppConfig::load_with_env(path),
        None => AppConfig::load(),
    }
}

/// Config defaults with command-line flags laid over them.
pub fn effective_settings(
    config: &AppConfig,
    slice: Option<&SliceArgs>,
    codec: &CodecArgs,
    prompt: &PromptArgs,
) -> Result<BenchmarkConfig, Box<dyn std::error::Error>> {
    let mut settings = config.benchmark.clone();
    if let Some(format) = codec.format {
        settings.format = format;
    }
    if let Some(ty) = codec.ts_type {
        settings.ts_type = ty;
    }
    if let Some(strategy) = prompt.strategy {
        settings.strategy = strategy;
    }
    if let Some(label) = &prompt.timestamp_label {
        settings.timestamp_label = label.clone();
    }
    if let Some(horizon) = slice.and_then(|s| s.horizon) {
        settings.horizon = validate_horizon(horizon)?;
    }
    Ok(settings)
}

pub fn load_slice(
    settings: &BenchmarkConfig,
    slice: &SliceArgs,
) -> Result<DatasetSlice, tsprompt_data::DataError> {
    let path = settings.dataset_path(&slice.dataset);
    DatasetSlice::select(path, slice.start, slice.end, settings.horizon)
}

/// The assembler for `settings`, using a configured template override if present.
pub fn build_assembler(
    config: &AppConfig,
    settings: &BenchmarkConfig,
) -> Result<PromptAssembler, Box<dyn std::error::Error>> {
    let mut assembler =
        PromptAssembler::new(settings.strategy, settings.format, settings.ts_type)
            .with_timestamp_label(&settings.timestamp_label);
    if let Some(source) = config.templates.load(settings.strategy)? {
        tracing::debug!(strategy = %settings.strategy, "Using template override");
        assembler = assembler.with_template(PromptTemplate::custom(settings.strategy, source)?)?;
    }
    Ok(assembler)
}
