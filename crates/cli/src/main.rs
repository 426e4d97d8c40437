//! tsprompt CLI: the main entry point.
//!
//! Commands:
//! - `prompt`   Assemble a forecasting prompt from a dataset slice
//! - `format`   Render a dataset slice in one of the nine formats
//! - `parse`    Parse a model reply back into numbers
//! - `run`      Prompt a model and score its forecast
//! - `formats`  List formats, types and strategies
//! - `providers` List configured model backends and check they answer
//! - `config`   Show, locate, create or validate the config file

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use commands::{CodecArgs, PromptArgs, SliceArgs};

#[derive(Parser)]
#[command(
    name = "tsprompt",
    about = "Time-series prompting benchmark for language models",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of ~/.tsprompt/config.toml
    #[arg(long, global = true, env = "TSPROMPT_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the prompt assembled for a dataset slice
    Prompt {
        #[command(flatten)]
        slice: SliceArgs,

        #[command(flatten)]
        codec: CodecArgs,

        #[command(flatten)]
        prompt: PromptArgs,

        /// Print the prompt, its fields and the truth as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render a dataset slice's window in a format
    Format {
        #[command(flatten)]
        slice: SliceArgs,

        #[command(flatten)]
        codec: CodecArgs,
    },

    /// Parse a model reply (file or stdin) into numbers
    Parse {
        /// Reply file; reads stdin when omitted
        input: Option<PathBuf>,

        #[command(flatten)]
        codec: CodecArgs,

        /// Fail instead of retrying as ARRAY/NUMERIC
        #[arg(long)]
        strict: bool,
    },

    /// Prompt a model with a dataset slice and score the forecast
    Run {
        #[command(flatten)]
        slice: SliceArgs,

        #[command(flatten)]
        codec: CodecArgs,

        #[command(flatten)]
        prompt: PromptArgs,

        /// Provider name (e.g. openai, deepseek, ollama, mock)
        #[arg(short, long)]
        provider: Option<String>,

        /// Model name
        #[arg(short, long)]
        model: Option<String>,

        /// Sampling temperature
        #[arg(short, long)]
        temperature: Option<f32>,

        /// Repeat the run and report the mean and standard error
        #[arg(long, default_value_t = 1)]
        repeat: usize,

        /// Seed for the mock provider
        #[arg(long)]
        seed: Option<u64>,

        /// Also write the records as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List formats, value types and prompt strategies
    Formats,

    /// List configured providers
    Providers {
        /// Ask each provider whether it is reachable
        #[arg(long)]
        check: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the config file path
    Path,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Check the config file for errors
    Validate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so command output can be piped
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Prompt {
            slice,
            codec,
            prompt,
            json,
        } => commands::prompt::run(config_path, &slice, &codec, &prompt, json).await?,
        Commands::Format { slice, codec } => {
            commands::format::run(config_path, &slice, &codec).await?
        }
        Commands::Parse {
            input,
            codec,
            strict,
        } => commands::parse::run(config_path, input, &codec, strict).await?,
        Commands::Run {
            slice,
            codec,
            prompt,
            provider,
            model,
            temperature,
            repeat,
            seed,
            output,
        } => {
            let options = commands::run::RunOptions {
                provider,
                model,
                temperature,
                repeat,
                seed,
                output,
            };
            commands::run::run(config_path, &slice, &codec, &prompt, options).await?
        }
        Commands::Formats => commands::formats::run().await?,
        Commands::Providers { check } => commands::providers::run(config_path, check).await?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show(config_path).await?,
            ConfigAction::Path => commands::config_cmd::path(config_path).await?,
            ConfigAction::Init { force } => commands::config_cmd::init(config_path, force).await?,
            ConfigAction::Validate => commands::config_cmd::validate(config_path).await?,
        },
    }

    Ok(())
}
