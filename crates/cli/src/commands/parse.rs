//! `tsprompt parse`: turn a model reply back into numbers.

use super::{CodecArgs, CommandResult, PromptArgs, effective_settings, load_config};
use std::io::Read;
use std::path::{Path, PathBuf};
use tsprompt_codec::{ParsedSeries, SeriesCodec};
use tsprompt_core::strip_reasoning;

fn read_reply(input: Option<PathBuf>) -> std::io::Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

/// Parse `reply` the way a benchmark run does.
pub fn parse_reply(
    codec: SeriesCodec,
    reply: &str,
    strict: bool,
) -> Result<ParsedSeries, tsprompt_core::CodecError> {
    let reply = strip_reasoning(reply);
    if strict {
        codec.parse_strict(reply).map(|values| ParsedSeries {
            values,
            used_fallback: false,
        })
    } else {
        codec.parse_detailed(reply)
    }
}

pub async fn run(
    config_path: Option<&Path>,
    input: Option<PathBuf>,
    codec: &CodecArgs,
    strict: bool,
) -> CommandResult {
    let config = load_config(config_path)?;
    let settings = effective_settings(&config, None, codec, &PromptArgs::default())?;
    let reply = read_reply(input)?;

    let parsed = parse_reply(SeriesCodec::new(settings.format, settings.ts_type), &reply, strict)?;
    println!("{}", serde_json::to_string_pretty(&parsed)?);
    Ok(())
}
