//! `tsprompt format`: render a dataset window in one format.

use super::{
    CodecArgs, CommandResult, PromptArgs, SliceArgs, effective_settings, load_config, load_slice,
};
use std::path::Path;
use tsprompt_codec::format_timeseries;

pub async fn run(config_path: Option<&Path>, slice: &SliceArgs, codec: &CodecArgs) -> CommandResult {
    let config = load_config(config_path)?;
    let settings = effective_settings(&config, Some(slice), codec, &PromptArgs::default())?;
    let data = load_slice(&settings, slice)?;
    println!(
        "{}",
        format_timeseries(&data.window, settings.format, settings.ts_type)
    );
    Ok(())
}
