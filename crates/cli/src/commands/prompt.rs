//! `tsprompt prompt`: assemble and print a forecasting prompt.

use super::{
    CodecArgs, CommandResult, PromptArgs, SliceArgs, build_assembler, effective_settings,
    load_config, load_slice,
};
use std::path::Path;

pub async fn run(
    config_path: Option<&Path>,
    slice: &SliceArgs,
    codec: &CodecArgs,
    prompt: &PromptArgs,
    json: bool,
) -> CommandResult {
    let config = load_config(config_path)?;
    let settings = effective_settings(&config, Some(slice), codec, prompt)?;
    let data = load_slice(&settings, slice)?;
    let assembler = build_assembler(&config, &settings)?;

    if json {
        let task = assembler.task(&data.window, settings.horizon, data.truth_values())?;
        println!("{}", serde_json::to_string_pretty(&task)?);
    } else {
        let assembled = assembler.assemble(&data.window, settings.horizon)?;
        println!("{}", assembled.text);
    }
    Ok(())
}
