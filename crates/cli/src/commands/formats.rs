//! `tsprompt formats`: list the closed variant sets.

use super::CommandResult;
use tsprompt_codec::format_timeseries;
use tsprompt_core::{PromptType, TimeseriesPoint, TsFormat, TsType};
use tsprompt_prompt::FEW_SHOT_MIN_WINDOW;

pub async fn run() -> CommandResult {
    let sample = [
        TimeseriesPoint::new("2016-07-01", 3.5),
        TimeseriesPoint::new("2016-07-02", 4.25),
    ];

    println!("Formats");
    println!("=======");
    for format in TsFormat::ALL {
        println!();
        println!("  {format}");
        for line in format_timeseries(&sample, format, TsType::Numeric).lines() {
            println!("    {line}");
        }
    }

    println!();
    println!("Types");
    println!("=====");
    for ty in TsType::ALL {
        let example = format_timeseries(&sample[..1], TsFormat::Array, ty);
        println!("  {:<10} {example}", ty.as_str());
    }

    println!();
    println!("Strategies");
    println!("==========");
    for strategy in PromptType::ALL {
        let minimum = if strategy.uses_examples() {
            FEW_SHOT_MIN_WINDOW
        } else {
            1
        };
        println!("  {:<10} window of at least {minimum} points", strategy.as_str());
    }

    Ok(())
}
