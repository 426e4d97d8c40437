//! Prompt assembly for tsprompt.
//!
//! A [`PromptAssembler`] takes a window of readings, a forecast horizon and a
//! strategy, renders the sub-windows that strategy needs through the codec,
//! and fills the strategy's template.

pub mod assembler;
pub mod template;

pub use assembler::{
    AssembledPrompt, EXAMPLE_LEN, FEW_SHOT_MIN_WINDOW, ForecastTask, OUTPUT_EXAMPLE_LEN,
    PromptAssembler, START_FORECAST_LEN, validate_horizon,
};
pub use template::{PromptFields, PromptTemplate};
