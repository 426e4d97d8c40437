//! # tsprompt Core
//!
//! Domain types, traits, and error definitions for the tsprompt forecasting
//! benchmark. This crate has **no I/O**; it defines the domain model the
//! codec, prompt, data and provider crates implement against.
//!
//! - [`TimeseriesPoint`]: a timestamped reading
//! - [`TsFormat`], [`TsType`], [`PromptType`]: the closed variant sets
//! - [`Provider`]: the seam to model backends
//! - [`CodecError`], [`PromptError`], [`ProviderError`]: one error enum per context

pub mod error;
pub mod provider;
pub mod series;
pub mod variants;

// Re-export key types at crate root for ergonomics
pub use error::{CodecError, PromptError, ProviderError};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage, strip_reasoning};
pub use series::{TimeseriesPoint, TimeseriesWindow};
pub use variants::{PromptType, TsFormat, TsType};
