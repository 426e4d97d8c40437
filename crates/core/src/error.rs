//! Error types for the tsprompt domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum.

use crate::variants::{PromptType, TsFormat};
use thiserror::Error;

// --- Bounded context errors ---

/// Failures of the value encodings and the nine format codecs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    #[error("Unknown type: {0}")]
    UnknownType(String),

    #[error("{format} parse failed: {reason}")]
    Parse { format: TsFormat, reason: String },

    #[error("Malformed value: {token:?}")]
    MalformedValue { token: String },
}

impl CodecError {
    /// Shorthand for a [`CodecError::Parse`] raised by `format`'s parser.
    pub fn parse(format: TsFormat, reason: impl Into<String>) -> Self {
        Self::Parse {
            format,
            reason: reason.into(),
        }
    }
}

/// Failures while turning a window into a prompt.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PromptError {
    #[error("Unknown prompt type: {0}")]
    UnknownPromptType(String),

    #[error("{strategy} needs at least {required} points, window has {actual}")]
    InsufficientWindow {
        strategy: PromptType,
        required: usize,
        actual: usize,
    },

    #[error("Forecast horizon must be a positive integer, got {0}")]
    InvalidHorizon(i64),

    #[error("Template references unknown placeholder {{{0}}}")]
    UnknownPlaceholder(String),

    #[error("Template is malformed: {0}")]
    MalformedTemplate(String),
}

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}
