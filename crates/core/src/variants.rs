//! The closed variant sets: serialization format, value type and prompting
//! strategy.
//!
//! Each enum round-trips through its upper-case name (`"CSV"`, `"TEXTUAL"`,
//! `"FEW_SHOT"`) for serde, `Display` and `FromStr`. Parsing accepts any
//! ASCII case.

use crate::error::{CodecError, PromptError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Textual shape a window is serialized into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TsFormat {
    #[default]
    Array,
    Custom,
    Tsv,
    Plain,
    Json,
    Markdown,
    Context,
    Symbol,
    Csv,
}

impl TsFormat {
    pub const ALL: [TsFormat; 9] = [
        TsFormat::Array,
        TsFormat::Custom,
        TsFormat::Tsv,
        TsFormat::Plain,
        TsFormat::Json,
        TsFormat::Markdown,
        TsFormat::Context,
        TsFormat::Symbol,
        TsFormat::Csv,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TsFormat::Array => "ARRAY",
            TsFormat::Custom => "CUSTOM",
            TsFormat::Tsv => "TSV",
            TsFormat::Plain => "PLAIN",
            TsFormat::Json => "JSON",
            TsFormat::Markdown => "MARKDOWN",
            TsFormat::Context => "CONTEXT",
            TsFormat::Symbol => "SYMBOL",
            TsFormat::Csv => "CSV",
        }
    }
}

impl fmt::Display for TsFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TsFormat {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| CodecError::UnknownFormat(s.to_string()))
    }
}

/// How each reading is spelled inside a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TsType {
    /// The number as written (`3.662`).
    #[default]
    Numeric,
    /// One space between every character (`3 . 6 6 2`).
    Textual,
}

impl TsType {
    pub const ALL: [TsType; 2] = [TsType::Numeric, TsType::Textual];

    pub fn as_str(&self) -> &'static str {
        match self {
            TsType::Numeric => "NUMERIC",
            TsType::Textual => "TEXTUAL",
        }
    }
}

impl fmt::Display for TsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TsType {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| CodecError::UnknownType(s.to_string()))
    }
}

/// Prompting strategy; selects the template and the sub-windows it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromptType {
    #[default]
    ZeroShot,
    FewShot,
    Cot,
    CotFew,
}

impl PromptType {
    pub const ALL: [PromptType; 4] = [
        PromptType::ZeroShot,
        PromptType::FewShot,
        PromptType::Cot,
        PromptType::CotFew,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PromptType::ZeroShot => "ZERO_SHOT",
            PromptType::FewShot => "FEW_SHOT",
            PromptType::Cot => "COT",
            PromptType::CotFew => "COT_FEW",
        }
    }

    /// Whether the strategy embeds the four 24-point worked examples.
    pub fn uses_examples(&self) -> bool {
        matches!(self, PromptType::FewShot | PromptType::CotFew)
    }
}

impl fmt::Display for PromptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromptType {
    type Err = PromptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(&name))
            .ok_or_else(|| PromptError::UnknownPromptType(s.to_string()))
    }
}
