//! Format codec registry: one formatter/parser pair per [`TsFormat`].
//!
//! | Format   | Rendered as |
//! |----------|-------------|
//! | ARRAY    | `[v1, v2, …]` (timestamps dropped) |
//! | CUSTOM   | `Date\|Value` header, `d\|v` rows |
//! | TSV      | `Date<TAB>Value` header, `d<TAB>v` rows |
//! | PLAIN    | `Date: d, Value: v` lines |
//! | JSON     | `[{"Date": d, "Value": v}, …]` |
//! | MARKDOWN | `\|Date\|Value\|`, `\|---\|---\|`, `\|d\|v\|` rows |
//! | CONTEXT  | `Date,Value` header, `d,[v]` rows |
//! | SYMBOL   | `Date,Value,DirectionIndicator` header, `d,v,↑/↓/→` rows |
//! | CSV      | `Date,Value` header, `d,v` rows |
//!
//! Every parser accepts exactly what its formatter emits (modulo
//! surrounding whitespace and blank lines) and reports any structural
//! deviation as [`CodecError::Parse`].

mod array;
mod delimited;
mod json;
mod markdown;
mod plain;

pub use array::ArrayCodec;
pub use delimited::{DelimitedCodec, Direction};
pub use json::JsonCodec;
pub use markdown::MarkdownCodec;
pub use plain::PlainCodec;

use crate::value::{EncodedPoint, RawPoint};
use tsprompt_core::{CodecError, TsFormat};

/// A formatter/parser pair for one textual shape of a window.
pub trait TimeseriesCodec: Send + Sync {
    /// The format this codec implements.
    fn format(&self) -> TsFormat;

    /// Render encoded points as text.
    fn render(&self, points: &[EncodedPoint<'_>]) -> String;

    /// Recover the rows laid down by [`render`](Self::render).
    fn parse(&self, text: &str) -> Result<Vec<RawPoint>, CodecError>;
}

/// Look up the codec for a format.
pub fn codec(format: TsFormat) -> &'static dyn TimeseriesCodec {
    match format {
        TsFormat::Array => &ArrayCodec,
        TsFormat::Custom => &delimited::CUSTOM,
        TsFormat::Tsv => &delimited::TSV,
        TsFormat::Plain => &PlainCodec,
        TsFormat::Json => &JsonCodec,
        TsFormat::Markdown => &MarkdownCodec,
        TsFormat::Context => &delimited::CONTEXT,
        TsFormat::Symbol => &delimited::SYMBOL,
        TsFormat::Csv => &delimited::CSV,
    }
}

/// Non-blank lines, trimmed.
fn content_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|line| !line.is_empty())
}

/// Non-blank lines with only a trailing `\r` removed.
///
/// Leading whitespace may be a delimiter (TSV rows with an empty timestamp),
/// so callers split first and trim fields afterwards.
fn raw_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
}
