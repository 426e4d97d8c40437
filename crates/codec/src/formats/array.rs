//! ARRAY: `[v1, v2, …]`, values only.
//!
//! The parser also serves as the round-trip fallback, so it reads the array
//! spanning the first `[` to the last `]` and ignores prose around it.

use super::TimeseriesCodec;
use crate::value::{EncodedPoint, RawPoint};
use tsprompt_core::{CodecError, TsFormat};

#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayCodec;

impl TimeseriesCodec for ArrayCodec {
    fn format(&self) -> TsFormat {
        TsFormat::Array
    }

    fn render(&self, points: &[EncodedPoint<'_>]) -> String {
        let values: Vec<String> = points.iter().map(|p| p.value.to_string()).collect();
        format!("[{}]", values.join(", "))
    }

    fn parse(&self, text: &str) -> Result<Vec<RawPoint>, CodecError> {
        let open = text
            .find('[')
            .ok_or_else(|| CodecError::parse(TsFormat::Array, "no opening '['"))?;
        let close = text
            .rfind(']')
            .filter(|&close| close > open)
            .ok_or_else(|| CodecError::parse(TsFormat::Array, "no closing ']'"))?;

        let inner = text[open + 1..close].trim();
        if inner.is_empty() {
            return Ok(Vec::new());
        }
        Ok(inner.split(',').map(|token| RawPoint::bare(token.trim())).collect())
    }
}
