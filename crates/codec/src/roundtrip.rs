//! Round-trip orchestrator: value encoding composed with a format codec.
//!
//! Formatting never fails and never falls back. Parsing a model reply falls
//! back exactly once: when the declared format or type does not fit the
//! text, the same text is retried as an ARRAY of NUMERIC values.

use crate::formats::codec;
use crate::value::{decode, encode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use tsprompt_core::{CodecError, TimeseriesPoint, TsFormat, TsType};

/// A format/type pair bound together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesCodec {
    pub format: TsFormat,
    #[serde(rename = "type")]
    pub ty: TsType,
}

/// Numbers recovered from a reply, and whether the fallback produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedSeries {
    pub values: Vec<f64>,
    pub used_fallback: bool,
}

impl SeriesCodec {
    /// The pair every failed parse is retried with.
    pub const FALLBACK: SeriesCodec = SeriesCodec {
        format: TsFormat::Array,
        ty: TsType::Numeric,
    };

    pub fn new(format: TsFormat, ty: TsType) -> Self {
        Self { format, ty }
    }

    /// Resolve a pair from names such as `("CSV", "NUMERIC")`.
    pub fn from_names(format: &str, ty: &str) -> Result<Self, CodecError> {
        Ok(Self::new(format.parse()?, ty.parse()?))
    }

    /// Render a window.
    pub fn format(&self, window: &[TimeseriesPoint]) -> String {
        debug!(format = %self.format, ty = %self.ty, points = window.len(), "Formatting window");
        codec(self.format).render(&encode(window, self.ty))
    }

    /// Parse text with exactly this format and type; no fallback.
    pub fn parse_strict(&self, text: &str) -> Result<Vec<f64>, CodecError> {
        let rows = codec(self.format).parse(text)?;
        decode(&rows, self.ty)
    }

    /// Parse text, retrying once as ARRAY/NUMERIC if the declared pair fails.
    pub fn parse_detailed(&self, text: &str) -> Result<ParsedSeries, CodecError> {
        match self.parse_strict(text) {
            Ok(values) => Ok(ParsedSeries {
                values,
                used_fallback: false,
            }),
            Err(err) => {
                warn!(
                    format = %self.format,
                    ty = %self.ty,
                    error = %err,
                    "Reply did not parse as declared, retrying as ARRAY/NUMERIC"
                );
                let values = Self::FALLBACK.parse_strict(text)?;
                Ok(ParsedSeries {
                    values,
                    used_fallback: true,
                })
            }
        }
    }

    /// Parse text with the fallback policy, returning only the numbers.
    pub fn parse(&self, text: &str) -> Result<Vec<f64>, CodecError> {
        self.parse_detailed(text).map(|parsed| parsed.values)
    }
}

/// Render `window` in `format`, spelling values per `ty`.
pub fn format_timeseries(window: &[TimeseriesPoint], format: TsFormat, ty: TsType) -> String {
    SeriesCodec::new(format, ty).format(window)
}

/// Parse a reply laid down in `format`/`ty`, with the ARRAY/NUMERIC fallback.
pub fn parse_timeseries(text: &str, format: TsFormat, ty: TsType) -> Result<Vec<f64>, CodecError> {
    SeriesCodec::new(format, ty).parse(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn july(values: &[f64]) -> Vec<TimeseriesPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| TimeseriesPoint::new(format!("2016-07-{:02}", i + 1), v))
            .collect()
    }

    /// Distinct readings with three decimals, like the dataset loader emits.
    fn sample_window(len: usize) -> Vec<TimeseriesPoint> {
        (0..len)
            .map(|i| {
                let raw = (i as f64 * 7.319).sin() * 250.0 + i as f64 * 0.5 - 40.0;
                let value = (raw * 1000.0).round() / 1000.0;
                TimeseriesPoint::new(format!("2017-01-01 {:02}:{:02}", i / 60, i % 60), value)
            })
            .collect()
    }

    #[test]
    fn csv_end_to_end() {
        let window = july(&[1.0, 2.0, 3.0]);
        let text = format_timeseries(&window, TsFormat::Csv, TsType::Numeric);
        assert_eq!(
            text,
            "Date,Value\n2016-07-01,1.0\n2016-07-02,2.0\n2016-07-03,3.0"
        );
        assert_eq!(
            parse_timeseries(&text, TsFormat::Csv, TsType::Numeric).unwrap(),
            vec![1.0, 2.0, 3.0]
        );
    }

    #[test]
    fn round_trip_holds_for_every_pair() {
        for len in [1, 2, 24, 97, 200] {
            let window = sample_window(len);
            let expected: Vec<f64> = window.iter().map(|p| p.value).collect();
            for format in TsFormat::ALL {
                for ty in TsType::ALL {
                    let codec = SeriesCodec::new(format, ty);
                    let parsed = codec.parse_detailed(&codec.format(&window)).unwrap();
                    assert_eq!(parsed.values, expected, "{format}/{ty} with {len} points");
                    assert!(!parsed.used_fallback, "{format}/{ty} needed the fallback");
                }
            }
        }
    }

    #[test]
    fn round_trip_preserves_extreme_magnitudes() {
        let window = july(&[1e-5, 1.5e16, -0.0001, 123456789.125]);
        for format in TsFormat::ALL {
            for ty in TsType::ALL {
                let text = format_timeseries(&window, format, ty);
                assert_eq!(
                    parse_timeseries(&text, format, ty).unwrap(),
                    vec![1e-5, 1.5e16, -0.0001, 123456789.125],
                    "{format}/{ty}"
                );
            }
        }
    }

    #[test]
    fn round_trip_ignores_timestamp_content() {
        let window = vec![
            TimeseriesPoint::new("", 1.0),
            TimeseriesPoint::new(" 2016-07-02", 2.0),
            TimeseriesPoint::new("", 3.5),
        ];
        for format in TsFormat::ALL {
            for ty in TsType::ALL {
                let codec = SeriesCodec::new(format, ty);
                assert_eq!(
                    codec.parse_strict(&codec.format(&window)).unwrap(),
                    vec![1.0, 2.0, 3.5],
                    "{format}/{ty}"
                );
            }
        }
    }

    #[test]
    fn plain_reply_with_preamble_parses_as_declared() {
        let parsed = SeriesCodec::new(TsFormat::Plain, TsType::Numeric)
            .parse_detailed("Here is the forecast:\nDate: d1, Value: 1.0\nDate: d2, Value: 2.0")
            .unwrap();
        assert_eq!(parsed.values, vec![1.0, 2.0]);
        assert!(!parsed.used_fallback);
    }

    #[test]
    fn fallback_reads_arrays_declared_as_csv() {
        let parsed = SeriesCodec::new(TsFormat::Csv, TsType::Numeric)
            .parse_detailed("[1.0, 2.0, 3.0]")
            .unwrap();
        assert_eq!(parsed.values, vec![1.0, 2.0, 3.0]);
        assert!(parsed.used_fallback);
    }

    #[test]
    fn fallback_applies_to_every_pair() {
        for format in TsFormat::ALL {
            for ty in TsType::ALL {
                assert_eq!(
                    parse_timeseries("Forecast: [4.0, 5.5]", format, ty).unwrap(),
                    vec![4.0, 5.5],
                    "{format}/{ty}"
                );
            }
        }
    }

    #[test]
    fn fallback_decodes_numerically_even_for_textual() {
        // Spelled tokens fail TEXTUAL CSV (no header) and NUMERIC ARRAY alike.
        let err = parse_timeseries("[1 . 5, 2 . 5]", TsFormat::Csv, TsType::Textual).unwrap_err();
        assert!(matches!(err, CodecError::MalformedValue { .. }));
    }

    #[test]
    fn fallback_error_is_surfaced() {
        let err = parse_timeseries("no numbers here", TsFormat::Json, TsType::Numeric).unwrap_err();
        assert_eq!(err, CodecError::parse(TsFormat::Array, "no opening '['"));
    }

    #[test]
    fn malformed_value_triggers_fallback() {
        // Structurally valid CSV with a non-numeric value falls through to ARRAY, which fails too.
        let err = parse_timeseries("Date,Value\nd1,high", TsFormat::Csv, TsType::Numeric).unwrap_err();
        assert!(matches!(err, CodecError::Parse { format: TsFormat::Array, .. }));
    }

    #[test]
    fn strict_parse_does_not_fall_back() {
        let codec = SeriesCodec::new(TsFormat::Csv, TsType::Numeric);
        assert!(codec.parse_strict("[1.0]").is_err());
    }

    #[test]
    fn textual_idempotence() {
        let window = july(&[3.662]);
        let text = format_timeseries(&window, TsFormat::Array, TsType::Textual);
        assert_eq!(text, "[3 . 6 6 2]");
        assert_eq!(
            parse_timeseries(&text, TsFormat::Array, TsType::Textual).unwrap(),
            vec![3.662]
        );
    }

    #[test]
    fn pairs_resolve_from_names() {
        let codec = SeriesCodec::from_names("markdown", "TEXTUAL").unwrap();
        assert_eq!(codec, SeriesCodec::new(TsFormat::Markdown, TsType::Textual));
        assert_eq!(
            SeriesCodec::from_names("XML", "NUMERIC").unwrap_err(),
            CodecError::UnknownFormat("XML".into())
        );
        assert_eq!(
            SeriesCodec::from_names("CSV", "ROMAN").unwrap_err(),
            CodecError::UnknownType("ROMAN".into())
        );
    }

    #[test]
    fn series_codec_serializes_type_field() {
        let json = serde_json::to_string(&SeriesCodec::new(TsFormat::Symbol, TsType::Textual)).unwrap();
        assert_eq!(json, r#"{"format":"SYMBOL","type":"TEXTUAL"}"#);
    }
}
