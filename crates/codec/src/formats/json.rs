//! JSON: `[{"Date": d, "Value": v}, …]`.
//!
//! Rendered by hand with `", "` / `": "` separators so NUMERIC values keep
//! their canonical spelling (`1e-05`, not `1e-5`). TEXTUAL values are JSON
//! strings.

use super::TimeseriesCodec;
use crate::value::{EncodedPoint, EncodedValue, RawPoint, render_value};
use serde_json::{Map, Value};
use tsprompt_core::{CodecError, TsFormat};

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

fn json_string(s: &str) -> String {
    Value::String(s.to_owned()).to_string()
}

fn json_number(v: f64) -> String {
    if v.is_nan() {
        "NaN".into()
    } else if v.is_infinite() {
        let name = if v > 0.0 { "Infinity" } else { "-Infinity" };
        name.into()
    } else {
        render_value(v)
    }
}

fn field_text(row: &Map<String, Value>, key: &str, index: usize) -> Result<String, CodecError> {
    match row.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(CodecError::parse(
            TsFormat::Json,
            format!("object {index}: {key:?} must be a string or number, found {other}"),
        )),
        None => Err(CodecError::parse(
            TsFormat::Json,
            format!("object {index}: missing {key:?}"),
        )),
    }
}

impl TimeseriesCodec for JsonCodec {
    fn format(&self) -> TsFormat {
        TsFormat::Json
    }

    fn render(&self, points: &[EncodedPoint<'_>]) -> String {
        let objects: Vec<String> = points
            .iter()
            .map(|p| {
                let value = match &p.value {
                    EncodedValue::Numeric(v) => json_number(*v),
                    EncodedValue::Textual(s) => json_string(s),
                };
                format!("{{\"Date\": {}, \"Value\": {}}}", json_string(p.timestamp), value)
            })
            .collect();
        format!("[{}]", objects.join(", "))
    }

    fn parse(&self, text: &str) -> Result<Vec<RawPoint>, CodecError> {
        let rows: Vec<Map<String, Value>> = serde_json::from_str(text.trim())
            .map_err(|e| CodecError::parse(TsFormat::Json, e.to_string()))?;

        rows.iter()
            .enumerate()
            .map(|(i, row)| {
                Ok(RawPoint::pair(
                    field_text(row, "Date", i)?,
                    field_text(row, "Value", i)?,
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::encode;
    use tsprompt_core::{TimeseriesPoint, TsType};

    fn window() -> Vec<TimeseriesPoint> {
        vec![
            TimeseriesPoint::new("2016-07-01", 1.0),
            TimeseriesPoint::new("2016-07-02", 0.00001),
        ]
    }

    #[test]
    fn renders_spaced_objects() {
        assert_eq!(
            JsonCodec.render(&encode(&window(), TsType::Numeric)),
            r#"[{"Date": "2016-07-01", "Value": 1.0}, {"Date": "2016-07-02", "Value": 1e-05}]"#
        );
    }

    #[test]
    fn textual_values_are_strings() {
        let text = JsonCodec.render(&encode(&window()[..1], TsType::Textual));
        assert_eq!(text, r#"[{"Date": "2016-07-01", "Value": "1 . 0"}]"#);
    }

    #[test]
    fn parses_numbers_and_strings() {
        let rows = JsonCodec
            .parse(r#"[{"Date": "d1", "Value": 1.5}, {"Date": "d2", "Value": "2 . 5"}]"#)
            .unwrap();
        assert_eq!(rows[0], RawPoint::pair("d1", "1.5"));
        assert_eq!(rows[1], RawPoint::pair("d2", "2 . 5"));
    }

    #[test]
    fn rejects_missing_keys() {
        let err = JsonCodec.parse(r#"[{"Date": "d1"}]"#).unwrap_err();
        assert!(err.to_string().contains("missing \"Value\""));
    }

    #[test]
    fn rejects_non_array_documents() {
        assert!(JsonCodec.parse(r#"{"Date": "d1", "Value": 1.0}"#).is_err());
        assert!(JsonCodec.parse("[1.0, 2.0]").is_err());
    }

    #[test]
    fn escapes_timestamps() {
        let w = vec![TimeseriesPoint::new("a\"b", 1.0)];
        let text = JsonCodec.render(&encode(&w, TsType::Numeric));
        assert_eq!(JsonCodec.parse(&text).unwrap()[0].timestamp.as_deref(), Some("a\"b"));
    }
}
