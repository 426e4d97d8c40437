//! Value encoding: how a single reading is spelled inside a format.
//!
//! NUMERIC keeps the number; TEXTUAL spells its canonical rendering one
//! character at a time (`-12.5` → `- 1 2 . 5`), which changes how a model
//! tokenizes the series.

use std::fmt;
use tsprompt_core::{CodecError, TimeseriesPoint, TsType};

/// Render a reading in canonical decimal form.
///
/// Shortest round-tripping digits, always with a fractional part
/// (`1.0`, `3.662`), switching to scientific notation with a signed,
/// two-digit exponent outside `1e-4 ..< 1e16` (`1e-05`, `1.5e+16`).
pub fn render_value(value: f64) -> String {
    if value.is_nan() {
        return "nan".into();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.into();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0.0" } else { "0.0" }.into();
    }

    let scientific = format!("{value:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return value.to_string();
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return value.to_string();
    };

    if (-4..16).contains(&exponent) {
        let plain = value.to_string();
        if plain.contains('.') {
            plain
        } else {
            format!("{plain}.0")
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.abs())
    }
}

/// Insert a single space between every character.
pub fn spell_out(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    for (i, ch) in text.chars().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

/// A reading after value encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum EncodedValue {
    Numeric(f64),
    Textual(String),
}

impl EncodedValue {
    pub fn encode(value: f64, ty: TsType) -> Self {
        match ty {
            TsType::Numeric => EncodedValue::Numeric(value),
            TsType::Textual => EncodedValue::Textual(spell_out(&render_value(value))),
        }
    }
}

impl fmt::Display for EncodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodedValue::Numeric(v) => f.write_str(&render_value(*v)),
            EncodedValue::Textual(s) => f.write_str(s),
        }
    }
}

/// A point ready for a formatter.
///
/// `reading` keeps the source number so derived columns (SYMBOL's direction)
/// compare values numerically whatever the encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedPoint<'a> {
    pub timestamp: &'a str,
    pub reading: f64,
    pub value: EncodedValue,
}

/// Encode every point of a window.
pub fn encode(points: &[TimeseriesPoint], ty: TsType) -> Vec<EncodedPoint<'_>> {
    points
        .iter()
        .map(|p| EncodedPoint {
            timestamp: &p.timestamp,
            reading: p.value,
            value: EncodedValue::encode(p.value, ty),
        })
        .collect()
}

/// A row recovered by a parser, before decoding.
///
/// ARRAY carries no timestamps; every other format yields
/// `(timestamp, value)` pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPoint {
    pub timestamp: Option<String>,
    pub value: String,
}

impl RawPoint {
    pub fn bare(value: impl Into<String>) -> Self {
        Self {
            timestamp: None,
            value: value.into(),
        }
    }

    pub fn pair(timestamp: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            timestamp: Some(timestamp.into()),
            value: value.into(),
        }
    }
}

/// Decode one value token.
pub fn decode_token(token: &str, ty: TsType) -> Result<f64, CodecError> {
    let malformed = || CodecError::MalformedValue {
        token: token.to_string(),
    };
    match ty {
        TsType::Numeric => token.trim().parse::<f64>().map_err(|_| malformed()),
        TsType::Textual => {
            let joined: String = token.chars().filter(|c| !c.is_whitespace()).collect();
            joined.parse::<f64>().map_err(|_| malformed())
        }
    }
}

/// Decode parsed rows into numbers, ignoring any timestamps.
pub fn decode(rows: &[RawPoint], ty: TsType) -> Result<Vec<f64>, CodecError> {
    rows.iter().map(|row| decode_token(&row.value, ty)).collect()
}
