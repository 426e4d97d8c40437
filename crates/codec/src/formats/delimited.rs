//! Header-plus-rows formats: CUSTOM, TSV, CSV, CONTEXT and SYMBOL.
//!
//! All five share one grammar: a fixed header line followed by one
//! delimited row per point. They differ in the delimiter, in whether the
//! value is bracketed and in whether a direction column is appended.

use super::{TimeseriesCodec, raw_lines};
use crate::value::{EncodedPoint, RawPoint};
use tsprompt_core::{CodecError, TsFormat};

/// How a row lays out its value column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// `d<delim>v`
    Plain,
    /// `d<delim>[v]`
    Bracketed,
    /// `d<delim>v<delim>s` where `s` is the direction from the previous point
    WithDirection,
}

/// Movement of a reading relative to the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Flat,
}

impl Direction {
    /// Direction of `current` relative to `previous`; the first point is flat.
    pub fn between(previous: Option<f64>, current: f64) -> Self {
        match previous {
            Some(prev) if current > prev => Direction::Up,
            Some(prev) if current < prev => Direction::Down,
            _ => Direction::Flat,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Direction::Up => '↑',
            Direction::Down => '↓',
            Direction::Flat => '→',
        }
    }

    /// Directions for a whole sequence of readings.
    pub fn sequence(readings: &[f64]) -> Vec<Direction> {
        readings
            .iter()
            .enumerate()
            .map(|(i, &v)| Direction::between(i.checked_sub(1).map(|j| readings[j]), v))
            .collect()
    }
}

/// A single-delimiter table codec.
#[derive(Debug)]
pub struct DelimitedCodec {
    format: TsFormat,
    delimiter: char,
    layout: Layout,
}

pub(super) static CUSTOM: DelimitedCodec = DelimitedCodec::new(TsFormat::Custom, '|', Layout::Plain);
pub(super) static TSV: DelimitedCodec = DelimitedCodec::new(TsFormat::Tsv, '\t', Layout::Plain);
pub(super) static CSV: DelimitedCodec = DelimitedCodec::new(TsFormat::Csv, ',', Layout::Plain);
pub(super) static CONTEXT: DelimitedCodec =
    DelimitedCodec::new(TsFormat::Context, ',', Layout::Bracketed);
pub(super) static SYMBOL: DelimitedCodec =
    DelimitedCodec::new(TsFormat::Symbol, ',', Layout::WithDirection);

impl DelimitedCodec {
    const fn new(format: TsFormat, delimiter: char, layout: Layout) -> Self {
        Self {
            format,
            delimiter,
            layout,
        }
    }

    fn header(&self) -> String {
        let d = self.delimiter;
        match self.layout {
            Layout::Plain | Layout::Bracketed => format!("Date{d}Value"),
            Layout::WithDirection => format!("Date{d}Value{d}DirectionIndicator"),
        }
    }

    fn columns(&self) -> usize {
        match self.layout {
            Layout::Plain | Layout::Bracketed => 2,
            Layout::WithDirection => 3,
        }
    }

    fn error(&self, reason: impl Into<String>) -> CodecError {
        CodecError::parse(self.format, reason)
    }
}

impl TimeseriesCodec for DelimitedCodec {
    fn format(&self) -> TsFormat {
        self.format
    }

    fn render(&self, points: &[EncodedPoint<'_>]) -> String {
        let d = self.delimiter;
        let rows: Vec<String> = points
            .iter()
            .enumerate()
            .map(|(i, p)| match self.layout {
                Layout::Plain => format!("{}{d}{}", p.timestamp, p.value),
                Layout::Bracketed => format!("{}{d}[{}]", p.timestamp, p.value),
                Layout::WithDirection => {
                    let previous = i.checked_sub(1).map(|j| points[j].reading);
                    let direction = Direction::between(previous, p.reading);
                    format!("{}{d}{}{d}{}", p.timestamp, p.value, direction.symbol())
                }
            })
            .collect();

        let mut out = self.header();
        out.push('\n');
        out.push_str(&rows.join("\n"));
        out
    }

    fn parse(&self, text: &str) -> Result<Vec<RawPoint>, CodecError> {
        let mut lines = raw_lines(text);
        let expected = self.header();
        let header = lines
            .next()
            .ok_or_else(|| self.error("input is empty"))?
            .trim();
        if header != expected {
            return Err(self.error(format!(
                "expected header {expected:?}, found {header:?}"
            )));
        }

        let mut rows = Vec::new();
        for (n, line) in lines.enumerate() {
            let fields: Vec<&str> = line.split(self.delimiter).collect();
            if fields.len() != self.columns() {
                return Err(self.error(format!(
                    "row {}: expected {} columns, found {}",
                    n + 1,
                    self.columns(),
                    fields.len()
                )));
            }

            let value = fields[1].trim();
            let value = match self.layout {
                Layout::Bracketed => value
                    .strip_prefix('[')
                    .and_then(|v| v.strip_suffix(']'))
                    .ok_or_else(|| {
                        self.error(format!("row {}: value {value:?} is not bracketed", n + 1))
                    })?
                    .trim(),
                Layout::Plain | Layout::WithDirection => value,
            };

            rows.push(RawPoint::pair(fields[0].trim(), value));
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::encode;
    use tsprompt_core::{TimeseriesPoint, TsType};

    fn window(values: &[f64]) -> Vec<TimeseriesPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| TimeseriesPoint::new(format!("2016-07-{:02}", i + 1), v))
            .collect()
    }

    #[test]
    fn csv_renders_header_and_rows() {
        let w = window(&[1.0, 2.0, 3.0]);
        assert_eq!(
            CSV.render(&encode(&w, TsType::Numeric)),
            "Date,Value\n2016-07-01,1.0\n2016-07-02,2.0\n2016-07-03,3.0"
        );
    }

    #[test]
    fn custom_and_tsv_use_their_delimiters() {
        let w = window(&[4.5]);
        let encoded = encode(&w, TsType::Numeric);
        assert_eq!(CUSTOM.render(&encoded), "Date|Value\n2016-07-01|4.5");
        assert_eq!(TSV.render(&encoded), "Date\tValue\n2016-07-01\t4.5");
    }

    #[test]
    fn context_brackets_values() {
        let w = window(&[3.662]);
        assert_eq!(
            CONTEXT.render(&encode(&w, TsType::Textual)),
            "Date,Value\n2016-07-01,[3 . 6 6 2]"
        );
    }

    #[test]
    fn symbol_marks_direction() {
        let w = window(&[10.0, 10.0, 5.0, 8.0]);
        let text = SYMBOL.render(&encode(&w, TsType::Numeric));
        let symbols: Vec<char> = text
            .lines()
            .skip(1)
            .map(|l| l.chars().last().unwrap())
            .collect();
        assert_eq!(symbols, vec!['→', '→', '↓', '↑']);
        assert!(text.starts_with("Date,Value,DirectionIndicator\n"));
    }

    #[test]
    fn symbol_compares_readings_not_spelled_text() {
        // "1 0 . 0" sorts before "9 . 0" as text; numerically 10 > 9.
        let w = window(&[9.0, 10.0]);
        let text = SYMBOL.render(&encode(&w, TsType::Textual));
        assert!(text.ends_with("1 0 . 0,↑"));
    }

    #[test]
    fn direction_sequence_starts_flat() {
        assert_eq!(
            Direction::sequence(&[10.0, 10.0, 5.0, 8.0]),
            vec![Direction::Flat, Direction::Flat, Direction::Down, Direction::Up]
        );
    }

    #[test]
    fn parse_recovers_pairs() {
        let rows = CSV
            .parse("Date,Value\r\n2016-07-01,1.0\r\n\r\n2016-07-02,2.0\r\n")
            .unwrap();
        assert_eq!(
            rows,
            vec![
                RawPoint::pair("2016-07-01", "1.0"),
                RawPoint::pair("2016-07-02", "2.0")
            ]
        );
    }

    #[test]
    fn symbol_parse_ignores_indicator() {
        let rows = SYMBOL
            .parse("Date,Value,DirectionIndicator\nd1,1.0,↑\nd2,0.5,↑")
            .unwrap();
        assert_eq!(rows[1], RawPoint::pair("d2", "0.5"));
    }

    #[test]
    fn missing_header_is_rejected() {
        let err = CSV.parse("2016-07-01,1.0").unwrap_err();
        assert!(matches!(err, CodecError::Parse { format: TsFormat::Csv, .. }));
    }

    #[test]
    fn wrong_column_count_is_rejected() {
        let err = CSV.parse("Date,Value\n2016-07-01,1.0,extra").unwrap_err();
        assert!(err.to_string().contains("expected 2 columns, found 3"));
        assert!(SYMBOL.parse("Date,Value,DirectionIndicator\nd,1.0").is_err());
    }

    #[test]
    fn wrong_delimiter_is_rejected() {
        assert!(CUSTOM.parse("Date|Value\n2016-07-01,1.0").is_err());
        assert!(TSV.parse("Date,Value\n2016-07-01,1.0").is_err());
    }

    #[test]
    fn context_requires_brackets() {
        assert!(CONTEXT.parse("Date,Value\nd,1.0").is_err());
        let rows = CONTEXT.parse("Date,Value\nd,[1.0]").unwrap();
        assert_eq!(rows[0].value, "1.0");
    }

    #[test]
    fn empty_window_renders_header_only() {
        assert_eq!(CSV.render(&[]), "Date,Value\n");
        assert!(CSV.parse("Date,Value\n").unwrap().is_empty());
    }

    #[test]
    fn blank_and_indented_timestamps_round_trip() {
        let w = vec![
            TimeseriesPoint::new("", 1.0),
            TimeseriesPoint::new("  2016-07-02", 2.0),
            TimeseriesPoint::new("", 0.5),
        ];
        for codec in [&CUSTOM, &TSV, &CSV, &CONTEXT, &SYMBOL] {
            let text = codec.render(&encode(&w, TsType::Numeric));
            let rows = codec.parse(&text).unwrap();
            let values: Vec<&str> = rows.iter().map(|r| r.value.as_str()).collect();
            assert_eq!(values, vec!["1.0", "2.0", "0.5"], "{:?}", codec.format);
            assert_eq!(rows[0].timestamp.as_deref(), Some(""));
        }
    }

    #[test]
    fn tsv_row_with_empty_timestamp_keeps_its_delimiter() {
        let rows = TSV.parse("Date\tValue\n\t1.0\n\t2.0").unwrap();
        assert_eq!(rows, vec![RawPoint::pair("", "1.0"), RawPoint::pair("", "2.0")]);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(CSV.parse("   \n").is_err());
    }
}
