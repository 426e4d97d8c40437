//! PLAIN: one `Date: d, Value: v` line per point, no header.

use super::{TimeseriesCodec, content_lines};
use crate::value::{EncodedPoint, RawPoint};
use regex_lite::Regex;
use std::sync::LazyLock;
use tsprompt_core::{CodecError, TsFormat};

static LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Date:\s*([^,]+),\s*Value:\s*(.*)$").expect("PLAIN line pattern is valid")
});

#[derive(Debug, Clone, Copy, Default)]
pub struct PlainCodec;

impl TimeseriesCodec for PlainCodec {
    fn format(&self) -> TsFormat {
        TsFormat::Plain
    }

    fn render(&self, points: &[EncodedPoint<'_>]) -> String {
        points
            .iter()
            .map(|p| format!("Date: {}, Value: {}", p.timestamp, p.value))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Lines that are not `Date: d, Value: v` are skipped, so a reply may
    /// carry prose around its rows. Text with content but no rows fails.
    fn parse(&self, text: &str) -> Result<Vec<RawPoint>, CodecError> {
        let mut skipped = 0;
        let mut rows = Vec::new();
        for line in content_lines(text) {
            match LINE.captures(line) {
                Some(caps) => rows.push(RawPoint::pair(caps[1].trim(), caps[2].trim())),
                None => skipped += 1,
            }
        }
        if rows.is_empty() && skipped > 0 {
            return Err(CodecError::parse(
                TsFormat::Plain,
                format!("none of {skipped} lines is `Date: d, Value: v`"),
            ));
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::encode;
    use tsprompt_core::{TimeseriesPoint, TsType};

    #[test]
    fn renders_one_line_per_point() {
        let w = vec![
            TimeseriesPoint::new("2016-07-01", 1.0),
            TimeseriesPoint::new("2016-07-02", -2.0),
        ];
        assert_eq!(
            PlainCodec.render(&encode(&w, TsType::Numeric)),
            "Date: 2016-07-01, Value: 1.0\nDate: 2016-07-02, Value: -2.0"
        );
    }

    #[test]
    fn parses_textual_values() {
        let rows = PlainCodec
            .parse("Date: 2016-07-01 00:00:00, Value: - 1 . 5  \n")
            .unwrap();
        assert_eq!(rows, vec![RawPoint::pair("2016-07-01 00:00:00", "- 1 . 5")]);
    }

    #[test]
    fn skips_prose_around_rows() {
        let rows = PlainCodec
            .parse("Here is the forecast:\nDate: d1, Value: 1.0\nDate: d2, Value: 2.0\nThe trend continues upward.")
            .unwrap();
        assert_eq!(
            rows,
            vec![RawPoint::pair("d1", "1.0"), RawPoint::pair("d2", "2.0")]
        );
    }

    #[test]
    fn rejects_text_without_rows() {
        let err = PlainCodec.parse("I cannot forecast this.\nSorry.").unwrap_err();
        assert!(err.to_string().contains("none of 2 lines"));
    }

    #[test]
    fn empty_text_is_an_empty_window() {
        assert!(PlainCodec.parse("").unwrap().is_empty());
    }
}
