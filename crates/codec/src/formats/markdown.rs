//! MARKDOWN: a two-column pipe table.

use super::{TimeseriesCodec, content_lines};
use crate::value::{EncodedPoint, RawPoint};
use tsprompt_core::{CodecError, TsFormat};

const HEADER: &str = "|Date|Value|\n|---|---|\n";

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownCodec;

fn error(reason: impl Into<String>) -> CodecError {
    CodecError::parse(TsFormat::Markdown, reason)
}

/// Cells of a `|a|b|` row, trimmed. `None` when the row is not pipe-fenced.
fn cells(line: &str) -> Option<Vec<&str>> {
    let inner = line.strip_prefix('|')?.strip_suffix('|')?;
    Some(inner.split('|').map(str::trim).collect())
}

fn is_separator_cell(cell: &str) -> bool {
    cell.contains('-') && cell.chars().all(|c| c == '-' || c == ':')
}

impl TimeseriesCodec for MarkdownCodec {
    fn format(&self) -> TsFormat {
        TsFormat::Markdown
    }

    fn render(&self, points: &[EncodedPoint<'_>]) -> String {
        let rows: Vec<String> = points
            .iter()
            .map(|p| format!("|{}|{}|", p.timestamp, p.value))
            .collect();
        format!("{HEADER}{}", rows.join("\n"))
    }

    fn parse(&self, text: &str) -> Result<Vec<RawPoint>, CodecError> {
        let mut lines = content_lines(text);

        let header = lines.next().ok_or_else(|| error("input is empty"))?;
        if cells(header).as_deref() != Some(&["Date", "Value"][..]) {
            return Err(error(format!("expected |Date|Value| header, found {header:?}")));
        }

        let separator = lines
            .next()
            .ok_or_else(|| error("missing |---|---| separator row"))?;
        match cells(separator) {
            Some(c) if c.len() == 2 && c.iter().all(|cell| is_separator_cell(cell)) => {}
            _ => {
                return Err(error(format!(
                    "expected |---|---| separator, found {separator:?}"
                )));
            }
        }

        lines
            .enumerate()
            .map(|(n, line)| match cells(line).as_deref() {
                Some([date, value]) => Ok(RawPoint::pair(*date, *value)),
                Some(other) => Err(error(format!(
                    "row {}: expected 2 cells, found {}",
                    n + 1,
                    other.len()
                ))),
                None => Err(error(format!("row {}: {line:?} is not a table row", n + 1))),
            })
            .collect()
    }
}
