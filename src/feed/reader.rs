// Feed table reader

use crate::error::{FeedError, FeedResult};
use crate::types::{Event, EventKind, Side};
use std::io::{BufRead, Lines};

/// Parses feed rows from any buffered source.
///
/// The header is optional: a first line that does not start with `ts_ns,` is
/// parsed as data. Blank lines are skipped and extra trailing columns ignored.
pub struct FeedReader<R: BufRead> {
    lines: Lines<R>,
    line_no: usize,
}

impl<R: BufRead> FeedReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            lines: source.lines(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for FeedReader<R> {
    type Item = FeedResult<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(FeedError::FileRead(e.to_string()))),
            };
            self.line_no += 1;

            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            if self.line_no == 1 && line.starts_with("ts_ns,") {
                continue;
            }
            return Some(parse_row(line, self.line_no));
        }
    }
}

/// Parse a single data row. `line_no` is only used for error reporting.
pub fn parse_row(line: &str, line_no: usize) -> FeedResult<Event> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < 6 {
        return Err(FeedError::MalformedRow(
            line_no,
            format!("expected 6 columns, found {}", fields.len()),
        ));
    }

    let timestamp = parse_field::<u64>(fields[0], "ts_ns", line_no)?;
    let kind = EventKind::from_code(fields[1]).ok_or_else(|| {
        FeedError::MalformedRow(line_no, format!("unknown event type '{}'", fields[1]))
    })?;
    let order_id = parse_field::<u64>(fields[2], "order_id", line_no)?;
    let side_code = parse_field::<u8>(fields[3], "side", line_no)?;
    let side = Side::from_code(side_code).ok_or_else(|| {
        FeedError::MalformedRow(line_no, format!("side must be 0 or 1, got {}", side_code))
    })?;
    let price = parse_field::<i64>(fields[4], "px", line_no)?;
    let quantity = parse_field::<i64>(fields[5], "qty", line_no)?;

    Ok(Event { timestamp, kind, order_id, side, price, quantity })
}

fn parse_field<T: std::str::FromStr>(raw: &str, column: &str, line_no: usize) -> FeedResult<T> {
    raw.parse::<T>().map_err(|_| {
        FeedError::MalformedRow(line_no, format!("invalid {} value '{}'", column, raw))
    })
}
