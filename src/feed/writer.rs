// Feed table writer

use crate::error::{FeedError, FeedResult};
use crate::types::Event;
use std::io::Write;

/// Column header of the feed table
pub const FEED_HEADER: &str = "ts_ns,type,order_id,side,px,qty";

/// Format one event as a feed row (no trailing newline).
pub fn format_row(event: &Event) -> String {
    format!(
        "{},{},{},{},{},{}",
        event.timestamp,
        event.kind.code(),
        event.order_id,
        event.side.code(),
        event.price,
        event.quantity
    )
}

/// Appends events to a feed table in emission order.
///
/// The header is written on construction. Every write error is returned to
/// the caller; nothing is swallowed.
pub struct FeedWriter<W: Write> {
    inner: W,
    rows: u64,
}

impl<W: Write> FeedWriter<W> {
    pub fn new(mut inner: W) -> FeedResult<Self> {
        writeln!(inner, "{}", FEED_HEADER).map_err(write_error)?;
        Ok(Self { inner, rows: 0 })
    }

    pub fn write_event(&mut self, event: &Event) -> FeedResult<()> {
        writeln!(self.inner, "{}", format_row(event)).map_err(write_error)?;
        self.rows += 1;
        Ok(())
    }

    pub fn write_all<I>(&mut self, events: I) -> FeedResult<u64>
    where
        I: IntoIterator<Item = Event>,
    {
        let before = self.rows;
        for event in events {
            self.write_event(&event)?;
        }
        Ok(self.rows - before)
    }

    /// Data rows written so far (header excluded)
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Flush and return the number of data rows.
    pub fn finish(self) -> FeedResult<u64> {
        let rows = self.rows;
        self.into_inner()?;
        Ok(rows)
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(mut self) -> FeedResult<W> {
        self.inner.flush().map_err(write_error)?;
        Ok(self.inner)
    }
}

fn write_error(err: std::io::Error) -> FeedError {
    FeedError::FileWrite(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Order, Side};

    #[test]
    fn test_header_and_rows() {
        let order = Order { id: 3, side: Side::Sell, price: 10_002, remaining_quantity: 4 };
        let mut writer = FeedWriter::new(Vec::new()).unwrap();
        writer.write_event(&Event::add(17, &order)).unwrap();
        writer.write_event(&Event::cancel(30, &order)).unwrap();
        writer.write_event(&Event::execute(41, &order, 2)).unwrap();
        assert_eq!(writer.rows(), 3);

        let bytes = writer.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "ts_ns,type,order_id,side,px,qty\n\
             17,A,3,1,10002,4\n\
             30,C,3,1,0,0\n\
             41,E,3,1,10002,2\n"
        );
    }

    #[test]
    fn test_empty_feed_is_header_only() {
        let writer = FeedWriter::new(Vec::new()).unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(text, format!("{}\n", FEED_HEADER));
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_errors_propagate() {
        let result = FeedWriter::new(FailingWriter);
        assert!(matches!(result, Err(FeedError::FileWrite(_))));
    }
}
