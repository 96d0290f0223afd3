// Feed table I/O: `ts_ns,type,order_id,side,px,qty`

pub mod reader;
pub mod writer;

pub use reader::{parse_row, FeedReader};
pub use writer::{format_row, FeedWriter, FEED_HEADER};

use crate::error::{FeedError, FeedResult};
use crate::types::Event;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Read a whole feed file into memory.
pub fn read_feed_file<P: AsRef<Path>>(path: P) -> FeedResult<Vec<Event>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| open_error(path, e))?;
    FeedReader::new(BufReader::new(file)).collect()
}

/// Write `events` to `path`, calling `on_row` after each row.
///
/// Rows go to a `.partial` sibling that is renamed over `path` only once every
/// row is written and flushed. On any failure the partial file is removed, so
/// a truncated feed never appears under the final name.
pub fn write_feed_file<P, I, F>(path: P, events: I, mut on_row: F) -> FeedResult<u64>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = Event>,
    F: FnMut(&Event),
{
    let path = path.as_ref();
    let partial = partial_path(path);

    let result = write_rows(&partial, path, events, &mut on_row);

    match &result {
        Ok(rows) => debug!("Wrote {} rows to {}", rows, path.display()),
        Err(_) => {
            if let Err(e) = fs::remove_file(&partial) {
                warn!("Could not remove partial feed {}: {}", partial.display(), e);
            }
        }
    }
    result
}

fn write_rows<I, F>(partial: &Path, path: &Path, events: I, on_row: &mut F) -> FeedResult<u64>
where
    I: IntoIterator<Item = Event>,
    F: FnMut(&Event),
{
    let file = File::create(partial)
        .map_err(|e| FeedError::FileWrite(format!("{}: {}", partial.display(), e)))?;
    let mut writer = FeedWriter::new(BufWriter::new(file))?;
    for event in events {
        writer.write_event(&event)?;
        on_row(&event);
    }
    let rows = writer.finish()?;
    fs::rename(partial, path)
        .map_err(|e| FeedError::FileWrite(format!("{}: {}", path.display(), e)))?;
    Ok(rows)
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".partial");
    PathBuf::from(name)
}

fn open_error(path: &Path, err: std::io::Error) -> FeedError {
    if err.kind() == std::io::ErrorKind::NotFound {
        FeedError::FileNotFound(path.display().to_string())
    } else {
        FeedError::FileRead(format!("{}: {}", path.display(), err))
    }
}
