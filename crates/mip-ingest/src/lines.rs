//! Line-oriented reading of raw uploads.
//!
//! Lines are decoded as UTF-8 with lossy replacement so a stray byte never
//! aborts a diagnosis. Trailing `\n` / `\r\n` are removed, as is a leading
//! byte-order mark on the first line.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::error::{IngestError, Result};

/// Streaming line iterator over any buffered reader.
pub struct LineReader<R> {
    reader: R,
    buf: Vec<u8>,
    first: bool,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            first: true,
        }
    }
}

impl<R: BufRead> Iterator for LineReader<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                }
                if self.buf.last() == Some(&b'\r') {
                    self.buf.pop();
                }
                let mut line = String::from_utf8_lossy(&self.buf).into_owned();
                if self.first {
                    self.first = false;
                    if let Some(stripped) = line.strip_prefix('\u{feff}') {
                        line = stripped.to_string();
                    }
                }
                Some(Ok(line))
            }
            Err(error) => Some(Err(error)),
        }
    }
}

/// Open a file for streaming line reads.
pub fn open_lines(path: &Path) -> Result<LineReader<BufReader<File>>> {
    let file = File::open(path).map_err(|e| IngestError::read(path, e))?;
    Ok(LineReader::new(BufReader::new(file)))
}

/// Read at most `limit` lines starting at 0-based line `start`.
pub fn read_lines(path: &Path, start: usize, limit: usize) -> Result<Vec<String>> {
    open_lines(path)?
        .skip(start)
        .take(limit)
        .map(|line| line.map_err(|e| IngestError::read(path, e)))
        .collect()
}
