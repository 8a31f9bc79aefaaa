// LogTally - platform/fs.rs
//
// Log file opening and lazy line reading.
// Gzip files are decompressed on the fly; nothing is read into memory beyond
// the current line.

use crate::core::discovery::is_gzip;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Open a log file as a buffered line source.
///
/// `.gz` files go through a multi-member gzip decoder so concatenated
/// members (rotated and appended logs) read as one stream. Decode errors
/// surface as `io::Error` from the reads.
pub fn open_log_reader(path: &Path) -> io::Result<Box<dyn BufRead>> {
    let file = File::open(path)?;
    if is_gzip(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(BufReader::new(
            file,
        )))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Iterator over the lines of a reader, one allocation per line.
///
/// Line terminators (`\n` or `\r\n`, or a bare `\r` at end of input) are
/// stripped. Invalid UTF-8 is replaced rather than failing the file, matching
/// lossy reads elsewhere.
pub struct LogLines<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> LogLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::with_capacity(256),
        }
    }
}

impl<R: BufRead> Iterator for LogLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                }
                // A CRLF file may end with a bare `\r` and no final `\n`.
                if self.buf.last() == Some(&b'\r') {
                    self.buf.pop();
                }
                Some(Ok(String::from_utf8_lossy(&self.buf).into_owned()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
