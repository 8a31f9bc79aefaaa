// LogTally - core/model.rs
//
// Core data model types. Pure data definitions with no I/O.
//
// These types are the shared vocabulary across all layers.

use crate::util::constants;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

// =============================================================================
// Log Record (output of line parsing)
// =============================================================================

/// One parsed log line.
///
/// Fields borrow from the raw line so parsing a record never allocates; only
/// filters in line mode copy `raw` when they keep it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogRecord<'a> {
    /// Leading timestamp, interpreted as UTC (the log format carries no offset).
    pub timestamp: DateTime<Utc>,

    /// Severity token, compared case-sensitively (e.g. `INFO`, `ERROR`).
    pub level: &'a str,

    /// Event category token (e.g. `TELEMETRY`, `GNMI`).
    pub event_type: &'a str,

    /// Remainder of the line after the event type, verbatim.
    pub message: &'a str,

    /// The full source line without its line terminator.
    pub raw: &'a str,
}

/// Re-serialises the four fields separated by single spaces.
impl fmt::Display for LogRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.timestamp.format(constants::TIMESTAMP_FORMAT),
            self.level,
            self.event_type,
            self.message
        )
    }
}

// =============================================================================
// Filter Result
// =============================================================================

/// One filter's accumulated outcome for a run.
///
/// The variant is fixed when the result is created from its filter and never
/// changes during the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum FilterResult {
    /// Count mode: number of matching records.
    Count { matches: u64 },

    /// Line mode: raw matching lines in encounter order (file order, then
    /// line order within each file).
    Lines { lines: Vec<String> },
}

impl FilterResult {
    /// Number of matches accumulated so far, whichever the mode.
    pub fn match_count(&self) -> u64 {
        match self {
            FilterResult::Count { matches } => *matches,
            FilterResult::Lines { lines } => lines.len() as u64,
        }
    }

    /// Append `other` (a later file's result for the same filter) to `self`.
    ///
    /// Both sides come from the same filter, so their modes always agree.
    pub fn merge(&mut self, other: FilterResult) {
        match (self, other) {
            (FilterResult::Count { matches }, FilterResult::Count { matches: more }) => {
                *matches += more;
            }
            (FilterResult::Lines { lines }, FilterResult::Lines { lines: more }) => {
                lines.extend(more);
            }
            (this, other) => {
                tracing::warn!(?this, ?other, "Mismatched filter result modes; ignoring");
            }
        }
    }
}

// =============================================================================
// Discovered File (output of discovery phase)
// =============================================================================

/// A log file selected from the log directory, before reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    /// Full path to the file.
    pub path: PathBuf,

    /// True when the file is read through the gzip decoder.
    pub compressed: bool,
}

// =============================================================================
// Scan Summary
// =============================================================================

/// Data-quality statistics for a completed scan.
#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    /// Log files selected by discovery.
    pub files_discovered: usize,

    /// Files read to the end without an I/O or decode error.
    pub files_read: usize,

    /// Files that could not be opened or failed part-way.
    pub failed_files: Vec<FileFailure>,

    /// Total lines read across all files.
    pub lines_read: u64,

    /// Lines rejected by the line parser.
    pub malformed_lines: u64,

    /// Well-formed records dropped by the time window.
    pub outside_window: u64,

    /// Per-file breakdown, in processing order.
    pub file_summaries: Vec<FileSummary>,

    /// Wall-clock scan duration.
    pub duration: std::time::Duration,
}

impl ScanSummary {
    /// True when at least one file could not be fully read.
    pub fn has_failures(&self) -> bool {
        !self.failed_files.is_empty()
    }
}

/// Per-file scan statistics.
#[derive(Debug, Clone, Default)]
pub struct FileSummary {
    /// File path.
    pub path: PathBuf,

    /// Lines read from this file.
    pub lines_read: u64,

    /// Lines rejected by the line parser.
    pub malformed_lines: u64,

    /// Well-formed records dropped by the time window.
    pub outside_window: u64,

    /// Records that passed the time window.
    pub records_in_window: u64,
}

/// A log file skipped (wholly or partially) because of an I/O or decode error.
#[derive(Debug, Clone)]
pub struct FileFailure {
    pub path: PathBuf,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_counts_and_lines() {
        let mut count = FilterResult::Count { matches: 2 };
        count.merge(FilterResult::Count { matches: 3 });
        assert_eq!(count, FilterResult::Count { matches: 5 });

        let mut lines = FilterResult::Lines {
            lines: vec!["first".to_string()],
        };
        lines.merge(FilterResult::Lines {
            lines: vec!["second".to_string()],
        });
        assert_eq!(
            lines,
            FilterResult::Lines {
                lines: vec!["first".to_string(), "second".to_string()]
            }
        );
    }

    #[test]
    fn test_merge_mismatched_modes_keeps_self() {
        let mut count = FilterResult::Count { matches: 1 };
        count.merge(FilterResult::Lines {
            lines: vec!["ignored".to_string()],
        });
        assert_eq!(count, FilterResult::Count { matches: 1 });
    }
}
