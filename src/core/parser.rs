// LogTally - core/parser.rs
//
// Line-oriented log record parsing.
// Core layer: accepts already-decoded lines, never touches the filesystem.
//
// Line layout: <TIMESTAMP> <LEVEL> <EVENT_TYPE> <MESSAGE...>
// Fields are separated by one or more whitespace characters; the message
// absorbs everything after the event type verbatim.

use crate::core::model::LogRecord;
use crate::util::constants;
use crate::util::error::MalformedLineError;
use chrono::{DateTime, NaiveDateTime, Utc};

/// Configuration for parsing operations.
#[derive(Debug, Clone)]
pub struct ParseConfig {
    /// Malformed lines logged individually per file; the rest are only counted.
    pub max_reported_malformed_per_file: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            max_reported_malformed_per_file: constants::DEFAULT_MAX_REPORTED_MALFORMED_PER_FILE,
        }
    }
}

/// Parse one log line (terminator already stripped) into a [`LogRecord`].
///
/// Fails with [`MalformedLineError::TooFewFields`] when fewer than four fields
/// are present, and with [`MalformedLineError::BadTimestamp`] when the first
/// field is not a `YYYY-MM-DDTHH:MM:SS` timestamp. Level and event type are
/// accepted as-is.
pub fn parse_line(line: &str) -> Result<LogRecord<'_>, MalformedLineError> {
    let (raw_ts, rest) = next_token(line).ok_or(MalformedLineError::TooFewFields { found: 0 })?;
    let (level, rest) = next_token(rest).ok_or(MalformedLineError::TooFewFields { found: 1 })?;
    let (event_type, rest) =
        next_token(rest).ok_or(MalformedLineError::TooFewFields { found: 2 })?;

    let message = rest.trim_start();
    if message.is_empty() {
        return Err(MalformedLineError::TooFewFields { found: 3 });
    }

    let timestamp = parse_timestamp(raw_ts).ok_or_else(|| MalformedLineError::BadTimestamp {
        raw: raw_ts.to_string(),
    })?;

    Ok(LogRecord {
        timestamp,
        level,
        event_type,
        message,
        raw: line,
    })
}

/// Parse a `YYYY-MM-DDTHH:MM:SS` timestamp as UTC.
///
/// The grammar is strict: zero-padded fields, a literal `T`, no fractional
/// seconds and no offset. Returns `None` for anything else.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if !has_timestamp_shape(raw) {
        return None;
    }
    NaiveDateTime::parse_from_str(raw, constants::TIMESTAMP_FORMAT)
        .ok()
        .map(|ndt| ndt.and_utc())
}

/// Split off the next whitespace-delimited token.
///
/// Returns the token and the unconsumed remainder (starting at the whitespace
/// that ended the token), or `None` when only whitespace is left.
pub(crate) fn next_token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    Some((&s[..end], &s[end..]))
}

/// chrono accepts unpadded numbers for most specifiers, so the fixed layout is
/// checked byte by byte first.
fn has_timestamp_shape(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == constants::TIMESTAMP_LEN
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            10 => *b == b'T',
            13 | 16 => *b == b':',
            _ => b.is_ascii_digit(),
        })
}
