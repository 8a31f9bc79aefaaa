// LogTally - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// Configuration-time errors are fatal; data-time errors (malformed lines,
// unreadable individual files) are isolated by the scan and never reach here
// as `Err`.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all LogTally operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum LogTallyError {
    /// Events file, CLI bounds or filter definitions are invalid.
    Config(ConfigError),

    /// The log directory could not be enumerated.
    Discovery(DiscoveryError),

    /// Writing the report failed.
    Report(ReportError),
}

impl fmt::Display for LogTallyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Discovery(e) => write!(f, "Discovery error: {e}"),
            Self::Report(e) => write!(f, "Report error: {e}"),
        }
    }
}

impl std::error::Error for LogTallyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Discovery(e) => Some(e),
            Self::Report(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Fatal errors detected before any log is read.
#[derive(Debug)]
pub enum ConfigError {
    /// The events file could not be read.
    EventsFileIo { path: PathBuf, source: io::Error },

    /// A filter line starts with a flag instead of an event type.
    MissingEventType { line_number: usize, line: String },

    /// A filter line contains a token that is not a recognised flag.
    UnknownFlag {
        line_number: usize,
        line: String,
        flag: String,
    },

    /// `--level` or `--pattern` appears without its argument.
    MissingFlagValue {
        line_number: usize,
        line: String,
        flag: &'static str,
    },

    /// A `--pattern` value failed to compile.
    InvalidPattern {
        line_number: usize,
        line: String,
        source: FilterError,
    },

    /// `--from` or `--to` does not follow the log timestamp grammar.
    InvalidTimestamp { arg: &'static str, value: String },

    /// `--from` is later than `--to`.
    InvertedWindow { from: String, to: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EventsFileIo { path, source } => {
                write!(f, "Cannot read events file '{}': {source}", path.display())
            }
            Self::MissingEventType { line_number, line } => write!(
                f,
                "events file line {line_number}: missing event type in '{line}'"
            ),
            Self::UnknownFlag {
                line_number,
                line,
                flag,
            } => write!(
                f,
                "events file line {line_number}: unrecognised flag '{flag}' in '{line}'"
            ),
            Self::MissingFlagValue {
                line_number,
                line,
                flag,
            } => write!(
                f,
                "events file line {line_number}: '{flag}' requires a value in '{line}'"
            ),
            Self::InvalidPattern {
                line_number,
                line,
                source,
            } => write!(f, "events file line {line_number}: {source} in '{line}'"),
            Self::InvalidTimestamp { arg, value } => write!(
                f,
                "--{arg} '{value}' is not a valid timestamp. Expected YYYY-MM-DDTHH:MM:SS"
            ),
            Self::InvertedWindow { from, to } => {
                write!(f, "--from '{from}' is later than --to '{to}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::EventsFileIo { source, .. } => Some(source),
            Self::InvalidPattern { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for LogTallyError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Filter errors
// ---------------------------------------------------------------------------

/// Errors raised while constructing an event filter.
#[derive(Debug)]
pub enum FilterError {
    /// User-provided regex is invalid.
    InvalidRegex {
        pattern: String,
        source: regex::Error,
    },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRegex { pattern, source } => {
                write!(f, "Invalid filter regex '{pattern}': {source}")
            }
        }
    }
}

impl std::error::Error for FilterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidRegex { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Malformed lines
// ---------------------------------------------------------------------------

/// A log line that does not follow `<TIMESTAMP> <LEVEL> <EVENT_TYPE> <MESSAGE>`.
///
/// Recoverable: the scan counts it and moves on to the next line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedLineError {
    /// Fewer than four whitespace-delimited fields.
    TooFewFields { found: usize },

    /// The first field is not a `YYYY-MM-DDTHH:MM:SS` timestamp.
    BadTimestamp { raw: String },
}

impl fmt::Display for MalformedLineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewFields { found } => {
                write!(f, "expected 4 fields, found {found}")
            }
            Self::BadTimestamp { raw } => write!(f, "cannot parse timestamp '{raw}'"),
        }
    }
}

impl std::error::Error for MalformedLineError {}

// ---------------------------------------------------------------------------
// Discovery errors
// ---------------------------------------------------------------------------

/// Errors related to log directory enumeration.
#[derive(Debug)]
pub enum DiscoveryError {
    /// The log directory does not exist.
    RootNotFound { path: PathBuf },

    /// The log path is not a directory.
    NotADirectory { path: PathBuf },

    /// Permission denied accessing the log directory.
    PermissionDenied { path: PathBuf, source: io::Error },

    /// The directory listing itself failed.
    Traversal {
        path: PathBuf,
        source: walkdir::Error,
    },
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RootNotFound { path } => {
                write!(f, "Log directory '{}' does not exist", path.display())
            }
            Self::NotADirectory { path } => {
                write!(f, "Log path '{}' is not a directory", path.display())
            }
            Self::PermissionDenied { path, source } => {
                write!(
                    f,
                    "Permission denied accessing '{}': {source}",
                    path.display()
                )
            }
            Self::Traversal { path, source } => {
                write!(f, "Error listing '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for DiscoveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::PermissionDenied { source, .. } => Some(source),
            Self::Traversal { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<DiscoveryError> for LogTallyError {
    fn from(e: DiscoveryError) -> Self {
        Self::Discovery(e)
    }
}

// ---------------------------------------------------------------------------
// Report errors
// ---------------------------------------------------------------------------

/// Errors related to writing the final report.
#[derive(Debug)]
pub enum ReportError {
    /// Writing to the output stream failed.
    Io(io::Error),

    /// JSON serialisation failed.
    Json(serde_json::Error),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "cannot write report: {e}"),
            Self::Json(e) => write!(f, "cannot serialise JSON report: {e}"),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
        }
    }
}

impl From<io::Error> for ReportError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<ReportError> for LogTallyError {
    fn from(e: ReportError) -> Self {
        Self::Report(e)
    }
}

/// Convenience type alias for LogTally results.
pub type Result<T> = std::result::Result<T, LogTallyError>;
