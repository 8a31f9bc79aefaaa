// LogTally - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "LogTally";

/// Application identifier used for the config directory.
pub const APP_ID: &str = "LogTally";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Log line format
// =============================================================================

/// chrono format of the leading timestamp field, also used for `--from`/`--to`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Exact byte length of a timestamp in `TIMESTAMP_FORMAT`.
pub const TIMESTAMP_LEN: usize = 19;

// =============================================================================
// Events file
// =============================================================================

/// Lines starting with this marker are ignored.
pub const COMMENT_PREFIX: char = '#';

/// Prefix shared by every filter flag; a first token with it has no event type.
pub const FLAG_PREFIX: &str = "--";

pub const FLAG_COUNT: &str = "--count";
pub const FLAG_LEVEL: &str = "--level";
pub const FLAG_PATTERN: &str = "--pattern";

// =============================================================================
// Discovery
// =============================================================================

/// Filename globs selecting readable log files (plain and gzip).
pub const DEFAULT_INCLUDE_PATTERNS: &[&str] = &["*.log", "*.log.gz"];

/// Extension that routes a file through the gzip decoder.
pub const GZIP_EXTENSION: &str = "gz";

// =============================================================================
// Parsing limits
// =============================================================================

/// Malformed lines logged individually per file before only the total is kept.
pub const DEFAULT_MAX_REPORTED_MALFORMED_PER_FILE: usize = 20;

/// Hard upper bound for the per-file malformed-line log cap.
pub const ABSOLUTE_MAX_REPORTED_MALFORMED_PER_FILE: usize = 10_000;

/// Maximum characters of a malformed line included in a debug event.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 200;

// =============================================================================
// Report
// =============================================================================

/// Width of the dash separator starting each report block.
pub const DEFAULT_SEPARATOR_WIDTH: usize = 20;

pub const MIN_SEPARATOR_WIDTH: usize = 1;

pub const MAX_SEPARATOR_WIDTH: usize = 200;

// =============================================================================
// Logging
// =============================================================================

/// Default tracing filter when neither RUST_LOG, --debug nor config sets one.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Level names accepted in `[logging] level`.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// =============================================================================
// Files
// =============================================================================

/// Name of the optional configuration file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

// =============================================================================
// Exit codes
// =============================================================================

/// Configuration, discovery or output failure; no report was produced.
pub const EXIT_FATAL: u8 = 1;

/// Report produced, but at least one log file could not be read.
pub const EXIT_PARTIAL: u8 = 2;
