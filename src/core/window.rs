// LogTally - core/window.rs
//
// Inclusive time window applied to every parsed record before filtering.
// Core layer: pure logic.

use crate::core::parser::parse_timestamp;
use crate::util::constants;
use crate::util::error::ConfigError;
use chrono::{DateTime, Utc};

/// Inclusive `[from, to]` time range. A missing bound is unbounded on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeWindow {
    /// Start of range (inclusive). None = no lower bound.
    pub from: Option<DateTime<Utc>>,

    /// End of range (inclusive). None = no upper bound.
    pub to: Option<DateTime<Utc>>,
}

impl TimeWindow {
    /// Window with neither bound set; contains every timestamp.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Build a window, rejecting `from > to` instead of silently matching nothing.
    pub fn new(
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Self, ConfigError> {
        if let (Some(f), Some(t)) = (from, to) {
            if f > t {
                return Err(ConfigError::InvertedWindow {
                    from: f.format(constants::TIMESTAMP_FORMAT).to_string(),
                    to: t.format(constants::TIMESTAMP_FORMAT).to_string(),
                });
            }
        }
        Ok(Self { from, to })
    }

    /// Build a window from the raw `--from` / `--to` argument strings.
    pub fn from_args(from: Option<&str>, to: Option<&str>) -> Result<Self, ConfigError> {
        let from = from.map(|v| parse_bound("from", v)).transpose()?;
        let to = to.map(|v| parse_bound("to", v)).transpose()?;
        Self::new(from, to)
    }

    /// Returns true if `ts` lies inside the window.
    pub fn contains(&self, ts: &DateTime<Utc>) -> bool {
        if let Some(ref from) = self.from {
            if ts < from {
                return false;
            }
        }
        if let Some(ref to) = self.to {
            if ts > to {
                return false;
            }
        }
        true
    }

    /// Returns true if neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

fn parse_bound(arg: &'static str, value: &str) -> Result<DateTime<Utc>, ConfigError> {
    parse_timestamp(value.trim()).ok_or_else(|| ConfigError::InvalidTimestamp {
        arg,
        value: value.to_string(),
    })
}
