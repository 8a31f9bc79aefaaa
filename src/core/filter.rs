// LogTally - core/filter.rs
//
// Event filters: one configured rule per events-file line.
// Event type, level and pattern constraints are AND-combined; filters never
// interact with each other.
// Core layer: pure logic, no I/O.

use crate::core::model::{FilterResult, LogRecord};
use crate::util::error::FilterError;
use regex::Regex;
use std::fmt;

/// A single filter rule. Immutable once built.
#[derive(Debug, Clone)]
pub struct EventFilter {
    /// Event type matched exactly against the record's event type.
    pub event_type: String,

    /// Exact, case-sensitive level constraint. None = any level.
    pub level: Option<String>,

    /// Compiled message regex (search semantics). None = any message.
    pub pattern: Option<Regex>,

    /// Report a count instead of the matching lines.
    pub count_only: bool,
}

impl EventFilter {
    /// Build a filter, compiling `pattern` once up front.
    pub fn new(
        event_type: impl Into<String>,
        level: Option<String>,
        pattern: Option<&str>,
        count_only: bool,
    ) -> Result<Self, FilterError> {
        let pattern = pattern
            .map(|p| {
                Regex::new(p).map_err(|e| FilterError::InvalidRegex {
                    pattern: p.to_string(),
                    source: e,
                })
            })
            .transpose()?;
        Ok(Self {
            event_type: event_type.into(),
            level,
            pattern,
            count_only,
        })
    }

    /// Source text of the message pattern, if any.
    pub fn pattern_str(&self) -> Option<&str> {
        self.pattern.as_ref().map(Regex::as_str)
    }

    /// True iff the record satisfies every constraint of this filter.
    pub fn matches(&self, record: &LogRecord<'_>) -> bool {
        if record.event_type != self.event_type {
            return false;
        }
        if let Some(ref level) = self.level {
            if record.level != level.as_str() {
                return false;
            }
        }
        if let Some(ref regex) = self.pattern {
            if !regex.is_match(record.message) {
                return false;
            }
        }
        true
    }

    /// Fresh, empty result in this filter's output mode.
    pub fn empty_result(&self) -> FilterResult {
        if self.count_only {
            FilterResult::Count { matches: 0 }
        } else {
            FilterResult::Lines { lines: Vec::new() }
        }
    }

    /// Add a matched record to `result`: bump the count or keep the raw line.
    pub fn accumulate(&self, result: &mut FilterResult, record: &LogRecord<'_>) {
        match result {
            FilterResult::Count { matches } => *matches += 1,
            FilterResult::Lines { lines } => lines.push(record.raw.to_string()),
        }
    }

    /// Match and accumulate in one step. Returns whether the record matched.
    pub fn evaluate(&self, result: &mut FilterResult, record: &LogRecord<'_>) -> bool {
        let matched = self.matches(record);
        if matched {
            self.accumulate(result, record);
        }
        matched
    }
}

/// Header description, e.g. `Event: GNMI level [ERROR] pattern [^conn] count`.
impl fmt::Display for EventFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Event: {}", self.event_type)?;
        if let Some(ref level) = self.level {
            write!(f, " level [{level}]")?;
        }
        if let Some(pattern) = self.pattern_str() {
            write!(f, " pattern [{pattern}]")?;
        }
        if self.count_only {
            f.write_str(" count")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::parse_line;

    const TELEMETRY: &str = "2025-06-01T14:03:05 INFO TELEMETRY Iteration time: 1793.845 sec";
    const GNMI: &str = "2025-06-01T14:10:00 ERROR GNMI unresponsive telemetry at endpoint http://SWX1:9001/ low_freq_debug";

    fn filter(event: &str, level: Option<&str>, pattern: Option<&str>, count: bool) -> EventFilter {
        EventFilter::new(event, level.map(str::to_string), pattern, count).unwrap()
    }

    #[test]
    fn test_event_type_must_match_exactly() {
        let rec = parse_line(TELEMETRY).unwrap();
        assert!(filter("TELEMETRY", None, None, false).matches(&rec));
        assert!(!filter("TELEMETR", None, None, false).matches(&rec));
        assert!(!filter("telemetry", None, None, false).matches(&rec));
    }

    /// Every combination of level/pattern set/unset and matching/not matching.
    #[test]
    fn test_constraint_combinations() {
        let rec = parse_line(GNMI).unwrap();
        let levels = [(None, true), (Some("ERROR"), true), (Some("error"), false), (Some("INFO"), false)];
        let patterns = [(None, true), (Some("telemetry at"), true), (Some("^unresponsive"), true), (Some("^telemetry"), false)];
        for (event, event_ok) in [("GNMI", true), ("DEVICE", false)] {
            for (level, level_ok) in levels {
                for (pattern, pattern_ok) in patterns {
                    let f = filter(event, level, pattern, false);
                    assert_eq!(
                        f.matches(&rec),
                        event_ok && level_ok && pattern_ok,
                        "event={event} level={level:?} pattern={pattern:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_pattern_is_search_not_full_match() {
        let rec = parse_line(GNMI).unwrap();
        assert!(filter("GNMI", None, Some("SWX1"), false).matches(&rec));
        assert!(!filter("GNMI", None, Some("^SWX1$"), false).matches(&rec));
    }

    #[test]
    fn test_count_mode_accumulates_count() {
        let rec = parse_line(TELEMETRY).unwrap();
        let f = filter("TELEMETRY", None, Some(r"^Iteration time:\s\d+\.\d+\ssec$"), true);
        let mut result = f.empty_result();
        assert!(f.evaluate(&mut result, &rec));
        assert_eq!(result, FilterResult::Count { matches: 1 });
    }

    #[test]
    fn test_line_mode_keeps_raw_line() {
        let rec = parse_line(GNMI).unwrap();
        let f = filter("GNMI", Some("ERROR"), None, false);
        let mut result = f.empty_result();
        f.evaluate(&mut result, &rec);
        assert_eq!(
            result,
            FilterResult::Lines {
                lines: vec![GNMI.to_string()]
            }
        );
    }

    #[test]
    fn test_non_matching_record_not_accumulated() {
        let rec = parse_line(GNMI).unwrap();
        let f = filter("TELEMETRY", None, None, true);
        let mut result = f.empty_result();
        assert!(!f.evaluate(&mut result, &rec));
        assert_eq!(result.match_count(), 0);
    }

    #[test]
    fn test_invalid_regex() {
        let result = EventFilter::new("GNMI", None, Some("[invalid"), false);
        assert!(matches!(result, Err(FilterError::InvalidRegex { .. })));
    }

    #[test]
    fn test_description() {
        assert_eq!(
            filter("DEVICE", Some("WARNING"), Some("^disk"), true).to_string(),
            "Event: DEVICE level [WARNING] pattern [^disk] count"
        );
        assert_eq!(filter("GNMI", None, None, false).to_string(), "Event: GNMI");
    }
}
