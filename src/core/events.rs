// LogTally - core/events.rs
//
// Events configuration parsing: one filter per line,
//   EVENT_TYPE [--count] [--level LEVEL] [--pattern REGEX]
// Blank lines and `#` comments are skipped. `--pattern` takes the rest of the
// line as its regex, so it must be the last flag on the line.
// Core layer: works on file content, the app layer does the reading.

use crate::core::filter::EventFilter;
use crate::core::parser::next_token;
use crate::util::constants;
use crate::util::error::ConfigError;

/// Parse the full events-file text into filters, in file order.
///
/// Any invalid line fails the whole load; the error names the 1-based line
/// number and its content. Duplicate event types are independent filters.
pub fn parse_events(content: &str) -> Result<Vec<EventFilter>, ConfigError> {
    let mut filters = Vec::new();

    for (idx, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with(constants::COMMENT_PREFIX) {
            continue;
        }
        let filter = parse_filter_line(line, idx + 1)?;
        tracing::debug!(line_number = idx + 1, filter = %filter, "Filter loaded");
        filters.push(filter);
    }

    Ok(filters)
}

/// Parse one trimmed, non-comment line.
fn parse_filter_line(line: &str, line_number: usize) -> Result<EventFilter, ConfigError> {
    let (event_type, mut rest) = match next_token(line) {
        Some((token, rest)) if !token.starts_with(constants::FLAG_PREFIX) => (token, rest),
        _ => {
            return Err(ConfigError::MissingEventType {
                line_number,
                line: line.to_string(),
            })
        }
    };

    let mut count_only = false;
    let mut level: Option<String> = None;
    let mut pattern: Option<&str> = None;

    while let Some((flag, after)) = next_token(rest) {
        match flag {
            constants::FLAG_COUNT => {
                count_only = true;
                rest = after;
            }
            constants::FLAG_LEVEL => {
                let (value, after_value) =
                    next_token(after).ok_or_else(|| ConfigError::MissingFlagValue {
                        line_number,
                        line: line.to_string(),
                        flag: constants::FLAG_LEVEL,
                    })?;
                level = Some(value.to_string());
                rest = after_value;
            }
            constants::FLAG_PATTERN => {
                let value = after.trim();
                if value.is_empty() {
                    return Err(ConfigError::MissingFlagValue {
                        line_number,
                        line: line.to_string(),
                        flag: constants::FLAG_PATTERN,
                    });
                }
                pattern = Some(value);
                break;
            }
            other => {
                return Err(ConfigError::UnknownFlag {
                    line_number,
                    line: line.to_string(),
                    flag: other.to_string(),
                })
            }
        }
    }

    EventFilter::new(event_type, level, pattern, count_only).map_err(|source| {
        ConfigError::InvalidPattern {
            line_number,
            line: line.to_string(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_flags_in_file_order() {
        let content = "\
# comment
TELEMETRY --count --pattern ^Iteration time:\\s\\d+\\.\\d+\\ssec$

GNMI --level ERROR
DEVICE --level WARNING --count --pattern ^disk
";
        let filters = parse_events(content).unwrap();
        assert_eq!(filters.len(), 3);

        assert_eq!(filters[0].event_type, "TELEMETRY");
        assert!(filters[0].count_only);
        assert_eq!(filters[0].level, None);
        assert_eq!(
            filters[0].pattern_str(),
            Some(r"^Iteration time:\s\d+\.\d+\ssec$")
        );

        assert_eq!(filters[1].event_type, "GNMI");
        assert!(!filters[1].count_only);
        assert_eq!(filters[1].level.as_deref(), Some("ERROR"));
        assert!(filters[1].pattern.is_none());

        assert_eq!(filters[2].event_type, "DEVICE");
        assert!(filters[2].count_only);
        assert_eq!(filters[2].level.as_deref(), Some("WARNING"));
        assert_eq!(filters[2].pattern_str(), Some("^disk"));
    }

    #[test]
    fn test_pattern_consumes_rest_of_line() {
        let filters = parse_events("GNMI --pattern connection --level ERROR  ").unwrap();
        assert_eq!(filters[0].pattern_str(), Some("connection --level ERROR"));
        assert_eq!(filters[0].level, None);
    }

    #[test]
    fn test_duplicate_event_types_kept_separate() {
        let filters = parse_events("TELEMETRY --count\nTELEMETRY\n").unwrap();
        assert_eq!(filters.len(), 2);
        assert!(filters[0].count_only);
        assert!(!filters[1].count_only);
    }

    #[test]
    fn test_repeated_level_keeps_last() {
        let filters = parse_events("GNMI --level INFO --level ERROR").unwrap();
        assert_eq!(filters[0].level.as_deref(), Some("ERROR"));
    }

    #[test]
    fn test_empty_content_yields_no_filters() {
        assert!(parse_events("\n   \n# only comments\n").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_flag_names_line() {
        let err = parse_events("GNMI\nDEVICE --verbose\n").unwrap_err();
        match err {
            ConfigError::UnknownFlag {
                line_number, flag, ..
            } => {
                assert_eq!(line_number, 2);
                assert_eq!(flag, "--verbose");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_stray_token_is_unknown_flag() {
        let err = parse_events("GNMI ERROR").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownFlag { .. }));
    }

    #[test]
    fn test_missing_event_type() {
        let err = parse_events("--count --level ERROR").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingEventType { line_number: 1, .. }
        ));
    }

    #[test]
    fn test_missing_flag_values() {
        assert!(matches!(
            parse_events("GNMI --level").unwrap_err(),
            ConfigError::MissingFlagValue { flag: "--level", .. }
        ));
        assert!(matches!(
            parse_events("GNMI --pattern   ").unwrap_err(),
            ConfigError::MissingFlagValue { flag: "--pattern", .. }
        ));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = parse_events("# header\nGNMI --pattern [unclosed").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidPattern { line_number: 2, .. }
        ));
    }
}
