// LogTally - platform/config.rs
//
// Platform config directory resolution and config.toml loading with
// startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::report::ReportFormat;
use crate::util::constants;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for LogTally configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/logtally/ or %APPDATA%\LogTally\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to the current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Default location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[discovery]` section.
    pub discovery: DiscoverySection,
    /// `[parsing]` section.
    pub parsing: ParsingSection,
    /// `[report]` section.
    pub report: ReportSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[discovery]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DiscoverySection {
    /// Filename globs selecting log files.
    pub include_patterns: Option<Vec<String>>,
}

/// `[parsing]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ParsingSection {
    /// Malformed lines logged individually per file.
    pub max_reported_malformed_per_file: Option<usize>,
}

/// `[report]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ReportSection {
    /// Dash separator width.
    pub separator_width: Option<usize>,
    /// "text" or "json".
    pub format: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- Discovery --
    pub include_patterns: Vec<String>,

    // -- Parsing --
    pub max_reported_malformed_per_file: usize,

    // -- Report --
    pub separator_width: usize,
    pub report_format: ReportFormat,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            include_patterns: constants::DEFAULT_INCLUDE_PATTERNS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            max_reported_malformed_per_file: constants::DEFAULT_MAX_REPORTED_MALFORMED_PER_FILE,
            separator_width: constants::DEFAULT_SEPARATOR_WIDTH,
            report_format: ReportFormat::Text,
            log_level: None,
        }
    }
}

/// Load and validate the config file at `config_path`.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// A missing file yields defaults with no warnings; an unreadable or
/// unparseable one yields defaults plus a warning. A broken config.toml never
/// stops a run.
///
/// Called before logging is initialised, so problems are returned rather
/// than logged.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        return (AppConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(config_path) {
        Ok(c) => c,
        Err(e) => {
            warnings.push(format!(
                "Could not read config file '{}': {e}. Using defaults.",
                config_path.display()
            ));
            return (AppConfig::default(), warnings);
        }
    };

    match toml::from_str::<RawConfig>(&content) {
        Ok(raw) => {
            let config = validate(raw, &mut warnings);
            (config, warnings)
        }
        Err(e) => {
            warnings.push(format!(
                "Failed to parse config file '{}': {e}. Using defaults.",
                config_path.display()
            ));
            (AppConfig::default(), warnings)
        }
    }
}

/// Validate each field against named constants, accumulating all problems.
fn validate(raw: RawConfig, warnings: &mut Vec<String>) -> AppConfig {
    let mut config = AppConfig::default();

    // -- Discovery: include_patterns --
    if let Some(patterns) = raw.discovery.include_patterns {
        let (valid, invalid): (Vec<String>, Vec<String>) = patterns
            .into_iter()
            .partition(|p| glob::Pattern::new(p).is_ok());
        for p in &invalid {
            warnings.push(format!(
                "[discovery] include pattern \"{p}\" is not a valid glob. Ignoring it."
            ));
        }
        if valid.is_empty() {
            warnings.push(
                "[discovery] include_patterns has no valid entries. Using default (*.log, *.log.gz)."
                    .to_string(),
            );
        } else {
            config.include_patterns = valid;
        }
    }

    // -- Parsing: max_reported_malformed_per_file --
    if let Some(n) = raw.parsing.max_reported_malformed_per_file {
        if n <= constants::ABSOLUTE_MAX_REPORTED_MALFORMED_PER_FILE {
            config.max_reported_malformed_per_file = n;
        } else {
            warnings.push(format!(
                "[parsing] max_reported_malformed_per_file = {n} is out of range (0-{}). Using default ({}).",
                constants::ABSOLUTE_MAX_REPORTED_MALFORMED_PER_FILE,
                constants::DEFAULT_MAX_REPORTED_MALFORMED_PER_FILE,
            ));
        }
    }

    // -- Report: separator_width --
    if let Some(width) = raw.report.separator_width {
        if (constants::MIN_SEPARATOR_WIDTH..=constants::MAX_SEPARATOR_WIDTH).contains(&width) {
            config.separator_width = width;
        } else {
            warnings.push(format!(
                "[report] separator_width = {width} is out of range ({}-{}). Using default ({}).",
                constants::MIN_SEPARATOR_WIDTH,
                constants::MAX_SEPARATOR_WIDTH,
                constants::DEFAULT_SEPARATOR_WIDTH,
            ));
        }
    }

    // -- Report: format --
    if let Some(ref format) = raw.report.format {
        match format.to_lowercase().as_str() {
            "text" => config.report_format = ReportFormat::Text,
            "json" => config.report_format = ReportFormat::Json,
            other => warnings.push(format!(
                "[report] format = \"{other}\" is not recognised. Expected \"text\" or \"json\". Using default (text).",
            )),
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (warn).",
            ));
        }
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_str(content: &str) -> (AppConfig, Vec<String>) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(constants::CONFIG_FILE_NAME);
        std::fs::write(&path, content).unwrap();
        load_config(&path)
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warnings) = load_config(&dir.path().join("absent.toml"));
        assert!(warnings.is_empty());
        assert_eq!(config.separator_width, constants::DEFAULT_SEPARATOR_WIDTH);
        assert_eq!(config.include_patterns, vec!["*.log", "*.log.gz"]);
        assert_eq!(config.report_format, ReportFormat::Text);
    }

    #[test]
    fn test_valid_config() {
        let (config, warnings) = load_str(
            r#"
[discovery]
include_patterns = ["*.log", "*.txt"]

[parsing]
max_reported_malformed_per_file = 5

[report]
separator_width = 40
format = "JSON"

[logging]
level = "Debug"

[unknown_section]
ignored = true
"#,
        );
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        assert_eq!(config.include_patterns, vec!["*.log", "*.txt"]);
        assert_eq!(config.max_reported_malformed_per_file, 5);
        assert_eq!(config.separator_width, 40);
        assert_eq!(config.report_format, ReportFormat::Json);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_out_of_range_values_fall_back() {
        let (config, warnings) = load_str(
            r#"
[report]
separator_width = 0
format = "xml"

[logging]
level = "loud"
"#,
        );
        assert_eq!(warnings.len(), 3, "warnings: {warnings:?}");
        assert_eq!(config.separator_width, constants::DEFAULT_SEPARATOR_WIDTH);
        assert_eq!(config.report_format, ReportFormat::Text);
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_invalid_glob_dropped() {
        let (config, warnings) = load_str("[discovery]\ninclude_patterns = [\"[\", \"*.log\"]\n");
        assert_eq!(config.include_patterns, vec!["*.log"]);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_unparseable_file_warns() {
        let (config, warnings) = load_str("this is = = not toml");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Failed to parse"));
        assert_eq!(config.separator_width, constants::DEFAULT_SEPARATOR_WIDTH);
    }
}
