// LogTally - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading and logging initialisation
// 3. Filter loading, scan, and report rendering
// 4. Exit code selection

use clap::{Parser, ValueEnum};
use logtally::app;
use logtally::core::discovery::DiscoveryConfig;
use logtally::core::model::ScanSummary;
use logtally::core::parser::ParseConfig;
use logtally::core::report::{self, ReportFormat};
use logtally::core::window::TimeWindow;
use logtally::platform::config::{load_config, AppConfig, PlatformPaths};
use logtally::util;
use logtally::util::constants;
use std::path::PathBuf;
use std::process::ExitCode;

/// LogTally - per-event breakdowns of structured text logs.
///
/// Reads every .log and .log.gz file in a directory, applies the filters
/// listed in an events file and prints a count or the matching lines for
/// each filter.
#[derive(Parser, Debug)]
#[command(name = "logtally", version, about)]
struct Cli {
    /// Directory containing the log files (not searched recursively).
    #[arg(long = "log-dir")]
    log_dir: PathBuf,

    /// Events configuration file, one filter per line.
    #[arg(long = "events-file")]
    events_file: PathBuf,

    /// Only consider records at or after this time (YYYY-MM-DDTHH:MM:SS).
    #[arg(long)]
    from: Option<String>,

    /// Only consider records at or before this time (YYYY-MM-DDTHH:MM:SS).
    #[arg(long)]
    to: Option<String>,

    /// Path to config.toml (defaults to the platform config directory).
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Report format; overrides [report] format in config.toml.
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Text => ReportFormat::Text,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

fn main() -> ExitCode {
    // Usage errors share the fatal exit code; --help and --version exit 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(constants::EXIT_FATAL)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PlatformPaths::resolve().config_file());
    let (config, config_warnings) = load_config(&config_path);

    util::logging::init(cli.debug, config.log_level.as_deref());

    tracing::info!(
        version = constants::APP_VERSION,
        config = %config_path.display(),
        "LogTally starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    match run(&cli, &config) {
        Ok(summary) => {
            print_summary(&summary);
            if summary.has_failures() {
                ExitCode::from(constants::EXIT_PARTIAL)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Run failed");
            eprintln!("Error: {e}");
            ExitCode::from(constants::EXIT_FATAL)
        }
    }
}

/// Validate inputs, scan, and write the report to stdout.
///
/// Every fatal error surfaces before the first byte of the report.
fn run(cli: &Cli, config: &AppConfig) -> util::error::Result<ScanSummary> {
    let window = TimeWindow::from_args(cli.from.as_deref(), cli.to.as_deref())?;
    let filters = app::events::load_events_file(&cli.events_file)?;

    let discovery_config = DiscoveryConfig {
        include_patterns: config.include_patterns.clone(),
    };
    let parse_config = ParseConfig {
        max_reported_malformed_per_file: config.max_reported_malformed_per_file,
    };

    let outcome = app::scan::run_scan(
        &cli.log_dir,
        &filters,
        &window,
        &discovery_config,
        &parse_config,
    )?;

    let format = cli.format.map(ReportFormat::from).unwrap_or(config.report_format);
    report::render(
        std::io::stdout().lock(),
        &filters,
        &outcome.results,
        format,
        config.separator_width,
    )?;

    Ok(outcome.summary)
}

/// One-line data-quality summary on stderr, only when something was skipped.
fn print_summary(summary: &ScanSummary) {
    if summary.malformed_lines > 0 {
        let files = summary
            .file_summaries
            .iter()
            .filter(|f| f.malformed_lines > 0)
            .count();
        eprintln!(
            "{}: skipped {} malformed line(s) in {files} file(s)",
            constants::APP_NAME,
            summary.malformed_lines
        );
    }
    for failure in &summary.failed_files {
        eprintln!(
            "{}: could not read '{}': {}",
            constants::APP_NAME,
            failure.path.display(),
            failure.reason
        );
    }
}
