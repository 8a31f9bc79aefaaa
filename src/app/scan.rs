// LogTally - app/scan.rs
//
// Single-pass scan pipeline: discovery -> per-file line stream -> parse ->
// time window -> every filter.
//
// Files are processed strictly one after another on the calling thread.
// Per-filter results are threaded explicitly through the call chain; there
// is no shared or global state. A malformed line or an unreadable file never
// aborts the run.

use crate::core::discovery::{self, DiscoveryConfig};
use crate::core::filter::EventFilter;
use crate::core::model::{FileFailure, FileSummary, FilterResult, ScanSummary};
use crate::core::parser::{self, ParseConfig};
use crate::core::window::TimeWindow;
use crate::platform::fs::{open_log_reader, LogLines};
use crate::util::constants;
use crate::util::error::DiscoveryError;
use std::io::{self, BufRead};
use std::path::Path;
use std::time::Instant;

/// Everything a completed scan produced.
#[derive(Debug)]
pub struct ScanOutcome {
    /// One result per filter, in filter order.
    pub results: Vec<FilterResult>,

    /// Data-quality statistics.
    pub summary: ScanSummary,

    /// Non-fatal discovery warnings (inaccessible directory entries).
    pub warnings: Vec<String>,
}

/// Run the full scan over the log files in `root`.
///
/// Returns `Err` only when the directory itself is unusable. Files that cannot
/// be accessed, opened or fully decoded are recorded in
/// `summary.failed_files` and contribute no matches, even if they failed
/// part-way through.
pub fn run_scan(
    root: &Path,
    filters: &[EventFilter],
    window: &TimeWindow,
    discovery_config: &DiscoveryConfig,
    parse_config: &ParseConfig,
) -> Result<ScanOutcome, DiscoveryError> {
    let started = Instant::now();

    let discovered = discovery::discover_files(root, discovery_config)?;
    let files = discovered.files;
    let warnings = discovered.warnings;
    for warning in &warnings {
        tracing::warn!(warning = %warning, "Discovery warning");
    }

    tracing::info!(
        root = %root.display(),
        files = files.len(),
        filters = filters.len(),
        unbounded_window = window.is_unbounded(),
        "Scan starting"
    );

    let mut results: Vec<FilterResult> = filters.iter().map(EventFilter::empty_result).collect();
    let mut summary = ScanSummary {
        files_discovered: files.len() + discovered.failures.len(),
        ..Default::default()
    };

    for failure in discovered.failures {
        tracing::warn!(
            file = %failure.path.display(),
            error = %failure.reason,
            "Log file not accessible; skipping"
        );
        summary.failed_files.push(failure);
    }

    for file in &files {
        let mut file_summary = FileSummary {
            path: file.path.clone(),
            ..Default::default()
        };

        // Matches are only merged once the whole file has been read.
        let mut file_results: Vec<FilterResult> =
            filters.iter().map(EventFilter::empty_result).collect();

        let outcome = open_log_reader(&file.path).and_then(|reader| {
            scan_reader(
                reader,
                &file.path,
                filters,
                window,
                &mut file_results,
                &mut file_summary,
                parse_config,
            )
        });

        match outcome {
            Ok(()) => {
                for (total, partial) in results.iter_mut().zip(file_results) {
                    total.merge(partial);
                }
                summary.files_read += 1;
                tracing::debug!(
                    file = %file.path.display(),
                    compressed = file.compressed,
                    lines = file_summary.lines_read,
                    in_window = file_summary.records_in_window,
                    "File scanned"
                );
            }
            Err(e) => {
                let discarded: u64 = file_results.iter().map(FilterResult::match_count).sum();
                tracing::warn!(
                    file = %file.path.display(),
                    lines_read = file_summary.lines_read,
                    error = %e,
                    discarded_matches = discarded,
                    "Failed to read log file; skipping it"
                );
                summary.failed_files.push(FileFailure {
                    path: file.path.clone(),
                    reason: e.to_string(),
                });
            }
        }

        summary.lines_read += file_summary.lines_read;
        summary.malformed_lines += file_summary.malformed_lines;
        summary.outside_window += file_summary.outside_window;
        summary.file_summaries.push(file_summary);
    }

    summary.duration = started.elapsed();

    tracing::info!(
        files = summary.files_discovered,
        files_failed = summary.failed_files.len(),
        lines = summary.lines_read,
        malformed = summary.malformed_lines,
        outside_window = summary.outside_window,
        duration_ms = summary.duration.as_millis() as u64,
        "Scan complete"
    );

    Ok(ScanOutcome {
        results,
        summary,
        warnings,
    })
}

/// Stream every line of `reader` through the parser, window and filters.
///
/// `results` must hold one entry per filter, created by
/// [`EventFilter::empty_result`]. Statistics are added to `stats` as lines
/// are read, so they are accurate up to the point of an I/O error.
pub fn scan_reader<R: BufRead>(
    reader: R,
    source: &Path,
    filters: &[EventFilter],
    window: &TimeWindow,
    results: &mut [FilterResult],
    stats: &mut FileSummary,
    parse_config: &ParseConfig,
) -> io::Result<()> {
    debug_assert_eq!(filters.len(), results.len());

    for (idx, line) in LogLines::new(reader).enumerate() {
        let line = line?;
        stats.lines_read += 1;

        let record = match parser::parse_line(&line) {
            Ok(record) => record,
            Err(e) => {
                stats.malformed_lines += 1;
                if stats.malformed_lines <= parse_config.max_reported_malformed_per_file as u64 {
                    let preview: String =
                        line.chars().take(constants::DEBUG_MAX_LINE_PREVIEW).collect();
                    tracing::debug!(
                        file = %source.display(),
                        line_number = idx + 1,
                        reason = %e,
                        line = %preview,
                        "Skipping malformed line"
                    );
                }
                continue;
            }
        };

        if !window.contains(&record.timestamp) {
            stats.outside_window += 1;
            continue;
        }
        stats.records_in_window += 1;

        for (filter, result) in filters.iter().zip(results.iter_mut()) {
            filter.evaluate(result, &record);
        }
    }

    if stats.malformed_lines > 0 {
        tracing::warn!(
            file = %source.display(),
            malformed = stats.malformed_lines,
            lines = stats.lines_read,
            "Skipped malformed lines"
        );
    }

    Ok(())
}
