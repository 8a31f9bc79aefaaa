// LogTally - core/report.rs
//
// Text and JSON rendering of per-filter results.
// Core layer: writes to any Write trait object.

use crate::core::filter::EventFilter;
use crate::core::model::FilterResult;
use crate::util::error::ReportError;
use serde::Serialize;
use std::io::Write;

/// Output format of the report on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// One separator-led block per filter.
    #[default]
    Text,

    /// A JSON array with one object per filter.
    Json,
}

/// Render one block per (filter, result) pair, in the given order.
pub fn render<W: Write>(
    writer: W,
    filters: &[EventFilter],
    results: &[FilterResult],
    format: ReportFormat,
    separator_width: usize,
) -> Result<(), ReportError> {
    debug_assert_eq!(filters.len(), results.len());
    match format {
        ReportFormat::Text => render_text(writer, filters, results, separator_width),
        ReportFormat::Json => render_json(writer, filters, results),
    }
}

/// Text report. Each block is:
///
/// ```text
/// --------------------
/// Event: GNMI level [ERROR] — matching log lines:
/// <raw line>
/// ```
///
/// or, in count mode, `Event: ... count — matches: N entries`.
pub fn render_text<W: Write>(
    mut writer: W,
    filters: &[EventFilter],
    results: &[FilterResult],
    separator_width: usize,
) -> Result<(), ReportError> {
    let separator = "-".repeat(separator_width);

    for (filter, result) in filters.iter().zip(results) {
        writeln!(writer, "{separator}")?;
        match result {
            FilterResult::Count { matches } => {
                writeln!(writer, "{filter} — matches: {matches} entries")?;
            }
            FilterResult::Lines { lines } => {
                writeln!(writer, "{filter} — matching log lines:")?;
                for line in lines {
                    writeln!(writer, "{line}")?;
                }
            }
        }
    }

    writer.flush()?;
    Ok(())
}

/// One filter's configuration and outcome in the JSON report.
#[derive(Debug, Serialize)]
struct JsonBlock<'a> {
    event_type: &'a str,
    level: Option<&'a str>,
    pattern: Option<&'a str>,
    count_only: bool,
    result: &'a FilterResult,
}

/// JSON report: a pretty-printed array of blocks in filter order.
pub fn render_json<W: Write>(
    mut writer: W,
    filters: &[EventFilter],
    results: &[FilterResult],
) -> Result<(), ReportError> {
    let blocks: Vec<JsonBlock<'_>> = filters
        .iter()
        .zip(results)
        .map(|(filter, result)| JsonBlock {
            event_type: &filter.event_type,
            level: filter.level.as_deref(),
            pattern: filter.pattern_str(),
            count_only: filter.count_only,
            result,
        })
        .collect();

    serde_json::to_writer_pretty(&mut writer, &blocks)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
