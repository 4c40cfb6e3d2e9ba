use std::fmt::Write as _;

use viewing_core::formatting::{format_count, percentage};
use viewing_data::pipeline::RunSummary;

/// Render the human-readable run summary printed on stdout.
pub fn render_summary(summary: &RunSummary) -> String {
    let filter = &summary.filter;
    let mut out = String::new();

    let _ = writeln!(out, "Viewing activity: {}", summary.viewing_file.display());
    let _ = writeln!(
        out,
        "Clickstream:      {} ({} records)",
        summary.clickstream_file.display(),
        format_count(summary.clickstream_records as u64)
    );
    let _ = writeln!(
        out,
        "Rows retained:    {} of {} ({}%)",
        format_count(filter.rows_retained as u64),
        format_count(filter.rows_read as u64),
        percentage(filter.rows_retained as f64, filter.rows_read as f64, 1)
    );
    if filter.rows_dropped() > 0 {
        let _ = writeln!(
            out,
            "Rows dropped:     {} (bad start time {}, bad duration {}, missing title {})",
            format_count(filter.rows_dropped() as u64),
            filter.bad_timestamp,
            filter.bad_duration,
            filter.missing_title
        );
    }
    let _ = writeln!(out, "Schema warnings:  {}", summary.schema_warnings());
    let _ = writeln!(out, "Total watch time: {}", summary.total_watch_time);
    let _ = writeln!(
        out,
        "Average session:  {}",
        summary.average_watch_time.as_deref().unwrap_or("-")
    );
    let _ = writeln!(
        out,
        "Unique titles:    {}",
        format_count(summary.unique_titles as u64)
    );
    if let Some(year) = summary.current_year {
        let _ = writeln!(out, "Current year:     {}", year);
    }
    let _ = writeln!(out, "Artifacts written: {}", summary.artifacts.len());
    for path in &summary.artifacts {
        let _ = writeln!(out, "  {}", path.display());
    }

    out
}
