//! Type coercion, row filtering, calendar derivation and type classification.

use chrono_tz::Tz;
use serde::Serialize;
use tracing::{debug, warn};
use viewing_core::models::{CoercedRow, TitleType, ViewingRecord, DURATION, START_TIME, TITLE};
use viewing_core::time_utils::{calendar_fields, parse_duration, parse_timestamp};

use crate::normalizer::RawTable;

// ── FilterReport ──────────────────────────────────────────────────────────────

/// Counts from the coercion gate.
///
/// A dropped row counts once under every reason that applies to it, so the
/// reason counts may sum to more than [`FilterReport::rows_dropped`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterReport {
    pub rows_read: usize,
    pub rows_retained: usize,
    pub bad_timestamp: usize,
    pub bad_duration: usize,
    pub missing_title: usize,
}

impl FilterReport {
    pub fn rows_dropped(&self) -> usize {
        self.rows_read - self.rows_retained
    }
}

// ── Coercion & filter ─────────────────────────────────────────────────────────

/// Parse start time and duration, and keep rows where both parse and a title
/// is present. Unparsable values never raise; the row is simply dropped.
///
/// A title is missing only when the row has no field at that position. A
/// present field is kept verbatim, empty or not, so `" A"` and `"A"` group
/// as distinct titles.
pub fn coerce_and_filter(table: &RawTable) -> (Vec<CoercedRow>, FilterReport) {
    let mut report = FilterReport {
        rows_read: table.len(),
        ..FilterReport::default()
    };
    let mut rows = Vec::with_capacity(table.len());

    for i in 0..table.len() {
        let start_time = table.cell(i, START_TIME).and_then(parse_timestamp);
        let duration = table.cell(i, DURATION).and_then(parse_duration);
        let title = table.cell(i, TITLE).map(str::to_string);

        if start_time.is_none() {
            report.bad_timestamp += 1;
        }
        if duration.is_none() {
            report.bad_duration += 1;
        }
        if title.is_none() {
            report.missing_title += 1;
        }

        let (Some(start_time), Some(duration), Some(title)) = (start_time, duration, title) else {
            continue;
        };

        rows.push(CoercedRow {
            start_time,
            duration,
            title,
        });
    }

    report.rows_retained = rows.len();
    if report.rows_dropped() > 0 {
        warn!(
            "Dropped {} of {} rows (timestamp: {}, duration: {}, title: {})",
            report.rows_dropped(),
            report.rows_read,
            report.bad_timestamp,
            report.bad_duration,
            report.missing_title
        );
    }
    debug!("Retained {} rows", report.rows_retained);

    (rows, report)
}

// ── Classification & derivation ───────────────────────────────────────────────

/// Label a title `Series` when it contains `season_marker` (case-sensitive).
pub fn classify_title(title: &str, season_marker: &str) -> TitleType {
    if title.contains(season_marker) {
        TitleType::Series
    } else {
        TitleType::Movie
    }
}

/// Parameters of the derivation stage.
#[derive(Debug, Clone)]
pub struct DeriveOptions {
    pub season_marker: String,
    pub timezone: Tz,
}

/// Attach calendar fields and the title type to every coerced row.
pub fn derive_records(rows: Vec<CoercedRow>, options: &DeriveOptions) -> Vec<ViewingRecord> {
    rows.into_iter()
        .map(|row| {
            let calendar = calendar_fields(row.start_time, options.timezone);
            let title_type = classify_title(&row.title, &options.season_marker);
            ViewingRecord {
                row,
                calendar,
                title_type,
            }
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
