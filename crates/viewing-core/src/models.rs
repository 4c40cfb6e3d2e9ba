use chrono::{DateTime, TimeDelta, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

// ── Raw export schema ─────────────────────────────────────────────────────────

pub const PROFILE_NAME: &str = "Profile Name";
pub const START_TIME: &str = "Start Time";
pub const DURATION: &str = "Duration";
pub const ATTRIBUTES: &str = "Attributes";
pub const TITLE: &str = "Title";
pub const SUPPLEMENTAL_VIDEO_TYPE: &str = "Supplemental Video Type";
pub const DEVICE_TYPE: &str = "Device Type";
pub const BOOKMARK: &str = "Bookmark";
pub const LATEST_BOOKMARK: &str = "Latest Bookmark";
pub const COUNTRY: &str = "Country";

/// Positional column names of a viewing activity export.
pub const CANONICAL_COLUMNS: [&str; 10] = [
    PROFILE_NAME,
    START_TIME,
    DURATION,
    ATTRIBUTES,
    TITLE,
    SUPPLEMENTAL_VIDEO_TYPE,
    DEVICE_TYPE,
    BOOKMARK,
    LATEST_BOOKMARK,
    COUNTRY,
];

/// Placeholder name for the `index`-th field beyond the canonical schema.
pub fn extra_column_name(index: usize) -> String {
    format!("Extra Column {}", index)
}

/// Substring that marks multi-episode content in English exports.
pub const DEFAULT_SEASON_MARKER: &str = "Season";

// ── TitleType ─────────────────────────────────────────────────────────────────

/// Coarse content classification derived from the title text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TitleType {
    Movie,
    Series,
}

impl TitleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TitleType::Movie => "Movie",
            TitleType::Series => "Series",
        }
    }
}

impl fmt::Display for TitleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Records ───────────────────────────────────────────────────────────────────

/// A raw row that passed the timestamp / duration / title gate.
#[derive(Debug, Clone, PartialEq)]
pub struct CoercedRow {
    /// Playback start, interpreted as UTC.
    pub start_time: DateTime<Utc>,
    /// Elapsed playback time.
    pub duration: TimeDelta,
    /// Title field exactly as exported.
    pub title: String,
}

/// Calendar fields derived from a start timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarFields {
    pub year: i32,
    /// 1–12.
    pub month: u32,
    /// 1–31.
    pub day: u32,
    pub weekday: Weekday,
    /// 0–23.
    pub hour: u32,
}

/// A cleaned viewing record: a coerced row plus its derived fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewingRecord {
    pub row: CoercedRow,
    pub calendar: CalendarFields,
    pub title_type: TitleType,
}

impl ViewingRecord {
    pub fn title(&self) -> &str {
        &self.row.title
    }

    pub fn duration(&self) -> TimeDelta {
        self.row.duration
    }
}
