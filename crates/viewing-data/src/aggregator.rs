//! Group-and-count / group-and-sum over cleaned viewing records.
//!
//! Every table is computed straight from the record slice; no table is built
//! from another.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{TimeDelta, Weekday};
use viewing_core::models::{TitleType, ViewingRecord};

// ── Aggregates ────────────────────────────────────────────────────────────────

/// The eight aggregate tables handed to the artifact writer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregates {
    /// Count desc, then type.
    pub access_by_type: Vec<(TitleType, u64)>,
    /// Count desc, then title.
    pub access_by_title: Vec<(String, u64)>,
    /// Title asc.
    pub hours_by_title: Vec<(String, TimeDelta)>,
    pub access_by_month: Vec<(u32, u64)>,
    pub access_by_day: Vec<(u32, u64)>,
    /// Monday first.
    pub access_by_weekday: Vec<(Weekday, u64)>,
    pub access_by_hour: Vec<(u32, u64)>,
    /// `[(max_year - 1, n), (max_year, m)]`, or empty without records.
    pub access_comparison: Vec<(i32, u64)>,
}

/// Headline figures over the whole cleaned set.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchTotals {
    pub records: usize,
    pub total_duration: TimeDelta,
    /// `None` without records.
    pub average_duration: Option<TimeDelta>,
    pub unique_titles: usize,
    pub max_year: Option<i32>,
}

// ── ViewingAggregator ─────────────────────────────────────────────────────────

/// Stateless helper that groups viewing records by one dimension at a time.
pub struct ViewingAggregator;

impl ViewingAggregator {
    /// Build all eight tables.
    pub fn aggregate_all(records: &[ViewingRecord]) -> Aggregates {
        Aggregates {
            access_by_type: Self::access_by_type(records),
            access_by_title: Self::access_by_title(records),
            hours_by_title: Self::hours_by_title(records),
            access_by_month: Self::access_by_month(records),
            access_by_day: Self::access_by_day(records),
            access_by_weekday: Self::access_by_weekday(records),
            access_by_hour: Self::access_by_hour(records),
            access_comparison: Self::access_comparison(records),
        }
    }

    pub fn access_by_type(records: &[ViewingRecord]) -> Vec<(TitleType, u64)> {
        by_count_desc(count_by(records, |r| r.title_type))
    }

    pub fn access_by_title(records: &[ViewingRecord]) -> Vec<(String, u64)> {
        by_count_desc(count_by(records, |r| r.title().to_string()))
    }

    pub fn hours_by_title(records: &[ViewingRecord]) -> Vec<(String, TimeDelta)> {
        let mut map: BTreeMap<String, TimeDelta> = BTreeMap::new();
        for record in records {
            let sum = map
                .entry(record.title().to_string())
                .or_insert_with(TimeDelta::zero);
            *sum = *sum + record.duration();
        }
        map.into_iter().collect()
    }

    pub fn access_by_month(records: &[ViewingRecord]) -> Vec<(u32, u64)> {
        count_by(records, |r| r.calendar.month).into_iter().collect()
    }

    pub fn access_by_day(records: &[ViewingRecord]) -> Vec<(u32, u64)> {
        count_by(records, |r| r.calendar.day).into_iter().collect()
    }

    pub fn access_by_weekday(records: &[ViewingRecord]) -> Vec<(Weekday, u64)> {
        // Weekday is not Ord; key on the Monday-based index instead.
        count_by(records, |r| r.calendar.weekday.num_days_from_monday())
            .into_iter()
            .filter_map(|(idx, count)| weekday_from_monday(idx).map(|day| (day, count)))
            .collect()
    }

    pub fn access_by_hour(records: &[ViewingRecord]) -> Vec<(u32, u64)> {
        count_by(records, |r| r.calendar.hour).into_iter().collect()
    }

    /// Counts for the latest year in the data and the year before it.
    ///
    /// The current year comes from the records, never the system clock.
    pub fn access_comparison(records: &[ViewingRecord]) -> Vec<(i32, u64)> {
        let Some(current) = records.iter().map(|r| r.calendar.year).max() else {
            return Vec::new();
        };
        let previous = current - 1;
        let count_year =
            |year: i32| records.iter().filter(|r| r.calendar.year == year).count() as u64;
        vec![(previous, count_year(previous)), (current, count_year(current))]
    }

    /// Total and mean watch time, distinct titles and the latest year.
    pub fn totals(records: &[ViewingRecord]) -> WatchTotals {
        let total_duration = records
            .iter()
            .fold(TimeDelta::zero(), |acc, r| acc + r.duration());
        let average_duration = if records.is_empty() {
            None
        } else {
            Some(TimeDelta::milliseconds(
                total_duration.num_milliseconds() / records.len() as i64,
            ))
        };
        let unique_titles = records
            .iter()
            .map(ViewingRecord::title)
            .collect::<BTreeSet<_>>()
            .len();

        WatchTotals {
            records: records.len(),
            total_duration,
            average_duration,
            unique_titles,
            max_year: records.iter().map(|r| r.calendar.year).max(),
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Count records per key; keys come back sorted.
fn count_by<K: Ord>(
    records: &[ViewingRecord],
    key_fn: impl Fn(&ViewingRecord) -> K,
) -> BTreeMap<K, u64> {
    let mut map: BTreeMap<K, u64> = BTreeMap::new();
    for record in records {
        *map.entry(key_fn(record)).or_insert(0) += 1;
    }
    map
}

/// Order by count descending; the stable sort keeps ties in key order.
fn by_count_desc<K>(counts: BTreeMap<K, u64>) -> Vec<(K, u64)> {
    let mut rows: Vec<(K, u64)> = counts.into_iter().collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1));
    rows
}

fn weekday_from_monday(idx: u32) -> Option<Weekday> {
    match idx {
        0 => Some(Weekday::Mon),
        1 => Some(Weekday::Tue),
        2 => Some(Weekday::Wed),
        3 => Some(Weekday::Thu),
        4 => Some(Weekday::Fri),
        5 => Some(Weekday::Sat),
        6 => Some(Weekday::Sun),
        _ => None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
