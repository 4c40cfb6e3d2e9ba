use std::sync::OnceLock;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use regex::Regex;

use crate::models::CalendarFields;

// ── Timestamps ────────────────────────────────────────────────────────────────

/// Parse an export start time into a UTC [`DateTime`].
///
/// Accepts RFC 3339 (with `Z` or an explicit offset) and the naive
/// `YYYY-MM-DD[ T]HH:MM[:SS[.f]]` / `YYYY-MM-DD` forms, which are taken to be
/// UTC. Returns `None` for blank or unrecognised input.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let normalised = if let Some(stripped) = s.strip_suffix('Z') {
        format!("{}+00:00", stripped)
    } else {
        s.to_string()
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalised) {
        return Some(dt.with_timezone(&Utc));
    }

    const FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

// ── Durations ─────────────────────────────────────────────────────────────────

fn duration_re() -> &'static Regex {
    static DURATION_RE: OnceLock<Regex> = OnceLock::new();
    DURATION_RE.get_or_init(|| {
        Regex::new(r"^(?:(\d+)\s+days?,?\s+)?(\d+):([0-5]?\d):([0-5]?\d)(?:\.(\d{1,9}))?$")
            .expect("valid duration regex")
    })
}

/// Parse an elapsed-time string with hours:minutes:seconds semantics.
///
/// Hours are unbounded (`"26:00:00"` is valid) and an optional
/// `"N days "` prefix is honoured. Anything else yields `None`.
pub fn parse_duration(s: &str) -> Option<TimeDelta> {
    let caps = duration_re().captures(s.trim())?;

    let days: i64 = match caps.get(1) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };
    let hours: i64 = caps[2].parse().ok()?;
    let minutes: i64 = caps[3].parse().ok()?;
    let seconds: i64 = caps[4].parse().ok()?;

    let total = days
        .checked_mul(86_400)?
        .checked_add(hours.checked_mul(3_600)?)?
        .checked_add(minutes * 60 + seconds)?;

    let nanos: i64 = match caps.get(5) {
        Some(m) => format!("{:0<9}", m.as_str()).parse().ok()?,
        None => 0,
    };

    TimeDelta::try_seconds(total)?.checked_add(&TimeDelta::nanoseconds(nanos))
}

// ── Calendar fields ───────────────────────────────────────────────────────────

/// English day name, e.g. `"Monday"`.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Resolve an IANA timezone name.
pub fn parse_timezone(name: &str) -> Option<Tz> {
    name.trim().parse::<Tz>().ok()
}

/// Derive year, month, day, weekday and hour of `ts` as seen in `tz`.
pub fn calendar_fields(ts: DateTime<Utc>, tz: Tz) -> CalendarFields {
    let local = ts.with_timezone(&tz);
    CalendarFields {
        year: local.year(),
        month: local.month(),
        day: local.day(),
        weekday: local.weekday(),
        hour: local.hour(),
    }
}
