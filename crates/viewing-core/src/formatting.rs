use chrono::TimeDelta;

/// Format an elapsed time as `HH:MM:SS`, truncating sub-second precision.
///
/// Hours are not wrapped at 24 and grow beyond two digits when needed.
/// Negative values are clamped to zero.
///
/// # Examples
///
/// ```
/// use chrono::TimeDelta;
/// use viewing_core::formatting::format_hms;
///
/// assert_eq!(format_hms(TimeDelta::minutes(30)), "00:30:00");
/// assert_eq!(format_hms(TimeDelta::hours(26) + TimeDelta::minutes(5)), "26:05:00");
/// ```
pub fn format_hms(duration: TimeDelta) -> String {
    let total_seconds = duration.num_seconds().max(0);
    let hours = total_seconds / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Format a count with thousands separators.
///
/// # Examples
///
/// ```
/// use viewing_core::formatting::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(1_234_567), "1,234,567");
/// ```
pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero.
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let raw = (part / whole) * 100.0;
    let factor = 10_f64.powi(decimal_places as i32);
    (raw * factor).round() / factor
}

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hms_zero() {
        assert_eq!(format_hms(TimeDelta::zero()), "00:00:00");
    }

    #[test]
    fn test_format_hms_mixed() {
        assert_eq!(format_hms(TimeDelta::seconds(3_725)), "01:02:05");
    }

    #[test]
    fn test_format_hms_over_a_day() {
        assert_eq!(format_hms(TimeDelta::hours(100)), "100:00:00");
    }

    #[test]
    fn test_format_hms_truncates_subseconds() {
        assert_eq!(format_hms(TimeDelta::milliseconds(59_999)), "00:00:59");
    }

    #[test]
    fn test_format_hms_negative_clamped() {
        assert_eq!(format_hms(TimeDelta::seconds(-10)), "00:00:00");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(5), "5");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn test_percentage() {
        assert!((percentage(50.0, 200.0, 1) - 25.0).abs() < 1e-9);
        assert_eq!(percentage(10.0, 0.0, 2), 0.0);
    }
}
