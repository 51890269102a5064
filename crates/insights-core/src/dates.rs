use chrono::NaiveDate;
use tracing::debug;

/// Best-effort coercion of a free-form date string into a [`NaiveDate`].
///
/// Handles the formats observed in exported trip logs:
/// * ISO dates, with or without a time-of-day tail (`2024-07-01`,
///   `2024-07-01 18:05:00`, `2024-07-01T18:05:00`).
/// * Slashed and dashed day-first / month-first / year-first orders
///   (`01-07-2024`, `07/01/2024`, `2024/07/01`), each with an optional
///   `H:M` or `H:M:S` tail.
///
/// Returns `None` when no format matches; callers treat that as a per-row
/// filtering rule, not an error.
pub fn parse_date_lenient(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    const DATE_FORMATS: &[&str] = &[
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%d-%m-%Y",
        "%d/%m/%Y",
        "%m/%d/%Y",
    ];
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%d-%m-%Y %H:%M:%S",
        "%d-%m-%Y %H:%M",
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
        "%m/%d/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M",
    ];

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    debug!("could not parse date string {s:?}");
    None
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_date_lenient("2024-07-01"), Some(ymd(2024, 7, 1)));
    }

    #[test]
    fn test_parse_iso_datetime() {
        assert_eq!(
            parse_date_lenient("2024-07-01 18:05:00"),
            Some(ymd(2024, 7, 1))
        );
        assert_eq!(
            parse_date_lenient("2024-07-01T18:05:00"),
            Some(ymd(2024, 7, 1))
        );
    }

    #[test]
    fn test_parse_day_first_dashed() {
        assert_eq!(parse_date_lenient("01-07-2024"), Some(ymd(2024, 7, 1)));
    }

    #[test]
    fn test_parse_day_first_slashed() {
        // 25/12/2024 is unambiguous day-first (month 25 does not exist).
        assert_eq!(parse_date_lenient("25/12/2024"), Some(ymd(2024, 12, 25)));
    }

    #[test]
    fn test_parse_month_first_slashed() {
        // Day-first wins for ambiguous values; 12/25 only parses month-first.
        assert_eq!(parse_date_lenient("12/25/2024"), Some(ymd(2024, 12, 25)));
    }

    #[test]
    fn test_parse_year_first_slashed() {
        assert_eq!(parse_date_lenient("2024/07/01"), Some(ymd(2024, 7, 1)));
    }

    #[test]
    fn test_parse_with_short_time_tail() {
        assert_eq!(
            parse_date_lenient("01/07/2024 09:30"),
            Some(ymd(2024, 7, 1))
        );
    }

    #[test]
    fn test_parse_surrounding_whitespace() {
        assert_eq!(parse_date_lenient("  2024-07-01  "), Some(ymd(2024, 7, 1)));
    }

    #[test]
    fn test_parse_garbage_returns_none() {
        assert_eq!(parse_date_lenient("not-a-date"), None);
        assert_eq!(parse_date_lenient("13/13/2024"), None);
        assert_eq!(parse_date_lenient(""), None);
    }
}
