//! Utility functions shared across the workspace
//!
//! Date windows are expressed in naive local date-times and converted to
//! epoch seconds as UTC, matching what the telemetry API expects.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};

/// Midnight at the start of `date`
pub fn day_start(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// The last representable instant of `date` (23:59:59.999999999)
pub fn day_end(date: NaiveDate) -> NaiveDateTime {
    let last = NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap_or(NaiveTime::MIN);
    date.and_time(last)
}

/// Every date from `from` to `to` inclusive. Empty when `from > to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut current = from;

    while current <= to {
        days.push(current);
        match current.checked_add_days(Days::new(1)) {
            Some(next) => current = next,
            None => break,
        }
    }

    days
}

/// Seconds since the Unix epoch, reading `value` as UTC
pub fn to_epoch_seconds(value: NaiveDateTime) -> i64 {
    value.and_utc().timestamp()
}

/// Render a decimal the way alert messages and documents show numbers:
/// always with a fractional part (`70.0`, `150.5`).
pub fn format_decimal(value: f64) -> String {
    format!("{:?}", value)
}

/// Parse a `yyyy-MM-dd` path segment
pub fn parse_iso_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, crate::DATE_FORMAT)
        .map_err(|e| format!("Invalid date '{}', expected yyyy-MM-dd: {}", value, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_bounds() {
        let d = date(2025, 11, 5);
        assert_eq!(day_start(d).to_string(), "2025-11-05 00:00:00");
        assert_eq!(day_end(d).to_string(), "2025-11-05 23:59:59.999999999");
        assert_eq!(to_epoch_seconds(day_end(d)) - to_epoch_seconds(day_start(d)), 86_399);
    }

    #[test]
    fn test_days_between() {
        assert_eq!(
            days_between(date(2025, 10, 30), date(2025, 11, 1)),
            vec![date(2025, 10, 30), date(2025, 10, 31), date(2025, 11, 1)]
        );
        assert_eq!(days_between(date(2025, 11, 5), date(2025, 11, 5)).len(), 1);
        assert!(days_between(date(2025, 11, 7), date(2025, 11, 5)).is_empty());
        assert_eq!(days_between(date(2024, 1, 1), date(2024, 12, 31)).len(), 366);
    }

    #[test]
    fn test_epoch_seconds() {
        assert_eq!(to_epoch_seconds(day_start(date(1970, 1, 2))), 86_400);
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(70.0), "70.0");
        assert_eq!(format_decimal(150.5), "150.5");
        assert_eq!(format_decimal(0.0), "0.0");
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_iso_date("2025-11-05"), Ok(date(2025, 11, 5)));
        assert!(parse_iso_date("11-05-2025").is_err());
        assert!(parse_iso_date("invalid").is_err());
        assert!(parse_iso_date("2025-02-30").is_err());
    }
}
