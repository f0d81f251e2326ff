//! Wall-clock timestamps as stored in shelf files.
//!
//! Timestamps are naive local times with microsecond precision, written as
//! `YYYY-MM-DD HH:MM:SS.ffffff`. [`now`] truncates to the same precision so
//! an item that is saved and reloaded compares equal field for field.

use chrono::{Local, NaiveDateTime, SubsecRound};

/// Format used when writing timestamps.
pub const WRITE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Format used when reading timestamps. The fractional part is optional.
const READ_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Current local time, truncated to microseconds.
#[must_use]
pub fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(6)
}

#[must_use]
pub fn format(ts: &NaiveDateTime) -> String {
    ts.format(WRITE_FORMAT).to_string()
}

/// # Errors
///
/// Returns the chrono error if `raw` is not a stored timestamp.
pub fn parse(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw.trim(), READ_FORMAT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn format_has_six_fraction_digits() {
        let ts = NaiveDate::from_ymd_opt(2019, 7, 4)
            .unwrap()
            .and_hms_micro_opt(9, 5, 3, 120)
            .unwrap();
        assert_eq!(format(&ts), "2019-07-04 09:05:03.000120");
    }

    #[test]
    fn parse_reads_back_format() {
        let raw = "2019-07-04 09:05:03.123456";
        let ts = parse(raw).unwrap();
        assert_eq!(ts.nanosecond(), 123_456_000);
        assert_eq!(format(&ts), raw);
    }

    #[test]
    fn parse_accepts_missing_fraction() {
        let ts = parse("2019-07-04 09:05:03").unwrap();
        assert_eq!(ts.nanosecond(), 0);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse("yesterday").is_err());
        assert!(parse("2019-13-40 09:05:03.000000").is_err());
    }

    #[test]
    fn now_is_microsecond_precise() {
        assert_eq!(now().nanosecond() % 1_000, 0);
    }
}
