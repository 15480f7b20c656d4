//! DTSTART / DTEND / DTSTAMP values.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// Offset applied to floating and date-only values (UTC+8).
pub const DEFAULT_FLOATING_OFFSET_SECS: i32 = 8 * 60 * 60;

/// Parse an ICS date or date-time into Unix seconds.
///
/// Handles:
/// - Date only: `20240115` (midnight, at the floating offset)
/// - UTC date: `20240115Z` (midnight UTC)
/// - Floating: `20240115T090000` (at the floating offset)
/// - UTC: `20240115T090000Z`
///
/// `floating_offset_secs` is the offset east of UTC that floating values are
/// read in. Returns None for any other layout or for impossible dates.
pub fn parse_datetime(value: &str, floating_offset_secs: i32) -> Option<i64> {
    if let Some(utc) = value.strip_suffix('Z') {
        let naive = match utc.len() {
            8 => parse_naive_date(utc)?,
            15 => parse_naive_datetime(utc)?,
            _ => return None,
        };
        return Some(naive.and_utc().timestamp());
    }

    let naive = match value.len() {
        8 => parse_naive_date(value)?,
        15 => parse_naive_datetime(value)?,
        _ => return None,
    };

    Some(naive.and_utc().timestamp() - i64::from(floating_offset_secs))
}

/// Format Unix seconds as `YYYYMMDDTHHMMSSZ`.
///
/// Returns None when the instant has no 4-digit year.
pub fn format_utc(timestamp: i64) -> Option<String> {
    let dt = DateTime::from_timestamp(timestamp, 0)?;
    if !(0..=9999).contains(&dt.year()) {
        return None;
    }
    Some(dt.format("%Y%m%dT%H%M%SZ").to_string())
}

/// `YYYYMMDD` as midnight
fn parse_naive_date(value: &str) -> Option<NaiveDateTime> {
    if !all_digits(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y%m%d").ok()?.and_hms_opt(0, 0, 0)
}

/// `YYYYMMDDTHHMMSS` with nothing else around it
fn parse_naive_datetime(value: &str) -> Option<NaiveDateTime> {
    // chrono's %Y also takes a sign or a short year, so pin the layout first
    let (date, time) = value.split_once('T')?;
    if date.len() != 8 || time.len() != 6 || !all_digits(date) || !all_digits(time) {
        return None;
    }
    NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S").ok()
}

fn all_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> i64 {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap().timestamp()
    }

    #[test]
    fn test_date_only_is_midnight_at_floating_offset() {
        assert_eq!(
            parse_datetime("20240115", DEFAULT_FLOATING_OFFSET_SECS),
            Some(utc(2024, 1, 14, 16, 0, 0))
        );
    }

    #[test]
    fn test_floating_datetime_subtracts_offset() {
        assert_eq!(
            parse_datetime("20240115T090000", DEFAULT_FLOATING_OFFSET_SECS),
            Some(utc(2024, 1, 15, 1, 0, 0))
        );
    }

    #[test]
    fn test_utc_datetime_ignores_offset() {
        assert_eq!(
            parse_datetime("20240115T090000Z", DEFAULT_FLOATING_OFFSET_SECS),
            Some(utc(2024, 1, 15, 9, 0, 0))
        );
    }

    #[test]
    fn test_utc_date_only_is_utc_midnight() {
        assert_eq!(
            parse_datetime("20240115Z", DEFAULT_FLOATING_OFFSET_SECS),
            Some(utc(2024, 1, 15, 0, 0, 0))
        );
        assert_eq!(parse_datetime("20240230Z", 0), None);
        assert_eq!(parse_datetime("2024011xZ", 0), None);
    }

    #[test]
    fn test_floating_offset_is_configurable() {
        assert_eq!(parse_datetime("20240115T090000", 0), Some(utc(2024, 1, 15, 9, 0, 0)));
        assert_eq!(
            parse_datetime("20240115T090000", -5 * 3600),
            Some(utc(2024, 1, 15, 14, 0, 0))
        );
    }

    #[test]
    fn test_rejects_other_layouts() {
        for bad in [
            "",
            "2024011",
            "2024-01-15",
            "20240115T0900",
            "20240115T090000X",
            "20240115 090000",
            "+0240115T090000",
            "2024011ST090000Z",
            "20240115T090000ZZ",
            "20240115ZZ",
            "Z",
        ] {
            assert_eq!(
                parse_datetime(bad, DEFAULT_FLOATING_OFFSET_SECS),
                None,
                "should reject {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_rejects_impossible_dates() {
        assert_eq!(parse_datetime("20240230", 0), None);
        assert_eq!(parse_datetime("20241315T090000Z", 0), None);
        assert_eq!(parse_datetime("20240115T250000", 0), None);
    }

    #[test]
    fn test_format_utc_zero_pads() {
        assert_eq!(format_utc(utc(2024, 3, 5, 7, 8, 9)).as_deref(), Some("20240305T070809Z"));
        assert_eq!(format_utc(0).as_deref(), Some("19700101T000000Z"));
    }

    #[test]
    fn test_format_utc_rejects_five_digit_years() {
        assert_eq!(format_utc(utc(9999, 12, 31, 23, 59, 59) + 1), None);
    }

    #[test]
    fn test_format_then_parse_is_identity() {
        let ts = utc(2025, 11, 30, 23, 15, 42);
        let formatted = format_utc(ts).unwrap();
        assert_eq!(parse_datetime(&formatted, DEFAULT_FLOATING_OFFSET_SECS), Some(ts));
    }
}
