//! Codec for the archive's 14-digit timestamp format (`YYYYMMDDhhmmss`).

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use regex::Regex;
use wayback_core::Error;

const FORMAT: &str = "%Y%m%d%H%M%S";

/// Format a timestamp as 14 digits, UTC, no separators.
pub fn encode<Tz: TimeZone>(t: DateTime<Tz>) -> String {
    t.with_timezone(&Utc).format(FORMAT).to_string()
}

/// Parse a 14-digit timestamp, optionally suffixed with `id_`.
///
/// Anything not matching exactly `\d{14}(id_)?` is rejected, as are
/// calendar-invalid digit runs (month 13 and the like). The result is UTC
/// with second precision.
pub fn decode(text: &str) -> Result<DateTime<Utc>, Error> {
    let shape = Regex::new(r"^(\d{14})(id_)?$").unwrap();
    let caps = shape
        .captures(text)
        .ok_or_else(|| Error::InvalidTimestamp(text.to_string()))?;

    let naive = NaiveDateTime::parse_from_str(&caps[1], FORMAT)
        .map_err(|_| Error::InvalidTimestamp(text.to_string()))?;
    Ok(naive.and_utc())
}

/// Day-precision prefix of a CDX timestamp (`YYYYMMDD...`).
pub fn decode_day(text: &str) -> Result<NaiveDate, Error> {
    let day = text.get(..8).ok_or_else(|| Error::InvalidTimestamp(text.to_string()))?;
    NaiveDate::parse_from_str(day, "%Y%m%d").map_err(|_| Error::InvalidTimestamp(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_encode() {
        let t = Utc.with_ymd_and_hms(2023, 1, 1, 12, 30, 45).unwrap();
        assert_eq!(encode(t), "20230101123045");
    }

    #[test]
    fn test_encode_converts_to_utc() {
        let offset = FixedOffset::east_opt(3600).unwrap();
        let t = offset.with_ymd_and_hms(2023, 1, 1, 13, 30, 45).unwrap();
        assert_eq!(encode(t), "20230101123045");
    }

    #[test]
    fn test_decode() {
        let t = decode("20230101123045").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2023, 1, 1, 12, 30, 45).unwrap());
    }

    #[test]
    fn test_decode_exact_suffix() {
        let t = decode("20230101123045id_").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2023, 1, 1, 12, 30, 45).unwrap());
    }

    #[test]
    fn test_decode_rejects_other_shapes() {
        for input in ["2023-01-01", "20230101", "20230101123045x", "id_20230101123045", ""] {
            assert!(matches!(decode(input), Err(Error::InvalidTimestamp(_))), "accepted {input:?}");
        }
    }

    #[test]
    fn test_decode_rejects_invalid_calendar() {
        assert!(matches!(decode("20231301123045"), Err(Error::InvalidTimestamp(_))));
        assert!(matches!(decode("20230132123045"), Err(Error::InvalidTimestamp(_))));
    }

    #[test]
    fn test_round_trip() {
        let t = Utc.with_ymd_and_hms(1999, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(decode(&encode(t)).unwrap(), t);
    }

    #[test]
    fn test_decode_day() {
        let day = decode_day("20230101123045").unwrap();
        assert_eq!(day, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
    }

    #[test]
    fn test_decode_day_rejects_short_input() {
        assert!(matches!(decode_day("2023"), Err(Error::InvalidTimestamp(_))));
    }
}
