//! Snapshot URL grammar: the `/web/<14-digit-timestamp>[id_]/` path segment.
//!
//! The `id_` modifier asks the archive for the literal stored capture instead
//! of the link-rewritten rendition that redirects to the nearest available
//! snapshot.

pub mod resolve;

use chrono::{DateTime, Utc};
use regex::Regex;
use url::Url;
use wayback_core::Error;

use crate::timestamp;

const WEB_BASE: &str = "https://web.archive.org/web";

/// Build a snapshot URL for a target at a timestamp.
pub fn snapshot_url(target: &str, ts: DateTime<Utc>, exact: bool) -> String {
    let modifier = if exact { "id_" } else { "" };
    format!("{WEB_BASE}/{}{modifier}/{target}", timestamp::encode(ts))
}

/// Extract (14-digit timestamp, target URL) from a snapshot URL.
///
/// The trailing part must itself be a valid URL or the whole parse fails.
pub fn parse_snapshot_url(input: &str) -> Result<(String, String), Error> {
    let shape = Regex::new(r"^https?://(?:www\.)?web\.archive\.org/web/(\d{14})(?:id_)?/(.+)$").unwrap();
    let caps = shape
        .captures(input)
        .ok_or_else(|| Error::InvalidSnapshotUrl(input.to_string()))?;

    let target = caps[2].to_string();
    Url::parse(&target).map_err(|_| Error::InvalidSnapshotUrl(input.to_string()))?;

    Ok((caps[1].to_string(), target))
}

/// Resolve the exact-capture URL for raw retrieval.
///
/// A snapshot URL is re-derived into its `id_` form so raw retrieval always
/// requests the literal capture, never the nearest-capture redirect. A plain
/// URL needs `ts` to build one.
pub fn raw_url(input: &str, ts: Option<DateTime<Utc>>) -> Result<String, Error> {
    if let Ok((digits, target)) = parse_snapshot_url(input) {
        return Ok(format!("{WEB_BASE}/{digits}id_/{target}"));
    }

    match ts {
        Some(ts) if Url::parse(input).is_ok() => Ok(snapshot_url(input, ts, true)),
        _ => Err(Error::InvalidSnapshotUrl(input.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_snapshot_url() {
        assert_eq!(
            snapshot_url("https://example.com/", ts(), false),
            "https://web.archive.org/web/20230101000000/https://example.com/"
        );
    }

    #[test]
    fn test_snapshot_url_exact() {
        assert_eq!(
            snapshot_url("https://example.com/", ts(), true),
            "https://web.archive.org/web/20230101000000id_/https://example.com/"
        );
    }

    #[test]
    fn test_parse_snapshot_url() {
        let (digits, target) =
            parse_snapshot_url("https://web.archive.org/web/20230101000000/https://example.com/").unwrap();
        assert_eq!(digits, "20230101000000");
        assert_eq!(target, "https://example.com/");
    }

    #[test]
    fn test_parse_accepts_exact_and_www_forms() {
        let (digits, target) =
            parse_snapshot_url("http://www.web.archive.org/web/20230101000000id_/http://example.com/a").unwrap();
        assert_eq!(digits, "20230101000000");
        assert_eq!(target, "http://example.com/a");
    }

    #[test]
    fn test_parse_rejects_plain_url() {
        assert!(matches!(
            parse_snapshot_url("https://example.com/"),
            Err(Error::InvalidSnapshotUrl(_))
        ));
    }

    #[test]
    fn test_parse_rejects_invalid_target() {
        assert!(matches!(
            parse_snapshot_url("https://web.archive.org/web/20230101000000/not a url"),
            Err(Error::InvalidSnapshotUrl(_))
        ));
    }

    #[test]
    fn test_raw_url_rederives_exact_form() {
        let raw = raw_url("https://web.archive.org/web/20230101000000/https://example.com/", None).unwrap();
        assert_eq!(raw, "https://web.archive.org/web/20230101000000id_/https://example.com/");

        // already-exact input stays exact
        assert_eq!(raw_url(&raw, None).unwrap(), raw);
    }

    #[test]
    fn test_raw_url_builds_from_plain_url() {
        let raw = raw_url("https://example.com/", Some(ts())).unwrap();
        assert_eq!(raw, "https://web.archive.org/web/20230101000000id_/https://example.com/");
    }

    #[test]
    fn test_raw_url_plain_url_needs_timestamp() {
        assert!(matches!(raw_url("https://example.com/", None), Err(Error::InvalidSnapshotUrl(_))));
    }

    #[test]
    fn test_raw_url_rejects_garbage() {
        assert!(matches!(raw_url("not a url", Some(ts())), Err(Error::InvalidSnapshotUrl(_))));
    }
}
