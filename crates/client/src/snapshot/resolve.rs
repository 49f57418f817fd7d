//! Closest-snapshot resolution via the archive's own redirect mechanism.
//!
//! Requesting an exact capture at a timestamp with no stored snapshot makes
//! the archive redirect to the nearest capture it has. Resolution is a
//! single redirect-disabled probe plus a pure match over the interpreted
//! status, rather than a reimplementation of index search.

use chrono::{DateTime, Utc};
use regex::Regex;
use reqwest::header;
use wayback_core::Error;

use crate::{snapshot, timestamp, transport_error};

/// Interpreted outcome of a snapshot probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    /// The exact capture exists at the requested timestamp.
    Exact,
    /// The archive redirected to the nearest capture at this timestamp.
    Nearest(DateTime<Utc>),
    /// No capture exists at or near the requested timestamp.
    Missing,
}

/// Interpret a probe response status and its `Location` header.
///
/// All string inspection happens here; callers match on the closed
/// [`Probe`] set.
pub fn classify(status: u16, location: Option<&str>) -> Result<Probe, Error> {
    match status {
        200 => Ok(Probe::Exact),
        300..=399 => {
            // the archive echoes the id_ modifier back in exact-capture redirects
            let capture = Regex::new(r"/web/(\d{14})(?:id_)?/").unwrap();
            let digits = location.and_then(|loc| capture.captures(loc)).map(|caps| caps[1].to_string());

            match digits {
                Some(digits) => {
                    let ts = timestamp::decode(&digits)
                        .map_err(|_| Error::UnresolvableRedirect(digits.clone()))?;
                    Ok(Probe::Nearest(ts))
                }
                None => Err(Error::UnresolvableRedirect(
                    location.unwrap_or("missing Location header").to_string(),
                )),
            }
        }
        400..=499 => Ok(Probe::Missing),
        500..=599 => Err(Error::UpstreamServer(status)),
        other => Err(Error::UnexpectedStatus(other)),
    }
}

/// Resolver for the capture closest to a requested timestamp.
#[derive(Debug, Clone)]
pub struct SnapshotResolver {
    http: reqwest::Client,
}

impl SnapshotResolver {
    /// `http` must have redirects disabled so 3xx answers stay observable.
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Resolve the timestamp of the capture closest to `desired`.
    ///
    /// `Ok(None)` means the archive holds no capture at or near that
    /// timestamp; a 5xx surfaces as [`Error::UpstreamServer`] for the caller
    /// to retry, this layer never does.
    pub async fn closest(&self, url: &str, desired: DateTime<Utc>) -> Result<Option<DateTime<Utc>>, Error> {
        let probe_url = snapshot::snapshot_url(url, desired, true);

        let response = self.http.get(&probe_url).send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        tracing::debug!("probe {probe_url} -> {status}");

        match classify(status, location.as_deref())? {
            Probe::Exact => Ok(Some(desired)),
            Probe::Nearest(ts) => Ok(Some(ts)),
            Probe::Missing => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_classify_ok() {
        assert_eq!(classify(200, None).unwrap(), Probe::Exact);
    }

    #[test]
    fn test_classify_redirect_with_timestamp() {
        let location = "https://web.archive.org/web/20220601000000/https://example.com/";
        let probe = classify(301, Some(location)).unwrap();
        assert_eq!(probe, Probe::Nearest(Utc.with_ymd_and_hms(2022, 6, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_classify_redirect_with_exact_modifier() {
        let location = "https://web.archive.org/web/20220601000000id_/https://example.com/";
        let probe = classify(302, Some(location)).unwrap();
        assert_eq!(probe, Probe::Nearest(Utc.with_ymd_and_hms(2022, 6, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_classify_redirect_without_location() {
        assert!(matches!(classify(302, None), Err(Error::UnresolvableRedirect(_))));
    }

    #[test]
    fn test_classify_redirect_with_unparseable_location() {
        assert!(matches!(
            classify(302, Some("https://web.archive.org/somewhere-else")),
            Err(Error::UnresolvableRedirect(_))
        ));
    }

    #[test]
    fn test_classify_not_found() {
        assert_eq!(classify(404, None).unwrap(), Probe::Missing);
        assert_eq!(classify(451, None).unwrap(), Probe::Missing);
    }

    #[test]
    fn test_classify_server_error() {
        assert!(matches!(classify(500, None), Err(Error::UpstreamServer(500))));
        assert!(matches!(classify(503, None), Err(Error::UpstreamServer(503))));
    }

    #[test]
    fn test_classify_unexpected_status() {
        assert!(matches!(classify(101, None), Err(Error::UnexpectedStatus(101))));
        assert!(matches!(classify(600, None), Err(Error::UnexpectedStatus(600))));
    }
}
