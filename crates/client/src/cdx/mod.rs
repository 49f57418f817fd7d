//! CDX index API client with TTL memoization.
//!
//! ### Specification
//!
//! - **Endpoint**: `http://web.archive.org/cdx/search/cdx`
//! - **Payload**: a JSON array of arrays; row 0 names the fields and is
//!   discarded.
//! - **Limits**: a negative `limit` means "most recent N, reverse
//!   chronological" per the CDX API convention.
//! - **Caching**: per-URL results keep for 3 days when non-empty and 10
//!   minutes when empty; subdomain maps keep for 30 minutes regardless.

pub mod record;

pub use record::{CdxRow, SnapshotRecord};

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use url::Url;
use wayback_core::{CacheStore, Error};

use crate::{normalize, timestamp, transport_error};

const CDX_BASE: &str = "http://web.archive.org/cdx/search/cdx";

/// Most recent captures pulled for a single-URL query.
const URL_QUERY_LIMIT: i32 = -1024;

/// Most recent captures pulled for a domain-match query.
const DOMAIN_QUERY_LIMIT: i32 = -10_000;

const NONEMPTY_TTL: Duration = Duration::from_secs(3 * 24 * 60 * 60);

/// Empty results usually reflect transient index lag, so revalidate sooner.
const EMPTY_TTL: Duration = Duration::from_secs(10 * 60);

const SUBDOMAIN_TTL: Duration = Duration::from_secs(30 * 60);

/// CDX index API client.
#[derive(Debug, Clone)]
pub struct CdxClient {
    http: reqwest::Client,
    cache: CacheStore,
}

impl CdxClient {
    pub fn new(http: reqwest::Client, cache: CacheStore) -> Self {
        Self { http, cache }
    }

    /// List archived captures of an exact URL, newest first.
    pub async fn query_url(&self, url: &str) -> Result<Vec<SnapshotRecord>, Error> {
        let normalized = normalize::canonicalize(url)?;
        let bare = normalized.as_str().trim_start_matches("https://").to_string();

        let http = self.http.clone();
        let query = bare.clone();
        let rows: Vec<CdxRow> = self
            .cache
            .get_or_compute_with(
                &bare,
                |rows: &Vec<CdxRow>| ttl_for_rows(rows),
                move || async move {
                    let rows = fetch_rows(&http, &query, URL_QUERY_LIMIT, false).await?;
                    Ok(sort_rows(rows))
                },
            )
            .await?;

        rows.iter().map(SnapshotRecord::try_from).collect()
    }

    /// List archived captures for the URL's registrable domain.
    ///
    /// Up to 4 trailing labels of subdomain structure are kept.
    pub async fn query_host(&self, url: &str) -> Result<Vec<SnapshotRecord>, Error> {
        let domain = self.domain_of(url, 5)?;
        self.query_url(&format!("https://{domain}")).await
    }

    /// Map every hostname captured under a domain to its earliest seen day.
    ///
    /// The apex domain is always present: it is seeded with today before
    /// folding, a floor that only an actual apex record can lower.
    pub async fn query_subdomains(&self, host: &str) -> Result<BTreeMap<String, NaiveDate>, Error> {
        let domain = self.domain_of(host, 2)?;

        let http = self.http.clone();
        let query = domain.clone();
        self.cache
            .get_or_compute(&format!("host-{domain}"), SUBDOMAIN_TTL, move || async move {
                let rows = fetch_rows(&http, &query, DOMAIN_QUERY_LIMIT, true).await?;
                Ok(first_seen_map(&query, &rows, Utc::now().date_naive()))
            })
            .await
    }

    fn domain_of(&self, url: &str, levels: usize) -> Result<String, Error> {
        let normalized = normalize::canonicalize(url)?;
        let host = normalized
            .host_str()
            .ok_or_else(|| Error::InvalidUrl(format!("{url}: no host")))?;
        Ok(normalize::domain_suffix(host, levels))
    }
}

async fn fetch_rows(
    http: &reqwest::Client,
    query: &str,
    limit: i32,
    domain_match: bool,
) -> Result<Vec<CdxRow>, Error> {
    let limit = limit.to_string();
    let mut request = http
        .get(CDX_BASE)
        .query(&[("url", query), ("output", "json"), ("limit", limit.as_str())]);
    if domain_match {
        request = request.query(&[("matchType", "domain")]);
    }

    let response = request.send().await.map_err(transport_error)?;
    let status = response.status();
    if status.is_server_error() {
        return Err(Error::UpstreamServer(status.as_u16()));
    }
    if !status.is_success() {
        return Err(Error::UnexpectedStatus(status.as_u16()));
    }

    let payload: Vec<Vec<String>> = response
        .json()
        .await
        .map_err(|e| Error::MalformedResponse(format!("CDX payload for {query}: {e}")))?;

    tracing::debug!("CDX {query} returned {} rows", payload.len().saturating_sub(1));

    rows_from_payload(&payload)
}

/// Drop the header row and decode the rest.
fn rows_from_payload(payload: &[Vec<String>]) -> Result<Vec<CdxRow>, Error> {
    payload.iter().skip(1).map(|fields| CdxRow::from_fields(fields)).collect()
}

/// Newest first; the stable sort keeps the index's own order for equal
/// timestamps.
fn sort_rows(mut rows: Vec<CdxRow>) -> Vec<CdxRow> {
    rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    rows
}

fn ttl_for_rows(rows: &[CdxRow]) -> Duration {
    if rows.is_empty() { EMPTY_TTL } else { NONEMPTY_TTL }
}

fn first_seen_map(domain: &str, rows: &[CdxRow], today: NaiveDate) -> BTreeMap<String, NaiveDate> {
    let mut hosts = BTreeMap::new();
    hosts.insert(domain.to_string(), today);

    for row in rows {
        let Some(host) = Url::parse(&row.original)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
        else {
            continue;
        };
        let Ok(day) = timestamp::decode_day(&row.timestamp) else {
            continue;
        };

        hosts
            .entry(host)
            .and_modify(|seen| {
                if day < *seen {
                    *seen = day;
                }
            })
            .or_insert(day);
    }

    hosts
}
