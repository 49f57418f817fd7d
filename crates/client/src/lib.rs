//! Client for the Internet Archive's Wayback Machine.
//!
//! This crate discovers archived snapshots through the CDX index API,
//! resolves the capture closest to a requested timestamp by following the
//! archive's own redirect mechanism, retrieves raw archived bytes, and
//! submits URLs for archiving. Every network call goes through the TTL cache
//! from `wayback-core`.
//!
//! Archived bytes are an opaque payload: nothing here crawls, bulk-downloads,
//! or renders captured content.

pub mod cdx;
pub mod normalize;
pub mod snapshot;
pub mod timestamp;

pub use cdx::{CdxClient, CdxRow, SnapshotRecord};
pub use snapshot::resolve::{Probe, SnapshotResolver};
pub use wayback_core::{CacheStore, Error, WaybackConfig};

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, NaiveDate, Utc};
use wayback_core::cache::body_cache_key;

const SAVE_BASE: &str = "https://web.archive.org/save";

/// Raw capture bodies keep as long as non-empty CDX results.
const RAW_BODY_TTL: Duration = Duration::from_secs(3 * 24 * 60 * 60);

/// Map a reqwest failure onto the transport side of the error taxonomy.
pub(crate) fn transport_error(e: reqwest::Error) -> Error {
    if e.is_decode() || e.is_body() {
        Error::MalformedResponse(e.to_string())
    } else {
        Error::Unreachable(e.to_string())
    }
}

/// Wayback Machine client.
///
/// Owns the HTTP clients and the cache store; create one per application and
/// share it. All operations are a single cache lookup plus at most one
/// network round trip; callers wanting parallelism run independent calls
/// concurrently themselves.
#[derive(Debug, Clone)]
pub struct Wayback {
    http: reqwest::Client,
    cache: CacheStore,
    cdx: CdxClient,
    resolver: SnapshotResolver,
    config: WaybackConfig,
}

impl Wayback {
    /// Create a client with default configuration.
    ///
    /// The cache lands in the system temporary directory under `wayback/`.
    pub async fn new() -> Result<Self, Error> {
        Self::with_config(WaybackConfig::default()).await
    }

    /// Create a client with the cache at a specific location.
    pub async fn with_cache_path(path: impl Into<PathBuf>) -> Result<Self, Error> {
        Self::with_config(WaybackConfig { cache_path: path.into(), ..Default::default() }).await
    }

    /// Create a client with the given configuration.
    pub async fn with_config(config: WaybackConfig) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout())
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Unreachable(format!("failed to build HTTP client: {e}")))?;

        // probe client: redirects must stay observable for closest-snapshot
        // resolution
        let probe = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout())
            .redirect(reqwest::redirect::Policy::none())
            .use_rustls_tls()
            .build()
            .map_err(|e| Error::Unreachable(format!("failed to build HTTP client: {e}")))?;

        let cache = CacheStore::open(&config.cache_path).await?;

        Ok(Self {
            http: http.clone(),
            cache: cache.clone(),
            cdx: CdxClient::new(http, cache),
            resolver: SnapshotResolver::new(probe),
            config,
        })
    }

    /// List archived captures of a URL, newest first.
    pub async fn snapshots(&self, url: &str) -> Result<Vec<SnapshotRecord>, Error> {
        self.cdx.query_url(url).await
    }

    /// List archived captures for the URL's registrable domain.
    pub async fn snapshots_by_host(&self, url: &str) -> Result<Vec<SnapshotRecord>, Error> {
        self.cdx.query_host(url).await
    }

    /// Map every hostname captured under a domain to its earliest seen day.
    pub async fn subdomains(&self, host: &str) -> Result<BTreeMap<String, NaiveDate>, Error> {
        self.cdx.query_subdomains(host).await
    }

    /// Resolve the timestamp of the capture closest to `when`.
    ///
    /// `Ok(None)` means the archive holds nothing at or near that timestamp.
    pub async fn closest_snapshot(&self, url: &str, when: DateTime<Utc>) -> Result<Option<DateTime<Utc>>, Error> {
        self.resolver.closest(url, when).await
    }

    /// Fetch the raw bytes of a capture.
    ///
    /// `url` is either a snapshot URL (re-derived into its exact `id_` form)
    /// or a plain URL paired with `when`. This path is fetch-or-absent: any
    /// fetch failure yields `Ok(None)` without caching, since archived
    /// content frequently 404s or times out and callers treat absence as
    /// normal. Invalid input still fails with [`Error::InvalidSnapshotUrl`].
    pub async fn raw_snapshot(&self, url: &str, when: Option<DateTime<Utc>>) -> Result<Option<Bytes>, Error> {
        let target = snapshot::raw_url(url, when)?;
        let key = body_cache_key(&target);

        if let Some(stored) = self.cache.load(&key).await? {
            return Ok(Some(Bytes::from(stored)));
        }

        let body = match self.fetch_body(&target).await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!("raw capture fetch failed for {target}: {e}");
                return Ok(None);
            }
        };

        self.cache.save(&key, body.to_vec(), RAW_BODY_TTL).await?;
        Ok(Some(body))
    }

    /// Ask the archive to capture a URL now.
    ///
    /// The URL must be syntactically valid; the response body is not
    /// interpreted and success of the submission itself is not verified
    /// beyond the request completing.
    pub async fn save_url(&self, url: &str) -> Result<(), Error> {
        let parsed = url::Url::parse(url).map_err(|e| Error::InvalidUrl(format!("{url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::InvalidUrl(format!("{url}: unsupported scheme {}", parsed.scheme())));
        }

        let encoded: String = url::form_urlencoded::byte_serialize(url.as_bytes()).collect();
        let save_url = format!("{SAVE_BASE}/{encoded}");

        tracing::debug!("submitting {url} for archiving");
        self.http.get(&save_url).send().await.map_err(transport_error)?;
        Ok(())
    }

    /// Get reference to the cache store.
    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &WaybackConfig {
        &self.config
    }

    async fn fetch_body(&self, url: &str) -> Result<Bytes, Error> {
        let response = self.http.get(url).send().await.map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::UnexpectedStatus(status.as_u16()));
        }

        response.bytes().await.map_err(transport_error)
    }
}
