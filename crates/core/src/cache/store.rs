//! TTL entry operations and the load-or-populate gateway.
//!
//! Every network call in the workspace goes through [`CacheStore::get_or_compute`]
//! (or its value-dependent-TTL sibling): a hit within TTL returns the stored
//! value without invoking the compute closure; a miss runs it, stores the
//! result, and returns it. A failed compute caches nothing and the error
//! propagates to the caller.

use super::connection::CacheStore;
use crate::Error;
use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

impl CacheStore {
    /// Load an entry by key.
    ///
    /// Returns None when the key is absent or its TTL has elapsed.
    pub async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, Error> {
        let key = key.to_string();
        let now = Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<Option<Vec<u8>>, Error> {
                let result = conn.query_row(
                    "SELECT value FROM entries WHERE key = ?1 AND expires_at > ?2",
                    params![key, now],
                    |row| row.get(0),
                );

                match result {
                    Ok(value) => Ok(Some(value)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Insert or replace an entry with the given TTL.
    ///
    /// Uses UPSERT semantics; last write wins on concurrent saves.
    pub async fn save(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), Error> {
        let key = key.to_string();
        let expires_at = (Utc::now() + chrono::Duration::seconds(ttl.as_secs() as i64)).to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO entries (key, value, expires_at) VALUES (?1, ?2, ?3)
                     ON CONFLICT(key) DO UPDATE SET
                        value = excluded.value,
                        expires_at = excluded.expires_at",
                    params![key, value, expires_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Delete expired entries.
    ///
    /// Returns the number of deleted entries. Expiry is the only eviction;
    /// `load` already ignores stale rows, so this is housekeeping only.
    pub async fn purge_expired(&self) -> Result<u64, Error> {
        let now = Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM entries WHERE expires_at < ?1", params![now])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Load a value by key, or compute, store, and return it.
    pub async fn get_or_compute<T, F, Fut>(&self, key: &str, ttl: Duration, compute: F) -> Result<T, Error>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        self.get_or_compute_with(key, |_| ttl, compute).await
    }

    /// Like [`CacheStore::get_or_compute`], with the TTL chosen from the
    /// computed value (CDX queries cache empty results for a shorter window).
    pub async fn get_or_compute_with<T, TtlFn, F, Fut>(
        &self,
        key: &str,
        ttl_for: TtlFn,
        compute: F,
    ) -> Result<T, Error>
    where
        T: Serialize + DeserializeOwned,
        TtlFn: FnOnce(&T) -> Duration,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        if let Some(stored) = self.load(key).await? {
            match serde_json::from_slice(&stored) {
                Ok(value) => return Ok(value),
                // stale payload shape from an older version: recompute
                Err(e) => tracing::warn!("discarding undecodable cache entry {key}: {e}"),
            }
        }

        let value = compute().await?;
        let encoded = serde_json::to_vec(&value).map_err(|e| Error::CacheCodec(e.to_string()))?;
        self.save(key, encoded, ttl_for(&value)).await?;
        Ok(value)
    }
}
