//! Unified error types for the Wayback client workspace.
//!
//! Validation failures are detected before any network call; transport and
//! service anomalies carry the offending URL or status so callers can
//! diagnose them.

use tokio_rusqlite::rusqlite;

/// Unified error type for archive operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed input URL, rejected before any I/O.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Text does not match the archive's 14-digit timestamp format.
    #[error("invalid archive timestamp: {0}")]
    InvalidTimestamp(String),

    /// Not a Wayback snapshot URL, and no timestamp to build one from.
    #[error("not a snapshot URL: {0}")]
    InvalidSnapshotUrl(String),

    /// The underlying fetch could not complete.
    #[error("archive not reachable: {0}")]
    Unreachable(String),

    /// The archive returned a payload the client cannot decode.
    #[error("malformed archive response: {0}")]
    MalformedResponse(String),

    /// A nearest-capture redirect carried no usable timestamp.
    #[error("unresolvable archive redirect: {0}")]
    UnresolvableRedirect(String),

    /// Status code outside the interpreted ranges.
    #[error("unexpected archive status {0}")]
    UnexpectedStatus(u16),

    /// 5xx from the archive. Retryable by the caller; never retried here.
    #[error("archive server error {0}")]
    UpstreamServer(u16),

    /// Cache location could not be created.
    #[error("cache path error: {0}")]
    CachePath(String),

    /// Cache payload could not be encoded.
    #[error("cache codec error: {0}")]
    CacheCodec(String),

    /// Database operation failed.
    #[error("cache database error: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("cache migration failed: {0}")]
    MigrationFailed(String),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}
