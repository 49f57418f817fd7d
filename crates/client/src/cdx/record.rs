//! CDX index rows and the snapshot records shaped from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wayback_core::Error;

use crate::timestamp;

/// One row of the CDX JSON payload, in the index's own field order.
///
/// Rows are cached verbatim; [`SnapshotRecord`]s are shaped from them on
/// every query, cache hit or miss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CdxRow {
    pub urlkey: String,
    pub timestamp: String,
    pub original: String,
    pub mimetype: String,
    pub statuscode: String,
    pub digest: String,
    pub length: String,
}

impl CdxRow {
    /// Decode one positional JSON row (`[urlkey, timestamp, original, ...]`).
    pub fn from_fields(fields: &[String]) -> Result<Self, Error> {
        match fields {
            [urlkey, timestamp, original, mimetype, statuscode, digest, length, ..] => Ok(Self {
                urlkey: urlkey.clone(),
                timestamp: timestamp.clone(),
                original: original.clone(),
                mimetype: mimetype.clone(),
                statuscode: statuscode.clone(),
                digest: digest.clone(),
                length: length.clone(),
            }),
            _ => Err(Error::MalformedResponse(format!(
                "CDX row has {} fields, expected 7",
                fields.len()
            ))),
        }
    }
}

/// One archived capture of a URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    /// Fully qualified snapshot URL.
    pub link: String,
    /// Content type as reported by the index.
    pub mime_type: String,
    /// HTTP status recorded at capture time; 0 when the index reports `-`.
    pub status_code: u16,
    /// Captured payload length as reported by the index; 0 when `-`.
    pub length: u64,
    /// Capture timestamp, UTC, second precision. Always agrees with the
    /// 14-digit component embedded in `link`.
    pub date: DateTime<Utc>,
}

impl TryFrom<&CdxRow> for SnapshotRecord {
    type Error = Error;

    fn try_from(row: &CdxRow) -> Result<Self, Error> {
        let date = timestamp::decode(&row.timestamp)?;

        Ok(Self {
            link: format!("http://web.archive.org/web/{}/{}", row.timestamp, row.original),
            mime_type: row.mimetype.clone(),
            status_code: row.statuscode.parse().unwrap_or(0),
            length: row.length.parse().unwrap_or(0),
            date,
        })
    }
}
