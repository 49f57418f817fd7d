//! SQLite-backed TTL cache for archive queries and raw capture bodies.
//!
//! This module provides a persistent key-value cache using SQLite with async
//! access via tokio-rusqlite. It supports:
//!
//! - Per-entry expiration (TTL is the only eviction; no LRU, no size bound)
//! - A load-or-populate gateway that wraps network calls
//! - Content-addressed keys for raw bodies using SHA-256 hashing
//! - Automatic schema migrations
//! - WAL mode for concurrent access

pub mod connection;
pub mod key;
pub mod migrations;
pub mod store;

pub use crate::Error;

pub use connection::CacheStore;
pub use key::body_cache_key;
