//! Core types and shared functionality for the Wayback client.
//!
//! This crate provides:
//! - TTL key-value cache with SQLite backend
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;

pub use cache::CacheStore;
pub use config::WaybackConfig;
pub use error::Error;
