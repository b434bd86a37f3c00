//! Packagist lookup core
//!
//! Host-agnostic package metadata pipeline: a registry client fetches the
//! per-package JSON document, a SQLite cache keeps it across restarts, and
//! the store ties the two together (check cache, fetch on miss).
//!
//! # Modules
//!
//! - [`cache`]: SQLite-based metadata cache with recency eviction
//! - [`client`]: Packagist HTTP client behind the [`client::MetadataSource`] trait
//! - [`metadata`]: typed extraction from the raw registry response
//! - [`store`]: lookup orchestration (cache hit / fetch-and-store)
//! - [`error`]: error types for cache and registry operations

pub mod cache;
pub mod client;
pub mod error;
pub mod metadata;
pub mod store;
