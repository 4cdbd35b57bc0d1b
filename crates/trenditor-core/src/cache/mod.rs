//! Local caching module for last-fetched data.
//!
//! This module provides the `CacheManager` for keeping a per-user JSON
//! snapshot of what the data pages last showed, so they render immediately
//! on startup before a refresh completes. Snapshots are considered stale
//! after 15 minutes and are wiped on logout and account deletion.
//!
//! Cached data types:
//! - Posted toots
//! - Search history
//! - Last trend analysis

pub mod manager;

pub use manager::{CacheAges, CacheManager, CachedData};
