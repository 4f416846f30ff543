//! In-memory video cache with TTL expiration and capacity eviction
//!
//! Stores upstream video payloads keyed by their source URL. Every insert
//! runs an eviction sweep that drops the oldest quarter of the entries when
//! the cache is full and every entry older than the TTL. [`InFlight`]
//! collapses concurrent fetches for the same key into one.

mod cache;
mod inflight;
mod types;

pub use cache::VideoCache;
pub use inflight::InFlight;
pub use types::{CacheConfig, CacheEntry, CacheStats, Lookup};
