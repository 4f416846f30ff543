//! Cache types

use bytes::Bytes;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A cached upstream payload
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// Source URL, used verbatim as the key
    pub key: String,
    pub payload: Bytes,
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Age of the entry at `now`. Negative ages (clock skew) count as zero.
    pub fn age(&self, now: DateTime<Utc>) -> TimeDelta {
        (now - self.fetched_at).max(TimeDelta::zero())
    }

    /// An entry is fresh while its age is strictly below the TTL
    pub fn is_fresh(&self, ttl: TimeDelta, now: DateTime<Utc>) -> bool {
        self.age(now) < ttl
    }
}

/// Result of a freshness-aware lookup
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Fresh(CacheEntry),
    Expired(CacheEntry),
    Absent,
}

/// Sizing and expiry for a [`VideoCache`](crate::VideoCache)
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Entry count at which the capacity sweep starts evicting
    pub max_entries: usize,
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 100,
            ttl: Duration::from_secs(60 * 60),
        }
    }
}

/// Statistics about the cache
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: usize,
    pub total_bytes: u64,
    pub max_entries: usize,
    pub ttl_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_at(fetched_at: DateTime<Utc>) -> CacheEntry {
        CacheEntry {
            key: "https://video.twimg.com/a.mp4".to_string(),
            payload: Bytes::from_static(b"data"),
            fetched_at,
        }
    }

    #[test]
    fn test_default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.max_entries, 100);
        assert_eq!(config.ttl, Duration::from_secs(3600));
    }

    #[test]
    fn test_freshness_boundary() {
        let t0 = Utc::now();
        let entry = entry_at(t0);
        let ttl = TimeDelta::seconds(60);

        assert!(entry.is_fresh(ttl, t0));
        assert!(entry.is_fresh(ttl, t0 + TimeDelta::seconds(59)));
        assert!(!entry.is_fresh(ttl, t0 + TimeDelta::seconds(60)));
        assert!(!entry.is_fresh(ttl, t0 + TimeDelta::hours(2)));
    }

    #[test]
    fn test_future_timestamp_has_zero_age() {
        let now = Utc::now();
        let entry = entry_at(now + TimeDelta::seconds(30));
        assert_eq!(entry.age(now), TimeDelta::zero());
    }

    #[test]
    fn test_cache_stats_serialization() {
        let stats = CacheStats {
            entries: 3,
            total_bytes: 12345,
            max_entries: 100,
            ttl_secs: 3600,
        };

        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"total_bytes\":12345"));
        assert!(json.contains("\"ttl_secs\":3600"));
    }
}
