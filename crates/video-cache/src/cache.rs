//! In-memory payload store keyed by source URL

use crate::types::{CacheConfig, CacheEntry, CacheStats, Lookup};
use bytes::Bytes;
use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// A bounded, TTL-aware video cache
pub struct VideoCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    max_entries: usize,
    ttl: TimeDelta,
}

impl VideoCache {
    /// Create a new, empty cache
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_entries: config.max_entries,
            ttl: TimeDelta::from_std(config.ttl).unwrap_or(TimeDelta::MAX),
        }
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Get the stored entry for `key`, whatever its age
    pub async fn get(&self, key: &str) -> Option<CacheEntry> {
        self.entries.read().await.get(key).cloned()
    }

    /// Look up `key` and classify it against the TTL at `now`
    pub async fn lookup(&self, key: &str, now: DateTime<Utc>) -> Lookup {
        match self.get(key).await {
            Some(entry) if entry.is_fresh(self.ttl, now) => Lookup::Fresh(entry),
            Some(entry) => Lookup::Expired(entry),
            None => Lookup::Absent,
        }
    }

    /// Store a payload fetched just now
    pub async fn put(&self, key: &str, payload: Bytes) {
        self.put_at(key, payload, Utc::now()).await;
    }

    /// Store a payload with an explicit fetch time.
    ///
    /// The eviction sweep runs before the insert, under the same write lock,
    /// against the wall clock. `fetched_at` only dates the new entry.
    pub async fn put_at(&self, key: &str, payload: Bytes, fetched_at: DateTime<Utc>) {
        let mut entries = self.entries.write().await;
        let evicted = Self::sweep(&mut entries, self.max_entries, self.ttl, Utc::now());
        if evicted > 0 {
            debug!(evicted, remaining = entries.len(), "Eviction sweep");
        }

        let size = payload.len();
        entries.insert(
            key.to_string(),
            CacheEntry {
                key: key.to_string(),
                payload,
                fetched_at,
            },
        );
        debug!(key = %key, size, "Cached video");
    }

    /// Remove and return the entry for `key`
    pub async fn remove(&self, key: &str) -> Option<CacheEntry> {
        self.entries.write().await.remove(key)
    }

    /// Remove the entry for `key` only if it was fetched at or before
    /// `fetched_at`. A newer entry stored in the meantime is kept.
    pub async fn remove_if_older(&self, key: &str, fetched_at: DateTime<Utc>) -> Option<CacheEntry> {
        let mut entries = self.entries.write().await;
        match entries.get(key) {
            Some(entry) if entry.fetched_at <= fetched_at => entries.remove(key),
            _ => None,
        }
    }

    /// Run the eviction sweep as of `now`, returning how many entries were dropped
    pub async fn evict_at(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.write().await;
        Self::sweep(&mut entries, self.max_entries, self.ttl, now)
    }

    /// Capacity phase then TTL phase.
    ///
    /// Capacity: at or above `max_entries`, drop the oldest `len / 4` by
    /// `fetched_at`. TTL: drop everything older than `ttl`.
    fn sweep(
        entries: &mut HashMap<String, CacheEntry>,
        max_entries: usize,
        ttl: TimeDelta,
        now: DateTime<Utc>,
    ) -> usize {
        let mut removed = 0;

        if entries.len() >= max_entries {
            let mut by_age: Vec<(DateTime<Utc>, String)> = entries
                .values()
                .map(|e| (e.fetched_at, e.key.clone()))
                .collect();
            by_age.sort();

            let to_remove = by_age.len() / 4;
            for (_, key) in by_age.into_iter().take(to_remove) {
                if entries.remove(&key).is_some() {
                    removed += 1;
                }
            }
        }

        let before = entries.len();
        entries.retain(|_, e| e.age(now) <= ttl);
        removed += before - entries.len();

        removed
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Get current cache statistics
    pub async fn stats(&self) -> CacheStats {
        let entries = self.entries.read().await;
        CacheStats {
            entries: entries.len(),
            total_bytes: entries.values().map(|e| e.payload.len() as u64).sum(),
            max_entries: self.max_entries,
            ttl_secs: self.ttl.num_seconds().max(0) as u64,
        }
    }
}

impl Default for VideoCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn cache(max_entries: usize, ttl_secs: u64) -> VideoCache {
        VideoCache::new(CacheConfig {
            max_entries,
            ttl: Duration::from_secs(ttl_secs),
        })
    }

    fn url(i: usize) -> String {
        format!("https://video.twimg.com/ext_tw_video/{i}/vid.mp4")
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let cache = cache(100, 3600);
        let key = url(1);

        cache.put(&key, Bytes::from_static(b"video bytes")).await;

        let entry = cache.get(&key).await.unwrap();
        assert_eq!(entry.key, key);
        assert_eq!(entry.payload, Bytes::from_static(b"video bytes"));
    }

    #[tokio::test]
    async fn test_miss() {
        let cache = cache(100, 3600);
        assert!(cache.get(&url(1)).await.is_none());
        assert_eq!(cache.lookup(&url(1), Utc::now()).await, Lookup::Absent);
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let cache = cache(100, 3600);
        let key = url(1);

        cache.put(&key, Bytes::from_static(b"old")).await;
        cache.put(&key, Bytes::from_static(b"new")).await;

        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get(&key).await.unwrap().payload, Bytes::from_static(b"new"));
    }

    #[tokio::test]
    async fn test_lookup_fresh_then_expired() {
        let cache = cache(100, 3600);
        let key = url(1);
        let t0 = Utc::now();

        cache.put_at(&key, Bytes::from_static(b"v"), t0).await;

        assert!(matches!(
            cache.lookup(&key, t0 + TimeDelta::minutes(59)).await,
            Lookup::Fresh(e) if e.payload == Bytes::from_static(b"v")
        ));
        assert!(matches!(
            cache.lookup(&key, t0 + TimeDelta::hours(1)).await,
            Lookup::Expired(_)
        ));
    }

    #[tokio::test]
    async fn test_get_has_no_side_effects() {
        let cache = cache(100, 60);
        let key = url(1);
        let t0 = Utc::now() - TimeDelta::hours(1);

        cache.put_at(&key, Bytes::from_static(b"v"), t0).await;

        // Expired, but reading never removes it
        assert!(cache.get(&key).await.is_some());
        assert!(matches!(cache.lookup(&key, Utc::now()).await, Lookup::Expired(_)));
        assert!(cache.get(&key).await.is_some());
    }

    #[tokio::test]
    async fn test_remove() {
        let cache = cache(100, 3600);
        let key = url(1);
        cache.put(&key, Bytes::from_static(b"v")).await;

        let removed = cache.remove(&key).await.unwrap();
        assert_eq!(removed.payload, Bytes::from_static(b"v"));
        assert!(cache.is_empty().await);
        assert!(cache.remove(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_capacity_eviction_removes_oldest_quarter() {
        let cache = cache(8, 3600);
        let t0 = Utc::now();

        for i in 0..8 {
            cache
                .put_at(&url(i), Bytes::from_static(b"x"), t0 + TimeDelta::seconds(i as i64))
                .await;
        }
        assert_eq!(cache.len().await, 8);

        // Ninth insert sees 8 >= 8 and drops floor(8 / 4) = 2 oldest first
        cache
            .put_at(&url(8), Bytes::from_static(b"x"), t0 + TimeDelta::seconds(8))
            .await;

        assert_eq!(cache.len().await, 7);
        assert!(cache.get(&url(0)).await.is_none());
        assert!(cache.get(&url(1)).await.is_none());
        for i in 2..=8 {
            assert!(cache.get(&url(i)).await.is_some(), "entry {i} should survive");
        }
    }

    #[tokio::test]
    async fn test_capacity_eviction_below_four_entries_is_noop() {
        let cache = cache(2, 3600);
        let t0 = Utc::now();

        for i in 0..3 {
            cache
                .put_at(&url(i), Bytes::from_static(b"x"), t0 + TimeDelta::seconds(i as i64))
                .await;
        }

        // floor(len / 4) is zero for fewer than four entries
        assert_eq!(cache.len().await, 3);
    }

    #[tokio::test]
    async fn test_many_inserts_stay_near_capacity() {
        let cache = cache(20, 3600);
        let t0 = Utc::now();

        for i in 0..200 {
            cache
                .put_at(&url(i), Bytes::from_static(b"x"), t0 + TimeDelta::seconds(i as i64))
                .await;
        }

        assert!(cache.len().await <= 20);
        assert!(cache.get(&url(199)).await.is_some());
    }

    #[tokio::test]
    async fn test_ttl_eviction() {
        let cache = cache(100, 60);
        let now = Utc::now();

        cache
            .put_at(&url(1), Bytes::from_static(b"old"), now - TimeDelta::minutes(5))
            .await;
        assert_eq!(cache.len().await, 1);

        // The insert sweeps url(1), which is already past the TTL
        cache
            .put_at(&url(2), Bytes::from_static(b"new"), now - TimeDelta::seconds(10))
            .await;
        assert!(cache.get(&url(1)).await.is_none());
        assert!(cache.get(&url(2)).await.is_some());

        assert_eq!(cache.evict_at(now).await, 0);
        assert_eq!(cache.evict_at(now + TimeDelta::minutes(2)).await, 1);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_backdated_put_sweeps_against_wall_clock() {
        let cache = cache(100, 60);
        let now = Utc::now();

        cache
            .put_at(&url(1), Bytes::from_static(b"a"), now - TimeDelta::minutes(5))
            .await;
        // Dated before url(1); url(1) must still be judged against the real time
        cache
            .put_at(&url(2), Bytes::from_static(b"b"), now - TimeDelta::minutes(10))
            .await;

        assert!(cache.get(&url(1)).await.is_none());
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_remove_if_older_keeps_refilled_entry() {
        let cache = cache(100, 3600);
        let key = url(1);
        let t0 = Utc::now() - TimeDelta::hours(2);

        cache.put_at(&key, Bytes::from_static(b"old"), t0).await;
        cache.put(&key, Bytes::from_static(b"new")).await;

        assert!(cache.remove_if_older(&key, t0).await.is_none());
        assert_eq!(cache.get(&key).await.unwrap().payload, Bytes::from_static(b"new"));

        let removed = cache.remove_if_older(&key, Utc::now()).await.unwrap();
        assert_eq!(removed.payload, Bytes::from_static(b"new"));
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_put_sweeps_expired_entries() {
        let cache = cache(100, 60);
        let now = Utc::now();

        cache
            .put_at(&url(1), Bytes::from_static(b"old"), now - TimeDelta::minutes(5))
            .await;
        cache.put_at(&url(2), Bytes::from_static(b"new"), now).await;

        assert_eq!(cache.len().await, 1);
        assert!(cache.get(&url(2)).await.is_some());
    }

    #[tokio::test]
    async fn test_stats() {
        let cache = cache(50, 3600);

        let stats = cache.stats().await;
        assert_eq!(stats.entries, 0);
        assert_eq!(stats.total_bytes, 0);

        cache.put(&url(1), Bytes::from_static(b"test data")).await;
        cache.put(&url(2), Bytes::from_static(b"abc")).await;

        let stats = cache.stats().await;
        assert_eq!(stats.entries, 2);
        assert_eq!(stats.total_bytes, 12);
        assert_eq!(stats.max_entries, 50);
        assert_eq!(stats.ttl_secs, 3600);
    }
}
