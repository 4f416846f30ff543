//! Cache-fronted video proxying
//!
//! Resolves a request for a source URL to one of four outcomes: a fresh
//! cache hit, a successful upstream fetch, a stale payload served after
//! the refetch failed, or a failure when nothing is cached.

use crate::content_type::resolve_content_type;
use crate::error::{Result, VideoProxyError};
use crate::types::{CacheStatus, ProxyStats};
use bytes::Bytes;
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};
use video_cache::{InFlight, Lookup, VideoCache};
use video_fetcher::{FetchError, Upstream};

/// A payload ready to be returned to the client
#[derive(Debug, Clone)]
pub struct ProxiedVideo {
    pub payload: Bytes,
    pub content_type: &'static str,
    pub cache_status: CacheStatus,
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    stale: AtomicU64,
    failures: AtomicU64,
    upstream_fetches: AtomicU64,
}

/// The proxy service: cache, upstream and per-key fetch deduplication
pub struct VideoProxy {
    cache: Arc<VideoCache>,
    upstream: Arc<dyn Upstream>,
    inflight: InFlight<std::result::Result<Bytes, FetchError>>,
    counters: Arc<Counters>,
}

impl VideoProxy {
    pub fn new(cache: VideoCache, upstream: Arc<dyn Upstream>) -> Self {
        Self {
            cache: Arc::new(cache),
            upstream,
            inflight: InFlight::new(),
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn cache(&self) -> &VideoCache {
        &self.cache
    }

    /// Serve `url` from cache or upstream
    pub async fn serve(&self, url: &str) -> Result<ProxiedVideo> {
        let content_type = resolve_content_type(url);

        let stale = match self.cache.lookup(url, Utc::now()).await {
            Lookup::Fresh(entry) => {
                debug!(url = %url, "Serving video from cache");
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(ProxiedVideo {
                    payload: entry.payload,
                    content_type,
                    cache_status: CacheStatus::Hit,
                });
            }
            Lookup::Expired(entry) => {
                // A concurrent refill since the lookup is newer and stays
                self.cache.remove_if_older(url, entry.fetched_at).await;
                Some(entry.payload)
            }
            Lookup::Absent => None,
        };

        match self.fetch_and_store(url).await {
            Ok(payload) => {
                self.counters.misses.fetch_add(1, Ordering::Relaxed);
                Ok(ProxiedVideo {
                    payload,
                    content_type,
                    cache_status: CacheStatus::Miss,
                })
            }
            Err(err) => {
                // Prefer whatever is cached now; another request may have refilled it
                let fallback = match self.cache.get(url).await {
                    Some(entry) => Some(entry.payload),
                    None => stale,
                };

                match fallback {
                    Some(payload) => {
                        info!(url = %url, error = %err, "Serving stale video after fetch error");
                        self.counters.stale.fetch_add(1, Ordering::Relaxed);
                        Ok(ProxiedVideo {
                            payload,
                            content_type,
                            cache_status: CacheStatus::Stale,
                        })
                    }
                    None => {
                        warn!(url = %url, error = %err, "Failed to fetch video");
                        self.counters.failures.fetch_add(1, Ordering::Relaxed);
                        Err(VideoProxyError::Upstream(err))
                    }
                }
            }
        }
    }

    /// Fetch `url` once per key and store the payload on success
    async fn fetch_and_store(&self, url: &str) -> std::result::Result<Bytes, FetchError> {
        let cache = self.cache.clone();
        let upstream = self.upstream.clone();
        let counters = self.counters.clone();
        let key = url.to_string();

        self.inflight
            .run(url, move || async move {
                info!(url = %key, "Fetching new video");
                counters.upstream_fetches.fetch_add(1, Ordering::Relaxed);
                let fetched = upstream.fetch(&key).await?;
                cache.put(&key, fetched.data.clone()).await;
                Ok(fetched.data)
            })
            .await
    }

    pub fn stats(&self) -> ProxyStats {
        ProxyStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            stale: self.counters.stale.load(Ordering::Relaxed),
            failures: self.counters.failures.load(Ordering::Relaxed),
            upstream_fetches: self.counters.upstream_fetches.load(Ordering::Relaxed),
        }
    }
}
