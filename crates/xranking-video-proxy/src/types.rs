//! Core types for the XRANKING video proxy

use serde::{Deserialize, Serialize};
use std::time::Duration;
use video_cache::CacheStats;

/// How a proxied response was satisfied, sent as `X-Cache`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
    Stale,
}

impl CacheStatus {
    pub fn as_header(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
            CacheStatus::Stale => "STALE",
        }
    }
}

/// Configuration for the video proxy
#[derive(Debug, Clone)]
pub struct VideoProxyConfig {
    pub port: u16,
    pub cache_max_entries: usize,
    pub cache_ttl_secs: u64,
    pub upstream_timeout_secs: u64,
    pub cache_control_max_age_secs: u64,
}

impl VideoProxyConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    /// Value of the `Cache-Control` response header
    pub fn cache_control(&self) -> String {
        format!("public, max-age={}", self.cache_control_max_age_secs)
    }
}

impl Default for VideoProxyConfig {
    fn default() -> Self {
        Self {
            port: 3001,
            cache_max_entries: 100,
            cache_ttl_secs: 60 * 60, // 1 hour
            upstream_timeout_secs: 8,
            cache_control_max_age_secs: 60 * 60,
        }
    }
}

/// Request counters kept by the proxy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProxyStats {
    pub hits: u64,
    pub misses: u64,
    pub stale: u64,
    pub failures: u64,
    pub upstream_fetches: u64,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
    pub cache: CacheStats,
    pub proxy: ProxyStats,
}
