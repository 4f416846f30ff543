//! XRANKING Video Proxy - caching proxy for third-party video URLs
//!
//! Fetches videos from upstream origins with browser headers, keeps
//! them in an in-memory cache and serves stale copies when a refetch fails.

mod content_type;
mod error;
mod proxy;
mod server;
#[cfg(test)]
mod testing;
mod types;

use crate::error::{Result, VideoProxyError};
use crate::proxy::VideoProxy;
use crate::server::{start_server, ServerState, SharedState};
use crate::types::VideoProxyConfig;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};
use video_cache::{CacheConfig, VideoCache};
use video_fetcher::{FetcherConfig, VideoFetcher};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let env_filter =
        EnvFilter::from_default_env().add_directive("xranking_video_proxy=info".parse()?);

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    };

    info!("Starting XRANKING Video Proxy...");

    let config = load_config();
    info!("Port: {}", config.port);
    info!("Cache max entries: {}", config.cache_max_entries);
    info!("Cache TTL: {} seconds", config.cache_ttl_secs);
    info!("Upstream timeout: {} seconds", config.upstream_timeout_secs);

    let cache = VideoCache::new(CacheConfig {
        max_entries: config.cache_max_entries,
        ttl: config.cache_ttl(),
    });

    let fetcher = build_fetcher(&FetcherConfig {
        timeout: config.upstream_timeout(),
        ..FetcherConfig::default()
    })?;

    let proxy = VideoProxy::new(cache, Arc::new(fetcher));
    let state: SharedState = Arc::new(ServerState::new(proxy, config.cache_control()));

    start_server(state, config.port)
        .await
        .map_err(|e| VideoProxyError::Config(format!("Server error: {}", e)))?;

    Ok(())
}

/// A fetcher that cannot be built is a start-up configuration problem
fn build_fetcher(config: &FetcherConfig) -> Result<VideoFetcher> {
    VideoFetcher::new(config).map_err(|e| VideoProxyError::Config(e.to_string()))
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse::<T>().ok())
        .unwrap_or(default)
}

fn load_config() -> VideoProxyConfig {
    let defaults = VideoProxyConfig::default();

    VideoProxyConfig {
        port: env_or("PORT", defaults.port),
        cache_max_entries: env_or("CACHE_MAX_ENTRIES", defaults.cache_max_entries),
        cache_ttl_secs: env_or("CACHE_TTL_SECS", defaults.cache_ttl_secs),
        upstream_timeout_secs: env_or("UPSTREAM_TIMEOUT_SECS", defaults.upstream_timeout_secs),
        cache_control_max_age_secs: env_or(
            "CACHE_CONTROL_MAX_AGE_SECS",
            defaults.cache_control_max_age_secs,
        ),
    }
}
