//! Fetcher configuration and the upstream seam

use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";
pub const DEFAULT_REFERER: &str = "https://twitter.com/";

/// A fetched upstream resource
#[derive(Debug, Clone)]
pub struct FetchedVideo {
    pub data: Bytes,
    /// Content type declared by the origin, if any
    pub content_type: Option<String>,
}

/// Something that can fetch a video by URL
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn fetch(&self, url: &str) -> crate::Result<FetchedVideo>;
}

#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub timeout: Duration,
    pub user_agent: String,
    pub referer: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(8),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            referer: DEFAULT_REFERER.to_string(),
        }
    }
}
