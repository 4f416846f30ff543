//! HTTP fetching of upstream video resources

use crate::error::{FetchError, Result};
use crate::types::{FetchedVideo, FetcherConfig, Upstream};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, REFERER, USER_AGENT};
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

/// HTTP client for fetching videos from third-party origins
pub struct VideoFetcher {
    client: Client,
}

impl VideoFetcher {
    /// Create a fetcher with the given headers and timeout
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(
            REFERER,
            HeaderValue::from_str(&config.referer)
                .map_err(|e| FetchError::Client(format!("invalid referer: {}", e)))?,
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| FetchError::Client(format!("invalid user agent: {}", e)))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { client })
    }

    /// Fetch a video by URL
    pub async fn fetch_video(&self, url: &str) -> Result<FetchedVideo> {
        let parsed = parse_source_url(url)?;
        debug!(url = %parsed, "Fetching upstream video");

        let response = self.client.get(parsed).send().await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), url = %url, "Upstream returned error status");
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let data = response.bytes().await?;

        debug!(
            size = data.len(),
            content_type = ?content_type,
            "Fetched upstream video"
        );

        Ok(FetchedVideo { data, content_type })
    }
}

#[async_trait]
impl Upstream for VideoFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedVideo> {
        self.fetch_video(url).await
    }
}

/// Accept only absolute http(s) URLs
fn parse_source_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::InvalidUrl(format!(
            "unsupported scheme: {}",
            other
        ))),
    }
}
