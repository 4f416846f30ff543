//! Scripted upstream for handler tests

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use video_fetcher::{FetchError, FetchedVideo, Upstream};

#[derive(Default)]
pub struct StubUpstream {
    responses: Mutex<HashMap<String, Result<Bytes, FetchError>>>,
    calls: Mutex<HashMap<String, usize>>,
    delay: Option<Duration>,
}

impl StubUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn respond_ok(&self, url: &str, body: &'static [u8]) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), Ok(Bytes::from_static(body)));
    }

    pub fn respond_err(&self, url: &str, err: FetchError) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), Err(err));
    }

    pub fn calls(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl Upstream for StubUpstream {
    async fn fetch(&self, url: &str) -> video_fetcher::Result<FetchedVideo> {
        *self.calls.lock().unwrap().entry(url.to_string()).or_insert(0) += 1;

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let response = self
            .responses
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or(Err(FetchError::Status(404)));

        response.map(|data| FetchedVideo {
            data,
            content_type: Some("application/octet-stream".to_string()),
        })
    }
}
