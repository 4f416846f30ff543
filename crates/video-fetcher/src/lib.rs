//! Upstream Video Fetcher
//!
//! Fetches video resources from third-party origins with
//! browser-impersonating headers and a single bounded timeout.
//! Failures are reported, never retried.

pub mod error;
pub mod fetcher;
pub mod types;

pub use error::{FetchError, Result};
pub use fetcher::VideoFetcher;
pub use types::{FetchedVideo, FetcherConfig, Upstream};
