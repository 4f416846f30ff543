//! Error types for the XRANKING video proxy

use std::fmt;
use video_fetcher::FetchError;

#[derive(Debug)]
pub enum VideoProxyError {
    /// Upstream failed and nothing was cached for the key
    Upstream(FetchError),
    Io(Box<std::io::Error>),
    Config(String),
}

impl fmt::Display for VideoProxyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoProxyError::Upstream(err) => write!(f, "Upstream error: {}", err),
            VideoProxyError::Io(err) => write!(f, "IO error: {}", err),
            VideoProxyError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for VideoProxyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VideoProxyError::Upstream(err) => Some(err),
            VideoProxyError::Io(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<FetchError> for VideoProxyError {
    fn from(err: FetchError) -> Self {
        VideoProxyError::Upstream(err)
    }
}

impl From<std::io::Error> for VideoProxyError {
    fn from(err: std::io::Error) -> Self {
        VideoProxyError::Io(Box::new(err))
    }
}

impl From<tracing_subscriber::filter::ParseError> for VideoProxyError {
    fn from(err: tracing_subscriber::filter::ParseError) -> Self {
        VideoProxyError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, VideoProxyError>;
