//! Error types for the upstream video fetcher

use std::fmt;

/// Why an upstream fetch failed.
///
/// Cloneable so one failed fetch can be handed to every request that was
/// waiting on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    InvalidUrl(String),
    Timeout,
    Status(u16),
    Network(String),
    Client(String),
}

impl FetchError {
    /// Upstream HTTP status, when the origin answered with a non-2xx
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            FetchError::Status(code) => Some(*code),
            _ => None,
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
            FetchError::Timeout => write!(f, "Upstream timed out"),
            FetchError::Status(code) => write!(f, "Upstream returned status {}", code),
            FetchError::Network(msg) => write!(f, "Network error: {}", msg),
            FetchError::Client(msg) => write!(f, "HTTP client error: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return FetchError::Timeout;
        }
        if let Some(status) = err.status() {
            return FetchError::Status(status.as_u16());
        }
        FetchError::Network(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = FetchError::Status(503);
        assert_eq!(format!("{}", err), "Upstream returned status 503");
        assert_eq!(err.upstream_status(), Some(503));
    }

    #[test]
    fn test_timeout_has_no_status() {
        assert_eq!(FetchError::Timeout.upstream_status(), None);
        assert_eq!(format!("{}", FetchError::Timeout), "Upstream timed out");
    }

    #[test]
    fn test_error_is_debug() {
        let err = FetchError::InvalidUrl("ftp://x".to_string());
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("InvalidUrl"));
    }
}
