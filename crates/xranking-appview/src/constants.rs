// --- Ranking pagination defaults ---

/// Default page size for the ranked tweet list.
pub const DEFAULT_TWEET_LIMIT: i64 = 20;

/// Maximum page size for the ranked tweet list.
pub const MAX_TWEET_LIMIT: i64 = 100;

/// Highest page number accepted; larger values are clamped.
pub const MAX_TWEET_PAGE: i64 = 1_000_000;

// --- Video list ---

/// Number of videos returned by the video list endpoint.
pub const VIDEO_LIST_LIMIT: i64 = 50;

// --- Video proxy ---

/// Path on this service that forwards to the video proxy.
pub const VIDEO_PROXY_PATH: &str = "/api/videoproxy";

/// Path prefix that streams a tweet's video by tweet id.
pub const VIDEO_BY_TWEET_PATH: &str = "/api/video";
