//! Outbound MIME type selection

pub const HLS_PLAYLIST: &str = "application/vnd.apple.mpegurl";
pub const MPEG_TS: &str = "video/mp2t";
pub const MP4: &str = "video/mp4";

/// Pick the response content type from the source URL suffix.
///
/// Matches on the raw string: a query string after the extension falls
/// through to MP4.
pub fn resolve_content_type(url: &str) -> &'static str {
    if url.ends_with(".m3u8") {
        HLS_PLAYLIST
    } else if url.ends_with(".ts") {
        MPEG_TS
    } else {
        MP4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hls_playlist() {
        assert_eq!(
            resolve_content_type("https://video.twimg.com/amplify_video/1/pl/master.m3u8"),
            "application/vnd.apple.mpegurl"
        );
    }

    #[test]
    fn test_transport_stream_segment() {
        assert_eq!(
            resolve_content_type("https://video.twimg.com/seg/0001.ts"),
            "video/mp2t"
        );
    }

    #[test]
    fn test_default_is_mp4() {
        assert_eq!(resolve_content_type("https://example.com/video1.mp4"), MP4);
        assert_eq!(resolve_content_type("https://example.com/stream"), MP4);
        assert_eq!(resolve_content_type(""), MP4);
    }

    #[test]
    fn test_query_string_hides_suffix() {
        assert_eq!(
            resolve_content_type("https://video.twimg.com/pl/master.m3u8?tag=12"),
            MP4
        );
    }

    #[test]
    fn test_deterministic() {
        let url = "https://video.twimg.com/pl/master.m3u8";
        let first = resolve_content_type(url);
        for _ in 0..10 {
            assert_eq!(resolve_content_type(url), first);
        }
    }
}
