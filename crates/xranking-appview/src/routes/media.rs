use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, warn};
use xranking_db::TweetRow;

use crate::error::AppError;
use crate::state::AppState;

/// Headers copied from the video proxy's response
const FORWARDED_HEADERS: [&str; 4] = [
    "content-type",
    "cache-control",
    "x-cache",
    "access-control-allow-origin",
];

#[derive(Deserialize)]
pub struct VideoProxyQuery {
    url: Option<String>,
}

/// GET /api/videoproxy?url=
/// Forwards to the video proxy service, passing its status, caching headers
/// and body through unchanged.
pub async fn proxy(State(state): State<AppState>, Query(query): Query<VideoProxyQuery>) -> Response {
    let Some(url) = query.url.filter(|u| !u.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "URL parameter is missing" })),
        )
            .into_response();
    };

    forward_to_proxy(&state, &url).await
}

/// GET /api/video/{tweet_id}
/// Looks up the tweet's video URL and streams it through the video proxy.
pub async fn video_by_tweet(State(state): State<AppState>, Path(tweet_id): Path<String>) -> Response {
    let tweet = match xranking_db::tweets::get_by_tweet_id(&state.pool, &tweet_id).await {
        Ok(tweet) => tweet,
        Err(e) => return AppError::Database(e).into_response(),
    };

    match video_source(tweet) {
        Ok(url) => forward_to_proxy(&state, &url).await,
        Err(e) => {
            warn!(tweet_id = %tweet_id, "No video for tweet");
            e.into_response()
        }
    }
}

/// The source URL to proxy for a looked-up tweet
fn video_source(tweet: Option<TweetRow>) -> Result<String, AppError> {
    tweet
        .and_then(|t| t.video_url)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::NotFound("Video not found".into()))
}

async fn forward_to_proxy(state: &AppState, url: &str) -> Response {
    let target_url = format!(
        "{}/videoproxy?url={}",
        state.video_proxy_url,
        urlencoding::encode(url)
    );

    let resp = match state.http.get(&target_url).send().await {
        Ok(resp) => resp,
        Err(e) => {
            error!(error = %e, url = %url, "Video proxy error");
            return (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "Video proxy unavailable" })),
            )
                .into_response();
        }
    };

    let status = StatusCode::from_u16(resp.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    if !status.is_success() {
        warn!(status = status.as_u16(), url = %url, "Video proxy returned an error");
    }

    let mut builder = Response::builder().status(status);
    for name in FORWARDED_HEADERS {
        if let Some(value) = resp.headers().get(name) {
            builder = builder.header(HeaderName::from_static(name), value.as_bytes());
        }
    }
    if !resp.headers().contains_key(header::CONTENT_TYPE) {
        builder = builder.header(header::CONTENT_TYPE, "application/octet-stream");
    }

    builder
        .body(Body::from_stream(resp.bytes_stream()))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
