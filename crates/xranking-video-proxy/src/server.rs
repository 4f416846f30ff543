//! HTTP server for the video proxy
//!
//! Provides /health and /videoproxy?url=<source URL>.

use crate::error::VideoProxyError;
use crate::proxy::{ProxiedVideo, VideoProxy};
use crate::types::HealthResponse;
use axum::{
    extract::{Query, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

const X_CACHE: HeaderName = HeaderName::from_static("x-cache");

/// Shared state for the HTTP server
pub struct ServerState {
    pub proxy: VideoProxy,
    pub cache_control: String,
    pub started_at: DateTime<Utc>,
}

impl ServerState {
    pub fn new(proxy: VideoProxy, cache_control: String) -> Self {
        Self {
            proxy,
            cache_control,
            started_at: Utc::now(),
        }
    }
}

pub type SharedState = Arc<ServerState>;

/// Error response
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Deserialize)]
pub struct VideoProxyParams {
    url: Option<String>,
}

/// Create the HTTP router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/videoproxy", get(video_proxy))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(state: SharedState, port: u16) -> std::io::Result<()> {
    let router = create_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await
}

/// Health check endpoint
async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let cache_stats = state.proxy.cache().stats().await;
    let uptime_secs = (Utc::now() - state.started_at).num_seconds().max(0) as u64;

    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs,
        cache: cache_stats,
        proxy: state.proxy.stats(),
    })
}

/// Proxy a video by source URL
async fn video_proxy(
    State(state): State<SharedState>,
    Query(params): Query<VideoProxyParams>,
) -> Response {
    let Some(url) = params.url.filter(|u| !u.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "URL parameter is missing".to_string(),
            }),
        )
            .into_response();
    };

    match state.proxy.serve(&url).await {
        Ok(video) => video_response(video, &state.cache_control),
        Err(e) => {
            if let VideoProxyError::Upstream(ref fetch_err) = e {
                error!(url = %url, error = %fetch_err, upstream_status = ?fetch_err.upstream_status(), "Video proxy failed");
            }
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch video".to_string(),
                }),
            )
                .into_response()
        }
    }
}

fn video_response(video: ProxiedVideo, cache_control: &str) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, video.content_type.to_string()),
            (header::CACHE_CONTROL, cache_control.to_string()),
            (X_CACHE, video.cache_status.as_header().to_string()),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*".to_string()),
        ],
        video.payload,
    )
        .into_response()
}
