pub mod admin;
pub mod health;
pub mod media;
pub mod tweets;
pub mod videos;

use axum::routing::{delete, get, post};
use axum::Router;

use crate::constants::VIDEO_PROXY_PATH;
use crate::state::AppState;

/// API routes, without CORS (the caller layers that from config)
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/health", get(health::health))
        // Tweets - specific routes before the listing
        .route("/api/tweets/single/{id}", get(tweets::get_single))
        .route("/api/tweets/clear", delete(tweets::clear))
        .route("/api/tweets/{id}", get(tweets::get_by_id))
        .route("/api/tweets", get(tweets::list).post(tweets::create))
        // Videos
        .route("/api/videos", get(videos::list))
        .route("/api/video/{id}", get(media::video_by_tweet))
        // Admin
        .route("/api/auth/admin", post(admin::login))
        // Video proxy
        .route(VIDEO_PROXY_PATH, get(media::proxy))
        .with_state(state)
}
