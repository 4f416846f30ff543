use sqlx::postgres::PgPool;

/// Shared application state passed to all route handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    /// Client for forwarding to the video proxy service
    pub http: reqwest::Client,
    pub video_proxy_url: String,
    pub admin_password: Option<String>,
}
