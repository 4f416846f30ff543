use std::env;

/// Application configuration parsed from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub cors_origins: Vec<String>,
    pub video_proxy_url: String,
    /// Shared secret for the admin page; the check answers 500 when unset
    pub admin_password: Option<String>,
}

impl Config {
    /// Parse configuration from environment variables
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/xranking".to_string());

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|s| parse_origins(&s))
            .unwrap_or_else(|_| {
                vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ]
            });

        let video_proxy_url = env::var("VIDEO_PROXY_URL")
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| "http://localhost:3001".to_string());

        let admin_password = env::var("ADMIN_PASSWORD").ok().filter(|p| !p.is_empty());

        Self {
            port,
            database_url,
            cors_origins,
            video_proxy_url,
            admin_password,
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect()
}
