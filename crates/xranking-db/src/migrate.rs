use sqlx::PgPool;
use tracing::info;

/// Apply the versioned migrations under `migrations/` (tracked in `_sqlx_migrations`)
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::Error> {
    info!("Running tweet store migrations...");
    sqlx::migrate!()
        .run(pool)
        .await
        .map_err(|e| sqlx::Error::Protocol(e.to_string()))?;
    info!("Tweet store migrations completed");
    Ok(())
}
