pub mod migrate;
pub mod tweets;
pub mod types;

pub use sqlx::postgres::PgPool;
pub use types::*;
