use sqlx::{Pool, Postgres};
use tracing::info;

/// Run all pending database migrations
///
/// Embeds the SQL files from the migrations/ directory at compile time.
/// Safe to run repeatedly; sqlx tracks which migrations have already
/// been applied.
pub async fn run_migrations(pool: &Pool<Postgres>) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Running database migrations...");

    sqlx::migrate!("./migrations").run(pool).await?;

    info!("Database migrations completed");
    Ok(())
}
