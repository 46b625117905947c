use sqlx::PgPool;
use tracing::info;

use super::CREATED_AT_INDEXES;

/// Run PostgreSQL migrations
///
/// Timestamps stay TEXT so rows decode the same way as on SQLite.
pub async fn run_migrations(pool: &PgPool) -> Result<(), String> {
    info!("Running PostgreSQL migrations");

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            full_name TEXT,
            role TEXT NOT NULL,
            phone TEXT,
            created_at TEXT
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| format!("Failed to create users table: {}", e))?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS vhvs (
            id TEXT PRIMARY KEY,
            user_id TEXT REFERENCES users (id),
            full_name TEXT NOT NULL,
            phone TEXT,
            village TEXT,
            district TEXT,
            status TEXT,
            created_at TEXT
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| format!("Failed to create vhvs table: {}", e))?;

    for statement in CREATED_AT_INDEXES {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| format!("Failed to create index: {}", e))?;
    }

    info!("PostgreSQL migrations completed successfully");
    Ok(())
}
