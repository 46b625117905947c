//! Database connection module for the CareDashboard application
//!
//! This module provides database connectivity with support for multiple database backends:
//! - SQLite (default)
//! - PostgreSQL (optional, `postgres` feature)

use std::env;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use once_cell::sync::OnceCell;
use thiserror::Error;
use tracing::{error, info, warn};

use super::migrations;

/// Global database pool used throughout the application
static DB_POOL: OnceCell<DatabasePool> = OnceCell::new();

/// SQLite pool type shared by storage and migrations
pub type SqlitePool = r2d2::Pool<r2d2_sqlite::SqliteConnectionManager>;

/// Supported database types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseType {
    /// SQLite database (file-based)
    Sqlite,
    /// PostgreSQL database (e.g. the Supabase Postgres instance)
    #[cfg(feature = "postgres")]
    PostgreSQL,
}

impl FromStr for DatabaseType {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(DatabaseType::Sqlite),
            #[cfg(feature = "postgres")]
            "postgresql" | "postgres" => Ok(DatabaseType::PostgreSQL),
            _ => Err(DatabaseError::UnsupportedDatabaseType(s.to_string())),
        }
    }
}

/// Database connection pool enum for different database types
#[derive(Debug, Clone)]
pub enum DatabasePool {
    /// SQLite connection pool
    SQLite(Arc<SqlitePool>),

    /// PostgreSQL connection pool
    #[cfg(feature = "postgres")]
    PostgreSQL(sqlx::PgPool),
}

/// Database error
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Environment variable not found
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    /// SQLite error
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),

    /// Connection pool error
    #[error("Connection pool error: {0}")]
    PoolError(#[from] r2d2::Error),

    /// PostgreSQL error
    #[cfg(feature = "postgres")]
    #[error("PostgreSQL error: {0}")]
    PostgresError(#[from] sqlx::Error),

    /// Database pool already initialized
    #[error("Database pool is already initialized")]
    PoolAlreadyInitialized,

    /// Database pool not initialized
    #[error("Database pool is not initialized")]
    PoolNotInitialized,

    /// Unsupported database type
    #[error("Unsupported database type: {0}")]
    UnsupportedDatabaseType(String),

    /// Migration error
    #[error("Database migration error: {0}")]
    MigrationError(String),
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database type (sqlite, postgresql)
    pub db_type: DatabaseType,
    /// Connection string for PostgreSQL
    pub connection_string: Option<String>,
    /// Path to SQLite database file
    pub sqlite_path: Option<String>,
    /// Maximum number of connections
    pub max_connections: u32,
    /// Connection timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_type: DatabaseType::Sqlite,
            connection_string: None,
            sqlite_path: Some("data/care_dashboard.db".to_string()),
            max_connections: 10,
            timeout_seconds: 30,
        }
    }
}

impl DatabaseConfig {
    /// Create a new database configuration from environment variables
    pub fn from_env() -> Result<Self, DatabaseError> {
        let db_type_str = env::var("DB_TYPE").unwrap_or_else(|_| "sqlite".to_string());
        let db_type = db_type_str.parse::<DatabaseType>()?;

        // Used by PostgreSQL only
        let connection_string = env::var("DB_CONNECTION").ok();
        let sqlite_path = env::var("DB_SQLITE_PATH").ok();

        match db_type {
            DatabaseType::Sqlite => {
                if let Some(ref path) = sqlite_path {
                    info!("Using SQLite database at: {}", path);
                } else {
                    info!("No DB_SQLITE_PATH provided, will use default path: data/care_dashboard.db");
                }
            },
            #[cfg(feature = "postgres")]
            DatabaseType::PostgreSQL => {
                if connection_string.is_none() {
                    return Err(DatabaseError::EnvVarNotFound("DB_CONNECTION".to_string()));
                }
                info!("Using PostgreSQL database with provided connection string");
            },
        }

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(20);

        let timeout_seconds = env::var("DB_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);

        info!("Database configuration: max_connections={}, timeout={}s",
            max_connections, timeout_seconds);

        Ok(DatabaseConfig {
            db_type,
            connection_string,
            sqlite_path,
            max_connections,
            timeout_seconds,
        })
    }
}

/// Initialize the global database connection pool and run migrations
pub async fn initialize_database_pool() -> Result<(), DatabaseError> {
    if DB_POOL.get().is_some() {
        return Err(DatabaseError::PoolAlreadyInitialized);
    }

    let config = DatabaseConfig::from_env()?;

    info!("Initializing database pool with type: {:?}", config.db_type);

    let pool = match config.db_type {
        DatabaseType::Sqlite => initialize_sqlite_pool(&config)?,
        #[cfg(feature = "postgres")]
        DatabaseType::PostgreSQL => initialize_postgres_pool(&config)?,
    };

    run_migrations(&pool).await?;

    DB_POOL.set(pool).map_err(|_| DatabaseError::PoolAlreadyInitialized)
}

/// Get the database connection pool
pub fn get_db_pool() -> Result<DatabasePool, DatabaseError> {
    DB_POOL.get()
        .cloned()
        .ok_or(DatabaseError::PoolNotInitialized)
}

/// Initialize SQLite connection pool
fn initialize_sqlite_pool(config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    use rusqlite::OpenFlags;
    use std::fs;
    use std::path::Path;

    let sqlite_path = config.sqlite_path.clone()
        .unwrap_or_else(|| "data/care_dashboard.db".to_string());

    info!("Initializing SQLite database at: {}", sqlite_path);

    if let Some(parent) = Path::new(&sqlite_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            info!("Creating parent directory: {:?}", parent);
            if let Err(e) = fs::create_dir_all(parent) {
                warn!("Failed to create directory: {}, falling back to in-memory database", e);
                return initialize_in_memory_sqlite_pool(config);
            }
        }
    }

    let manager = r2d2_sqlite::SqliteConnectionManager::file(&sqlite_path)
        .with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE);

    match r2d2::Pool::builder()
        .max_size(config.max_connections)
        .connection_timeout(Duration::from_secs(config.timeout_seconds))
        .build(manager) {
            Ok(pool) => {
                info!("SQLite connection pool created successfully");
                Ok(DatabasePool::SQLite(Arc::new(pool)))
            },
            Err(e) => {
                error!("Failed to create SQLite connection pool: {}", e);
                warn!("Falling back to in-memory SQLite database");
                initialize_in_memory_sqlite_pool(config)
            }
        }
}

/// Initialize an in-memory SQLite database as fallback
///
/// The pool is capped at one connection: every `:memory:` connection is a
/// separate database, so a larger pool would lose the schema.
fn initialize_in_memory_sqlite_pool(config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    info!("Initializing in-memory SQLite database");

    let manager = r2d2_sqlite::SqliteConnectionManager::memory();

    let pool = r2d2::Pool::builder()
        .max_size(1)
        .connection_timeout(Duration::from_secs(config.timeout_seconds))
        .build(manager)?;

    Ok(DatabasePool::SQLite(Arc::new(pool)))
}

/// Initialize PostgreSQL connection pool
///
/// Connections are opened lazily so startup does not block on the network.
#[cfg(feature = "postgres")]
fn initialize_postgres_pool(config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    use sqlx::postgres::PgPoolOptions;

    let connection_string = config.connection_string
        .as_ref()
        .ok_or_else(|| DatabaseError::EnvVarNotFound("DB_CONNECTION".to_string()))?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.timeout_seconds))
        .connect_lazy(connection_string)?;

    Ok(DatabasePool::PostgreSQL(pool))
}

/// Run database migrations against a pool
pub async fn run_migrations(pool: &DatabasePool) -> Result<(), DatabaseError> {
    info!("Running database migrations");

    match pool {
        DatabasePool::SQLite(pool) => {
            let conn = pool.get()?;
            migrations::run_sqlite_migrations(&conn)
                .map_err(DatabaseError::MigrationError)?;
        },
        #[cfg(feature = "postgres")]
        DatabasePool::PostgreSQL(pool) => {
            migrations::run_postgres_migrations(pool).await
                .map_err(DatabaseError::MigrationError)?;
        },
    }

    info!("Database migrations completed successfully");

    Ok(())
}

/// Get information about the current database connection
pub fn get_connection_info() -> Option<String> {
    let pool = DB_POOL.get()?;
    Some(describe_pool(pool))
}

/// Describe a pool for health reporting
pub fn describe_pool(pool: &DatabasePool) -> String {
    match pool {
        DatabasePool::SQLite(pool) => {
            match pool.get() {
                Ok(conn) => {
                    let location = match conn.query_row(
                        "PRAGMA database_list",
                        [],
                        |row| row.get::<_, String>(2)
                    ) {
                        Ok(path) if path.is_empty() || path == ":memory:" => "SQLite in-memory database".to_string(),
                        Ok(path) => format!("SQLite database at {}", path),
                        Err(_) => "SQLite database (path unknown)".to_string(),
                    };

                    let state = pool.state();
                    format!("{} healthy (connections: active={}, idle={})",
                        location,
                        state.connections,
                        state.idle_connections
                    )
                },
                Err(e) => {
                    error!("Failed to get SQLite connection: {}", e);
                    format!("SQLite connection error: {}", e)
                }
            }
        },
        #[cfg(feature = "postgres")]
        DatabasePool::PostgreSQL(pool) => {
            if pool.is_closed() {
                "PostgreSQL pool closed".to_string()
            } else {
                format!(
                    "PostgreSQL database healthy (size={}, idle={})",
                    pool.size(),
                    pool.num_idle()
                )
            }
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn test_database_config_default() {
        let config = DatabaseConfig::default();
        assert_eq!(config.db_type, DatabaseType::Sqlite);
        assert!(config.sqlite_path.is_some());
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.timeout_seconds, 30);
    }

    #[test]
    fn test_database_type_from_str() {
        assert_eq!("sqlite".parse::<DatabaseType>().unwrap(), DatabaseType::Sqlite);
        assert_eq!("SQLite".parse::<DatabaseType>().unwrap(), DatabaseType::Sqlite);

        #[cfg(feature = "postgres")]
        assert_eq!("postgres".parse::<DatabaseType>().unwrap(), DatabaseType::PostgreSQL);

        assert!("mysql".parse::<DatabaseType>().is_err());
    }

    #[tokio::test]
    async fn test_in_memory_pool_migrates_and_reports_healthy() {
        let pool = initialize_in_memory_sqlite_pool(&DatabaseConfig::default()).unwrap();
        run_migrations(&pool).await.unwrap();

        let info = describe_pool(&pool);
        assert!(info.contains("in-memory"), "unexpected info: {}", info);
        assert!(info.contains("healthy"));

        // Migrations are idempotent
        run_migrations(&pool).await.unwrap();
    }
}
