use async_trait::async_trait;
use tracing::debug;

use crate::database::{get_db_pool, DatabasePool};
use crate::models::{UserRecord, VhvRecord};
use super::errors::RepositoryError;
use super::in_memory::InMemoryStorage;
use super::storage::DatabaseStorage;

/// Repository trait for directory records (users and volunteers)
#[async_trait]
pub trait DirectoryRepositoryTrait {
    /// Get all users
    async fn list_users(&self) -> Result<Vec<UserRecord>, RepositoryError>;

    /// Get all village health volunteers
    async fn list_vhvs(&self) -> Result<Vec<VhvRecord>, RepositoryError>;
}

/// Repository for directory records.
///
/// Reads from the database pool when one is available and from in-memory
/// storage otherwise. Query failures against an available pool are returned
/// to the caller, not masked by the in-memory fallback.
#[derive(Debug, Clone, Default)]
pub struct DirectoryRepository {
    /// In-memory storage for when no database is available
    storage: InMemoryStorage,
    /// Explicit pool; the global pool is used when unset
    pool: Option<DatabasePool>,
}

impl DirectoryRepository {
    /// Create a repository backed by the global pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository bound to a specific pool
    pub fn with_pool(pool: DatabasePool) -> Self {
        Self {
            storage: InMemoryStorage::new(),
            pool: Some(pool),
        }
    }

    /// Create a repository over existing in-memory storage
    pub fn with_storage(storage: InMemoryStorage) -> Self {
        Self {
            storage,
            pool: None,
        }
    }

    /// In-memory storage used when no database is available
    pub fn storage(&self) -> &InMemoryStorage {
        &self.storage
    }

    fn pool(&self) -> Option<DatabasePool> {
        match &self.pool {
            Some(pool) => Some(pool.clone()),
            None => match get_db_pool() {
                Ok(pool) => Some(pool),
                Err(e) => {
                    debug!("Database not available ({}), using in-memory storage", e);
                    None
                }
            },
        }
    }
}

#[async_trait]
impl DirectoryRepositoryTrait for DirectoryRepository {
    async fn list_users(&self) -> Result<Vec<UserRecord>, RepositoryError> {
        match self.pool() {
            Some(pool) => DatabaseStorage::list_users(&pool).await,
            None => self.storage.list_users(),
        }
    }

    async fn list_vhvs(&self) -> Result<Vec<VhvRecord>, RepositoryError> {
        match self.pool() {
            Some(pool) => DatabaseStorage::list_vhvs(&pool).await,
            None => self.storage.list_vhvs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::database::{run_migrations, SqlitePool};

    async fn sqlite_pool() -> DatabasePool {
        let manager = r2d2_sqlite::SqliteConnectionManager::memory();
        let pool: SqlitePool = r2d2::Pool::builder().max_size(1).build(manager).unwrap();
        let pool = DatabasePool::SQLite(Arc::new(pool));
        run_migrations(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_in_memory_repository_lists_seeded_records() {
        let repo = DirectoryRepository::with_storage(InMemoryStorage::new());
        repo.storage().insert_user(UserRecord {
            id: "u1".to_string(),
            email: Some("admin@example.org".to_string()),
            full_name: Some("Admin".to_string()),
            role: "admin".to_string(),
            phone: None,
            created_at: None,
        }).unwrap();

        let users = repo.list_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert!(repo.list_vhvs().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sqlite_repository_reads_rows_in_creation_order() {
        let pool = sqlite_pool().await;
        if let DatabasePool::SQLite(ref sqlite) = pool {
            let conn = sqlite.get().unwrap();
            conn.execute_batch(
                "INSERT INTO users (id, email, full_name, role, phone, created_at) VALUES
                    ('u2', 'doc@example.org', 'Dr. Ann', 'doctor', NULL, '2024-02-01T00:00:00Z'),
                    ('u1', 'vhv@example.org', NULL, 'vhv', '0800000000', '2024-01-01T00:00:00Z');
                 INSERT INTO vhvs (id, user_id, full_name, phone, village, district, status, created_at) VALUES
                    ('v1', 'u1', 'Somchai', '0800000000', 'Ban Nong', 'Mueang', 'active', '2024-01-01T00:00:00Z');",
            ).unwrap();
        }

        let repo = DirectoryRepository::with_pool(pool);

        let users = repo.list_users().await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].id, "u1");
        assert_eq!(users[0].phone.as_deref(), Some("0800000000"));
        assert_eq!(users[1].full_name.as_deref(), Some("Dr. Ann"));

        let vhvs = repo.list_vhvs().await.unwrap();
        assert_eq!(vhvs.len(), 1);
        assert_eq!(vhvs[0].village.as_deref(), Some("Ban Nong"));
    }

    #[tokio::test]
    async fn test_database_errors_are_not_masked() {
        // A pool without migrations has no tables to read
        let manager = r2d2_sqlite::SqliteConnectionManager::memory();
        let pool: SqlitePool = r2d2::Pool::builder().max_size(1).build(manager).unwrap();
        let repo = DirectoryRepository::with_pool(DatabasePool::SQLite(Arc::new(pool)));

        assert!(matches!(repo.list_users().await, Err(RepositoryError::Sqlite(_))));
        assert!(repo.list_vhvs().await.is_err());
    }
}
