use tracing::debug;

use crate::database::DatabasePool;
use crate::models::{UserRecord, VhvRecord};
use super::errors::RepositoryError;

const SELECT_USERS: &str =
    "SELECT id, email, full_name, role, phone, created_at
     FROM users ORDER BY created_at, id";

const SELECT_VHVS: &str =
    "SELECT id, user_id, full_name, phone, village, district, status, created_at
     FROM vhvs ORDER BY created_at, id";

/// Database storage operations for directory records
pub struct DatabaseStorage;

impl DatabaseStorage {
    /// Get all users from the database
    pub async fn list_users(pool: &DatabasePool) -> Result<Vec<UserRecord>, RepositoryError> {
        debug!("Getting all users from database");

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;
                let mut stmt = conn.prepare(SELECT_USERS)?;

                let rows = stmt.query_map([], |row| {
                    Ok(UserRecord {
                        id: row.get(0)?,
                        email: row.get(1)?,
                        full_name: row.get(2)?,
                        role: row.get(3)?,
                        phone: row.get(4)?,
                        created_at: row.get(5)?,
                    })
                })?;

                let mut users = Vec::new();
                for user in rows {
                    users.push(user?);
                }
                Ok(users)
            },

            #[cfg(feature = "postgres")]
            DatabasePool::PostgreSQL(pool) => {
                use sqlx::Row;

                let rows = sqlx::query(SELECT_USERS).fetch_all(pool).await?;

                rows.iter()
                    .map(|row| {
                        Ok(UserRecord {
                            id: row.try_get("id")?,
                            email: row.try_get("email")?,
                            full_name: row.try_get("full_name")?,
                            role: row.try_get("role")?,
                            phone: row.try_get("phone")?,
                            created_at: row.try_get("created_at")?,
                        })
                    })
                    .collect()
            },
        }
    }

    /// Get all volunteers from the database
    pub async fn list_vhvs(pool: &DatabasePool) -> Result<Vec<VhvRecord>, RepositoryError> {
        debug!("Getting all VHVs from database");

        match pool {
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;
                let mut stmt = conn.prepare(SELECT_VHVS)?;

                let rows = stmt.query_map([], |row| {
                    Ok(VhvRecord {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        full_name: row.get(2)?,
                        phone: row.get(3)?,
                        village: row.get(4)?,
                        district: row.get(5)?,
                        status: row.get(6)?,
                        created_at: row.get(7)?,
                    })
                })?;

                let mut vhvs = Vec::new();
                for vhv in rows {
                    vhvs.push(vhv?);
                }
                Ok(vhvs)
            },

            #[cfg(feature = "postgres")]
            DatabasePool::PostgreSQL(pool) => {
                use sqlx::Row;

                let rows = sqlx::query(SELECT_VHVS).fetch_all(pool).await?;

                rows.iter()
                    .map(|row| {
                        Ok(VhvRecord {
                            id: row.try_get("id")?,
                            user_id: row.try_get("user_id")?,
                            full_name: row.try_get("full_name")?,
                            phone: row.try_get("phone")?,
                            village: row.try_get("village")?,
                            district: row.try_get("district")?,
                            status: row.try_get("status")?,
                            created_at: row.try_get("created_at")?,
                        })
                    })
                    .collect()
            },
        }
    }
}
