use rusqlite::Connection;
use tracing::info;

use super::CREATED_AT_INDEXES;

/// Run SQLite migrations
pub fn run_migrations(conn: &Connection) -> Result<(), String> {
    info!("Running SQLite migrations");

    create_users_table(conn)?;
    create_vhvs_table(conn)?;
    create_indexes(conn)?;

    info!("SQLite migrations completed successfully");
    Ok(())
}

/// Create the users table
fn create_users_table(conn: &Connection) -> Result<(), String> {
    info!("Creating users table if not exists");

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            full_name TEXT,
            role TEXT NOT NULL,
            phone TEXT,
            created_at TEXT
        );",
    ).map_err(|e| format!("Failed to create users table: {}", e))
}

/// Create the village health volunteers table
fn create_vhvs_table(conn: &Connection) -> Result<(), String> {
    info!("Creating vhvs table if not exists");

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS vhvs (
            id TEXT PRIMARY KEY,
            user_id TEXT REFERENCES users (id),
            full_name TEXT NOT NULL,
            phone TEXT,
            village TEXT,
            district TEXT,
            status TEXT,
            created_at TEXT
        );",
    ).map_err(|e| format!("Failed to create vhvs table: {}", e))
}

fn create_indexes(conn: &Connection) -> Result<(), String> {
    for statement in CREATED_AT_INDEXES {
        conn.execute_batch(statement)
            .map_err(|e| format!("Failed to create index: {}", e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_names(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'index' AND name LIKE 'idx_%' ORDER BY name")
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<String>, _>>()
            .unwrap()
    }

    #[test]
    fn test_migrations_create_created_at_indexes() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        assert_eq!(index_names(&conn), vec!["idx_users_created_at", "idx_vhvs_created_at"]);
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        assert_eq!(index_names(&conn).len(), 2);
    }
}
