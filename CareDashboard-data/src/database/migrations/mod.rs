// Schema migrations per backend

mod sqlite;
pub use sqlite::run_migrations as run_sqlite_migrations;

#[cfg(feature = "postgres")]
mod postgres;
#[cfg(feature = "postgres")]
pub use postgres::run_migrations as run_postgres_migrations;

/// Indexes backing the `created_at` ordering of both listings
pub(crate) const CREATED_AT_INDEXES: [&str; 2] = [
    "CREATE INDEX IF NOT EXISTS idx_users_created_at ON users (created_at)",
    "CREATE INDEX IF NOT EXISTS idx_vhvs_created_at ON vhvs (created_at)",
];
