use std::sync::{Arc, Mutex};
use indexmap::IndexMap;

use crate::models::{UserRecord, VhvRecord};
use super::errors::RepositoryError;

/// In-memory storage for directory records
///
/// Records keep insertion order; re-inserting an id replaces the record in place.
/// Clones share the same underlying storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    users: Arc<Mutex<IndexMap<String, UserRecord>>>,
    vhvs: Arc<Mutex<IndexMap<String, VhvRecord>>>,
}

impl InMemoryStorage {
    /// Create a new, empty in-memory storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a user
    pub fn insert_user(&self, user: UserRecord) -> Result<(), RepositoryError> {
        let mut store = self.users.lock()?;
        store.insert(user.id.clone(), user);
        Ok(())
    }

    /// Insert or replace a volunteer
    pub fn insert_vhv(&self, vhv: VhvRecord) -> Result<(), RepositoryError> {
        let mut store = self.vhvs.lock()?;
        store.insert(vhv.id.clone(), vhv);
        Ok(())
    }

    /// All users in insertion order
    pub fn list_users(&self) -> Result<Vec<UserRecord>, RepositoryError> {
        let store = self.users.lock()?;
        Ok(store.values().cloned().collect())
    }

    /// All volunteers in insertion order
    pub fn list_vhvs(&self) -> Result<Vec<VhvRecord>, RepositoryError> {
        let store = self.vhvs.lock()?;
        Ok(store.values().cloned().collect())
    }
}
