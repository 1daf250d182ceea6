//! Storage port for wizard snapshots.

use std::collections::HashMap;
use std::sync::Mutex;

use super::error::PersistenceError;
use crate::db::{wizard_repo, Database};

/// Key/value store holding serialized wizard snapshots.
pub trait WizardStore: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    fn save(&self, key: &str, value: &str) -> Result<(), PersistenceError>;
    fn clear(&self, key: &str) -> Result<(), PersistenceError>;
}

/// Process-local store, mostly for tests.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WizardStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let entries = self.entries.lock().map_err(|_| PersistenceError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let mut entries = self.entries.lock().map_err(|_| PersistenceError::LockPoisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), PersistenceError> {
        let mut entries = self.entries.lock().map_err(|_| PersistenceError::LockPoisoned)?;
        entries.remove(key);
        Ok(())
    }
}

/// Store backed by the `wizard_state` table.
#[derive(Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl WizardStore for SqliteStore {
    fn load(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(wizard_repo::load(&self.db, key)?)
    }

    fn save(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        Ok(wizard_repo::save(&self.db, key, value)?)
    }

    fn clear(&self, key: &str) -> Result<(), PersistenceError> {
        Ok(wizard_repo::clear(&self.db, key)?)
    }
}
