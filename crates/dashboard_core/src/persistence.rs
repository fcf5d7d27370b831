use std::collections::HashMap;
use std::error::Error as StdError;

use dashboard_logging::{dash_debug, dash_warn};
use thiserror::Error;

use crate::{Effect, Job};

/// Fixed key under which the job list is stored.
pub const JOBS_KEY: &str = "employer_jobs";

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to serialize jobs: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("storage backend error: {0}")]
    Storage(#[source] Box<dyn StdError + Send + Sync>),
}

impl PersistenceError {
    pub fn storage(err: impl StdError + Send + Sync + 'static) -> Self {
        PersistenceError::Storage(Box::new(err))
    }
}

/// String key-value storage collaborator.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;
    fn remove(&mut self, key: &str) -> Result<(), PersistenceError>;
}

/// In-process store; useful for tests and sessions that should not touch disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// JSON serialization boundary between the job list and a [`KeyValueStore`].
#[derive(Debug, Clone, Default)]
pub struct JobPersistence<S> {
    store: S,
}

impl<S: KeyValueStore> JobPersistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reads the stored list. Missing, unreadable or malformed data yields an empty list.
    pub fn load(&self) -> Vec<Job> {
        let raw = match self.store.get(JOBS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                dash_warn!("Failed to read stored jobs: {}", err);
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<Job>>(&raw) {
            Ok(jobs) => {
                dash_debug!("Loaded {} stored jobs", jobs.len());
                jobs
            }
            Err(err) => {
                dash_warn!("Failed to parse stored jobs, starting empty: {}", err);
                Vec::new()
            }
        }
    }

    pub fn save(&mut self, jobs: &[Job]) -> Result<(), PersistenceError> {
        let encoded = serde_json::to_string(jobs)?;
        self.store.set(JOBS_KEY, &encoded)
    }

    pub fn clear(&mut self) -> Result<(), PersistenceError> {
        self.store.remove(JOBS_KEY)
    }

    /// Executes a persistence effect. Returns `Ok(false)` for effects that
    /// belong to someone else.
    pub fn apply(&mut self, effect: &Effect) -> Result<bool, PersistenceError> {
        match effect {
            Effect::PersistJobs(jobs) => self.save(jobs).map(|()| true),
            Effect::ClearPersistedJobs => self.clear().map(|()| true),
            _ => Ok(false),
        }
    }
}
