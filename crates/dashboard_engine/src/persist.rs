use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use dashboard_core::{KeyValueStore, PersistenceError};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("data directory missing or not writable: {0}")]
    DataDir(String),
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl From<StoreError> for PersistenceError {
    fn from(err: StoreError) -> Self {
        PersistenceError::storage(err)
    }
}

/// Ensure the data directory exists; create if missing.
pub fn ensure_data_dir(dir: &Path) -> Result<(), StoreError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| StoreError::DataDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(StoreError::DataDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| StoreError::DataDir(e.to_string()))?;
    }
    Ok(())
}

/// Atomically replace `target` by writing a temp file next to it, then renaming.
pub fn write_atomic(target: &Path, content: &str) -> Result<(), StoreError> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    ensure_data_dir(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(target).map_err(|e| StoreError::Io(e.error))?;
    Ok(())
}

/// Key-value store keeping each key in `{dir}/{key}.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }

    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let target = self.path_for(key)?;
        write_atomic(&target, value)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.read(key)?)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        Ok(self.write(key, value)?)
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        Ok(self.delete(key)?)
    }
}
