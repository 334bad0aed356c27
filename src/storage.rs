use std::{
    collections::HashMap,
    fs, io,
    path::PathBuf,
    sync::Mutex,
};

use crate::error::StoreError;

/// One JSON blob per store, keyed by the store's name. The blob is the raw
/// collection array; there is no versioning and no partial write.
pub trait StorageBackend: Send + Sync {
    fn load(&self, store: &str) -> Result<Option<String>, StoreError>;
    fn persist(&self, store: &str, payload: &str) -> Result<(), StoreError>;
}

#[derive(Default)]
pub struct MemoryBackend {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> MemoryBackend {
        MemoryBackend::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn load(&self, store: &str) -> Result<Option<String>, StoreError> {
        Ok(self.blobs.lock().expect("BLOB_LOCK_POISONED").get(store).cloned())
    }
    fn persist(&self, store: &str, payload: &str) -> Result<(), StoreError> {
        self.blobs
            .lock()
            .expect("BLOB_LOCK_POISONED")
            .insert(store.to_string(), payload.to_string());
        Ok(())
    }
}

pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    pub fn new(root: impl Into<PathBuf>) -> Result<FileBackend, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(FileBackend { root })
    }

    fn path(&self, store: &str) -> PathBuf {
        self.root.join(format!("{store}.json"))
    }
}

impl StorageBackend for FileBackend {
    fn load(&self, store: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path(store)) {
            Ok(raw) => Ok(Some(raw)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(StoreError::Storage(error)),
        }
    }
    fn persist(&self, store: &str, payload: &str) -> Result<(), StoreError> {
        fs::write(self.path(store), payload)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_round_trip() {
        let backend = MemoryBackend::new();
        assert!(backend.load("incidents-storage").unwrap().is_none());
        backend.persist("incidents-storage", "[]").unwrap();
        assert_eq!(backend.load("incidents-storage").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path()).unwrap();
        backend.persist("cameras-storage", r#"[{"id":1}]"#).unwrap();
        assert_eq!(
            backend.load("cameras-storage").unwrap().as_deref(),
            Some(r#"[{"id":1}]"#)
        );
    }

    #[test]
    fn file_load_missing_store_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path()).unwrap();
        assert!(backend.load("lost-items-storage").unwrap().is_none());
    }
}
