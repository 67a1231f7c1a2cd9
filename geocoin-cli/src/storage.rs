//! File-backed implementation of the core's storage collaborator.
//!
//! One file per key inside a save directory. Unreadable or unwritable
//! directories surface as storage errors; the session reacts by degrading
//! to in-memory play rather than crashing.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use geocoin_game::StateStorage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileStorageError {
    #[error("save dir i/o: {0}")]
    Io(#[from] std::io::Error),
}

/// Key-value store over a directory of files.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub const fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are dotted identifiers, safe as file names.
        self.dir.join(key)
    }
}

impl StateStorage for FileStorage {
    type Error = FileStorageError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), Self::Error> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "geocoin-storage-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn get_set_remove_roundtrip() {
        let mut storage = FileStorage::new(temp_dir("roundtrip"));
        assert!(storage.get("geocoin.save.v1").unwrap().is_none());
        storage.set("geocoin.save.v1", "{\"x\":1}").unwrap();
        assert_eq!(
            storage.get("geocoin.save.v1").unwrap().as_deref(),
            Some("{\"x\":1}")
        );
        storage.remove("geocoin.save.v1").unwrap();
        assert!(storage.get("geocoin.save.v1").unwrap().is_none());
        // Removing again is fine.
        storage.remove("geocoin.save.v1").unwrap();
    }
}
