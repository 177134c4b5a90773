use std::fs;
use std::path::{Path, PathBuf};

use super::memory::Collections;
use super::{Document, DocumentStore, Result, StoreError};

/// Store persisted as a single JSON file of `{collection: [documents]}`.
///
/// Every mutation rewrites the whole file through a temporary sibling and a
/// rename. The in-memory state only changes once the file is written.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    collections: Collections,
}

impl JsonFileStore {
    /// Open the store at `path`, starting empty if the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let collections = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                Collections::default()
            } else {
                Collections(serde_json::from_str(&content)?)
            }
        } else {
            Collections::default()
        };

        tracing::debug!("Opened store at {}", path.display());
        Ok(Self { path, collections })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` to a copy of the collections, write it, then keep it.
    fn commit(&mut self, change: impl FnOnce(&mut Collections) -> bool) -> Result<bool> {
        let mut next = self.collections.clone();
        if !change(&mut next) {
            return Ok(false);
        }
        self.persist(&next)?;
        self.collections = next;
        Ok(true)
    }

    fn persist(&self, collections: &Collections) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&collections.0)?;
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, &self.path).map_err(|e| {
            StoreError::Unavailable(format!("could not replace {}: {e}", self.path.display()))
        })
    }
}

impl DocumentStore for JsonFileStore {
    fn get_document(&self, collection: &str, filter: &Document) -> Result<Option<Document>> {
        Ok(self.collections.find_one(collection, filter))
    }

    fn get_all_documents(&self, collection: &str, filter: &Document) -> Result<Vec<Document>> {
        Ok(self.collections.find_all(collection, filter))
    }

    fn insert(&mut self, collection: &str, document: Document) -> Result<()> {
        self.commit(|collections| {
            collections.insert(collection, document);
            true
        })?;
        Ok(())
    }

    fn update(&mut self, collection: &str, filter: &Document, document: Document) -> Result<bool> {
        self.commit(|collections| collections.update(collection, filter, &document))
    }

    fn delete(&mut self, collection: &str, filter: &Document) -> Result<bool> {
        self.commit(|collections| collections.delete(collection, filter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CATEGORIES, filter};
    use tempfile::TempDir;

    #[test]
    fn test_mutations_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("inventory.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        store.insert(CATEGORIES, filter("name", "Resistors")).unwrap();
        store.insert(CATEGORIES, filter("name", "Diodes")).unwrap();
        assert!(store.delete(CATEGORIES, &filter("name", "Diodes")).unwrap());

        let reopened = JsonFileStore::open(&path).unwrap();
        let all = reopened.get_all_documents(CATEGORIES, &Document::new()).unwrap();
        assert_eq!(all, vec![filter("name", "Resistors")]);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_failed_write_leaves_state_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inventory.json");
        let mut store = JsonFileStore::open(&path).unwrap();
        store.insert(CATEGORIES, filter("name", "Resistors")).unwrap();

        // A directory where the temporary file goes makes every write fail.
        fs::create_dir(path.with_extension("json.tmp")).unwrap();
        assert!(store.insert(CATEGORIES, filter("name", "Diodes")).is_err());
        assert!(store.delete(CATEGORIES, &filter("name", "Resistors")).is_err());

        let all = store.get_all_documents(CATEGORIES, &Document::new()).unwrap();
        assert_eq!(all, vec![filter("name", "Resistors")]);
        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get_all_documents(CATEGORIES, &Document::new()).unwrap(), all);
    }

    #[test]
    fn test_invalid_file_is_a_json_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inventory.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(JsonFileStore::open(&path), Err(StoreError::Json(_))));
    }

    #[test]
    fn test_empty_file_opens_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inventory.json");
        fs::write(&path, "").unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.path(), path);
        assert!(store.get_all_documents(CATEGORIES, &Document::new()).unwrap().is_empty());
    }
}
