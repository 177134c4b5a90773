//! Document storage.
//!
//! The inventory talks to a [`DocumentStore`]: a small document-database
//! interface over named collections of JSON objects. Filters are documents
//! that match by field equality.

mod json_file;
mod memory;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use serde_json::Value;
use thiserror::Error;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

pub type Document = serde_json::Map<String, Value>;

pub const ITEMS: &str = "Items";
pub const CATEGORIES: &str = "Categories";
pub const BOMS: &str = "BOMs";
pub const USERS: &str = "Users";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed {collection} document: {message}")]
    Codec {
        collection: &'static str,
        message: String,
    },

    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Permissions granted to a logged in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRole {
    pub username: String,
    pub write: bool,
}

pub trait DocumentStore: Send {
    fn get_document(&self, collection: &str, filter: &Document) -> Result<Option<Document>>;

    fn get_all_documents(&self, collection: &str, filter: &Document) -> Result<Vec<Document>>;

    fn insert(&mut self, collection: &str, document: Document) -> Result<()>;

    /// Replace the fields of every matching document. Returns whether anything matched.
    fn update(&mut self, collection: &str, filter: &Document, document: Document) -> Result<bool>;

    /// Remove every matching document. Returns whether anything was removed.
    fn delete(&mut self, collection: &str, filter: &Document) -> Result<bool>;

    /// Check credentials against the `Users` collection.
    fn login(&self, username: &str, password: &str) -> Result<Option<UserRole>> {
        let Some(user) = self.get_document(USERS, &filter("username", username))? else {
            return Ok(None);
        };

        let hash = user
            .get("passwordHash")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if !verify_password(hash, password) {
            return Ok(None);
        }

        Ok(Some(UserRole {
            username: username.to_string(),
            write: user.get("write").and_then(Value::as_bool).unwrap_or(false),
        }))
    }
}

/// Single-field equality filter.
#[must_use]
pub fn filter(field: &str, value: &str) -> Document {
    let mut doc = Document::new();
    doc.insert(field.to_string(), Value::String(value.to_string()));
    doc
}

#[must_use]
pub fn matches_filter(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, value)| document.get(key) == Some(value))
}

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| StoreError::Hash(e.to_string()))?;
    Ok(hash.to_string())
}

#[must_use]
pub fn verify_password(hash: &str, password: &str) -> bool {
    PasswordHash::new(hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}

/// Create or replace a user with the given password and write permission.
pub fn add_user(
    store: &mut dyn DocumentStore,
    username: &str,
    password: &str,
    write: bool,
) -> Result<()> {
    let mut document = filter("username", username);
    document.insert("passwordHash".into(), Value::String(hash_password(password)?));
    document.insert("write".into(), Value::Bool(write));

    let by_name = filter("username", username);
    if !store.update(USERS, &by_name, document.clone())? {
        store.insert(USERS, document)?;
    }
    tracing::info!(target: "audit", "Provisioned user {username} (write: {write})");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_matches_filter() {
        let mut doc = filter("id", "R0");
        doc.insert("quantity".into(), json!(4.0));

        assert!(matches_filter(&doc, &filter("id", "R0")));
        assert!(!matches_filter(&doc, &filter("id", "R1")));
        assert!(matches_filter(&doc, &Document::new()));
    }

    #[test]
    fn test_password_hash_verifies() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password(&hash, "hunter2"));
        assert!(!verify_password(&hash, "hunter3"));
        assert!(!verify_password("not a hash", "hunter2"));
    }

    #[test]
    fn test_add_user_then_login() {
        let mut store = MemoryStore::new();
        add_user(&mut store, "alice", "pw", true).unwrap();
        add_user(&mut store, "alice", "new-pw", false).unwrap();

        assert_eq!(store.get_all_documents(USERS, &Document::new()).unwrap().len(), 1);
        assert_eq!(store.login("alice", "pw").unwrap(), None);
        assert_eq!(
            store.login("alice", "new-pw").unwrap(),
            Some(UserRole {
                username: "alice".into(),
                write: false
            })
        );
        assert_eq!(store.login("bob", "pw").unwrap(), None);
    }
}
