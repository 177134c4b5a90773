use std::collections::BTreeMap;

use serde_json::{Value, json};

use super::{Document, DocumentStore, Result, add_user, matches_filter};
use super::{BOMS, CATEGORIES, ITEMS};

/// Named collections of documents, shared by the in-memory and file stores.
#[derive(Debug, Default, Clone, PartialEq)]
pub(super) struct Collections(pub BTreeMap<String, Vec<Document>>);

impl Collections {
    pub fn find_one(&self, collection: &str, filter: &Document) -> Option<Document> {
        self.0
            .get(collection)?
            .iter()
            .find(|doc| matches_filter(doc, filter))
            .cloned()
    }

    pub fn find_all(&self, collection: &str, filter: &Document) -> Vec<Document> {
        self.0
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| matches_filter(doc, filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn insert(&mut self, collection: &str, document: Document) {
        self.0
            .entry(collection.to_string())
            .or_default()
            .push(document);
    }

    pub fn update(&mut self, collection: &str, filter: &Document, document: &Document) -> bool {
        let mut matched = false;
        for doc in self.0.get_mut(collection).into_iter().flatten() {
            if matches_filter(doc, filter) {
                for (key, value) in document {
                    doc.insert(key.clone(), value.clone());
                }
                matched = true;
            }
        }
        matched
    }

    pub fn delete(&mut self, collection: &str, filter: &Document) -> bool {
        let Some(docs) = self.0.get_mut(collection) else {
            return false;
        };
        let before = docs.len();
        docs.retain(|doc| !matches_filter(doc, filter));
        docs.len() != before
    }
}

/// Volatile store for tests and `--memory` sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Collections,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding a few categories, items and one BOM, plus an `admin`
    /// user (password `admin`, write access) and a read-only `guest`.
    pub fn with_demo_data() -> Result<Self> {
        let mut store = Self::new();

        let categories = [
            json!({ "name": "Resistors", "prefix": "R", "suffix": null }),
            json!({ "name": "Capacitors", "prefix": "C", "suffix": null }),
            json!({ "name": "Connectors", "prefix": "CON", "suffix": "A" }),
        ];
        let items = [
            json!({ "id": "R0", "description": "10k 0603 1%", "category": "Resistors",
                    "referenceLink": "RC0603FR-0710KL", "location": "Drawer A1",
                    "price": 0.01, "quantity": 500.0, "unit": "pcs", "status": 0 }),
            json!({ "id": "R1", "description": "4.7k 0603 1%", "category": "Resistors",
                    "referenceLink": "RC0603FR-074K7L", "location": "Drawer A1",
                    "price": 0.01, "quantity": 120.0, "unit": "pcs", "status": 0 }),
            json!({ "id": "C0", "description": "100nF 0402 X7R", "category": "Capacitors",
                    "referenceLink": "GRM155R71C104KA88D", "location": "Drawer B2",
                    "price": 0.02, "quantity": 8.0, "unit": "pcs", "status": 2 }),
            json!({ "id": "CON0A", "description": "2-pin header 2.54mm", "category": "Connectors",
                    "referenceLink": "", "location": "Bin 4",
                    "price": 0.15, "quantity": 40.0, "unit": "pcs", "status": 0 }),
            json!({ "id": "CON1A", "description": "Sensor board", "category": "Connectors",
                    "referenceLink": "", "location": "Shelf 2",
                    "price": 3.5, "quantity": 0.0, "unit": "pcs", "status": 0 }),
        ];
        let boms = [json!({
            "id": "BOM1",
            "name": "Sensor board",
            "items": [
                { "id": "R0", "quantity": 4.0, "position": 0 },
                { "id": "C0", "quantity": 2.0, "position": 1 },
                { "id": "CON0A", "quantity": 1.0, "position": 2 },
            ],
            "output": { "id": "CON1A", "quantity": 1.0, "position": 0 },
        })];

        for (collection, docs) in [
            (CATEGORIES, &categories[..]),
            (ITEMS, &items[..]),
            (BOMS, &boms[..]),
        ] {
            for doc in docs {
                if let Value::Object(map) = doc {
                    store.collections.insert(collection, map.clone());
                }
            }
        }

        add_user(&mut store, "admin", "admin", true)?;
        add_user(&mut store, "guest", "guest", false)?;
        Ok(store)
    }
}

impl DocumentStore for MemoryStore {
    fn get_document(&self, collection: &str, filter: &Document) -> Result<Option<Document>> {
        Ok(self.collections.find_one(collection, filter))
    }

    fn get_all_documents(&self, collection: &str, filter: &Document) -> Result<Vec<Document>> {
        Ok(self.collections.find_all(collection, filter))
    }

    fn insert(&mut self, collection: &str, document: Document) -> Result<()> {
        self.collections.insert(collection, document);
        Ok(())
    }

    fn update(&mut self, collection: &str, filter: &Document, document: Document) -> Result<bool> {
        Ok(self.collections.update(collection, filter, &document))
    }

    fn delete(&mut self, collection: &str, filter: &Document) -> Result<bool> {
        Ok(self.collections.delete(collection, filter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::filter;

    #[test]
    fn test_update_merges_fields() {
        let mut store = MemoryStore::new();
        let mut doc = filter("id", "R0");
        doc.insert("quantity".into(), json!(1.0));
        store.insert(ITEMS, doc).unwrap();

        let mut change = Document::new();
        change.insert("quantity".into(), json!(3.0));
        assert!(store.update(ITEMS, &filter("id", "R0"), change.clone()).unwrap());
        assert!(!store.update(ITEMS, &filter("id", "R9"), change).unwrap());

        let found = store.get_document(ITEMS, &filter("id", "R0")).unwrap().unwrap();
        assert_eq!(found["quantity"], json!(3.0));
    }

    #[test]
    fn test_delete_reports_removal() {
        let mut store = MemoryStore::new();
        store.insert(ITEMS, filter("id", "R0")).unwrap();

        assert!(store.delete(ITEMS, &filter("id", "R0")).unwrap());
        assert!(!store.delete(ITEMS, &filter("id", "R0")).unwrap());
        assert!(!store.delete(BOMS, &filter("id", "R0")).unwrap());
    }

    #[test]
    fn test_demo_data() {
        let store = MemoryStore::with_demo_data().unwrap();
        assert_eq!(store.get_all_documents(ITEMS, &Document::new()).unwrap().len(), 5);
        assert!(store.login("admin", "admin").unwrap().is_some_and(|r| r.write));
        assert!(store.login("guest", "guest").unwrap().is_some_and(|r| !r.write));
    }
}
