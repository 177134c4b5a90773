use std::time::{Duration, Instant};

use crate::model::{Bom, Category, Item, Record, numeric_part};
use crate::store::{self, Document, DocumentStore, StoreError};

/// In-memory mirror of one collection.
///
/// Mutations update the cache first and the store second. A failed load
/// latches [`Cache::has_error`] until [`Cache::clear_error`] is called.
#[derive(Debug)]
pub struct Cache<T> {
    records: Vec<T>,
    has_error: bool,
    loaded_at: Option<Instant>,
    refresh_interval: Duration,
}

impl<T: Record> Cache<T> {
    #[must_use]
    pub const fn new(refresh_interval: Duration) -> Self {
        Self {
            records: Vec::new(),
            has_error: false,
            loaded_at: None,
            refresh_interval,
        }
    }

    /// Drop the cached records and reload them. Returns false on failure.
    pub fn init(&mut self, store: &dyn DocumentStore) -> bool {
        self.init_at(store, Instant::now())
    }

    fn init_at(&mut self, store: &dyn DocumentStore, now: Instant) -> bool {
        if self.has_error {
            return false;
        }

        self.records.clear();
        self.loaded_at = Some(now);

        let loaded = store
            .get_all_documents(T::COLLECTION, &Document::new())
            .and_then(|docs| docs.into_iter().map(T::from_document).collect());

        match loaded {
            Ok(records) => {
                self.records = records;
                tracing::debug!("Loaded {} {}", self.records.len(), T::COLLECTION);
                true
            }
            Err(e) => {
                tracing::error!(critical = true, "Failed to load {}: {e}", T::COLLECTION);
                self.has_error = true;
                false
            }
        }
    }

    /// Reload once the refresh interval has elapsed since the last load.
    pub fn refresh(&mut self, store: &dyn DocumentStore, now: Instant) {
        let due = self
            .loaded_at
            .is_none_or(|at| now.saturating_duration_since(at) >= self.refresh_interval);
        if due {
            self.init_at(store, now);
        }
    }

    #[must_use]
    pub const fn has_error(&self) -> bool {
        self.has_error
    }

    pub const fn clear_error(&mut self) {
        self.has_error = false;
    }

    #[must_use]
    pub fn all(&self) -> &[T] {
        &self.records
    }

    pub fn find(&self, key: &str) -> Option<&T> {
        self.records.iter().find(|r| r.key() == key)
    }

    pub fn add(&mut self, store: &mut dyn DocumentStore, record: T) -> Result<(), StoreError> {
        let document = record.to_document()?;
        self.records.push(record);
        store.insert(T::COLLECTION, document)
    }

    /// Replace `old` with `new`, matching the stored document on `old`'s key.
    pub fn edit(
        &mut self,
        store: &mut dyn DocumentStore,
        old: &T,
        new: T,
    ) -> Result<bool, StoreError> {
        let document = new.to_document()?;
        self.remove(old);
        self.records.push(new);
        store.update(T::COLLECTION, &old.key_filter(), document)
    }

    pub fn delete(&mut self, store: &mut dyn DocumentStore, record: &T) -> Result<bool, StoreError> {
        self.remove(record);
        store.delete(T::COLLECTION, &record.key_filter())
    }

    fn remove(&mut self, record: &T) {
        if let Some(pos) = self.records.iter().position(|r| r == record) {
            self.records.remove(pos);
        }
    }
}

impl Cache<Item> {
    pub fn get_by_id(&self, id: &str) -> Option<&Item> {
        self.find(id)
    }

    /// Next free id in `category`, or the id for `number` when given.
    ///
    /// `None` once the category's numbering is exhausted.
    #[must_use]
    pub fn new_id(&self, category: &Category, number: Option<u64>) -> Option<String> {
        let number = match number {
            Some(number) => number,
            None => self
                .records
                .iter()
                .filter(|item| item.category == category.name)
                .filter_map(|item| numeric_part(&item.id))
                .max()
                .map_or(Some(0), |max| max.checked_add(1))?,
        };
        Some(category.format_id(number))
    }
}

impl Cache<Category> {
    pub fn get_by_name(&mut self, store: &dyn DocumentStore, name: &str) -> Option<Category> {
        self.lookup(store, "name", name, |c| c.name == name)
    }

    pub fn get_by_prefix(&mut self, store: &dyn DocumentStore, prefix: &str) -> Option<Category> {
        self.lookup(store, "prefix", prefix, |c| c.prefix == prefix)
    }

    /// Cache first, then the store. Store hits are added to the cache.
    fn lookup(
        &mut self,
        store: &dyn DocumentStore,
        field: &str,
        value: &str,
        predicate: impl Fn(&Category) -> bool,
    ) -> Option<Category> {
        if let Some(found) = self.records.iter().find(|c| predicate(c)) {
            return Some(found.clone());
        }

        let document = match store.get_document(Category::COLLECTION, &store::filter(field, value)) {
            Ok(document) => document?,
            Err(e) => {
                tracing::error!("Category lookup by {field} failed: {e}");
                return None;
            }
        };
        match Category::from_document(document) {
            Ok(category) => {
                self.records.push(category.clone());
                Some(category)
            }
            Err(e) => {
                tracing::warn!("{e}");
                None
            }
        }
    }
}

impl Cache<Bom> {
    /// `None` once BOM numbering is exhausted.
    #[must_use]
    pub fn new_id(&self) -> Option<String> {
        let max = self
            .records
            .iter()
            .filter_map(|bom| numeric_part(&bom.id))
            .max()
            .unwrap_or(0);
        Some(format!("BOM{}", max.checked_add(1)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreError};

    const INTERVAL: Duration = Duration::from_secs(10);

    fn demo() -> MemoryStore {
        MemoryStore::with_demo_data().unwrap()
    }

    struct BrokenStore;

    impl DocumentStore for BrokenStore {
        fn get_document(&self, _: &str, _: &Document) -> store::Result<Option<Document>> {
            Err(StoreError::Unavailable("offline".into()))
        }
        fn get_all_documents(&self, _: &str, _: &Document) -> store::Result<Vec<Document>> {
            Err(StoreError::Unavailable("offline".into()))
        }
        fn insert(&mut self, _: &str, _: Document) -> store::Result<()> {
            Err(StoreError::Unavailable("offline".into()))
        }
        fn update(&mut self, _: &str, _: &Document, _: Document) -> store::Result<bool> {
            Err(StoreError::Unavailable("offline".into()))
        }
        fn delete(&mut self, _: &str, _: &Document) -> store::Result<bool> {
            Err(StoreError::Unavailable("offline".into()))
        }
    }

    #[test]
    fn test_init_loads_collection() {
        let store = demo();
        let mut items: Cache<Item> = Cache::new(INTERVAL);
        assert!(items.init(&store));
        assert_eq!(items.all().len(), 5);
        assert_eq!(items.get_by_id("C0").unwrap().quantity, 8.0);
    }

    #[test]
    fn test_failure_latches() {
        let mut items: Cache<Item> = Cache::new(INTERVAL);
        assert!(!items.init(&BrokenStore));
        assert!(items.has_error());
        assert!(!items.init(&demo()));
        assert!(items.all().is_empty());

        items.clear_error();
        assert!(items.init(&demo()));
    }

    #[test]
    fn test_refresh_waits_for_interval() {
        let mut store = demo();
        let mut categories: Cache<Category> = Cache::new(INTERVAL);
        let start = Instant::now();
        categories.refresh(&store, start);
        assert_eq!(categories.all().len(), 3);

        store
            .insert(
                Category::COLLECTION,
                Category::new("Diodes", "D", None).to_document().unwrap(),
            )
            .unwrap();
        categories.refresh(&store, start + Duration::from_secs(5));
        assert_eq!(categories.all().len(), 3);
        categories.refresh(&store, start + INTERVAL);
        assert_eq!(categories.all().len(), 4);
    }

    #[test]
    fn test_edit_and_delete_reach_store() {
        let mut store = demo();
        let mut items: Cache<Item> = Cache::new(INTERVAL);
        items.init(&store);

        let old = items.get_by_id("R1").unwrap().clone();
        let new = Item {
            id: "R7".into(),
            ..old.clone()
        };
        assert!(items.edit(&mut store, &old, new.clone()).unwrap());
        assert!(items.get_by_id("R1").is_none());
        assert!(store.get_document(Item::COLLECTION, &store::filter("id", "R7")).unwrap().is_some());

        assert!(items.delete(&mut store, &new).unwrap());
        assert!(!items.delete(&mut store, &new).unwrap());
        assert_eq!(items.all().len(), 4);
    }

    #[test]
    fn test_item_new_id() {
        let store = demo();
        let mut items: Cache<Item> = Cache::new(INTERVAL);
        items.init(&store);

        let connectors = Category::new("Connectors", "CON", Some('A'));
        assert_eq!(items.new_id(&connectors, None).unwrap(), "CON2A");
        assert_eq!(items.new_id(&connectors, Some(9)).unwrap(), "CON9A");
        assert_eq!(
            items.new_id(&Category::new("Diodes", "d", None), None).unwrap(),
            "D0"
        );
    }

    #[test]
    fn test_new_id_stops_at_numbering_limit() {
        let mut store = demo();
        let mut items: Cache<Item> = Cache::new(INTERVAL);
        items.init(&store);
        let resistors = Category::new("Resistors", "R", None);
        let last = Item {
            id: resistors.format_id(u64::MAX),
            category: resistors.name.clone(),
            ..Item::default()
        };
        items.add(&mut store, last).unwrap();

        assert_eq!(items.new_id(&resistors, None), None);
        assert_eq!(items.new_id(&resistors, Some(3)).unwrap(), "R3");

        let mut boms: Cache<Bom> = Cache::new(INTERVAL);
        boms.init(&store);
        let mut bom = boms.find("BOM1").unwrap().clone();
        bom.id = format!("BOM{}", u64::MAX);
        boms.add(&mut store, bom).unwrap();
        assert_eq!(boms.new_id(), None);
    }

    #[test]
    fn test_category_lookup_falls_back_to_store() {
        let mut store = demo();
        let mut categories: Cache<Category> = Cache::new(INTERVAL);
        categories.init(&store);
        store
            .insert(
                Category::COLLECTION,
                Category::new("Diodes", "D", None).to_document().unwrap(),
            )
            .unwrap();

        assert_eq!(categories.get_by_prefix(&store, "D").unwrap().name, "Diodes");
        assert_eq!(categories.all().len(), 4);
        assert!(categories.get_by_name(&store, "Inductors").is_none());
    }

    #[test]
    fn test_bom_new_id() {
        let store = demo();
        let mut boms: Cache<Bom> = Cache::new(INTERVAL);
        assert_eq!(boms.new_id().unwrap(), "BOM1");
        boms.init(&store);
        assert_eq!(boms.new_id().unwrap(), "BOM2");
    }
}
