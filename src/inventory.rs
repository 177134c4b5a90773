//! Cached view of the store plus the logged in session.
//!
//! All mutations go through [`Inventory`], which checks write permission
//! before touching the caches or the store.

mod cache;
mod session;

use std::time::{Duration, Instant};

use thiserror::Error;

pub use cache::Cache;
pub use session::Session;

use crate::model::{Bom, Category, Item};
use crate::store::{DocumentStore, StoreError};

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("You must be logged in to do this action")]
    Unauthorized,

    #[error("Unknown item {0}")]
    UnknownItem(String),

    #[error("Item {0} already exists")]
    DuplicateItem(String),

    #[error("Not enough stock for {} item(s)", .0.len())]
    Shortfall(Vec<Requirement>),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, InventoryError>;

/// Stock needed from one component to make a BOM.
#[derive(Debug, Clone, PartialEq)]
pub struct Requirement {
    pub id: String,
    pub description: String,
    pub unit: String,
    pub needed: f32,
    pub available: f32,
}

impl Requirement {
    #[must_use]
    pub fn is_short(&self) -> bool {
        self.needed > self.available
    }
}

pub struct Inventory {
    store: Box<dyn DocumentStore>,
    items: Cache<Item>,
    categories: Cache<Category>,
    boms: Cache<Bom>,
    session: Session,
}

impl Inventory {
    pub fn new(store: Box<dyn DocumentStore>, refresh_interval: Duration) -> Self {
        let mut inventory = Self {
            store,
            items: Cache::new(refresh_interval),
            categories: Cache::new(refresh_interval),
            boms: Cache::new(refresh_interval),
            session: Session::default(),
        };
        inventory.reload();
        inventory
    }

    /// Clear latched errors and reload every cache.
    pub fn reload(&mut self) -> bool {
        self.items.clear_error();
        self.categories.clear_error();
        self.boms.clear_error();

        let store = self.store.as_ref();
        let items = self.items.init(store);
        let categories = self.categories.init(store);
        let boms = self.boms.init(store);
        items && categories && boms
    }

    pub fn refresh_all(&mut self, now: Instant) {
        let store = self.store.as_ref();
        self.items.refresh(store, now);
        self.categories.refresh(store, now);
        self.boms.refresh(store, now);
    }

    #[must_use]
    pub const fn has_error(&self) -> bool {
        self.items.has_error() || self.categories.has_error() || self.boms.has_error()
    }

    #[must_use]
    pub const fn items(&self) -> &Cache<Item> {
        &self.items
    }

    #[must_use]
    pub const fn categories(&self) -> &Cache<Category> {
        &self.categories
    }

    #[must_use]
    pub const fn boms(&self) -> &Cache<Bom> {
        &self.boms
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    pub fn login(&mut self, username: &str, password: &str) -> Result<bool> {
        Ok(self.session.login(self.store.as_ref(), username, password)?)
    }

    pub fn logout(&mut self) {
        self.session.logout();
    }

    #[must_use]
    pub fn can_write(&self) -> bool {
        self.session.has_write_privileges()
    }

    fn require_write(&self) -> Result<()> {
        if self.can_write() {
            Ok(())
        } else {
            Err(InventoryError::Unauthorized)
        }
    }

    pub fn category_by_name(&mut self, name: &str) -> Option<Category> {
        self.categories.get_by_name(self.store.as_ref(), name)
    }

    pub fn category_by_prefix(&mut self, prefix: &str) -> Option<Category> {
        self.categories.get_by_prefix(self.store.as_ref(), prefix)
    }

    #[must_use]
    pub fn new_item_id(&self, category: &Category, number: Option<u64>) -> Option<String> {
        self.items.new_id(category, number)
    }

    #[must_use]
    pub fn new_bom_id(&self) -> Option<String> {
        self.boms.new_id()
    }

    pub fn add_item(&mut self, item: Item) -> Result<()> {
        self.require_write()?;
        if self.items.get_by_id(&item.id).is_some() {
            return Err(InventoryError::DuplicateItem(item.id));
        }
        tracing::info!(target: "audit", "Added item {}", item.id);
        self.items.add(self.store.as_mut(), item)?;
        self.items.init(self.store.as_ref());
        Ok(())
    }

    pub fn edit_item(&mut self, old: &Item, new: Item) -> Result<bool> {
        self.require_write()?;
        if new.id != old.id && self.items.get_by_id(&new.id).is_some() {
            return Err(InventoryError::DuplicateItem(new.id));
        }
        tracing::info!(target: "audit", "Edited item {}", old.id);
        Ok(self.items.edit(self.store.as_mut(), old, new)?)
    }

    pub fn delete_item(&mut self, item: &Item) -> Result<bool> {
        self.require_write()?;
        tracing::info!(target: "audit", "Deleted item {}", item.id);
        Ok(self.items.delete(self.store.as_mut(), item)?)
    }

    /// Add `delta` to the stock of `id`. Negative deltas stop at zero.
    pub fn adjust_quantity(&mut self, id: &str, delta: f32) -> Result<()> {
        self.require_write()?;
        let old = self
            .items
            .get_by_id(id)
            .cloned()
            .ok_or_else(|| InventoryError::UnknownItem(id.to_string()))?;

        let mut new = old.clone();
        if delta >= 0.0 {
            new.inc_quantity(delta);
        } else {
            new.dec_quantity(-delta);
        }
        tracing::debug!("Quantity of {id}: {} -> {}", old.quantity, new.quantity);
        self.items.edit(self.store.as_mut(), &old, new)?;
        Ok(())
    }

    pub fn add_category(&mut self, category: Category) -> Result<()> {
        self.require_write()?;
        tracing::info!(target: "audit", "Added category {}", category.name);
        Ok(self.categories.add(self.store.as_mut(), category)?)
    }

    pub fn edit_category(&mut self, old: &Category, new: Category) -> Result<bool> {
        self.require_write()?;
        tracing::info!(target: "audit", "Edited category {}", old.name);
        Ok(self.categories.edit(self.store.as_mut(), old, new)?)
    }

    pub fn delete_category(&mut self, category: &Category) -> Result<bool> {
        self.require_write()?;
        tracing::info!(target: "audit", "Deleted category {}", category.name);
        Ok(self.categories.delete(self.store.as_mut(), category)?)
    }

    pub fn add_bom(&mut self, bom: Bom) -> Result<()> {
        self.require_write()?;
        tracing::info!(target: "audit", "Added BOM {}", bom.id);
        Ok(self.boms.add(self.store.as_mut(), bom)?)
    }

    pub fn edit_bom(&mut self, old: &Bom, new: Bom) -> Result<bool> {
        self.require_write()?;
        tracing::info!(target: "audit", "Edited BOM {}", old.id);
        for line in Bom::diff(old, &new) {
            tracing::info!(target: "audit", "    {line}");
        }
        Ok(self.boms.edit(self.store.as_mut(), old, new)?)
    }

    pub fn delete_bom(&mut self, bom: &Bom) -> Result<bool> {
        self.require_write()?;
        tracing::info!(target: "audit", "Deleted BOM {}", bom.id);
        Ok(self.boms.delete(self.store.as_mut(), bom)?)
    }

    /// Stock needed per component to make `count` of `bom`.
    #[must_use]
    pub fn requirements(&self, bom: &Bom, count: u32) -> Vec<Requirement> {
        let count = count as f32;
        bom.items
            .iter()
            .map(|reference| {
                let item = self.items.get_by_id(&reference.id);
                Requirement {
                    id: reference.id.clone(),
                    description: item.map(|i| i.description.clone()).unwrap_or_default(),
                    unit: item.map(|i| i.unit.clone()).unwrap_or_default(),
                    needed: reference.quantity * count,
                    available: item.map_or(0.0, |i| i.quantity),
                }
            })
            .collect()
    }

    /// Consume components and stock the output of `count` builds of `bom`.
    ///
    /// Nothing changes when any component is short.
    pub fn make(&mut self, bom: &Bom, count: u32) -> Result<()> {
        self.require_write()?;

        let shortfalls: Vec<Requirement> = self
            .requirements(bom, count)
            .into_iter()
            .filter(Requirement::is_short)
            .collect();
        if !shortfalls.is_empty() {
            return Err(InventoryError::Shortfall(shortfalls));
        }
        if self.items.get_by_id(&bom.output.id).is_none() {
            return Err(InventoryError::UnknownItem(bom.output.id.clone()));
        }

        let builds = count as f32;
        self.adjust_quantity(&bom.output.id, bom.output.quantity * builds)?;
        for reference in &bom.items {
            self.adjust_quantity(&reference.id, -(reference.quantity * builds))?;
        }

        tracing::info!(target: "audit", "Made {count} x {} ({})", bom.name, bom.id);
        Ok(())
    }
}
