//! Domain records stored in the document store.
//!
//! - [`Category`] - Item family with an id prefix and optional suffix
//! - [`Item`] - A stocked part
//! - [`Bom`] - Bill of materials producing one output item

mod bom;
mod category;
mod item;

pub use bom::{Bom, ItemReference};
pub use category::Category;
pub use item::{Item, ItemStatus};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::store::{self, Document, StoreError};

/// A type persisted as one document of a collection.
pub trait Record: Clone + PartialEq + Serialize + DeserializeOwned {
    const COLLECTION: &'static str;
    /// Field that identifies a record within its collection.
    const KEY: &'static str;

    fn key(&self) -> &str;

    fn key_filter(&self) -> Document {
        store::filter(Self::KEY, self.key())
    }

    fn to_document(&self) -> Result<Document, StoreError> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(StoreError::Codec {
                collection: Self::COLLECTION,
                message: format!("expected an object, got {other}"),
            }),
            Err(e) => Err(StoreError::Codec {
                collection: Self::COLLECTION,
                message: e.to_string(),
            }),
        }
    }

    fn from_document(document: Document) -> Result<Self, StoreError> {
        serde_json::from_value(Value::Object(document)).map_err(|e| StoreError::Codec {
            collection: Self::COLLECTION,
            message: e.to_string(),
        })
    }
}

/// The digits of `id` read as one number, e.g. `CON12A` gives 12.
#[must_use]
pub fn numeric_part(id: &str) -> Option<u64> {
    let digits: String = id.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}
