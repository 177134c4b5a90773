use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use url::Url;

use super::Record;
use crate::store::ITEMS;

/// Production status. Stored as its integer value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ItemStatus {
    #[default]
    Active = 0,
    Obsolete = 1,
    /// Not recommended for new designs.
    Nrfnd = 2,
}

impl ItemStatus {
    pub const ALL: [Self; 3] = [Self::Active, Self::Obsolete, Self::Nrfnd];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Obsolete => "Obsolete",
            Self::Nrfnd => "Not Recommended for New Designs",
        }
    }

    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        match index {
            1 => Self::Obsolete,
            2 => Self::Nrfnd,
            _ => Self::Active,
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ItemStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

impl<'de> Deserialize<'de> for ItemStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u8::deserialize(deserializer)? {
            0 => Ok(Self::Active),
            1 => Ok(Self::Obsolete),
            2 => Ok(Self::Nrfnd),
            other => Err(serde::de::Error::custom(format!(
                "invalid item status {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Item {
    pub id: String,
    pub description: String,
    /// Name of the owning category.
    pub category: String,
    pub reference_link: String,
    pub location: String,
    pub price: f32,
    pub quantity: f32,
    pub unit: String,
    pub status: ItemStatus,
}

impl Item {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.id.is_empty()
            && !self.description.is_empty()
            && !self.category.is_empty()
            && self.price >= 0.0
            && self.quantity >= 0.0
    }

    pub fn inc_quantity(&mut self, step: f32) {
        self.quantity += step;
    }

    /// Remove `step` from the stock, stopping at zero.
    pub fn dec_quantity(&mut self, step: f32) {
        self.quantity = (self.quantity - step).max(0.0);
    }

    /// The reference link when it is an http(s) URL with a host.
    #[must_use]
    pub fn reference_url(&self) -> Option<Url> {
        let url = Url::parse(self.reference_link.trim()).ok()?;
        let web = matches!(url.scheme(), "http" | "https") && url.host_str().is_some();
        web.then_some(url)
    }
}

impl Record for Item {
    const COLLECTION: &'static str = ITEMS;
    const KEY: &'static str = "id";

    fn key(&self) -> &str {
        &self.id
    }
}
