use serde::{Deserialize, Serialize};

use super::Record;
use crate::store::BOMS;

/// A quantity of one item, referenced by id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemReference {
    pub id: String,
    pub quantity: f32,
    pub position: i32,
}

impl ItemReference {
    pub fn new(id: impl Into<String>, quantity: f32, position: i32) -> Self {
        Self {
            id: id.into(),
            quantity,
            position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Bom {
    pub id: String,
    pub name: String,
    pub items: Vec<ItemReference>,
    pub output: ItemReference,
}

impl Bom {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.id.is_empty() && !self.name.is_empty() && !self.output.id.is_empty()
    }

    /// Audit lines describing what changed from `old` to `new`.
    ///
    /// Component lists are only compared by length.
    #[must_use]
    pub fn diff(old: &Self, new: &Self) -> Vec<String> {
        let mut lines = Vec::new();

        if old.id != new.id {
            lines.push(format!("ID changed from {} to {}", old.id, new.id));
        }
        if old.name != new.name {
            lines.push(format!("Name changed from {} to {}", old.name, new.name));
        }
        if old.output != new.output {
            lines.push(format!(
                "Output changed from {} x{} to {} x{}",
                old.output.id, old.output.quantity, new.output.id, new.output.quantity
            ));
        }

        match new.items.len().cmp(&old.items.len()) {
            std::cmp::Ordering::Greater => {
                lines.push(format!("Added {} items", new.items.len() - old.items.len()));
            }
            std::cmp::Ordering::Less => {
                lines.push(format!("Removed {} items", old.items.len() - new.items.len()));
            }
            std::cmp::Ordering::Equal => {}
        }

        lines
    }
}

impl Record for Bom {
    const COLLECTION: &'static str = BOMS;
    const KEY: &'static str = "id";

    fn key(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Bom {
        Bom {
            id: "BOM1".into(),
            name: "Sensor board".into(),
            items: vec![ItemReference::new("R0", 4.0, 0)],
            output: ItemReference::new("CON1A", 1.0, 0),
        }
    }

    #[test]
    fn test_diff_lists_changes() {
        let old = board();
        let mut new = board();
        new.name = "Sensor board v2".into();
        new.items.push(ItemReference::new("C0", 2.0, 1));
        new.items.push(ItemReference::new("C1", 1.0, 2));

        assert_eq!(
            Bom::diff(&old, &new),
            vec![
                "Name changed from Sensor board to Sensor board v2".to_string(),
                "Added 2 items".to_string(),
            ]
        );
        assert_eq!(Bom::diff(&new, &old).last().unwrap(), "Removed 2 items");
        assert!(Bom::diff(&old, &old).is_empty());
    }

    #[test]
    fn test_validity() {
        assert!(board().is_valid());
        let mut bom = board();
        bom.output.id.clear();
        assert!(!bom.is_valid());
    }
}
