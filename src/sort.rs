//! Column sorting for the viewers.

use std::cmp::Ordering;

use crate::filter::Filterable;
use crate::model::{Bom, Category, Item};

/// Value a row is ordered by in one column.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Text(String),
    Number(f64),
}

impl SortKey {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
        }
    }
}

pub trait Sortable: Filterable {
    fn sort_key(&self, column: usize) -> SortKey {
        SortKey::Text(self.column_text(column))
    }
}

impl Sortable for Item {
    fn sort_key(&self, column: usize) -> SortKey {
        match column {
            5 => SortKey::Number(f64::from(self.price)),
            6 => SortKey::Number(f64::from(self.quantity)),
            8 => SortKey::Number(f64::from(self.status as u8)),
            _ => SortKey::Text(self.column_text(column)),
        }
    }
}

impl Sortable for Bom {}

impl Sortable for Category {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: usize,
    pub ascending: bool,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            column: 0,
            ascending: true,
        }
    }
}

impl SortSpec {
    /// Sort by `column`. Selecting the current column flips the direction.
    pub fn select(&mut self, column: usize) {
        if self.column == column {
            self.ascending = !self.ascending;
        } else {
            self.column = column;
            self.ascending = true;
        }
    }

    pub fn compare<T: Sortable>(&self, a: &T, b: &T) -> Ordering {
        let ordering = a.sort_key(self.column).compare(&b.sort_key(self.column));
        if self.ascending {
            ordering
        } else {
            ordering.reverse()
        }
    }

    pub fn sort<T: Sortable>(&self, rows: &mut [T]) {
        rows.sort_by(|a, b| self.compare(a, b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ItemStatus;

    fn item(id: &str, quantity: f32, status: ItemStatus) -> Item {
        Item {
            id: id.into(),
            quantity,
            status,
            ..Item::default()
        }
    }

    fn ids(items: &[Item]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_quantity_sorts_numerically() {
        let mut items = vec![
            item("a", 10.0, ItemStatus::Active),
            item("b", 9.0, ItemStatus::Active),
            item("c", 100.0, ItemStatus::Active),
        ];
        SortSpec {
            column: 6,
            ascending: true,
        }
        .sort(&mut items);
        assert_eq!(ids(&items), ["b", "a", "c"]);
    }

    #[test]
    fn test_text_ignores_case_and_reselect_reverses() {
        let mut items = vec![
            item("b", 0.0, ItemStatus::Nrfnd),
            item("A", 0.0, ItemStatus::Active),
            item("c", 0.0, ItemStatus::Obsolete),
        ];
        let mut spec = SortSpec::default();
        spec.sort(&mut items);
        assert_eq!(ids(&items), ["A", "b", "c"]);

        spec.select(0);
        spec.sort(&mut items);
        assert_eq!(ids(&items), ["c", "b", "A"]);

        spec.select(8);
        assert!(spec.ascending);
        spec.sort(&mut items);
        assert_eq!(ids(&items), ["A", "c", "b"]);
    }
}
