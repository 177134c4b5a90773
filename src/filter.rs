//! Column-scoped text filtering for the viewers.

use crate::model::{Bom, Category, Item};

/// Rows that can be filtered column by column.
pub trait Filterable {
    /// Column labels, in display order.
    const COLUMNS: &'static [&'static str];

    fn column_text(&self, column: usize) -> String;
}

impl Filterable for Item {
    const COLUMNS: &'static [&'static str] = &[
        "ID",
        "Description",
        "Category",
        "Reference",
        "Location",
        "Price",
        "Quantity",
        "Unit",
        "Status",
    ];

    fn column_text(&self, column: usize) -> String {
        match column {
            0 => self.id.clone(),
            1 => self.description.clone(),
            2 => self.category.clone(),
            3 => self.reference_link.clone(),
            4 => self.location.clone(),
            5 => format!("{:.2}", self.price),
            6 => self.quantity.to_string(),
            7 => self.unit.clone(),
            8 => self.status.to_string(),
            _ => String::new(),
        }
    }
}

impl Filterable for Bom {
    const COLUMNS: &'static [&'static str] = &["ID", "Description", "Output ID"];

    fn column_text(&self, column: usize) -> String {
        match column {
            0 => self.id.clone(),
            1 => self.name.clone(),
            2 => self.output.id.clone(),
            _ => String::new(),
        }
    }
}

impl Filterable for Category {
    const COLUMNS: &'static [&'static str] = &["Name", "Prefix", "Suffix"];

    fn column_text(&self, column: usize) -> String {
        match column {
            0 => self.name.clone(),
            1 => self.prefix.clone(),
            2 => self.suffix.map(String::from).unwrap_or_default(),
            _ => String::new(),
        }
    }
}

/// Case-insensitive substring match on one column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub text: String,
    column: usize,
}

impl Filter {
    #[must_use]
    pub const fn column(&self) -> usize {
        self.column
    }

    pub const fn set_column(&mut self, column: usize) {
        self.column = column;
    }

    /// Move to the next column of `T`, wrapping around.
    pub fn next_column<T: Filterable>(&mut self) {
        self.column = (self.column + 1) % T::COLUMNS.len();
    }

    #[must_use]
    pub fn column_label<T: Filterable>(&self) -> &'static str {
        T::COLUMNS.get(self.column).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.text.is_empty()
    }

    /// Whether `row` passes the filter. `column` overrides the selected column.
    pub fn check_match<T: Filterable>(&self, row: &T, column: Option<usize>) -> bool {
        if self.text.is_empty() {
            return true;
        }
        let needle = self.text.to_uppercase();
        row.column_text(column.unwrap_or(self.column))
            .to_uppercase()
            .contains(&needle)
    }
}
