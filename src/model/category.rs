use serde::{Deserialize, Serialize};

use super::Record;
use crate::store::CATEGORIES;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub prefix: String,
    pub suffix: Option<char>,
}

impl Category {
    pub fn new(name: impl Into<String>, prefix: impl Into<String>, suffix: Option<char>) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
            suffix,
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty() && !self.prefix.is_empty()
    }

    /// Item id for `number` in this category, e.g. `CON3A`.
    #[must_use]
    pub fn format_id(&self, number: u64) -> String {
        let suffix = self.suffix.map(String::from).unwrap_or_default();
        format!("{}{number}{suffix}", self.prefix).to_uppercase()
    }

    /// Number of an id in this category's format, ignoring case.
    #[must_use]
    pub fn parse_id(&self, id: &str) -> Option<u64> {
        let id = id.to_uppercase();
        let rest = id.strip_prefix(&self.prefix.to_uppercase())?;
        let digits = match self.suffix {
            Some(suffix) => rest.strip_suffix(suffix.to_ascii_uppercase())?,
            None => rest,
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }
}

impl Record for Category {
    const COLLECTION: &'static str = CATEGORIES;
    const KEY: &'static str = "name";

    fn key(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_id() {
        assert_eq!(Category::new("Connectors", "con", Some('a')).format_id(3), "CON3A");
        assert_eq!(Category::new("Resistors", "R", None).format_id(0), "R0");
    }

    #[test]
    fn test_parse_id() {
        let connectors = Category::new("Connectors", "CON", Some('A'));
        assert_eq!(connectors.parse_id("CON12A"), Some(12));
        assert_eq!(connectors.parse_id("con3a"), Some(3));
        assert_eq!(connectors.parse_id("CON12"), None);
        assert_eq!(connectors.parse_id("R12A"), None);
        assert_eq!(connectors.parse_id("CONA"), None);
        assert_eq!(connectors.parse_id("CON+1A"), None);

        let resistors = Category::new("Resistors", "R", None);
        assert_eq!(resistors.parse_id("R18446744073709551615"), Some(u64::MAX));
        assert_eq!(resistors.parse_id("R18446744073709551616"), None);
    }

    #[test]
    fn test_validity() {
        assert!(Category::new("Resistors", "R", None).is_valid());
        assert!(!Category::new("", "R", None).is_valid());
        assert!(!Category::new("Resistors", "", None).is_valid());
    }
}
