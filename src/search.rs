//! Fuzzy search used by the BOM item picker.

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::model::Item;

pub struct Matcher {
    inner: SkimMatcherV2,
}

impl Default for Matcher {
    fn default() -> Self {
        Self {
            inner: SkimMatcherV2::default().ignore_case(),
        }
    }
}

impl Matcher {
    /// Best score of `pattern` against the item id and description.
    pub fn score_item(&self, item: &Item, pattern: &str) -> Option<i64> {
        if pattern.is_empty() {
            return Some(0);
        }
        [item.id.as_str(), item.description.as_str()]
            .into_iter()
            .filter_map(|text| self.inner.fuzzy_match(text, pattern))
            .max()
    }

    /// Indices of the matching `items`, best match first. Ties keep their order.
    pub fn rank(&self, items: &[Item], pattern: &str) -> Vec<usize> {
        let mut scored: Vec<(usize, i64)> = items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| self.score_item(item, pattern).map(|s| (i, s)))
            .collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.into_iter().map(|(i, _)| i).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, description: &str) -> Item {
        Item {
            id: id.into(),
            description: description.into(),
            ..Item::default()
        }
    }

    #[test]
    fn test_matches_id_or_description() {
        let matcher = Matcher::default();
        let resistor = item("R12", "10k thin film");

        assert!(matcher.score_item(&resistor, "r12").is_some());
        assert!(matcher.score_item(&resistor, "thnflm").is_some());
        assert!(matcher.score_item(&resistor, "xyz").is_none());
    }

    #[test]
    fn test_rank_orders_and_filters() {
        let matcher = Matcher::default();
        let items = [
            item("C0", "100nF capacitor"),
            item("R0", "10k resistor"),
            item("R1", "resistor network"),
        ];

        let ranked = matcher.rank(&items, "resistor");
        assert_eq!(ranked.len(), 2);
        assert!(!ranked.contains(&0));
        assert_eq!(matcher.rank(&items, "").len(), 3);
    }
}
