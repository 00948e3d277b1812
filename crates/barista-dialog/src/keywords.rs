use tracing::warn;

use crate::catalog::{CatalogError, DrinkCatalog};
use crate::normalize::normalize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Drink,
    Size,
    YesNo,
    Trigger,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Drink,
        Category::Size,
        Category::YesNo,
        Category::Trigger,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Drink => "Drink",
            Category::Size => "Size",
            Category::YesNo => "YesNo",
            Category::Trigger => "Trigger",
        }
    }
}

#[derive(Debug, Clone)]
pub struct KeywordEntry {
    pub label: String,
    pub phrases: Vec<String>,
}

/// Phrase tables the intent matcher scores against, one per category.
///
/// Entries are kept in insertion order in plain vectors: matcher tie-breaks
/// fall back to "first seen wins", so iteration order is part of the
/// contract and must not depend on a hash seed.
#[derive(Debug, Clone)]
pub struct KeywordCatalog {
    categories: Vec<(Category, Vec<KeywordEntry>)>,
}

impl Default for KeywordCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordCatalog {
    pub fn new() -> Self {
        Self {
            categories: Category::ALL.iter().map(|&c| (c, Vec::new())).collect(),
        }
    }

    /// The built-in tables: size synonyms, yes/no words, and the default
    /// trigger phrases. Drinks are filled in from the drink catalog.
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        catalog.push_entries(
            Category::Size,
            &[
                ("S", &["size s", "size small", "small", "s"][..]),
                ("M", &["size m", "size medium", "medium", "m"][..]),
                ("L", &["size l", "size large", "large", "l"][..]),
            ],
        );
        catalog.push_entries(
            Category::YesNo,
            &[
                ("Yes", &["yes", "yeah", "correct", "sure", "right"][..]),
                ("No", &["no", "nope", "not", "incorrect", "wrong"][..]),
            ],
        );
        catalog.push_entries(
            Category::Trigger,
            &[(
                "start",
                &[
                    "continue",
                    "go on",
                    "carry on",
                    "can you",
                    "ok",
                    "start",
                    "autobarista",
                ][..],
            )],
        );
        catalog
    }

    fn push_entries(&mut self, category: Category, entries: &[(&str, &[&str])]) {
        let table = self.table_mut(category);
        for (label, phrases) in entries {
            table.push(KeywordEntry {
                label: label.to_string(),
                phrases: phrases.iter().map(|p| p.to_string()).collect(),
            });
        }
    }

    pub fn entries(&self, category: Category) -> &[KeywordEntry] {
        self.categories
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, entries)| entries.as_slice())
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &[KeywordEntry])> {
        self.categories
            .iter()
            .map(|(c, entries)| (*c, entries.as_slice()))
    }

    /// Add one labeled entry, validating the catalog invariants: labels
    /// unique within the category, phrases lowercase alphanumeric+space and
    /// non-empty.
    pub fn insert(
        &mut self,
        category: Category,
        label: &str,
        phrases: &[&str],
    ) -> Result<(), CatalogError> {
        if self.entries(category).iter().any(|e| e.label == label) {
            return Err(CatalogError::DuplicateLabel {
                category: category.as_str(),
                label: label.to_string(),
            });
        }
        for phrase in phrases {
            validate_phrase(phrase)?;
        }
        self.table_mut(category).push(KeywordEntry {
            label: label.to_string(),
            phrases: phrases.iter().map(|p| p.to_string()).collect(),
        });
        Ok(())
    }

    /// Regenerate the drink table from the drink catalog, one entry per
    /// drink keyed and phrased by its normalized name. Names that survive
    /// normalization with illegal characters are skipped, not fatal.
    pub fn set_drinks(&mut self, drinks: &DrinkCatalog) {
        let mut entries = Vec::with_capacity(drinks.len());
        for drink in drinks.iter() {
            if validate_phrase(&drink.id).is_err() {
                warn!("Skipping drink with unmatchable name: {:?}", drink.id);
                continue;
            }
            entries.push(KeywordEntry {
                label: drink.id.clone(),
                phrases: vec![drink.id.clone()],
            });
        }
        *self.table_mut(Category::Drink) = entries;
    }

    /// Replace the trigger table with the configured phrase list.
    pub fn set_trigger_phrases(&mut self, phrases: &[String]) {
        let cleaned: Vec<String> = phrases
            .iter()
            .map(|p| normalize(p))
            .filter(|p| !p.is_empty())
            .collect();
        *self.table_mut(Category::Trigger) = vec![KeywordEntry {
            label: "start".to_string(),
            phrases: cleaned,
        }];
    }

    fn table_mut(&mut self, category: Category) -> &mut Vec<KeywordEntry> {
        // All four categories exist from construction.
        let idx = self
            .categories
            .iter()
            .position(|(c, _)| *c == category)
            .unwrap_or(0);
        &mut self.categories[idx].1
    }
}

fn validate_phrase(phrase: &str) -> Result<(), CatalogError> {
    if phrase.is_empty() {
        return Err(CatalogError::InvalidPhrase {
            phrase: phrase.to_string(),
            reason: "empty",
        });
    }
    let legal = phrase
        .chars()
        .all(|c| c == ' ' || c.is_numeric() || (c.is_alphabetic() && !c.is_uppercase()));
    if !legal {
        return Err(CatalogError::InvalidPhrase {
            phrase: phrase.to_string(),
            reason: "must be lowercase alphanumeric and spaces",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DrinkRow;

    #[test]
    fn duplicate_labels_are_rejected() {
        let mut catalog = KeywordCatalog::new();
        catalog.insert(Category::Size, "S", &["size s"]).unwrap();
        let err = catalog.insert(Category::Size, "S", &["small"]);
        assert!(matches!(err, Err(CatalogError::DuplicateLabel { .. })));
    }

    #[test]
    fn uppercase_and_punctuated_phrases_are_rejected() {
        let mut catalog = KeywordCatalog::new();
        assert!(catalog.insert(Category::Drink, "x", &["Coffee"]).is_err());
        assert!(catalog.insert(Category::Drink, "y", &["no!"]).is_err());
        assert!(catalog.insert(Category::Drink, "z", &[""]).is_err());
    }

    #[test]
    fn entries_keep_insertion_order() {
        let mut catalog = KeywordCatalog::new();
        catalog.insert(Category::Drink, "coffee", &["coffee"]).unwrap();
        catalog
            .insert(Category::Drink, "milk tea", &["milk tea"])
            .unwrap();
        let labels: Vec<_> = catalog
            .entries(Category::Drink)
            .iter()
            .map(|e| e.label.as_str())
            .collect();
        assert_eq!(labels, ["coffee", "milk tea"]);
    }

    #[test]
    fn drinks_regenerate_from_the_catalog() {
        let drinks = DrinkCatalog::from_rows(vec![
            DrinkRow {
                name: "Milk Coffee".into(),
                price: Some(25_000),
                components: vec!["milk".into(), "coffee".into()],
            },
            DrinkRow {
                name: "Sugar Tea".into(),
                price: None,
                components: vec![],
            },
        ]);
        let mut catalog = KeywordCatalog::standard();
        catalog.set_drinks(&drinks);

        let labels: Vec<_> = catalog
            .entries(Category::Drink)
            .iter()
            .map(|e| e.label.as_str())
            .collect();
        assert_eq!(labels, ["milk coffee", "sugar tea"]);
    }

    #[test]
    fn trigger_phrases_are_normalized() {
        let mut catalog = KeywordCatalog::standard();
        catalog.set_trigger_phrases(&["OK".to_string(), "Go On!".to_string(), " ".to_string()]);
        assert_eq!(
            catalog.entries(Category::Trigger)[0].phrases,
            vec!["ok".to_string(), "go on".to_string()]
        );
    }
}
