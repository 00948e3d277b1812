use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::normalize::normalize;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Duplicate label {label:?} in category {category}")]
    DuplicateLabel {
        category: &'static str,
        label: String,
    },

    #[error("Invalid phrase {phrase:?}: {reason}")]
    InvalidPhrase { phrase: String, reason: &'static str },

    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One row as the catalog store returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct DrinkRow {
    pub name: String,
    #[serde(default)]
    pub price: Option<u32>,
    #[serde(default)]
    pub components: Vec<String>,
}

/// One orderable drink. `id` is the normalized display name and doubles as
/// the keyword phrase customers say.
#[derive(Debug, Clone, PartialEq)]
pub struct DrinkEntry {
    pub id: String,
    pub display_name: String,
    pub price: Option<u32>,
    /// Ingredients that can be sized individually, in serving order.
    pub components: Vec<String>,
}

/// Immutable drink lineup for one session. Shared read-only behind an `Arc`;
/// a refresh would swap the whole snapshot, never patch it in place.
#[derive(Debug, Clone, Default)]
pub struct DrinkCatalog {
    entries: Vec<DrinkEntry>,
}

impl DrinkCatalog {
    pub fn from_rows(rows: Vec<DrinkRow>) -> Self {
        let mut entries: Vec<DrinkEntry> = Vec::with_capacity(rows.len());
        for row in rows {
            let id = normalize(&row.name);
            if id.is_empty() {
                warn!("Skipping catalog row with empty name");
                continue;
            }
            let components: Vec<String> = row
                .components
                .iter()
                .map(|c| normalize(c))
                .filter(|c| !c.is_empty())
                .collect();
            let entry = DrinkEntry {
                id: id.clone(),
                display_name: row.name.trim().to_string(),
                price: row.price,
                components,
            };
            if let Some(existing) = entries.iter_mut().find(|e| e.id == id) {
                warn!("Duplicate catalog row for {:?}; keeping the newer one", id);
                *existing = entry;
            } else {
                entries.push(entry);
            }
        }
        Self { entries }
    }

    pub fn get(&self, id: &str) -> Option<&DrinkEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn components(&self, id: &str) -> Option<&[String]> {
        self.get(id).map(|e| e.components.as_slice())
    }

    pub fn price(&self, id: &str) -> Option<u32> {
        self.get(id).and_then(|e| e.price)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DrinkEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Where the drink lineup comes from. The real store is an external
/// collaborator; these providers cover local files and baked-in data.
pub trait CatalogProvider {
    fn load(&self) -> Result<DrinkCatalog, CatalogError>;
}

/// Fixed in-memory lineup, used in tests and as the demo fallback.
pub struct StaticCatalog {
    rows: Vec<DrinkRow>,
}

impl StaticCatalog {
    pub fn new(rows: Vec<DrinkRow>) -> Self {
        Self { rows }
    }

    /// The classic four-drink demo lineup.
    pub fn demo() -> Self {
        let drink = |name: &str, price: u32, components: &[&str]| DrinkRow {
            name: name.to_string(),
            price: Some(price),
            components: components.iter().map(|c| c.to_string()).collect(),
        };
        Self::new(vec![
            drink("coffee", 20_000, &["coffee", "sugar"]),
            drink("milk coffee", 25_000, &["milk", "coffee"]),
            drink("milk tea", 30_000, &["milk", "tea"]),
            drink("sugar tea", 18_000, &["tea", "sugar"]),
        ])
    }
}

impl CatalogProvider for StaticCatalog {
    fn load(&self) -> Result<DrinkCatalog, CatalogError> {
        Ok(DrinkCatalog::from_rows(self.rows.clone()))
    }
}

/// Reads a JSON array of `{name, price, components}` rows.
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogProvider for JsonFileCatalog {
    fn load(&self) -> Result<DrinkCatalog, CatalogError> {
        let raw = std::fs::read_to_string(&self.path)?;
        let rows: Vec<DrinkRow> = serde_json::from_str(&raw)?;
        Ok(DrinkCatalog::from_rows(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn rows_normalize_names_and_components() {
        let catalog = DrinkCatalog::from_rows(vec![DrinkRow {
            name: "  Milk Tea! ".into(),
            price: Some(30_000),
            components: vec!["Milk".into(), " Tea ".into(), "".into()],
        }]);

        let entry = catalog.get("milk tea").expect("entry");
        assert_eq!(entry.display_name, "Milk Tea!");
        assert_eq!(entry.components, vec!["milk", "tea"]);
        assert_eq!(catalog.price("milk tea"), Some(30_000));
    }

    #[test]
    fn unknown_ids_return_none() {
        let catalog = StaticCatalog::demo().load().unwrap();
        assert!(catalog.get("phantom tea").is_none());
        assert!(catalog.components("phantom tea").is_none());
        assert!(catalog.price("phantom tea").is_none());
    }

    #[test]
    fn later_duplicate_rows_replace_earlier_ones() {
        let catalog = DrinkCatalog::from_rows(vec![
            DrinkRow {
                name: "coffee".into(),
                price: Some(10),
                components: vec![],
            },
            DrinkRow {
                name: "Coffee".into(),
                price: Some(20),
                components: vec![],
            },
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.price("coffee"), Some(20));
    }

    #[test]
    fn json_file_catalog_round_trips() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"name": "coffee", "price": 20000, "components": ["coffee", "sugar"]}},
                {{"name": "sugar tea"}}]"#
        )
        .unwrap();

        let catalog = JsonFileCatalog::new(file.path()).load().unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.components("coffee").unwrap(),
            &["coffee".to_string(), "sugar".to_string()]
        );
        assert_eq!(catalog.price("sugar tea"), None);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = JsonFileCatalog::new("/nonexistent/drinks.json").load();
        assert!(matches!(result, Err(CatalogError::Io(_))));
    }
}
