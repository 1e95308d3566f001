//! The seed document: the initial dataset for the live table and the data source for mock mode.

use crate::domain::item::{CatalogItem, CatalogItems};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Error reading catalog json file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Error parsing catalog json: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parsed seed document plus its raw text, kept so mock mode can return it verbatim.
#[derive(Debug, Clone)]
pub struct SeedDocument {
    raw: String,
    catalog: CatalogItems,
}

impl SeedDocument {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| SeedError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(raw)
    }

    pub fn parse(raw: String) -> Result<Self, SeedError> {
        let catalog: CatalogItems = serde_json::from_str(&raw)?;
        Ok(Self { raw, catalog })
    }

    /// The document exactly as it was read.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.catalog.items
    }

    /// Looks an item up by its `item_id` value (not its position in the array).
    pub fn find(&self, item_id: i32) -> Option<&CatalogItem> {
        self.catalog.items.iter().find(|item| item.item_id == item_id)
    }
}
