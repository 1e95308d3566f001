//! Catalog domain types: the item row shape and the seed document.

pub mod item;
pub mod seed;

pub use item::{CatalogItem, CatalogItems, ItemFields};
pub use seed::{SeedDocument, SeedError};
