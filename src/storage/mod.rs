//! Catalog persistence.
//!
//! Handlers only see [`CatalogStore`]; the concrete client is chosen at startup and
//! injected through the HTTP state.

pub mod memory;
pub mod mysql;

use crate::domain::CatalogItem;
use async_trait::async_trait;
use thiserror::Error;

pub use memory::MemoryCatalogStore;
pub use mysql::MySqlCatalogStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("error connecting to {target}: {source}")]
    Connect {
        target: String,
        #[source]
        source: sqlx::Error,
    },
    #[error("{0}")]
    Query(#[from] sqlx::Error),
    #[error("invalid SQL identifier: {0:?}")]
    InvalidIdentifier(String),
    /// Failure reported by a non-SQL store (e.g. a duplicate key in the in-memory store).
    #[error("{0}")]
    Rejected(String),
}

/// The operations the catalog handler and the bootstrapper need from a store.
///
/// Implementations must be safe for concurrent use; every method is one atomic
/// unit as far as callers are concerned.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Round-trip liveness probe.
    async fn ping(&self) -> Result<(), StoreError>;

    /// All rows in the store's natural order.
    async fn list_items(&self) -> Result<Vec<CatalogItem>, StoreError>;

    async fn get_item(&self, item_id: i32) -> Result<Option<CatalogItem>, StoreError>;

    /// Inserts a new row; an existing `item_id` is an error.
    async fn insert_item(&self, item: &CatalogItem) -> Result<(), StoreError>;

    /// Rewrites all non-key columns of the row with `item.item_id`. Returns rows affected.
    async fn update_item(&self, item: &CatalogItem) -> Result<u64, StoreError>;

    /// Returns rows affected; `0` when the id did not exist.
    async fn delete_item(&self, item_id: i32) -> Result<u64, StoreError>;

    /// Inserts `items` in one transaction, skipping rows whose key already exists.
    /// Any other failure rolls back the whole batch. Returns rows actually inserted.
    async fn import_items(&self, items: &[CatalogItem]) -> Result<u64, StoreError>;
}
