//! In-process catalog store.
//!
//! Used when the service runs without MySQL and as the store double in tests. It
//! counts every store call so tests can assert that a request never reached it.

use crate::domain::CatalogItem;
use crate::storage::{CatalogStore, StoreError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryCatalogStore {
    // Insertion order is the natural order.
    rows: RwLock<Vec<CatalogItem>>,
    calls: AtomicU64,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store operations issued so far.
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.record_call();
        Ok(())
    }

    async fn list_items(&self) -> Result<Vec<CatalogItem>, StoreError> {
        self.record_call();
        Ok(self.rows.read().await.clone())
    }

    async fn get_item(&self, item_id: i32) -> Result<Option<CatalogItem>, StoreError> {
        self.record_call();
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|r| r.item_id == item_id).cloned())
    }

    async fn insert_item(&self, item: &CatalogItem) -> Result<(), StoreError> {
        self.record_call();
        let mut rows = self.rows.write().await;
        if rows.iter().any(|r| r.item_id == item.item_id) {
            return Err(StoreError::Rejected(format!(
                "Duplicate entry '{}' for key 'PRIMARY'",
                item.item_id
            )));
        }
        rows.push(item.clone());
        Ok(())
    }

    async fn update_item(&self, item: &CatalogItem) -> Result<u64, StoreError> {
        self.record_call();
        let mut rows = self.rows.write().await;
        match rows.iter_mut().find(|r| r.item_id == item.item_id) {
            Some(row) => {
                *row = item.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_item(&self, item_id: i32) -> Result<u64, StoreError> {
        self.record_call();
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|r| r.item_id != item_id);
        Ok((before - rows.len()) as u64)
    }

    async fn import_items(&self, items: &[CatalogItem]) -> Result<u64, StoreError> {
        self.record_call();
        // Holding the write lock for the whole batch makes it atomic to readers.
        let mut rows = self.rows.write().await;
        let mut inserted = 0;
        for item in items {
            if rows.iter().any(|r| r.item_id == item.item_id) {
                continue;
            }
            rows.push(item.clone());
            inserted += 1;
        }
        Ok(inserted)
    }
}
