pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::bootstrap::{ensure_catalog_store, import_seed};
pub use domain::{CatalogItem, CatalogItems, ItemFields, SeedDocument};
pub use infra::config::{Config, ConfigError, StoreBackend};
pub use storage::{CatalogStore, MemoryCatalogStore, MySqlCatalogStore, StoreError};
