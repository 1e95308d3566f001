pub mod bootstrap;

pub use bootstrap::{ensure_catalog_store, import_seed};
