//! One-time startup routine: make sure the schema and `catalog` table exist, then
//! import the seed document.
//!
//! Each step is a precondition for the next. The first failure aborts; there is no
//! retry and no partial recovery.

use crate::domain::SeedDocument;
use crate::infra::config::DbConfig;
use crate::storage::mysql::{connect_verified, create_schema};
use crate::storage::{CatalogStore, MySqlCatalogStore, StoreError};

/// Always present on a MySQL server, so it is safe to connect to before our schema exists.
const SYSTEM_DATABASE: &str = "information_schema";

/// Bootstraps MySQL and returns a store scoped to the catalog schema.
pub async fn ensure_catalog_store(
    db: &DbConfig,
    seed: &SeedDocument,
) -> Result<MySqlCatalogStore, StoreError> {
    let system = connect_verified(db.options_for(SYSTEM_DATABASE), SYSTEM_DATABASE)
        .await
        .inspect_err(|e| tracing::error!("Error connecting to system database: {}", e))?;

    create_schema(&system, &db.schema)
        .await
        .inspect_err(|e| tracing::error!("Error creating database {}: {}", db.schema, e))?;
    system.close().await;

    let pool = connect_verified(db.schema_options(), &db.schema)
        .await
        .inspect_err(|e| tracing::error!("Error connecting to {}: {}", db.redacted(), e))?;
    tracing::info!("Success connecting to database: {}", db.redacted());

    let store = MySqlCatalogStore::new(pool);
    store
        .create_table()
        .await
        .inspect_err(|e| tracing::error!("Error creating catalog table: {}", e))?;

    import_seed(&store, seed).await?;
    Ok(store)
}

/// Imports every seed item, ignoring keys already present. All-or-nothing.
pub async fn import_seed(store: &dyn CatalogStore, seed: &SeedDocument) -> Result<u64, StoreError> {
    let inserted = store
        .import_items(seed.items())
        .await
        .inspect_err(|e| tracing::error!("Error importing seed rows into catalog table: {}", e))?;
    tracing::info!(
        "Imported {} of {} seed items ({} already present)",
        inserted,
        seed.items().len(),
        seed.items().len() as u64 - inserted
    );
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryCatalogStore;

    #[tokio::test]
    async fn seed_import_is_idempotent() {
        let seed = SeedDocument::parse(
            r#"{"items":[
                {"item_id":1,"name":"Widget","description":"d","price":9.99,"image":"w.png"},
                {"item_id":2,"name":"Gadget","description":"g","price":5.0,"image":"g.png"}
            ]}"#
            .to_string(),
        )
        .unwrap();
        let store = MemoryCatalogStore::new();

        assert_eq!(import_seed(&store, &seed).await.unwrap(), 2);
        let first = store.list_items().await.unwrap();
        assert_eq!(import_seed(&store, &seed).await.unwrap(), 0);
        assert_eq!(store.list_items().await.unwrap(), first);
    }
}
