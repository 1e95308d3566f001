//! Bootstrap against a real MySQL server.
//!
//! Needs `SHIPPED_MYSQL_HOST` (and optionally the other `SHIPPED_MYSQL_*` variables) in the
//! environment or `.env`; skipped otherwise. Uses its own schema so it never touches `shipped`.

use shipped_catalog::{ensure_catalog_store, CatalogItem, CatalogStore, Config, SeedDocument};
use sqlx::Executor;

const SEED: &str = r#"{"items":[{"item_id":1,"name":"Widget","description":"d","price":9.99,"image":"w.png"}]}"#;

fn mysql_config() -> Option<Config> {
    dotenv::dotenv().ok();
    if std::env::var("SHIPPED_MYSQL_HOST").is_err() {
        eprintln!("SHIPPED_MYSQL_HOST not set; skipping MySQL bootstrap test");
        return None;
    }
    let mut config = Config::from_env().expect("valid configuration");
    config.db.schema = "shipped_catalog_test".to_string();
    Some(config)
}

#[tokio::test]
async fn test_bootstrap_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let Some(config) = mysql_config() else {
        return Ok(());
    };
    let seed = SeedDocument::parse(SEED.to_string())?;

    let store = ensure_catalog_store(&config.db, &seed).await?;
    sqlx::query("DELETE FROM catalog").execute(store.pool()).await?;

    let store = ensure_catalog_store(&config.db, &seed).await?;
    let first = store.list_items().await?;
    assert_eq!(first.len(), 1);
    assert_eq!(
        store.get_item(1).await?,
        Some(CatalogItem {
            item_id: 1,
            name: "Widget".to_string(),
            description: "d".to_string(),
            price: 9.99,
            image: "w.png".to_string(),
        })
    );

    // Second run: duplicate keys are ignored, nothing changes.
    let store = ensure_catalog_store(&config.db, &seed).await?;
    assert_eq!(store.list_items().await?, first);
    Ok(())
}

#[tokio::test]
async fn test_store_operations() -> Result<(), Box<dyn std::error::Error>> {
    let Some(mut config) = mysql_config() else {
        return Ok(());
    };
    config.db.schema = "shipped_catalog_ops_test".to_string();
    let seed = SeedDocument::parse(r#"{"items":[]}"#.to_string())?;
    let store = ensure_catalog_store(&config.db, &seed).await?;
    sqlx::query("DELETE FROM catalog").execute(store.pool()).await?;

    let mut gadget = CatalogItem {
        item_id: 2,
        name: "Gadget".to_string(),
        description: "g".to_string(),
        price: 5.0,
        image: "g.png".to_string(),
    };
    store.insert_item(&gadget).await?;
    assert!(store.insert_item(&gadget).await.is_err());

    gadget.name = "Gadget Pro".to_string();
    assert_eq!(store.update_item(&gadget).await?, 1);
    assert_eq!(store.get_item(2).await?, Some(gadget));

    assert_eq!(store.delete_item(2).await?, 1);
    assert_eq!(store.delete_item(2).await?, 0);
    assert_eq!(store.get_item(2).await?, None);
    Ok(())
}

#[tokio::test]
async fn test_failed_seed_row_rolls_back_whole_import() -> Result<(), Box<dyn std::error::Error>> {
    let Some(mut config) = mysql_config() else {
        return Ok(());
    };
    config.db.schema = "shipped_catalog_rollback_test".to_string();
    let empty = SeedDocument::parse(r#"{"items":[]}"#.to_string())?;
    let store = ensure_catalog_store(&config.db, &empty).await?;
    let pool = store.pool();
    sqlx::query("DELETE FROM catalog").execute(pool).await?;

    // INSERT IGNORE turns data errors (over-long values, NULLs) into warnings, so force a
    // hard failure on the second row with a trigger instead.
    pool.execute("DROP TRIGGER IF EXISTS reject_poison").await?;
    pool.execute(
        "CREATE TRIGGER reject_poison BEFORE INSERT ON catalog FOR EACH ROW
         BEGIN
             IF NEW.name = 'poison' THEN
                 SIGNAL SQLSTATE '45000' SET MESSAGE_TEXT = 'poison row rejected';
             END IF;
         END",
    )
    .await?;

    let seed = SeedDocument::parse(
        r#"{"items":[
            {"item_id":1,"name":"Widget","description":"d","price":9.99,"image":"w.png"},
            {"item_id":2,"name":"poison","description":"p","price":1.0,"image":""}
        ]}"#
        .to_string(),
    )?;
    let result = ensure_catalog_store(&config.db, &seed).await;
    pool.execute("DROP TRIGGER IF EXISTS reject_poison").await?;

    let err = result.err().expect("import must fail on the rejected row");
    assert!(err.to_string().contains("poison row rejected"), "{}", err);
    assert!(store.list_items().await?.is_empty());
    Ok(())
}
