use anyhow::Context;
use shipped_catalog::infra::logging;
use shipped_catalog::storage::mysql::connect_verified;
use shipped_catalog::{ensure_catalog_store, CatalogStore, Config, SeedDocument, StoreBackend};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight -- [--bootstrap]\n\
         \n\
         Checks configuration, the seed document and MySQL connectivity.\n\
         With --bootstrap, also creates the schema/table and imports the seed.\n\
         \n\
         Reads env vars:\n\
           SHIPPED_MYSQL_HOST, SHIPPED_MYSQL_SCHEMA, SHIPPED_MYSQL_USER, SHIPPED_MYSQL_PASSWORD,\n\
           LISTEN_PORT, SHIPPED_CATALOG_SEED, SHIPPED_TEMPLATES_DIR, SHIPPED_CATALOG_STORE\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }
    let bootstrap = args.iter().any(|a| a == "--bootstrap");

    let config = Config::from_env().context("Configuration is invalid")?;
    println!("> Preflight:");
    println!("  MySQL: {}", config.db.redacted());
    println!("  LISTEN_PORT={}", config.listen_port);
    println!("  Seed: {}", config.seed_path.display());
    println!("  Templates: {}", config.templates_dir.display());

    let seed = SeedDocument::load(&config.seed_path)?;
    println!("  Seed document parses ({} items).", seed.items().len());

    for name in ["layout.html", "index.html"] {
        let path = config.templates_dir.join(name);
        if !path.is_file() {
            eprintln!("  Warning: {} is missing; GET / will fail.", path.display());
        }
    }

    if config.backend == StoreBackend::Memory {
        println!("  SHIPPED_CATALOG_STORE=memory, skipping MySQL checks.");
        println!("> Preflight OK.");
        return Ok(());
    }

    if bootstrap {
        let store = ensure_catalog_store(&config.db, &seed).await?;
        let rows = store.list_items().await?;
        println!("  Bootstrap complete; catalog table holds {} rows.", rows.len());
    } else {
        let pool = connect_verified(
            config.db.options_for("information_schema"),
            "information_schema",
        )
        .await?;
        println!("  MySQL server is reachable.");
        pool.close().await;
    }

    println!("> Preflight OK.");
    Ok(())
}
