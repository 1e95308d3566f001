// src/bin/catalog_server.rs

use anyhow::Context;
use shipped_catalog::infra::logging;
use shipped_catalog::transport;
use shipped_catalog::{
    ensure_catalog_store, import_seed, CatalogStore, Config, MemoryCatalogStore, SeedDocument,
    StoreBackend,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    // Any failure before `serve` exits non-zero; we never serve with an unready store.
    let config = Config::from_env().context("Error resolving configuration")?;
    tracing::info!("Configuration: {:?}", config);

    let seed = SeedDocument::load(&config.seed_path)?;
    tracing::info!(
        "Loaded {} seed items from {}",
        seed.items().len(),
        config.seed_path.display()
    );

    let store: Arc<dyn CatalogStore> = match config.backend {
        StoreBackend::MySql => Arc::new(
            ensure_catalog_store(&config.db, &seed)
                .await
                .context("Error creating database")?,
        ),
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on exit");
            let store = MemoryCatalogStore::new();
            import_seed(&store, &seed).await?;
            Arc::new(store)
        }
    };

    let app_state = transport::http::AppState::new(store, seed, config.templates_dir.clone());

    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(cors);

    let addr = format!("0.0.0.0:{}", config.listen_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Error binding {}", addr))?;
    tracing::info!("Catalog listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://localhost:{}/swagger-ui", config.listen_port);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received (Ctrl+C)");
        })
        .await?;

    tracing::info!("Graceful shutdown complete.");
    Ok(())
}
