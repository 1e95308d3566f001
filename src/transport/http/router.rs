use crate::domain::{CatalogItem, CatalogItems, ItemFields};
use crate::transport::http::handlers::{catalog, health, index};
use crate::transport::http::types::{AppState, Envelope, EnvelopeStatus};
use axum::http::{StatusCode, Uri};
use axum::routing::{any, get};
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        catalog::list_items,
        catalog::get_item,
        catalog::create_item,
        catalog::update_item,
        catalog::delete_item
    ),
    components(schemas(CatalogItem, CatalogItems, ItemFields, Envelope, EnvelopeStatus))
)]
pub struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(index::index_handler))
        .route("/health", get(health::healthcheck_handler))
        .route("/v1/catalog", any(catalog::catalog_handler))
        .route("/v1/catalog/", any(catalog::catalog_handler))
        // `*rest` does not match an empty segment, hence the explicit routes above.
        .route("/v1/catalog/*rest", any(catalog::catalog_handler))
        .fallback(not_found_handler)
        .with_state(app_state)
}

async fn not_found_handler(uri: Uri) -> Envelope {
    Envelope::error(StatusCode::NOT_FOUND, format!("No route for {}", uri.path()))
}
