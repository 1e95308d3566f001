//! `/v1/catalog/` endpoint: one handler dispatching on method, path id and the mock flag.

use crate::domain::{CatalogItems, ItemFields};
use crate::transport::http::handlers::common::{
    item_number, json_response, mock_requested, read_item_fields, CatalogError,
};
use crate::transport::http::types::{AppState, Envelope};
use axum::extract::{Request, State};
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};

pub async fn catalog_handler(State(state): State<AppState>, request: Request) -> Response {
    let method = request.method().clone();
    let item_id = item_number(request.uri().path());
    let mock = mock_requested(request.uri());

    let result = match method {
        Method::GET if item_id > 0 => get_item(&state, item_id, mock).await,
        Method::GET => list_items(&state, mock).await,
        Method::POST => create_item(&state, item_id, request).await,
        Method::PUT => update_item(&state, item_id, request).await,
        Method::DELETE => delete_item(&state, item_id).await,
        other => Err(CatalogError::MethodNotAllowed(other)),
    };
    result.unwrap_or_else(IntoResponse::into_response)
}

#[utoipa::path(
    get,
    path = "/v1/catalog/",
    params(
        ("mock" = Option<bool>, Query, description = "Serve the seed document verbatim instead of the database")
    ),
    responses(
        (status = 200, description = "All catalog items", body = CatalogItems),
        (status = 500, description = "Store failure", body = Envelope)
    )
)]
pub async fn list_items(state: &AppState, mock: bool) -> Result<Response, CatalogError> {
    if mock {
        return Ok((
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            state.seed.raw().to_string(),
        )
            .into_response());
    }

    let items = state
        .store
        .list_items()
        .await
        .map_err(CatalogError::read("Error getting catalog items"))?;
    tracing::info!("Successfully sent {} catalog items", items.len());
    Ok(json_response(StatusCode::OK, &CatalogItems { items }))
}

#[utoipa::path(
    get,
    path = "/v1/catalog/{item_id}",
    params(
        ("item_id" = i32, Path, description = "Catalog item id"),
        ("mock" = Option<bool>, Query, description = "Look the item up in the seed document")
    ),
    responses(
        (status = 200, description = "The item", body = CatalogItem),
        (status = 404, description = "No item with that id", body = Envelope),
        (status = 500, description = "Store failure", body = Envelope)
    )
)]
pub async fn get_item(state: &AppState, item_id: i32, mock: bool) -> Result<Response, CatalogError> {
    let item = if mock {
        state.seed.find(item_id).cloned()
    } else {
        state.store.get_item(item_id).await.map_err(CatalogError::read(format!(
            "Error from database retrieving item_id {}",
            item_id
        )))?
    };

    let item = item.ok_or(CatalogError::NotFound(item_id))?;
    tracing::info!("Successfully sent item_number: {}", item_id);
    Ok(json_response(StatusCode::OK, &item))
}

#[utoipa::path(
    post,
    path = "/v1/catalog/",
    request_body(content = ItemFields, description = "New item; `item_id` and `name` are required. Form-encoded bodies are also accepted."),
    responses(
        (status = 201, description = "Item created", body = Envelope),
        (status = 400, description = "Id on the path, bad body, or store rejection (e.g. duplicate id)", body = Envelope)
    )
)]
pub async fn create_item(
    state: &AppState,
    item_id: i32,
    request: Request,
) -> Result<Response, CatalogError> {
    if item_id > 0 {
        return Err(CatalogError::BadRequest(
            "Item number must not appear on URL".to_string(),
        ));
    }

    let item = read_item_fields(state, request)
        .await?
        .into_new_item()
        .map_err(CatalogError::BadRequest)?;

    state
        .store
        .insert_item(&item)
        .await
        .map_err(CatalogError::write("Error adding item to catalog"))?;

    Ok(Envelope::success(
        StatusCode::CREATED,
        format!("Created item_id {}", item.item_id),
    )
    .into_response())
}

#[utoipa::path(
    put,
    path = "/v1/catalog/{item_id}",
    params(
        ("item_id" = i32, Path, description = "Catalog item id")
    ),
    request_body(content = ItemFields, description = "Fields to overwrite; anything omitted keeps its current value"),
    responses(
        (status = 200, description = "Item updated", body = Envelope),
        (status = 400, description = "Missing id, bad body, or store failure", body = Envelope),
        (status = 404, description = "No item with that id", body = Envelope)
    )
)]
pub async fn update_item(
    state: &AppState,
    item_id: i32,
    request: Request,
) -> Result<Response, CatalogError> {
    if item_id <= 0 {
        return Err(CatalogError::BadRequest(
            "Item number must appear on URL".to_string(),
        ));
    }

    let fields: ItemFields = read_item_fields(state, request).await?;

    let mut item = state
        .store
        .get_item(item_id)
        .await
        .map_err(CatalogError::write("Error getting row for update"))?
        .ok_or(CatalogError::NotFound(item_id))?;
    item.apply(fields);

    let updated = state
        .store
        .update_item(&item)
        .await
        .map_err(CatalogError::write("Error updating item in catalog"))?;

    // MySQL reports 0 for an unchanged row too, so only a missing row is NotFound.
    if updated == 0
        && state
            .store
            .get_item(item_id)
            .await
            .map_err(CatalogError::write("Error updating item in catalog"))?
            .is_none()
    {
        return Err(CatalogError::NotFound(item_id));
    }

    Ok(Envelope::success(StatusCode::OK, format!("Updated item_id {}", item_id)).into_response())
}

#[utoipa::path(
    delete,
    path = "/v1/catalog/{item_id}",
    params(
        ("item_id" = i32, Path, description = "Catalog item id")
    ),
    responses(
        (status = 200, description = "Rows affected (0 when the id did not exist)", body = Envelope),
        (status = 400, description = "Missing id or store failure", body = Envelope)
    )
)]
pub async fn delete_item(state: &AppState, item_id: i32) -> Result<Response, CatalogError> {
    if item_id <= 0 {
        return Err(CatalogError::BadRequest(format!(
            "Invalid item number: {}",
            item_id
        )));
    }

    let rows = state
        .store
        .delete_item(item_id)
        .await
        .map_err(CatalogError::write(format!("Error deleting item_id {}", item_id)))?;

    Ok(Envelope::success(StatusCode::OK, format!("Rows affected: {}", rows)).into_response())
}

