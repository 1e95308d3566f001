use crate::domain::ItemFields;
use crate::storage::StoreError;
use crate::transport::http::types::{AppState, Envelope};
use axum::extract::{FromRequest, Query, Request};
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Position of the item id in `/v1/catalog/{id}` once split on `/`.
const ITEM_SEGMENT: usize = 3;

/// Per-request failures. Each maps to one status code and an error envelope.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Item not found: item_id {0}")]
    NotFound(i32),
    #[error("{0} not allowed")]
    MethodNotAllowed(Method),
    /// Store failure while reading.
    #[error("{context}: {source}")]
    Read {
        context: String,
        #[source]
        source: StoreError,
    },
    /// Store failure while writing (constraint violations included).
    #[error("{context}: {source}")]
    Write {
        context: String,
        #[source]
        source: StoreError,
    },
}

impl CatalogError {
    pub fn status(&self) -> StatusCode {
        match self {
            CatalogError::BadRequest(_) | CatalogError::Write { .. } => StatusCode::BAD_REQUEST,
            CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
            CatalogError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            CatalogError::Read { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn read(context: impl Into<String>) -> impl FnOnce(StoreError) -> Self {
        let context = context.into();
        move |source| CatalogError::Read { context, source }
    }

    pub fn write(context: impl Into<String>) -> impl FnOnce(StoreError) -> Self {
        let context = context.into();
        move |source| CatalogError::Write { context, source }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        Envelope::error(self.status(), self.to_string()).into_response()
    }
}

/// Item id from the request path. Absent, unparsable or non-positive means `0`,
/// i.e. a collection-level request.
pub fn item_number(path: &str) -> i32 {
    path.split('/')
        .nth(ITEM_SEGMENT)
        .and_then(|segment| segment.parse::<i32>().ok())
        .filter(|id| *id > 0)
        .unwrap_or(0)
}

#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    #[serde(default)]
    pub mock: Option<String>,
}

/// `?mock=true` (exactly, after percent-decoding) switches reads to the seed document.
/// A query string that does not decode counts as no flag.
pub fn mock_requested(uri: &Uri) -> bool {
    Query::<CatalogQuery>::try_from_uri(uri)
        .map(|Query(query)| query.mock.as_deref() == Some("true"))
        .unwrap_or(false)
}

/// Serializes with four-space indentation.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}

pub fn json_response<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Response {
    match to_pretty_json(value) {
        Ok(body) => (status, [(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(e) => {
            tracing::error!("Error marshalling response: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Reads create/update fields from a JSON body, or from a form-encoded body when the
/// request says so.
pub async fn read_item_fields(state: &AppState, request: Request) -> Result<ItemFields, CatalogError> {
    let is_form = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

    if is_form {
        let Form(fields) = Form::<ItemFields>::from_request(request, state)
            .await
            .map_err(|e| CatalogError::BadRequest(format!("Invalid form body: {}", e)))?;
        Ok(fields)
    } else {
        let Json(fields) = Json::<ItemFields>::from_request(request, state)
            .await
            .map_err(|e| CatalogError::BadRequest(format!("Invalid JSON body: {}", e)))?;
        Ok(fields)
    }
}
