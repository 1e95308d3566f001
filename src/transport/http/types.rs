use crate::domain::SeedDocument;
use crate::storage::CatalogStore;
use crate::transport::http::handlers::common::json_response;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use utoipa::ToSchema;

/// Shared, read-only request state. The store is the only thing that talks to MySQL.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CatalogStore>,
    pub seed: Arc<SeedDocument>,
    pub templates_dir: Arc<PathBuf>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        seed: SeedDocument,
        templates_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            seed: Arc::new(seed),
            templates_dir: Arc::new(templates_dir.into()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum EnvelopeStatus {
    Success,
    Error,
}

/// `{status, code, message}` wrapper used for every reply that is not catalog data.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Envelope {
    pub status: EnvelopeStatus,
    pub code: u16,
    pub message: String,
}

impl Envelope {
    pub fn success(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: EnvelopeStatus::Success,
            code: code.as_u16(),
            message: message.into(),
        }
    }

    pub fn error(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: EnvelopeStatus::Error,
            code: code.as_u16(),
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        match self.status {
            EnvelopeStatus::Success => tracing::info!(code = self.code, "{}", self.message),
            EnvelopeStatus::Error => tracing::warn!(code = self.code, "{}", self.message),
        }
        json_response(self.status_code(), &self)
    }
}
