//! Landing page: `layout.html` with `index.html` spliced in, followed by a ready envelope.

use crate::transport::http::handlers::common::to_pretty_json;
use crate::transport::http::types::{AppState, Envelope};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use std::path::Path;

/// Marker in `layout.html` replaced by the contents of `index.html`.
pub const CONTENT_PLACEHOLDER: &str = "{{content}}";

pub async fn index_handler(State(state): State<AppState>) -> Response {
    let page = match render_index(&state.templates_dir).await {
        Ok(page) => page,
        Err(message) => {
            tracing::error!("{}", message);
            return (StatusCode::INTERNAL_SERVER_ERROR, message).into_response();
        }
    };

    let ready = Envelope::success(StatusCode::OK, "Ready for request.");
    tracing::info!("{}", ready.message);
    let mut body = page.into_bytes();
    match to_pretty_json(&ready) {
        Ok(envelope) => body.extend_from_slice(&envelope),
        Err(e) => tracing::error!("Error marshalling ready envelope: {}", e),
    }

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        body,
    )
        .into_response()
}

async fn render_index(dir: &Path) -> Result<String, String> {
    let layout_path = dir.join("layout.html");
    let index_path = dir.join("index.html");

    let layout = tokio::fs::read_to_string(&layout_path)
        .await
        .map_err(|e| format!("Error reading {}: {}", layout_path.display(), e))?;
    let index = tokio::fs::read_to_string(&index_path)
        .await
        .map_err(|e| format!("Error reading {}: {}", index_path.display(), e))?;

    if !layout.contains(CONTENT_PLACEHOLDER) {
        return Err(format!(
            "{} has no {} placeholder",
            layout_path.display(),
            CONTENT_PLACEHOLDER
        ));
    }
    Ok(layout.replacen(CONTENT_PLACEHOLDER, &index, 1))
}
