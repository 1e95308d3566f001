use crate::transport::http::types::{AppState, Envelope};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy (store reachable)", body = Envelope),
        (status = 503, description = "Service is unhealthy (store unreachable)", body = Envelope)
    )
)]
pub async fn healthcheck_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => Envelope::success(StatusCode::OK, "ok"),
        Err(e) => Envelope::error(
            StatusCode::SERVICE_UNAVAILABLE,
            format!("Store ping failed: {}", e),
        ),
    }
}
