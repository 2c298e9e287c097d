use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use super::AppState;

/// `GET /health` -- returns service status together with a metrics snapshot.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let snap = state.gateway.metrics().snapshot();
    (
        StatusCode::OK,
        Json(json!({
            "ok": true,
            "status": "ok",
            "metrics": snap,
        })),
    )
}

/// `GET /metrics` -- returns pipeline counters as JSON.
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.gateway.metrics().snapshot()))
}
