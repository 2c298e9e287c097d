use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use flowarden_core::EventContext;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::error::ApiError;
use super::{AppState, respond};

#[derive(Debug, Default, Deserialize)]
pub struct IngestQuery {
    /// Wait for the pipeline and return the full report.
    #[serde(default)]
    pub wait: bool,
}

/// `POST /v1/events` -- run the pipeline for an already-normalized event.
///
/// Acknowledges with `202` and processes in the background, or with
/// `?wait=true` returns the `EventReport` with `200`. A store failure on
/// one path shows up as `ruleError` or `workflowError` in the report.
pub async fn ingest(
    State(state): State<AppState>,
    Query(query): Query<IngestQuery>,
    body: Result<Json<EventContext>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(ctx) = body?;
    debug!(event = %ctx.event.name, scope = %ctx.scope(), wait = query.wait, "event received");

    if query.wait {
        let report = state.gateway.handle_event(&ctx).await;
        return Ok(respond(StatusCode::OK, report));
    }

    let ack = json!({
        "accepted": true,
        "event": ctx.event.name,
        "deliveryId": ctx.event.delivery_id,
    });
    state.gateway.submit(ctx);
    Ok(respond(StatusCode::ACCEPTED, ack))
}
