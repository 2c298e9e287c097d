pub mod error;
pub mod events;
pub mod health;
pub mod rules;
pub mod scope;
pub mod workflows;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use flowarden_gateway::Gateway;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
}

/// Success envelope: `{ok: true, data}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub ok: bool,
    pub data: T,
}

pub(crate) fn respond<T: Serialize>(status: StatusCode, data: T) -> Response {
    (status, Json(Envelope { ok: true, data })).into_response()
}

/// Build the Axum router with all API routes and middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health & metrics
        .route("/health", get(health::health))
        .route("/metrics", get(health::metrics))
        // Event ingestion
        .route("/v1/events", axum::routing::post(events::ingest))
        // Workflows
        .route(
            "/v1/workflows",
            get(workflows::list_workflows).post(workflows::create_workflow),
        )
        .route(
            "/v1/workflows/{id}",
            get(workflows::get_workflow)
                .patch(workflows::patch_workflow)
                .delete(workflows::delete_workflow),
        )
        // Rules
        .route(
            "/v1/rules",
            get(rules::list_rules)
                .put(rules::replace_rules)
                .delete(rules::clear_rules),
        )
        .route("/v1/installation/rules", get(rules::list_installation_rules))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
