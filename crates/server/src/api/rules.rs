use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use flowarden_rules::Rule;
use tracing::info;

use super::error::ApiError;
use super::scope::{Installation, Scope};
use super::{AppState, respond};

/// `GET /v1/rules` -- the rule set for the header scope, in listing order.
pub async fn list_rules(
    State(state): State<AppState>,
    Scope(scope): Scope,
) -> Result<Response, ApiError> {
    let rules = state.gateway.rule_store().list_for_scope(scope).await?;
    Ok(respond(StatusCode::OK, rules))
}

/// `PUT /v1/rules` -- replace the whole rule set for the header scope.
pub async fn replace_rules(
    State(state): State<AppState>,
    Scope(scope): Scope,
    body: Result<Json<Vec<Rule>>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(rules) = body?;
    let count = rules.len();
    let store = state.gateway.rule_store();
    store.replace_scope(scope, rules).await?;
    info!(scope = %scope, count, "rules replaced");
    Ok(respond(StatusCode::OK, store.list_for_scope(scope).await?))
}

/// `DELETE /v1/rules` -- remove every rule of the header scope.
pub async fn clear_rules(
    State(state): State<AppState>,
    Scope(scope): Scope,
) -> Result<Response, ApiError> {
    let removed = state.gateway.rule_store().clear_scope(scope).await?;
    info!(scope = %scope, removed, "rules cleared");
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// `GET /v1/installation/rules` -- rules of every repository of the
/// installation, repository id ascending.
pub async fn list_installation_rules(
    State(state): State<AppState>,
    Installation(installation_id): Installation,
) -> Result<Response, ApiError> {
    let rules = state
        .gateway
        .rule_store()
        .list_for_installation(installation_id)
        .await?;
    Ok(respond(StatusCode::OK, rules))
}
