use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use flowarden_core::{
    CreatedBy, Workflow, WorkflowPatch, WorkflowStep, WorkflowTrigger, validate_workflow,
};
use flowarden_state::StoreError;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::error::ApiError;
use super::scope::Scope;
use super::{AppState, respond};

/// Body of `POST /v1/workflows`. The id, scope and metadata are assigned
/// by the server.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkflowRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
    pub trigger: WorkflowTrigger,
    #[serde(default)]
    pub steps: Vec<WorkflowStep>,
}

impl CreateWorkflowRequest {
    fn into_workflow(self, scope: Scope) -> Result<Workflow, ApiError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ApiError::bad_request("name is required."));
        }
        let event = self.trigger.event.trim();
        if event.is_empty() {
            return Err(ApiError::bad_request("trigger.event is required."));
        }

        let mut workflow = Workflow::new(Uuid::new_v4().to_string(), name, scope.0, event)
            .with_enabled(self.enabled.unwrap_or(true))
            .with_created_by(CreatedBy::Api);
        workflow.description = self.description;
        workflow.steps = self.steps;
        Ok(workflow)
    }
}

fn workflow_not_found() -> ApiError {
    ApiError::not_found("Workflow not found.")
}

/// `GET /v1/workflows` -- workflows for the header scope, in listing order.
pub async fn list_workflows(
    State(state): State<AppState>,
    scope: Scope,
) -> Result<Response, ApiError> {
    let workflows = state.gateway.workflow_store().list_for_scope(scope.0).await?;
    Ok(respond(StatusCode::OK, workflows))
}

/// `POST /v1/workflows` -- create a workflow with a fresh id.
pub async fn create_workflow(
    State(state): State<AppState>,
    scope: Scope,
    body: Result<Json<CreateWorkflowRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = body?;
    let workflow = request.into_workflow(scope)?;

    let errors = validate_workflow(&workflow);
    if !errors.is_empty() {
        return Err(ApiError::invalid(errors));
    }

    let created = state
        .gateway
        .workflow_store()
        .create(scope.0, workflow)
        .await
        .map_err(|err| match err {
            StoreError::AlreadyExists { .. } => ApiError::conflict("Workflow already exists."),
            other => ApiError::from(other),
        })?;
    info!(scope = %scope.0, workflow = %created.id, "workflow created");
    Ok(respond(StatusCode::CREATED, created))
}

/// `GET /v1/workflows/{id}`
pub async fn get_workflow(
    State(state): State<AppState>,
    scope: Scope,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let workflow = state
        .gateway
        .workflow_store()
        .get(scope.0, &id)
        .await?
        .ok_or_else(workflow_not_found)?;
    Ok(respond(StatusCode::OK, workflow))
}

/// `PATCH /v1/workflows/{id}` -- update name, description or enabled.
/// Structural fields (trigger, steps, scope) cannot be patched.
pub async fn patch_workflow(
    State(state): State<AppState>,
    scope: Scope,
    Path(id): Path<String>,
    body: Result<Json<WorkflowPatch>, JsonRejection>,
) -> Result<Response, ApiError> {
    let store = state.gateway.workflow_store();
    let mut workflow = store
        .get(scope.0, &id)
        .await?
        .ok_or_else(workflow_not_found)?;

    let Json(patch) = body?;
    patch
        .apply(&mut workflow)
        .map_err(|err| ApiError::bad_request(err.message))?;

    let saved = store.update(scope.0, workflow).await?;
    info!(scope = %scope.0, workflow = %saved.id, "workflow updated");
    Ok(respond(StatusCode::OK, saved))
}

/// `DELETE /v1/workflows/{id}` -- `204` on success.
pub async fn delete_workflow(
    State(state): State<AppState>,
    scope: Scope,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    if !state.gateway.workflow_store().delete(scope.0, &id).await? {
        return Err(workflow_not_found());
    }
    info!(scope = %scope.0, workflow = %id, "workflow deleted");
    Ok(StatusCode::NO_CONTENT.into_response())
}
