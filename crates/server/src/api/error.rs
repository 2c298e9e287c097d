use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use flowarden_core::ValidationError;
use flowarden_state::StoreError;
use serde::Serialize;
use tracing::warn;

/// Machine-readable error codes carried in the failure envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    BadRequest,
    Unauthorized,
    NotFound,
    Conflict,
    Internal,
}

/// An API failure, rendered as `{ok: false, error: {code, message}}`.
#[derive(Debug)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Vec<ValidationError>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: ErrorCode,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a [ValidationError]>,
}

#[derive(Serialize)]
struct FailureEnvelope<'a> {
    ok: bool,
    error: ErrorBody<'a>,
}

impl ApiError {
    fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    /// A `BAD_REQUEST` listing every validation failure.
    pub fn invalid(details: Vec<ValidationError>) -> Self {
        Self {
            details,
            ..Self::bad_request("Workflow failed validation.")
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }

    pub fn status(&self) -> StatusCode {
        match self.code {
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = FailureEnvelope {
            ok: false,
            error: ErrorBody {
                code: self.code,
                message: &self.message,
                details: (!self.details.is_empty()).then_some(self.details.as_slice()),
            },
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AlreadyExists { .. } => Self::conflict(err.to_string()),
            StoreError::NotFound { .. } => Self::not_found(err.to_string()),
            StoreError::ScopeMismatch { .. } => Self::bad_request(err.to_string()),
            StoreError::Backend(_) => {
                warn!(error = %err, "store backend failure");
                Self::internal("Store unavailable.")
            }
        }
    }
}
