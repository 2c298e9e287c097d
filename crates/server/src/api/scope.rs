use axum::extract::FromRequestParts;
use axum::http::HeaderValue;
use axum::http::request::Parts;
use flowarden_core::ScopeKey;

use super::error::ApiError;

pub const INSTALLATION_HEADER: &str = "x-installation-id";
pub const REPOSITORY_HEADER: &str = "x-repository-id";

/// Tenant scope taken from the `x-installation-id` and `x-repository-id`
/// headers. Missing or empty headers are `UNAUTHORIZED`; non-numeric ones
/// are `BAD_REQUEST`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope(pub ScopeKey);

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a HeaderValue> {
    parts.headers.get(name).filter(|value| !value.is_empty())
}

fn parse_id(value: &HeaderValue) -> Option<u64> {
    value.to_str().ok()?.trim().parse().ok()
}

/// Installation taken from the `x-installation-id` header alone, for reads
/// that span every repository of one installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Installation(pub u64);

impl<S: Send + Sync> FromRequestParts<S> for Installation {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(installation) = header(parts, INSTALLATION_HEADER) else {
            return Err(ApiError::unauthorized("Missing installation header."));
        };
        parse_id(installation)
            .map(Self)
            .ok_or_else(|| ApiError::bad_request("Invalid installation header."))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Scope {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let (Some(installation), Some(repository)) = (
            header(parts, INSTALLATION_HEADER),
            header(parts, REPOSITORY_HEADER),
        ) else {
            return Err(ApiError::unauthorized("Missing scope headers."));
        };

        match (parse_id(installation), parse_id(repository)) {
            (Some(installation_id), Some(repository_id)) => {
                Ok(Self(ScopeKey::new(installation_id, repository_id)))
            }
            _ => Err(ApiError::bad_request("Invalid scope headers.")),
        }
    }
}
