use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::HandlerError;

/// Parameters for `addLabel`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddLabelParams {
    pub label: String,
}

/// Parameters for `removeLabel`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoveLabelParams {
    pub label: String,
}

/// Parameters for `addComment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddCommentParams {
    pub body: String,
}

impl AddLabelParams {
    pub fn from_params(params: Option<&Map<String, Value>>) -> Result<Self, HandlerError> {
        Ok(Self {
            label: required_str(params, "label")?,
        })
    }
}

impl RemoveLabelParams {
    pub fn from_params(params: Option<&Map<String, Value>>) -> Result<Self, HandlerError> {
        Ok(Self {
            label: required_str(params, "label")?,
        })
    }
}

impl AddCommentParams {
    pub fn from_params(params: Option<&Map<String, Value>>) -> Result<Self, HandlerError> {
        Ok(Self {
            body: required_str(params, "body")?,
        })
    }
}

/// A non-empty string parameter. Absent, empty, and non-string values are
/// all reported the same way.
fn required_str(
    params: Option<&Map<String, Value>>,
    name: &'static str,
) -> Result<String, HandlerError> {
    params
        .and_then(|p| p.get(name))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .ok_or(HandlerError::MissingParam {
            name,
            expected: "string",
        })
}
