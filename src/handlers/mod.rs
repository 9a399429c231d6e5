pub mod auth;
pub mod inventory;
pub mod menus;
pub mod products;
pub mod rbac;
pub mod uploads;
pub mod users;
pub mod warehouses;

use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;

/// Rewrite the forwarder's generic duplicate error with the entity name so
/// the client sees "<entity> already exists".
pub(crate) fn named_duplicate(entity: &'static str) -> impl FnOnce(ApiError) -> ApiError {
    move |err| match err {
        ApiError::Duplicate(_) => ApiError::Duplicate(entity.to_string()),
        other => other,
    }
}

pub(crate) fn to_body<T: Serialize>(payload: &T) -> Result<Value, ApiError> {
    serde_json::to_value(payload).map_err(|e| ApiError::Internal(format!("serialize body: {e}")))
}

/// An update whose fields were all absent serializes to `{}`; PostgREST
/// rejects an empty patch, so fail fast with a validation error instead of
/// letting the no-op surface as a generic upstream failure.
pub(crate) fn require_changes(body: &Value) -> Result<(), ApiError> {
    match body.as_object() {
        Some(fields) if !fields.is_empty() => Ok(()),
        _ => Err(ApiError::Validation(
            "at least one field must be provided".to_string(),
        )),
    }
}
