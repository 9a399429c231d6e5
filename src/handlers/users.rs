use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use tower_cookies::Cookies;

use crate::{
    error::ApiError,
    handlers::{named_duplicate, require_changes, to_body},
    middleware::require_permission,
    models::{CreateUser, UpdateUser},
    utils::hash_password,
    validate::validate_payload,
    AppState,
};

/// Strip `password_hash` from an upstream row or row array before it goes
/// out the door.
pub(crate) fn sanitize(mut value: Value) -> Value {
    match &mut value {
        Value::Object(row) => {
            row.remove("password_hash");
        }
        Value::Array(rows) => {
            for row in rows.iter_mut() {
                if let Value::Object(row) = row {
                    row.remove("password_hash");
                }
            }
        }
        _ => {}
    }
    value
}

pub async fn list_users(
    State(state): State<AppState>,
    cookies: Cookies,
    RawQuery(query): RawQuery,
) -> Result<Json<Value>, ApiError> {
    require_permission(&cookies, &state.sessions, "users:read")?;
    let rows = state.postgrest.list("users", query.as_deref()).await?;
    Ok(Json(sanitize(rows)))
}

pub async fn create_user(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<CreateUser>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_permission(&cookies, &state.sessions, "users:write")?;
    validate_payload(&payload)?;

    let mut body = to_body(&payload)?;
    let hashed = hash_password(&payload.password)?;
    body.as_object_mut()
        .ok_or_else(|| ApiError::Internal("user body is not an object".into()))?
        .insert("password_hash".to_string(), Value::String(hashed));

    let row = state
        .postgrest
        .create("users", &body)
        .await
        .map_err(named_duplicate("user"))?;
    Ok((StatusCode::CREATED, Json(sanitize(row))))
}

pub async fn update_user(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUser>,
) -> Result<Json<Value>, ApiError> {
    require_permission(&cookies, &state.sessions, "users:write")?;
    validate_payload(&payload)?;

    let mut body = to_body(&payload)?;
    if let Some(password) = &payload.password {
        let hashed = hash_password(password)?;
        body.as_object_mut()
            .ok_or_else(|| ApiError::Internal("user body is not an object".into()))?
            .insert("password_hash".to_string(), Value::String(hashed));
    }
    require_changes(&body)?;

    let row = state
        .postgrest
        .update("users", "user_id", id, &body)
        .await
        .map_err(named_duplicate("user"))?;
    Ok(Json(sanitize(row)))
}

pub async fn delete_user(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    require_permission(&cookies, &state.sessions, "users:write")?;
    state.postgrest.delete("users", "user_id", id).await?;
    Ok(StatusCode::NO_CONTENT)
}
