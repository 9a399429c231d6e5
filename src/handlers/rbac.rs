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
    models::{AssignRolePermission, CreatePermission, CreateRole, UpdatePermission, UpdateRole},
    validate::validate_payload,
    AppState,
};

pub async fn list_roles(
    State(state): State<AppState>,
    cookies: Cookies,
    RawQuery(query): RawQuery,
) -> Result<Json<Value>, ApiError> {
    require_permission(&cookies, &state.sessions, "rbac:read")?;
    Ok(Json(state.postgrest.list("roles", query.as_deref()).await?))
}

pub async fn create_role(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<CreateRole>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_permission(&cookies, &state.sessions, "rbac:write")?;
    validate_payload(&payload)?;
    let row = state
        .postgrest
        .create("roles", &to_body(&payload)?)
        .await
        .map_err(named_duplicate("role"))?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update_role(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateRole>,
) -> Result<Json<Value>, ApiError> {
    require_permission(&cookies, &state.sessions, "rbac:write")?;
    validate_payload(&payload)?;
    let body = to_body(&payload)?;
    require_changes(&body)?;
    let row = state
        .postgrest
        .update("roles", "role_id", id, &body)
        .await
        .map_err(named_duplicate("role"))?;
    Ok(Json(row))
}

pub async fn delete_role(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    require_permission(&cookies, &state.sessions, "rbac:write")?;
    state.postgrest.delete("roles", "role_id", id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_permissions(
    State(state): State<AppState>,
    cookies: Cookies,
    RawQuery(query): RawQuery,
) -> Result<Json<Value>, ApiError> {
    require_permission(&cookies, &state.sessions, "rbac:read")?;
    Ok(Json(state.postgrest.list("permissions", query.as_deref()).await?))
}

pub async fn create_permission(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<CreatePermission>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_permission(&cookies, &state.sessions, "rbac:write")?;
    validate_payload(&payload)?;
    let row = state
        .postgrest
        .create("permissions", &to_body(&payload)?)
        .await
        .map_err(named_duplicate("permission"))?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update_permission(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
    Json(payload): Json<UpdatePermission>,
) -> Result<Json<Value>, ApiError> {
    require_permission(&cookies, &state.sessions, "rbac:write")?;
    validate_payload(&payload)?;
    let body = to_body(&payload)?;
    require_changes(&body)?;
    let row = state
        .postgrest
        .update("permissions", "permission_id", id, &body)
        .await
        .map_err(named_duplicate("permission"))?;
    Ok(Json(row))
}

pub async fn delete_permission(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    require_permission(&cookies, &state.sessions, "rbac:write")?;
    state.postgrest.delete("permissions", "permission_id", id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_role_permissions(
    State(state): State<AppState>,
    cookies: Cookies,
    RawQuery(query): RawQuery,
) -> Result<Json<Value>, ApiError> {
    require_permission(&cookies, &state.sessions, "rbac:read")?;
    Ok(Json(state.postgrest.list("role_permissions", query.as_deref()).await?))
}

pub async fn assign_role_permission(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<AssignRolePermission>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_permission(&cookies, &state.sessions, "rbac:write")?;
    validate_payload(&payload)?;
    let row = state
        .postgrest
        .create("role_permissions", &to_body(&payload)?)
        .await
        .map_err(named_duplicate("role permission assignment"))?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// Composite key, so both halves come from the path.
pub async fn revoke_role_permission(
    State(state): State<AppState>,
    cookies: Cookies,
    Path((role_id, permission_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    require_permission(&cookies, &state.sessions, "rbac:write")?;
    state
        .postgrest
        .delete_where(
            "role_permissions",
            &[
                ("role_id", format!("eq.{role_id}")),
                ("permission_id", format!("eq.{permission_id}")),
            ],
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
