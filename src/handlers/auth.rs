use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use tower_cookies::{Cookie, Cookies};
use uuid::Uuid;

use crate::{
    error::ApiError,
    middleware::{get_current_user, CurrentUser, SESSION_COOKIE},
    models::LoginRequest,
    utils::verify_password,
    validate::validate_payload,
    AppState,
};

/// Look the user up by email, compare the supplied password against the
/// stored hash, and open a session. Unknown email and wrong password are
/// indistinguishable to the caller.
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    validate_payload(&payload)?;

    let row = state
        .postgrest
        .find_one(
            "users",
            &[
                ("email", format!("eq.{}", payload.email)),
                ("active", "is.true".to_string()),
            ],
        )
        .await?
        .ok_or(ApiError::Unauthorized)?;

    let stored_hash = row
        .get("password_hash")
        .and_then(Value::as_str)
        .ok_or(ApiError::Unauthorized)?;
    if !verify_password(&payload.password, stored_hash) {
        return Err(ApiError::Unauthorized);
    }

    let role_id = row.get("role_id").and_then(Value::as_i64);
    let permissions = load_permissions(&state, role_id).await?;
    let user = CurrentUser::from_row(&row, permissions)
        .ok_or_else(|| ApiError::Internal("malformed user row from upstream".into()))?;

    let token = state.sessions.login(user.clone());
    let cookie = Cookie::build((SESSION_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .max_age(time::Duration::hours(24))
        .build();
    cookies.add(cookie);

    log::info!("user {} logged in", user.username);
    Ok(Json(json!({ "user": user })))
}

pub async fn logout(State(state): State<AppState>, cookies: Cookies) -> StatusCode {
    if let Some(cookie) = cookies.get(SESSION_COOKIE) {
        if let Ok(token) = Uuid::parse_str(cookie.value()) {
            state.sessions.logout(token);
        }
    }
    cookies.remove(Cookie::build((SESSION_COOKIE, "")).path("/").build());
    StatusCode::NO_CONTENT
}

pub async fn me(
    State(state): State<AppState>,
    cookies: Cookies,
) -> Result<Json<Value>, ApiError> {
    let user = get_current_user(&cookies, &state.sessions).ok_or(ApiError::Unauthorized)?;
    Ok(Json(json!({ "user": user })))
}

/// Resolve a role to its permission names: role_permissions gives the ids,
/// permissions gives the names, joined with a PostgREST `in.(...)` filter.
async fn load_permissions(
    state: &AppState,
    role_id: Option<i64>,
) -> Result<Vec<String>, ApiError> {
    let Some(role_id) = role_id else {
        return Ok(Vec::new());
    };

    let assignments = state
        .postgrest
        .find("role_permissions", &[("role_id", format!("eq.{role_id}"))])
        .await?;
    let ids: Vec<String> = assignments
        .iter()
        .filter_map(|row| row.get("permission_id").and_then(Value::as_i64))
        .map(|id| id.to_string())
        .collect();
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows = state
        .postgrest
        .find(
            "permissions",
            &[("permission_id", format!("in.({})", ids.join(",")))],
        )
        .await?;
    Ok(rows
        .iter()
        .filter_map(|row| row.get("permission_name").and_then(Value::as_str))
        .map(String::from)
        .collect())
}
