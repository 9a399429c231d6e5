use std::collections::HashMap;

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
    models::{CreateMenu, MenuNode, UpdateMenu},
    validate::validate_payload,
    AppState,
};

pub async fn list_menus(
    State(state): State<AppState>,
    cookies: Cookies,
    RawQuery(query): RawQuery,
) -> Result<Json<Value>, ApiError> {
    require_permission(&cookies, &state.sessions, "menus:read")?;
    Ok(Json(state.postgrest.list("menus", query.as_deref()).await?))
}

pub async fn create_menu(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<CreateMenu>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_permission(&cookies, &state.sessions, "menus:write")?;
    validate_payload(&payload)?;
    if let Some(parent_id) = payload.parent_menu_id {
        check_parent(&state, None, parent_id).await?;
    }
    let row = state
        .postgrest
        .create("menus", &to_body(&payload)?)
        .await
        .map_err(named_duplicate("menu"))?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update_menu(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateMenu>,
) -> Result<Json<Value>, ApiError> {
    require_permission(&cookies, &state.sessions, "menus:write")?;
    validate_payload(&payload)?;
    if let Some(Some(parent_id)) = payload.parent_menu_id {
        check_parent(&state, Some(id), parent_id).await?;
    }
    let body = to_body(&payload)?;
    require_changes(&body)?;
    let row = state
        .postgrest
        .update("menus", "menu_id", id, &body)
        .await
        .map_err(named_duplicate("menu"))?;
    Ok(Json(row))
}

pub async fn delete_menu(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    require_permission(&cookies, &state.sessions, "menus:write")?;
    state.postgrest.delete("menus", "menu_id", id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Validate a proposed parent assignment against the current tree: the
/// parent must exist, and the edit must not make the menu its own ancestor.
async fn check_parent(
    state: &AppState,
    menu_id: Option<i64>,
    parent_id: i64,
) -> Result<(), ApiError> {
    let rows = state.postgrest.find("menus", &[]).await?;
    let parents: HashMap<i64, Option<i64>> = rows
        .iter()
        .filter_map(MenuNode::from_row)
        .map(|node| (node.menu_id, node.parent_menu_id))
        .collect();

    if !parents.contains_key(&parent_id) {
        return Err(ApiError::Validation(format!(
            "parent_menu_id: no menu {parent_id}"
        )));
    }
    if would_create_cycle(menu_id, parent_id, &parents) {
        return Err(ApiError::Validation(
            "parent_menu_id: assignment would create a cycle".to_string(),
        ));
    }
    Ok(())
}

/// Walk up from the proposed parent. If the walk reaches the menu being
/// edited the assignment closes a loop. The step bound also rejects
/// assignments into a chain that is already cyclic.
fn would_create_cycle(
    menu_id: Option<i64>,
    new_parent: i64,
    parents: &HashMap<i64, Option<i64>>,
) -> bool {
    if menu_id == Some(new_parent) {
        return true;
    }
    let mut current = Some(new_parent);
    let mut steps = 0;
    while let Some(node) = current {
        if steps > parents.len() {
            return true;
        }
        if menu_id == Some(node) {
            return true;
        }
        current = parents.get(&node).copied().flatten();
        steps += 1;
    }
    false
}
