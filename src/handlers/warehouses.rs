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
    models::{
        CreateLocation, CreateWarehouse, CreateZone, UpdateLocation, UpdateWarehouse, UpdateZone,
    },
    validate::validate_payload,
    AppState,
};

// Warehouses, zones and locations share one admin area; zones belong to a
// warehouse and locations to a zone, but referential integrity lives
// upstream.

pub async fn list_warehouses(
    State(state): State<AppState>,
    cookies: Cookies,
    RawQuery(query): RawQuery,
) -> Result<Json<Value>, ApiError> {
    require_permission(&cookies, &state.sessions, "warehouses:read")?;
    Ok(Json(state.postgrest.list("warehouses", query.as_deref()).await?))
}

pub async fn create_warehouse(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<CreateWarehouse>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_permission(&cookies, &state.sessions, "warehouses:write")?;
    validate_payload(&payload)?;
    let row = state
        .postgrest
        .create("warehouses", &to_body(&payload)?)
        .await
        .map_err(named_duplicate("warehouse"))?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update_warehouse(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateWarehouse>,
) -> Result<Json<Value>, ApiError> {
    require_permission(&cookies, &state.sessions, "warehouses:write")?;
    validate_payload(&payload)?;
    let body = to_body(&payload)?;
    require_changes(&body)?;
    let row = state
        .postgrest
        .update("warehouses", "warehouse_id", id, &body)
        .await
        .map_err(named_duplicate("warehouse"))?;
    Ok(Json(row))
}

pub async fn delete_warehouse(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    require_permission(&cookies, &state.sessions, "warehouses:write")?;
    state.postgrest.delete("warehouses", "warehouse_id", id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_zones(
    State(state): State<AppState>,
    cookies: Cookies,
    RawQuery(query): RawQuery,
) -> Result<Json<Value>, ApiError> {
    require_permission(&cookies, &state.sessions, "warehouses:read")?;
    Ok(Json(state.postgrest.list("zones", query.as_deref()).await?))
}

pub async fn create_zone(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<CreateZone>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_permission(&cookies, &state.sessions, "warehouses:write")?;
    validate_payload(&payload)?;
    let row = state
        .postgrest
        .create("zones", &to_body(&payload)?)
        .await
        .map_err(named_duplicate("zone"))?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update_zone(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateZone>,
) -> Result<Json<Value>, ApiError> {
    require_permission(&cookies, &state.sessions, "warehouses:write")?;
    validate_payload(&payload)?;
    let body = to_body(&payload)?;
    require_changes(&body)?;
    let row = state
        .postgrest
        .update("zones", "zone_id", id, &body)
        .await
        .map_err(named_duplicate("zone"))?;
    Ok(Json(row))
}

pub async fn delete_zone(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    require_permission(&cookies, &state.sessions, "warehouses:write")?;
    state.postgrest.delete("zones", "zone_id", id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_locations(
    State(state): State<AppState>,
    cookies: Cookies,
    RawQuery(query): RawQuery,
) -> Result<Json<Value>, ApiError> {
    require_permission(&cookies, &state.sessions, "warehouses:read")?;
    Ok(Json(state.postgrest.list("locations", query.as_deref()).await?))
}

pub async fn create_location(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<CreateLocation>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_permission(&cookies, &state.sessions, "warehouses:write")?;
    validate_payload(&payload)?;
    let row = state
        .postgrest
        .create("locations", &to_body(&payload)?)
        .await
        .map_err(named_duplicate("location code"))?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update_location(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateLocation>,
) -> Result<Json<Value>, ApiError> {
    require_permission(&cookies, &state.sessions, "warehouses:write")?;
    validate_payload(&payload)?;
    let body = to_body(&payload)?;
    require_changes(&body)?;
    let row = state
        .postgrest
        .update("locations", "location_id", id, &body)
        .await
        .map_err(named_duplicate("location code"))?;
    Ok(Json(row))
}

pub async fn delete_location(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    require_permission(&cookies, &state.sessions, "warehouses:write")?;
    state.postgrest.delete("locations", "location_id", id).await?;
    Ok(StatusCode::NO_CONTENT)
}
