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
        CreateInventory, CreateTransaction, CreateTransactionType, UpdateInventory,
        UpdateTransaction,
    },
    validate::validate_payload,
    AppState,
};

pub async fn list_inventory(
    State(state): State<AppState>,
    cookies: Cookies,
    RawQuery(query): RawQuery,
) -> Result<Json<Value>, ApiError> {
    require_permission(&cookies, &state.sessions, "inventory:read")?;
    Ok(Json(state.postgrest.list("inventory", query.as_deref()).await?))
}

pub async fn create_inventory(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<CreateInventory>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_permission(&cookies, &state.sessions, "inventory:write")?;
    validate_payload(&payload)?;
    let row = state
        .postgrest
        .create("inventory", &to_body(&payload)?)
        .await
        .map_err(named_duplicate("inventory record for this product, location and lot"))?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update_inventory(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateInventory>,
) -> Result<Json<Value>, ApiError> {
    require_permission(&cookies, &state.sessions, "inventory:write")?;
    validate_payload(&payload)?;
    let body = to_body(&payload)?;
    require_changes(&body)?;
    let row = state
        .postgrest
        .update("inventory", "inventory_id", id, &body)
        .await
        .map_err(named_duplicate("inventory record for this product, location and lot"))?;
    Ok(Json(row))
}

pub async fn delete_inventory(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    require_permission(&cookies, &state.sessions, "inventory:write")?;
    state.postgrest.delete("inventory", "inventory_id", id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_transactions(
    State(state): State<AppState>,
    cookies: Cookies,
    RawQuery(query): RawQuery,
) -> Result<Json<Value>, ApiError> {
    require_permission(&cookies, &state.sessions, "inventory:read")?;
    Ok(Json(
        state
            .postgrest
            .list("inventory_transactions", query.as_deref())
            .await?,
    ))
}

/// Create an audit transaction. The referenced inventory row must exist and
/// `transaction_type` must match a row in the lookup table; beyond that the
/// transaction is standalone and `quantity_on_hand` is NOT adjusted here —
/// the two are maintained by separate screens, so the gap is logged instead
/// of hidden.
pub async fn create_transaction(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<CreateTransaction>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_permission(&cookies, &state.sessions, "inventory:write")?;
    validate_payload(&payload)?;

    state
        .postgrest
        .find_one(
            "inventory",
            &[("inventory_id", format!("eq.{}", payload.inventory_id))],
        )
        .await?
        .ok_or_else(|| {
            ApiError::Validation(format!("inventory_id: no inventory record {}", payload.inventory_id))
        })?;

    state
        .postgrest
        .find_one(
            "transaction_types",
            &[("name", format!("eq.{}", payload.transaction_type))],
        )
        .await?
        .ok_or_else(|| {
            ApiError::Validation(format!(
                "transaction_type: unknown type {:?}",
                payload.transaction_type
            ))
        })?;

    let row = state
        .postgrest
        .create("inventory_transactions", &to_body(&payload)?)
        .await?;
    log::warn!(
        "transaction recorded for inventory {} (change {}); quantity_on_hand is not reconciled here",
        payload.inventory_id,
        payload.quantity_change
    );
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update_transaction(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateTransaction>,
) -> Result<Json<Value>, ApiError> {
    require_permission(&cookies, &state.sessions, "inventory:write")?;
    validate_payload(&payload)?;
    if let Some(name) = &payload.transaction_type {
        state
            .postgrest
            .find_one("transaction_types", &[("name", format!("eq.{name}"))])
            .await?
            .ok_or_else(|| {
                ApiError::Validation(format!("transaction_type: unknown type {name:?}"))
            })?;
    }
    let body = to_body(&payload)?;
    require_changes(&body)?;
    let row = state
        .postgrest
        .update("inventory_transactions", "transaction_id", id, &body)
        .await?;
    Ok(Json(row))
}

pub async fn delete_transaction(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    require_permission(&cookies, &state.sessions, "inventory:write")?;
    state
        .postgrest
        .delete("inventory_transactions", "transaction_id", id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_transaction_types(
    State(state): State<AppState>,
    cookies: Cookies,
    RawQuery(query): RawQuery,
) -> Result<Json<Value>, ApiError> {
    require_permission(&cookies, &state.sessions, "inventory:read")?;
    Ok(Json(state.postgrest.list("transaction_types", query.as_deref()).await?))
}

pub async fn create_transaction_type(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<CreateTransactionType>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_permission(&cookies, &state.sessions, "inventory:write")?;
    validate_payload(&payload)?;
    let row = state
        .postgrest
        .create("transaction_types", &to_body(&payload)?)
        .await
        .map_err(named_duplicate("transaction type"))?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn delete_transaction_type(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    require_permission(&cookies, &state.sessions, "inventory:write")?;
    state
        .postgrest
        .delete("transaction_types", "transactiontype_id", id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
