use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tower_cookies::Cookies;

use crate::{
    error::ApiError,
    handlers::{named_duplicate, require_changes, to_body},
    middleware::require_permission,
    models::{
        CreateProduct, CreateProductImage, CreateProductMetadata, UpdateProduct,
        UpdateProductImage, UpdateProductMetadata,
    },
    validate::validate_payload,
    AppState,
};

pub async fn list_products(
    State(state): State<AppState>,
    cookies: Cookies,
    RawQuery(query): RawQuery,
) -> Result<Json<Value>, ApiError> {
    require_permission(&cookies, &state.sessions, "products:read")?;
    Ok(Json(state.postgrest.list("products", query.as_deref()).await?))
}

pub async fn create_product(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<CreateProduct>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_permission(&cookies, &state.sessions, "products:write")?;
    validate_payload(&payload)?;
    let row = state
        .postgrest
        .create("products", &to_body(&payload)?)
        .await
        .map_err(named_duplicate("product SKU"))?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update_product(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateProduct>,
) -> Result<Json<Value>, ApiError> {
    require_permission(&cookies, &state.sessions, "products:write")?;
    validate_payload(&payload)?;
    let body = to_body(&payload)?;
    require_changes(&body)?;
    let row = state
        .postgrest
        .update("products", "product_id", id, &body)
        .await
        .map_err(named_duplicate("product SKU"))?;
    Ok(Json(row))
}

pub async fn delete_product(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    require_permission(&cookies, &state.sessions, "products:write")?;
    state.postgrest.delete("products", "product_id", id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_product_images(
    State(state): State<AppState>,
    cookies: Cookies,
    RawQuery(query): RawQuery,
) -> Result<Json<Value>, ApiError> {
    require_permission(&cookies, &state.sessions, "products:read")?;
    Ok(Json(state.postgrest.list("product_images", query.as_deref()).await?))
}

pub async fn create_product_image(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<CreateProductImage>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_permission(&cookies, &state.sessions, "products:write")?;
    validate_payload(&payload)?;
    // A new primary displaces the old one in the same request.
    if payload.is_primary {
        state
            .postgrest
            .update_where(
                "product_images",
                &[("product_id", format!("eq.{}", payload.product_id))],
                &json!({"is_primary": false}),
            )
            .await?;
    }
    let row = state
        .postgrest
        .create("product_images", &to_body(&payload)?)
        .await?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update_product_image(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateProductImage>,
) -> Result<Json<Value>, ApiError> {
    require_permission(&cookies, &state.sessions, "products:write")?;
    validate_payload(&payload)?;
    let body = to_body(&payload)?;
    require_changes(&body)?;
    let row = state
        .postgrest
        .update("product_images", "image_id", id, &body)
        .await?;
    Ok(Json(row))
}

pub async fn delete_product_image(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    require_permission(&cookies, &state.sessions, "products:write")?;
    state.postgrest.delete("product_images", "image_id", id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Reassign the primary image for a product in one request: clear every
/// image of the product, then mark the chosen one. The client never
/// sequences the two steps itself, so two browser sessions cannot
/// interleave a clear-then-set pair into two primaries.
pub async fn set_primary_image(
    State(state): State<AppState>,
    cookies: Cookies,
    Path((product_id, image_id)): Path<(i64, i64)>,
) -> Result<Json<Value>, ApiError> {
    require_permission(&cookies, &state.sessions, "products:write")?;

    // The image must belong to the product before anything is cleared.
    state
        .postgrest
        .find_one(
            "product_images",
            &[
                ("image_id", format!("eq.{image_id}")),
                ("product_id", format!("eq.{product_id}")),
            ],
        )
        .await?
        .ok_or(ApiError::NotFound)?;

    state
        .postgrest
        .update_where(
            "product_images",
            &[("product_id", format!("eq.{product_id}"))],
            &json!({"is_primary": false}),
        )
        .await?;
    let row = state
        .postgrest
        .update("product_images", "image_id", image_id, &json!({"is_primary": true}))
        .await?;
    Ok(Json(row))
}

pub async fn list_product_metadata(
    State(state): State<AppState>,
    cookies: Cookies,
    RawQuery(query): RawQuery,
) -> Result<Json<Value>, ApiError> {
    require_permission(&cookies, &state.sessions, "products:read")?;
    Ok(Json(state.postgrest.list("product_metadata", query.as_deref()).await?))
}

pub async fn create_product_metadata(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<CreateProductMetadata>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_permission(&cookies, &state.sessions, "products:write")?;
    validate_payload(&payload)?;
    let row = state
        .postgrest
        .create("product_metadata", &to_body(&payload)?)
        .await
        .map_err(named_duplicate("metadata key"))?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update_product_metadata(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateProductMetadata>,
) -> Result<Json<Value>, ApiError> {
    require_permission(&cookies, &state.sessions, "products:write")?;
    validate_payload(&payload)?;
    let body = to_body(&payload)?;
    require_changes(&body)?;
    let row = state
        .postgrest
        .update("product_metadata", "meta_id", id, &body)
        .await
        .map_err(named_duplicate("metadata key"))?;
    Ok(Json(row))
}

pub async fn delete_product_metadata(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    require_permission(&cookies, &state.sessions, "products:write")?;
    state.postgrest.delete("product_metadata", "meta_id", id).await?;
    Ok(StatusCode::NO_CONTENT)
}
