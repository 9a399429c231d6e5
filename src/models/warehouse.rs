use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateWarehouse {
    #[validate(length(min = 1, max = 120, message = "must be 1-120 characters"))]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 40, message = "must be at most 40 characters"))]
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, Default)]
pub struct UpdateWarehouse {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 120, message = "must be 1-120 characters"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 40, message = "must be at most 40 characters"))]
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateZone {
    #[validate(range(min = 1, message = "must be a valid warehouse id"))]
    pub warehouse_id: i64,
    #[validate(length(min = 1, max = 80, message = "must be 1-80 characters"))]
    pub zone_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, Default)]
pub struct UpdateZone {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, message = "must be a valid warehouse id"))]
    pub warehouse_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 80, message = "must be 1-80 characters"))]
    pub zone_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub description: Option<String>,
}

/// `(zone_id, location_code)` is unique upstream; a duplicate create comes
/// back as a 409 and is surfaced as "location code already exists".
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateLocation {
    #[validate(range(min = 1, message = "must be a valid zone id"))]
    pub zone_id: i64,
    #[validate(length(min = 1, max = 40, message = "must be 1-40 characters"))]
    pub location_code: String,
    #[serde(default)]
    #[validate(range(min = 0, message = "must not be negative"))]
    pub capacity: i32,
}

#[derive(Debug, Serialize, Deserialize, Validate, Default)]
pub struct UpdateLocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, message = "must be a valid zone id"))]
    pub zone_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 40, message = "must be 1-40 characters"))]
    pub location_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, message = "must not be negative"))]
    pub capacity: Option<i32>,
}
