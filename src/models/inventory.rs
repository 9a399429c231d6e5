use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// `(product_id, location_id, lot_number)` is unique upstream; duplicates
/// surface as a 409.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateInventory {
    #[validate(range(min = 1, message = "must be a valid product id"))]
    pub product_id: i64,
    #[validate(range(min = 1, message = "must be a valid location id"))]
    pub location_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 80, message = "must be 1-80 characters"))]
    pub lot_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "crate::validate::not_past_date")]
    pub expiration_date: Option<NaiveDate>,
    #[serde(default)]
    #[validate(range(min = 0, message = "must not be negative"))]
    pub quantity_on_hand: i64,
}

#[derive(Debug, Serialize, Deserialize, Validate, Default)]
pub struct UpdateInventory {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, message = "must be a valid location id"))]
    pub location_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 80, message = "must be 1-80 characters"))]
    pub lot_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "crate::validate::not_past_date")]
    pub expiration_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, message = "must not be negative"))]
    pub quantity_on_hand: Option<i64>,
}

/// Audit row only: creating a transaction does not touch
/// `quantity_on_hand` on the inventory record. The handler resolves
/// `transaction_type` against the lookup table before forwarding.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateTransaction {
    #[validate(range(min = 1, message = "must be a valid inventory id"))]
    pub inventory_id: i64,
    #[validate(length(min = 1, max = 60, message = "must be 1-60 characters"))]
    pub transaction_type: String,
    #[validate(custom = "crate::validate::nonzero_change")]
    pub quantity_change: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 120, message = "must be at most 120 characters"))]
    pub reference_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, Default)]
pub struct UpdateTransaction {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 60, message = "must be 1-60 characters"))]
    pub transaction_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "crate::validate::nonzero_change")]
    pub quantity_change: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 120, message = "must be at most 120 characters"))]
    pub reference_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateTransactionType {
    #[validate(length(min = 1, max = 60, message = "must be 1-60 characters"))]
    pub name: String,
}
