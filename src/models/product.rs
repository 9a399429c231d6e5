use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 64, message = "must be 1-64 characters"))]
    pub sku: String,
    #[validate(length(min = 1, max = 160, message = "must be 1-160 characters"))]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 80, message = "must be at most 80 characters"))]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_weight: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 120, message = "must be at most 120 characters"))]
    pub dimensions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 80, message = "must be at most 80 characters"))]
    pub season: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 80, message = "must be at most 80 characters"))]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 80, message = "must be at most 80 characters"))]
    pub collection: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 80, message = "must be at most 80 characters"))]
    pub material: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 80, message = "must be at most 80 characters"))]
    pub style: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, Default)]
pub struct UpdateProduct {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 64, message = "must be 1-64 characters"))]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 160, message = "must be 1-160 characters"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 80, message = "must be at most 80 characters"))]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_weight: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 120, message = "must be at most 120 characters"))]
    pub dimensions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 80, message = "must be at most 80 characters"))]
    pub season: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 80, message = "must be at most 80 characters"))]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 80, message = "must be at most 80 characters"))]
    pub collection: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 80, message = "must be at most 80 characters"))]
    pub material: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 80, message = "must be at most 80 characters"))]
    pub style: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateProductImage {
    #[validate(range(min = 1, message = "must be a valid product id"))]
    pub product_id: i64,
    #[validate(length(min = 1, max = 500, message = "must be 1-500 characters"))]
    pub image_url: String,
    #[serde(default)]
    pub is_primary: bool,
}

#[derive(Debug, Serialize, Deserialize, Validate, Default)]
pub struct UpdateProductImage {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 500, message = "must be 1-500 characters"))]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_primary: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateProductMetadata {
    #[validate(range(min = 1, message = "must be a valid product id"))]
    pub product_id: i64,
    #[validate(length(min = 1, max = 80, message = "must be 1-80 characters"))]
    pub meta_key: String,
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub meta_value: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, Default)]
pub struct UpdateProductMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 80, message = "must be 1-80 characters"))]
    pub meta_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub meta_value: Option<String>,
}
