use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateMenu {
    #[validate(length(min = 1, max = 80, message = "must be 1-80 characters"))]
    pub menu_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub menu_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_menu_id: Option<i64>,
    #[serde(default)]
    #[validate(range(min = 0, message = "must not be negative"))]
    pub order_index: i32,
}

#[derive(Debug, Serialize, Deserialize, Validate, Default)]
pub struct UpdateMenu {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 80, message = "must be 1-80 characters"))]
    pub menu_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub menu_url: Option<String>,
    // Double option: absent means "leave alone", `null` means "make root".
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_menu_id: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, message = "must not be negative"))]
    pub order_index: Option<i32>,
}

fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<i64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::deserialize(deserializer).map(Some)
}

/// Minimal projection of a menu row used for cycle detection.
#[derive(Debug, Clone, Copy)]
pub struct MenuNode {
    pub menu_id: i64,
    pub parent_menu_id: Option<i64>,
}

impl MenuNode {
    pub fn from_row(row: &Value) -> Option<Self> {
        Some(Self {
            menu_id: row.get("menu_id")?.as_i64()?,
            parent_menu_id: row.get("parent_menu_id").and_then(Value::as_i64),
        })
    }
}
