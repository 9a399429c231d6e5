use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateRole {
    #[validate(length(min = 1, max = 60, message = "must be 1-60 characters"))]
    pub role_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, Default)]
pub struct UpdateRole {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 60, message = "must be 1-60 characters"))]
    pub role_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub description: Option<String>,
}

/// Permission names follow the `area:action` convention the permission
/// checks use, e.g. `inventory:write`.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreatePermission {
    #[validate(length(min = 1, max = 80, message = "must be 1-80 characters"))]
    pub permission_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, Default)]
pub struct UpdatePermission {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 80, message = "must be 1-80 characters"))]
    pub permission_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub description: Option<String>,
}

/// Composite-key join row; delete takes both ids in the path.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct AssignRolePermission {
    #[validate(range(min = 1, message = "must be a valid id"))]
    pub role_id: i64,
    #[validate(range(min = 1, message = "must be a valid id"))]
    pub permission_id: i64,
}
