use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_cookies::Cookies;
use uuid::Uuid;

use crate::error::ApiError;
use crate::session::SessionStore;

pub const SESSION_COOKIE: &str = "stockroom_session";

/// The authenticated user attached to a session. Never contains the
/// password hash; permission names are resolved once at login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub role_id: Option<i64>,
    pub permissions: Vec<String>,
}

impl CurrentUser {
    /// Build from a PostgREST user row plus resolved permission names.
    pub fn from_row(row: &Value, permissions: Vec<String>) -> Option<Self> {
        Some(Self {
            user_id: row.get("user_id")?.as_i64()?,
            username: row.get("username")?.as_str()?.to_string(),
            email: row.get("email")?.as_str()?.to_string(),
            role_id: row.get("role_id").and_then(Value::as_i64),
            permissions,
        })
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

/// Resolve the session cookie to its user, recording activity for the idle
/// watchdog. Missing, malformed, or expired sessions all come back `None`.
pub fn get_current_user(cookies: &Cookies, sessions: &SessionStore) -> Option<CurrentUser> {
    let token = cookies.get(SESSION_COOKIE)?;
    let token = Uuid::parse_str(token.value()).ok()?;
    sessions.touch(token)
}

/// Authentication plus permission gate used by every protected handler.
pub fn require_permission(
    cookies: &Cookies,
    sessions: &SessionStore,
    permission: &str,
) -> Result<CurrentUser, ApiError> {
    let user = get_current_user(cookies, sessions).ok_or(ApiError::Unauthorized)?;
    if !user.has_permission(permission) {
        return Err(ApiError::Forbidden);
    }
    Ok(user)
}
