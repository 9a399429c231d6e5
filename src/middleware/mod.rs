pub mod auth;

pub use auth::{get_current_user, require_permission, CurrentUser, SESSION_COOKIE};
