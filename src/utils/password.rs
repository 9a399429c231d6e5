use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::ApiError;

/// Salted one-way hash applied to passwords before they are forwarded
/// upstream. Plaintext never leaves this process.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    hash(password, DEFAULT_COST).map_err(|e| ApiError::Internal(format!("bcrypt hash: {e}")))
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    verify(password, password_hash).unwrap_or(false)
}
