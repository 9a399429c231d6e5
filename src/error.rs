use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Error taxonomy for the whole service. Validation failures are caught
/// before anything is forwarded upstream; duplicate-key conflicts from
/// PostgREST keep their own variant so the client can show an "already
/// exists" message instead of a generic failure.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("invalid or missing credentials")]
    Unauthorized,

    #[error("permission denied")]
    Forbidden,

    #[error("not found")]
    NotFound,

    #[error("{0} already exists")]
    Duplicate(String),

    #[error("upstream request failed with status {0}")]
    Upstream(u16),

    #[error("upstream unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Duplicate(_) => StatusCode::CONFLICT,
            // Upstream and transport failures collapse into a generic 500;
            // the real status lives in the log line only.
            ApiError::Upstream(_) | ApiError::Transport(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::Unauthorized => "unauthorized",
            ApiError::Forbidden => "forbidden",
            ApiError::NotFound => "not_found",
            ApiError::Duplicate(_) => "duplicate",
            ApiError::Upstream(_) | ApiError::Transport(_) => "upstream_error",
            ApiError::Internal(_) => "internal_error",
        }
    }

    fn public_message(&self) -> String {
        match self {
            ApiError::Upstream(_) | ApiError::Transport(_) | ApiError::Internal(_) => {
                "request failed".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Upstream(_) | ApiError::Transport(_) | ApiError::Internal(_) => {
                log::error!("{}", self)
            }
            other => log::debug!("{}", other),
        }

        let body = json!({
            "error": self.kind(),
            "message": self.public_message(),
        });
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_maps_to_409() {
        assert_eq!(
            ApiError::Duplicate("product".into()).status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn upstream_failures_stay_generic() {
        let err = ApiError::Upstream(503);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "request failed");
    }

    #[test]
    fn duplicate_message_names_the_entity() {
        let err = ApiError::Duplicate("location code".into());
        assert_eq!(err.public_message(), "location code already exists");
    }
}
