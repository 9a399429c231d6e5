use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use axum_extra::extract::Multipart;
use serde_json::json;
use tower_cookies::Cookies;
use uuid::Uuid;

use crate::{error::ApiError, middleware::require_permission, AppState};

/// Accept a multipart upload, write it into the images directory under a
/// uniquified sanitized name, and return the path the image is served from.
pub async fn upload_image(
    State(state): State<AppState>,
    cookies: Cookies,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    require_permission(&cookies, &state.sessions, "products:write")?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("file: invalid multipart body ({e})")))?
    {
        let Some(original_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::Validation(format!("file: unreadable upload ({e})")))?;
        if bytes.is_empty() {
            return Err(ApiError::Validation("file: upload is empty".to_string()));
        }

        let stored_name = format!("{}-{}", Uuid::new_v4(), sanitize_filename(&original_name));
        tokio::fs::create_dir_all(&state.config.images_dir)
            .await
            .map_err(|e| ApiError::Internal(format!("create images dir: {e}")))?;
        let target = std::path::Path::new(&state.config.images_dir).join(&stored_name);
        tokio::fs::write(&target, &bytes)
            .await
            .map_err(|e| ApiError::Internal(format!("write upload: {e}")))?;

        log::info!("stored upload {original_name} as {stored_name}");
        return Ok((
            StatusCode::CREATED,
            Json(json!({ "path": format!("/images/{stored_name}") })),
        ));
    }

    Err(ApiError::Validation("file: no file field in upload".to_string()))
}

/// Serve a stored image by name. The single path segment is checked before
/// it ever touches the filesystem; the body goes out with a long-lived
/// cache header since stored names are unique.
pub async fn serve_image(
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if !is_safe_segment(&file) {
        return Err(ApiError::NotFound);
    }
    let path = std::path::Path::new(&state.config.images_dir).join(&file);
    let bytes = tokio::fs::read(&path).await.map_err(|_| ApiError::NotFound)?;
    Ok((
        [
            (header::CONTENT_TYPE, content_type_for(&file)),
            (
                header::CACHE_CONTROL,
                "public, max-age=31536000, immutable",
            ),
        ],
        bytes,
    ))
}

/// One plain filename segment: no separators, no dot-segments, no hidden
/// files.
fn is_safe_segment(file: &str) -> bool {
    !file.is_empty()
        && !file.starts_with('.')
        && !file.contains('/')
        && !file.contains('\\')
        && !file.contains("..")
}

fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}

fn content_type_for(file: &str) -> &'static str {
    match file.rsplit('.').next().map(str::to_ascii_lowercase).as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traversal_segments_are_rejected() {
        assert!(!is_safe_segment("../etc/passwd"));
        assert!(!is_safe_segment("a/../b.png"));
        assert!(!is_safe_segment("dir/photo.png"));
        assert!(!is_safe_segment(".hidden"));
        assert!(!is_safe_segment(""));
        assert!(is_safe_segment("photo-1.png"));
    }

    #[test]
    fn filenames_are_sanitized_and_never_empty() {
        assert_eq!(sanitize_filename("my photo (1).png"), "my_photo__1_.png");
        assert_eq!(sanitize_filename("..sneaky"), "sneaky");
        assert_eq!(sanitize_filename("¡!"), "__");
        assert_eq!(sanitize_filename("..."), "upload");
    }

    #[test]
    fn content_type_follows_extension() {
        assert_eq!(content_type_for("a.PNG"), "image/png");
        assert_eq!(content_type_for("a.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("a.tar.gz"), "application/octet-stream");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }
}
