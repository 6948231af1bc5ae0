//! Multipart upload for sessions and API keys

use crate::web::extract::resolve_request_app;
use crate::web::{ApiError, AppState};
use axum::extract::{Multipart, State};
use axum::http::HeaderMap;
use axum::Json;
use bytes::Bytes;
use log::info;
use object_tree::path::split_path;
use serde::Serialize;
use std::sync::Arc;

pub const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

#[derive(Debug, Serialize)]
pub struct UploadResult {
    pub key: String,
    pub link: String,
}

struct UploadedFile {
    filename: String,
    content_type: Option<String>,
    body: Bytes,
}

fn check_file_size(len: usize) -> Result<(), ApiError> {
    if len > MAX_UPLOAD_BYTES {
        return Err(ApiError::bad_request(format!(
            "File too large: {} bytes (limit {})",
            len, MAX_UPLOAD_BYTES
        )));
    }
    Ok(())
}

/// Fields: `file` (required), `path` (required, may be empty, e.g. `docs/`)
/// and `appName` (only read for session-authenticated callers).
pub async fn upload(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<UploadResult>, ApiError> {
    let mut file: Option<UploadedFile> = None;
    let mut path: Option<String> = None;
    let mut app_name: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| ApiError::bad_request("File field has no filename"))?;
                let content_type = field.content_type().map(str::to_string);
                let body = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read file: {}", e)))?;
                check_file_size(body.len())?;
                file = Some(UploadedFile {
                    filename,
                    content_type,
                    body,
                });
            }
            Some("path") => {
                path = Some(field.text().await.map_err(|e| {
                    ApiError::bad_request(format!("Failed to read path: {}", e))
                })?);
            }
            Some("appName") => {
                app_name = Some(field.text().await.map_err(|e| {
                    ApiError::bad_request(format!("Failed to read appName: {}", e))
                })?);
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| ApiError::bad_request("No file"))?;
    let path = path.ok_or_else(|| ApiError::bad_request("Invalid paths"))?;

    let app = resolve_request_app(&state, &headers, app_name.as_deref())
        .await?
        .ok_or_else(|| ApiError::forbidden("Invalid app"))?;

    let segments = split_path(&path)?;
    let key = state
        .drive
        .put_one(
            &app.name,
            &segments,
            &file.filename,
            file.body,
            file.content_type.as_deref(),
        )
        .await?;

    info!("upload: {} for app {}", key, app.name);
    let link = state.drive.public_link(&key);
    Ok(Json(UploadResult { key, link }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::error::ErrorCode;

    #[test]
    fn file_size_limit_applies_to_the_file_itself() {
        assert!(check_file_size(0).is_ok());
        assert!(check_file_size(MAX_UPLOAD_BYTES).is_ok());

        let err = check_file_size(MAX_UPLOAD_BYTES + 1).unwrap_err();
        assert_eq!(err.code(), ErrorCode::BadRequest);
    }
}
