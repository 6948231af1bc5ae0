//! Folder browsing and mutation for one app

use super::apps::find_app;
use crate::web::extract::{JsonBody, PathParams, QueryParams, Session};
use crate::web::{ApiError, AppState};
use axum::extract::State;
use axum::Json;
use object_tree::path::{build_prefix, split_path};
use object_tree::Children;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct PathQuery {
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct FileQuery {
    #[serde(default)]
    pub path: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateFolderRequest {
    #[serde(default)]
    pub path: Vec<String>,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CreateFolderResult {
    pub key: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteFolderResult {
    pub key: String,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct DeleteFileResult {
    pub key: String,
}

pub async fn list_files(
    _: Session,
    State(state): State<Arc<AppState>>,
    PathParams(name): PathParams<String>,
    QueryParams(query): QueryParams<PathQuery>,
) -> Result<Json<Children>, ApiError> {
    let app = find_app(&state, &name).await?;
    let segments = split_path(&query.path)?;
    let children = state.drive.list_children(&app.name, &segments).await?;
    Ok(Json(children))
}

pub async fn create_folder(
    _: Session,
    State(state): State<Arc<AppState>>,
    PathParams(name): PathParams<String>,
    JsonBody(req): JsonBody<CreateFolderRequest>,
) -> Result<Json<CreateFolderResult>, ApiError> {
    let app = find_app(&state, &name).await?;
    let key = state
        .drive
        .create_folder(&app.name, &req.path, &req.name)
        .await?;
    Ok(Json(CreateFolderResult { key }))
}

/// Delete a folder and everything below it. The app root cannot be
/// deleted here; deleting the app does that.
pub async fn delete_folder(
    _: Session,
    State(state): State<Arc<AppState>>,
    PathParams(name): PathParams<String>,
    QueryParams(query): QueryParams<PathQuery>,
) -> Result<Json<DeleteFolderResult>, ApiError> {
    let app = find_app(&state, &name).await?;
    let segments = split_path(&query.path)?;
    if segments.is_empty() {
        return Err(ApiError::bad_request("Refusing to delete the app root"));
    }

    let key = build_prefix(&app.name, &segments);
    let count = state.drive.delete_tree(&app.name, &key).await?;
    Ok(Json(DeleteFolderResult { key, count }))
}

pub async fn delete_file(
    _: Session,
    State(state): State<Arc<AppState>>,
    PathParams(name): PathParams<String>,
    QueryParams(query): QueryParams<FileQuery>,
) -> Result<Json<DeleteFileResult>, ApiError> {
    let app = find_app(&state, &name).await?;
    let segments = split_path(&query.path)?;
    let key = state
        .drive
        .delete_one(&app.name, &segments, &query.name)
        .await?;
    Ok(Json(DeleteFileResult { key }))
}
