//! App (tenant) and API key management

use crate::db::{ApiKey, App, AppWithKeys};
use crate::web::extract::{JsonBody, PathParams, Session};
use crate::web::{ApiError, AppState};
use axum::extract::State;
use axum::Json;
use log::info;
use object_tree::path::{build_prefix, validate_segment};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct CreateAppRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteAppResult {
    pub name: String,
    pub deleted_objects: usize,
}

pub async fn list_apps(
    _: Session,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<App>>, ApiError> {
    let apps = state
        .db
        .list_apps()
        .await
        .map_err(|e| ApiError::internal("list_apps", e))?;
    Ok(Json(apps))
}

pub async fn create_app(
    _: Session,
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreateAppRequest>,
) -> Result<Json<App>, ApiError> {
    validate_segment(&req.name)?;

    let app = state
        .db
        .create_app(&req.name)
        .await
        .map_err(|e| ApiError::internal("create_app", e))?
        .ok_or_else(|| ApiError::conflict(format!("App already exists: {}", req.name)))?;

    info!("create_app: {}", app.name);
    Ok(Json(app))
}

/// Remove every object under the app's namespace first, then its keys and
/// record. A store failure leaves the app in place so the delete can be
/// retried.
pub async fn delete_app(
    _: Session,
    State(state): State<Arc<AppState>>,
    PathParams(name): PathParams<String>,
) -> Result<Json<DeleteAppResult>, ApiError> {
    let app = find_app(&state, &name).await?;

    let empty: [&str; 0] = [];
    let deleted_objects = state
        .drive
        .delete_tree(&app.name, &build_prefix(&app.name, &empty))
        .await?;

    state
        .db
        .delete_app(&app.name)
        .await
        .map_err(|e| ApiError::internal("delete_app", e))?;

    info!("delete_app: {} ({} objects)", app.name, deleted_objects);
    Ok(Json(DeleteAppResult {
        name: app.name,
        deleted_objects,
    }))
}

pub async fn get_app_keys(
    _: Session,
    State(state): State<Arc<AppState>>,
    PathParams(name): PathParams<String>,
) -> Result<Json<AppWithKeys>, ApiError> {
    state
        .db
        .get_app_with_keys(&name)
        .await
        .map_err(|e| ApiError::internal("get_app_with_keys", e))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("App not found: {}", name)))
}

pub async fn create_api_key(
    _: Session,
    State(state): State<Arc<AppState>>,
    PathParams(name): PathParams<String>,
) -> Result<Json<ApiKey>, ApiError> {
    let key = state
        .db
        .create_api_key(&name)
        .await
        .map_err(|e| ApiError::internal("create_api_key", e))?
        .ok_or_else(|| ApiError::not_found(format!("App not found: {}", name)))?;

    info!("create_api_key: app {} key #{}", name, key.id);
    Ok(Json(key))
}

pub async fn delete_api_key(
    _: Session,
    State(state): State<Arc<AppState>>,
    PathParams((name, id)): PathParams<(String, i64)>,
) -> Result<Json<bool>, ApiError> {
    let deleted = state
        .db
        .delete_api_key(&name, id)
        .await
        .map_err(|e| ApiError::internal("delete_api_key", e))?;

    if !deleted {
        return Err(ApiError::not_found(format!("API key not found: {}", id)));
    }
    info!("delete_api_key: app {} key #{}", name, id);
    Ok(Json(true))
}

/// Look up an app by name, mapping absence to `TenantNotFound`.
pub(crate) async fn find_app(state: &AppState, name: &str) -> Result<App, ApiError> {
    state
        .db
        .find_app_by_name(name)
        .await
        .map_err(|e| ApiError::internal("find_app_by_name", e))?
        .ok_or_else(|| object_tree::DriveError::TenantNotFound(name.to_string()).into())
}
