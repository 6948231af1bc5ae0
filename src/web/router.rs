//! Router configuration for the HTTP API

use super::handlers::{apps, auth, drive, upload};
use super::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

// Room for multipart framing around the largest accepted file.
const UPLOAD_BODY_LIMIT: usize = upload::MAX_UPLOAD_BYTES + 64 * 1024;

pub fn create_router(state: Arc<AppState>) -> Router {
    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/check-auth", get(auth::check_auth));

    let app_routes = Router::new()
        .route("/apps", get(apps::list_apps).post(apps::create_app))
        .route("/apps/:name", delete(apps::delete_app))
        .route(
            "/apps/:name/keys",
            get(apps::get_app_keys).post(apps::create_api_key),
        )
        .route("/apps/:name/keys/:id", delete(apps::delete_api_key))
        .route(
            "/apps/:name/files",
            get(drive::list_files).delete(drive::delete_file),
        )
        .route(
            "/apps/:name/folders",
            post(drive::create_folder).delete(drive::delete_folder),
        );

    let upload_routes = Router::new()
        .route("/upload", post(upload::upload))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT));

    Router::new()
        .nest(
            "/api",
            auth_routes.merge(app_routes).merge(upload_routes),
        )
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
