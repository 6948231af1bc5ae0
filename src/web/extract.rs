//! Request extractors for the session gate

use super::{ApiError, AppState};
use crate::auth::SESSION_COOKIE;
use crate::db::App;
use axum::async_trait;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// `Json` whose rejections use the API error body.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid JSON: {}", e.body_text())))?;
        Ok(JsonBody(value))
    }
}

/// `Path` whose rejections use the API error body.
pub struct PathParams<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for PathParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e: PathRejection| {
                ApiError::bad_request(format!("Invalid path: {}", e.body_text()))
            })?;
        Ok(PathParams(value))
    }
}

/// `Query` whose rejections use the API error body.
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e: QueryRejection| {
                ApiError::bad_request(format!("Invalid query: {}", e.body_text()))
            })?;
        Ok(QueryParams(value))
    }
}

/// Proof that the request carries a valid session cookie.
#[derive(Debug, Clone, Copy)]
pub struct Session;

pub(crate) fn has_valid_session(state: &AppState, headers: &HeaderMap) -> bool {
    let jar = CookieJar::from_headers(headers);
    jar.get(SESSION_COOKIE)
        .map(|cookie| state.sessions.verify(cookie.value()))
        .unwrap_or(false)
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if has_valid_session(state, &parts.headers) {
            Ok(Session)
        } else {
            Err(ApiError::unauthorized("Missing or expired session"))
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Resolve the app an upload targets.
///
/// A session-authenticated caller names the app explicitly; otherwise the
/// bearer API key decides. A present but invalid session cookie is not
/// retried against the API key.
pub(crate) async fn resolve_request_app(
    state: &AppState,
    headers: &HeaderMap,
    app_name: Option<&str>,
) -> Result<Option<App>, ApiError> {
    let jar = CookieJar::from_headers(headers);
    if jar.get(SESSION_COOKIE).is_some() {
        if !has_valid_session(state, headers) {
            return Ok(None);
        }
        let Some(name) = app_name else {
            return Ok(None);
        };
        return state
            .db
            .find_app_by_name(name)
            .await
            .map_err(|e| ApiError::internal("find_app_by_name", e));
    }

    let Some(key) = bearer_token(headers) else {
        return Ok(None);
    };
    state
        .db
        .find_app_by_api_key(key)
        .await
        .map_err(|e| ApiError::internal("find_app_by_api_key", e))
}
