//! Login, logout and session check

use crate::auth::{SESSION_COOKIE, SESSION_TTL_SECS};
use crate::web::extract::{has_valid_session, JsonBody};
use crate::web::{ApiError, AppState};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use log::{info, warn};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

fn session_cookie(value: String, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .max_age(time::Duration::seconds(max_age_secs))
        .build()
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<(CookieJar, Json<bool>), ApiError> {
    if !state.sessions.password_matches(&req.password) {
        warn!("login: invalid password");
        return Err(ApiError::bad_request("Invalid password"));
    }

    let token = state
        .sessions
        .issue(chrono::Utc::now().timestamp())
        .map_err(|e| ApiError::internal("issue session", e))?;
    info!("login: session issued");
    let jar = jar.add(session_cookie(token, SESSION_TTL_SECS, state.secure_cookies));
    Ok((jar, Json(true)))
}

pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, Json<bool>) {
    let jar = jar.add(session_cookie(String::new(), 0, state.secure_cookies));
    (jar, Json(true))
}

pub async fn check_auth(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Json<bool> {
    Json(has_valid_session(&state, &headers))
}
