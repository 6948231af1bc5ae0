//! HTTP API
//!
//! - `router`: route table and middleware
//! - `extract`: session and request-app extractors
//! - `handlers`: request handlers per area
//! - `error`: JSON error responses

pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;

use crate::auth::SessionKeys;
use crate::db::Db;
use object_tree::Drive;

pub use error::ApiError;
pub use router::create_router;

/// Shared state handed to every handler.
pub struct AppState {
    pub db: Db,
    pub drive: Drive,
    pub sessions: SessionKeys,
    pub secure_cookies: bool,
}
