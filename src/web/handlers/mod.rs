pub mod apps;
pub mod auth;
pub mod drive;
pub mod upload;
