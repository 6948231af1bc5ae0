use log::{error, info};
use object_tree::{Drive, MemoryStore, ObjectStore, S3ObjectStore};
use std::sync::Arc;

pub mod auth;
pub mod config;
pub mod db;
pub mod logging;
pub mod web;

pub use config::Config;

pub type AppResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Build the shared handler state from a validated configuration.
pub async fn build_state(config: &Config) -> AppResult<Arc<web::AppState>> {
    let db = db::Db::open(&config.database_path).await?;

    let store: Arc<dyn ObjectStore> = if config.memory_store {
        info!("using in-memory object store; objects are lost on exit");
        Arc::new(MemoryStore::new())
    } else {
        info!("using S3 bucket {}", config.s3_bucket);
        Arc::new(S3ObjectStore::new(&config.s3()))
    };

    Ok(Arc::new(web::AppState {
        db,
        drive: Drive::new(store, config.public_host.clone()),
        sessions: auth::SessionKeys::new(&config.session_secret, &config.app_password),
        secure_cookies: config.secure_cookies,
    }))
}

pub async fn run(config: Config) -> AppResult<()> {
    config.validate()?;
    let state = build_state(&config).await?;
    let router = web::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!("listening on {}", config.listen_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {}", e);
    }
    info!("shutting down");
}
