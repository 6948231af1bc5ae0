use std::path::Path;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use turso::{Builder, Connection};

pub(crate) type DbResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub mod api_keys;
pub mod apps;

pub use api_keys::ApiKey;
pub use apps::{App, AppWithKeys};

// ============ Connection and Initialization ============

/// Handle to the metadata database. Access is serialized through one
/// connection.
#[derive(Clone)]
pub struct Db {
    conn: Arc<Mutex<Connection>>,
}

impl Db {
    /// Open (or create) the database file and its tables
    pub async fn open(db_path: &Path) -> DbResult<Self> {
        let path = db_path
            .to_str()
            .ok_or_else(|| format!("Database path is not valid UTF-8: {}", db_path.display()))?;
        Self::open_at(path).await
    }

    pub async fn open_in_memory() -> DbResult<Self> {
        Self::open_at(":memory:").await
    }

    async fn open_at(path: &str) -> DbResult<Self> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        conn.execute_batch(&format!(
            "{}{}",
            apps::get_table_sql(),
            api_keys::get_table_sql()
        ))
        .await?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub(crate) async fn connection(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().await
    }
}
