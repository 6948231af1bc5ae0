use super::{ApiKey, Db, DbResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct App {
    pub id: i64,
    pub name: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppWithKeys {
    #[serde(flatten)]
    pub app: App,
    pub api_keys: Vec<ApiKey>,
}

/// Get SQL for creating the apps table
pub fn get_table_sql() -> &'static str {
    "
    CREATE TABLE IF NOT EXISTS apps (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        created_at INTEGER NOT NULL
    );
    "
}

impl Db {
    /// Create an app. Returns `None` when the name is already taken.
    pub async fn create_app(&self, name: &str) -> DbResult<Option<App>> {
        let conn = self.connection().await;

        let mut rows = conn
            .query("SELECT id FROM apps WHERE name = ?1", turso::params![name])
            .await?;
        if rows.next().await?.is_some() {
            return Ok(None);
        }
        drop(rows);

        let now = chrono::Utc::now().timestamp();
        conn.execute(
            "INSERT INTO apps (name, created_at) VALUES (?1, ?2)",
            turso::params![name, now],
        )
        .await?;
        let id = conn.last_insert_rowid();

        Ok(Some(App {
            id,
            name: name.to_string(),
            created_at: now,
        }))
    }

    pub async fn find_app_by_name(&self, name: &str) -> DbResult<Option<App>> {
        let conn = self.connection().await;
        let mut rows = conn
            .query(
                "SELECT id, name, created_at FROM apps WHERE name = ?1",
                turso::params![name],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(App {
                id: row.get(0)?,
                name: row.get(1)?,
                created_at: row.get(2)?,
            }))
        } else {
            Ok(None)
        }
    }

    /// List all apps ordered by name
    pub async fn list_apps(&self) -> DbResult<Vec<App>> {
        let conn = self.connection().await;
        let mut rows = conn
            .query("SELECT id, name, created_at FROM apps ORDER BY name", ())
            .await?;

        let mut apps = Vec::new();
        while let Some(row) = rows.next().await? {
            apps.push(App {
                id: row.get(0)?,
                name: row.get(1)?,
                created_at: row.get(2)?,
            });
        }
        Ok(apps)
    }

    /// App by name together with its API keys
    pub async fn get_app_with_keys(&self, name: &str) -> DbResult<Option<AppWithKeys>> {
        let Some(app) = self.find_app_by_name(name).await? else {
            return Ok(None);
        };
        let api_keys = self.list_api_keys(app.id).await?;
        Ok(Some(AppWithKeys { app, api_keys }))
    }

    /// Delete app (manually cascades to API keys). Returns false if no such app.
    pub async fn delete_app(&self, name: &str) -> DbResult<bool> {
        let Some(app) = self.find_app_by_name(name).await? else {
            return Ok(false);
        };

        let conn = self.connection().await;
        delete_rows_atomically(
            &conn,
            &[
                "DELETE FROM api_keys WHERE app_id = ?1",
                "DELETE FROM apps WHERE id = ?1",
            ],
            app.id,
        )
        .await?;
        Ok(true)
    }
}

/// Run each statement with `id` bound to `?1` inside one transaction.
async fn delete_rows_atomically(
    conn: &turso::Connection,
    statements: &[&str],
    id: i64,
) -> DbResult<()> {
    conn.execute("BEGIN TRANSACTION", ()).await?;

    for sql in statements {
        if let Err(e) = conn.execute(sql, turso::params![id]).await {
            // Rollback on error
            let _ = conn.execute("ROLLBACK", ()).await;
            return Err(e.into());
        }
    }

    conn.execute("COMMIT", ()).await?;
    Ok(())
}
