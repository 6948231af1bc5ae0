use super::{App, Db, DbResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKey {
    pub id: i64,
    pub key: String,
    pub app_id: i64,
    pub created_at: i64,
}

/// Get SQL for creating the api_keys table
pub fn get_table_sql() -> &'static str {
    "
    CREATE TABLE IF NOT EXISTS api_keys (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        key TEXT NOT NULL UNIQUE,
        app_id INTEGER NOT NULL REFERENCES apps(id),
        created_at INTEGER NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_api_keys_app ON api_keys(app_id);
    "
}

impl Db {
    /// Issue a new key for the named app. Returns `None` if the app does not exist.
    pub async fn create_api_key(&self, app_name: &str) -> DbResult<Option<ApiKey>> {
        let Some(app) = self.find_app_by_name(app_name).await? else {
            return Ok(None);
        };

        let conn = self.connection().await;
        let key = uuid::Uuid::new_v4().simple().to_string();
        let now = chrono::Utc::now().timestamp();
        conn.execute(
            "INSERT INTO api_keys (key, app_id, created_at) VALUES (?1, ?2, ?3)",
            turso::params![key.as_str(), app.id, now],
        )
        .await?;
        let id = conn.last_insert_rowid();

        Ok(Some(ApiKey {
            id,
            key,
            app_id: app.id,
            created_at: now,
        }))
    }

    pub async fn list_api_keys(&self, app_id: i64) -> DbResult<Vec<ApiKey>> {
        let conn = self.connection().await;
        let mut rows = conn
            .query(
                "SELECT id, key, app_id, created_at FROM api_keys WHERE app_id = ?1 ORDER BY id",
                turso::params![app_id],
            )
            .await?;

        let mut keys = Vec::new();
        while let Some(row) = rows.next().await? {
            keys.push(ApiKey {
                id: row.get(0)?,
                key: row.get(1)?,
                app_id: row.get(2)?,
                created_at: row.get(3)?,
            });
        }
        Ok(keys)
    }

    /// Resolve the app an API key belongs to
    pub async fn find_app_by_api_key(&self, key: &str) -> DbResult<Option<App>> {
        let conn = self.connection().await;
        let mut rows = conn
            .query(
                "SELECT apps.id, apps.name, apps.created_at
                 FROM api_keys JOIN apps ON apps.id = api_keys.app_id
                 WHERE api_keys.key = ?1",
                turso::params![key],
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

    /// Delete key `id` if it belongs to `app_name`. Returns false otherwise.
    pub async fn delete_api_key(&self, app_name: &str, id: i64) -> DbResult<bool> {
        let conn = self.connection().await;
        let mut rows = conn
            .query(
                "SELECT apps.name FROM api_keys JOIN apps ON apps.id = api_keys.app_id
                 WHERE api_keys.id = ?1",
                turso::params![id],
            )
            .await?;

        let owner: Option<String> = match rows.next().await? {
            Some(row) => Some(row.get(0)?),
            None => None,
        };
        drop(rows);

        if owner.as_deref() != Some(app_name) {
            return Ok(false);
        }

        conn.execute("DELETE FROM api_keys WHERE id = ?1", turso::params![id])
            .await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use crate::db::Db;

    #[tokio::test]
    async fn keys_resolve_to_their_app() {
        let db = Db::open_in_memory().await.unwrap();
        let app = db.create_app("acme").await.unwrap().unwrap();

        let key = db.create_api_key("acme").await.unwrap().unwrap();
        assert_eq!(key.key.len(), 32);
        assert_eq!(key.app_id, app.id);

        let found = db.find_app_by_api_key(&key.key).await.unwrap().unwrap();
        assert_eq!(found.name, "acme");
        assert!(db.find_app_by_api_key("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn keys_for_unknown_apps_are_not_created() {
        let db = Db::open_in_memory().await.unwrap();
        assert!(db.create_api_key("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn deleting_checks_key_ownership() {
        let db = Db::open_in_memory().await.unwrap();
        db.create_app("acme").await.unwrap();
        db.create_app("other").await.unwrap();
        let key = db.create_api_key("acme").await.unwrap().unwrap();

        assert!(!db.delete_api_key("other", key.id).await.unwrap());
        assert!(db.delete_api_key("acme", key.id).await.unwrap());
        assert!(!db.delete_api_key("acme", key.id).await.unwrap());
    }
}
