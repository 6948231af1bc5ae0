//! Tenant-scoped view of an object store

use crate::error::{DriveError, DriveResult};
use crate::path::{build_prefix, validate_segment, validate_segments};
use crate::store::ObjectStore;
use bytes::Bytes;
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub link: String,
}

/// Immediate children of one folder. Folder names carry no trailing separator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Children {
    pub folders: Vec<String>,
    pub files: Vec<FileEntry>,
}

#[derive(Clone)]
pub struct Drive {
    pub(crate) store: Arc<dyn ObjectStore>,
    public_host: String,
}

impl Drive {
    pub fn new(store: Arc<dyn ObjectStore>, public_host: impl Into<String>) -> Self {
        Self {
            store,
            public_host: public_host.into(),
        }
    }

    /// Public URL of an object, `https://<public-host>/<key>`.
    pub fn public_link(&self, key: &str) -> String {
        format!("https://{}/{}", self.public_host, key)
    }

    /// Upload a file named `name` under `segments`, returning its key.
    pub async fn put_one<S: AsRef<str>>(
        &self,
        tenant: &str,
        segments: &[S],
        name: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> DriveResult<String> {
        validate_segments(segments)?;
        validate_segment(name)?;
        let key = format!("{}{}", build_prefix(tenant, segments), name);
        let size = body.len();

        self.store
            .put_object(&key, body, content_type)
            .await
            .map_err(|e| DriveError::store("put_object", key.as_str(), e))?;

        info!("put_one: {} ({} bytes)", key, size);
        Ok(key)
    }

    /// Delete the single file `name` under `segments`.
    pub async fn delete_one<S: AsRef<str>>(
        &self,
        tenant: &str,
        segments: &[S],
        name: &str,
    ) -> DriveResult<String> {
        validate_segments(segments)?;
        validate_segment(name)?;
        let key = format!("{}{}", build_prefix(tenant, segments), name);

        self.store
            .delete_one(&key)
            .await
            .map_err(|e| DriveError::store("delete_object", key.as_str(), e))?;

        info!("delete_one: {}", key);
        Ok(key)
    }
}
