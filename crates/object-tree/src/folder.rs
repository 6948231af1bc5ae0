//! Empty folder placeholders

use crate::drive::Drive;
use crate::error::{DriveError, DriveResult};
use crate::path::{build_prefix, validate_segment, validate_segments, SEPARATOR};
use bytes::Bytes;
use log::info;

impl Drive {
    /// Write the zero-byte placeholder `<prefix><name>/` so the folder shows
    /// up in listings before anything is uploaded into it.
    ///
    /// Re-creating an existing folder rewrites the same key. A file with the
    /// same name at this level is left alone and both are listed.
    pub async fn create_folder<S: AsRef<str>>(
        &self,
        tenant: &str,
        segments: &[S],
        name: &str,
    ) -> DriveResult<String> {
        validate_segments(segments)?;
        validate_segment(name)?;

        let mut key = build_prefix(tenant, segments);
        key.push_str(name);
        key.push(SEPARATOR);

        self.store
            .put_object(&key, Bytes::new(), None)
            .await
            .map_err(|e| DriveError::store("put_object", key.as_str(), e))?;

        info!("create_folder: {}", key);
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use crate::memory::MemoryStore;
    use crate::{Drive, DriveError};
    use std::sync::Arc;

    #[tokio::test]
    async fn writes_placeholder_under_parent() {
        let store = Arc::new(MemoryStore::new());
        let drive = Drive::new(store.clone(), "h");

        let key = drive.create_folder("acme", &["docs"], "2024").await.unwrap();
        assert_eq!(key, "acme/docs/2024/");
        assert!(store.contains("acme/docs/2024/").await);
    }

    #[tokio::test]
    async fn creating_twice_lists_once() {
        let drive = Drive::new(Arc::new(MemoryStore::new()), "h");
        let root: [&str; 0] = [];

        drive.create_folder("acme", &root, "docs").await.unwrap();
        drive.create_folder("acme", &root, "docs").await.unwrap();

        let children = drive.list_children("acme", &root).await.unwrap();
        assert_eq!(children.folders, vec!["docs"]);
    }

    #[tokio::test]
    async fn rejects_names_with_separators() {
        let drive = Drive::new(Arc::new(MemoryStore::new()), "h");
        let root: [&str; 0] = [];
        for bad in ["", "a/b", ".."] {
            let err = drive.create_folder("acme", &root, bad).await.unwrap_err();
            assert!(matches!(err, DriveError::InvalidName(_)));
        }
    }
}
