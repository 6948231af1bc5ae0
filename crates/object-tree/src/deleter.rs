//! Recursive folder deletion

use crate::drive::Drive;
use crate::error::{DriveError, DriveResult};
use crate::path::is_folder_key;
use log::{debug, info};

impl Drive {
    /// Delete every object whose key starts with `directory_key` and return
    /// how many the store confirmed.
    ///
    /// The sweep is not atomic: a failure part way through leaves the pages
    /// already deleted gone, and the error carries no partial count. Running
    /// it again removes whatever remains.
    pub async fn delete_tree(&self, tenant: &str, directory_key: &str) -> DriveResult<usize> {
        if !is_folder_key(directory_key) {
            return Err(DriveError::InvalidName(directory_key.to_string()));
        }
        let tenant_root = format!("{}/", tenant);
        if !directory_key.starts_with(&tenant_root) {
            return Err(DriveError::MalformedKey {
                key: directory_key.to_string(),
                prefix: tenant_root,
            });
        }

        let mut count = 0usize;
        let mut continuation_token: Option<String> = None;

        loop {
            let page = self
                .store
                .list_flat(directory_key, continuation_token.as_deref())
                .await
                .map_err(|e| DriveError::store("list_flat", directory_key, e))?;

            if !page.contents.is_empty() {
                let keys: Vec<String> = page.contents.into_iter().map(|obj| obj.key).collect();
                let requested = keys.len();
                let deleted = self
                    .store
                    .delete_many(keys)
                    .await
                    .map_err(|e| DriveError::store("delete_many", directory_key, e))?;
                debug!(
                    "delete_tree: {} batch {}/{} confirmed",
                    directory_key,
                    deleted.len(),
                    requested
                );
                count += deleted.len();
            }

            if !page.truncated {
                break;
            }
            match page.continuation_token {
                Some(token) => continuation_token = Some(token),
                None => {
                    return Err(DriveError::store(
                        "list_flat",
                        directory_key,
                        "truncated listing without continuation token".into(),
                    ))
                }
            }
        }

        info!("delete_tree: {} removed {} objects", directory_key, count);
        Ok(count)
    }
}
