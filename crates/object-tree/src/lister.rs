//! Single-level folder listing

use crate::drive::{Children, Drive, FileEntry};
use crate::error::{DriveError, DriveResult};
use crate::path::{build_prefix, relative_name, validate_segments, SEPARATOR};
use log::debug;

const DELIMITER: &str = "/";

impl Drive {
    /// List the folders and files directly under `segments`.
    ///
    /// Drives the grouped listing through every page. The folder's own
    /// placeholder object is never reported as a file.
    pub async fn list_children<S: AsRef<str>>(
        &self,
        tenant: &str,
        segments: &[S],
    ) -> DriveResult<Children> {
        validate_segments(segments)?;
        let prefix = build_prefix(tenant, segments);

        let mut folders: Vec<String> = Vec::new();
        let mut files: Vec<FileEntry> = Vec::new();
        let mut continuation_token: Option<String> = None;
        let mut page_count = 0;

        loop {
            let page = self
                .store
                .list_grouped(&prefix, DELIMITER, continuation_token.as_deref())
                .await
                .map_err(|e| DriveError::store("list_grouped", prefix.as_str(), e))?;
            page_count += 1;

            for common in &page.common_prefixes {
                let name = relative_name(common, &prefix)?.trim_end_matches(SEPARATOR);
                if name.is_empty() {
                    continue;
                }
                if !folders.iter().any(|f| f == name) {
                    folders.push(name.to_string());
                }
            }

            for obj in &page.contents {
                let name = relative_name(&obj.key, &prefix)?;
                if name.is_empty() {
                    continue;
                }
                files.push(FileEntry {
                    name: name.to_string(),
                    link: self.public_link(&obj.key),
                });
            }

            if !page.truncated {
                break;
            }
            match page.continuation_token {
                Some(token) => continuation_token = Some(token),
                None => {
                    return Err(DriveError::store(
                        "list_grouped",
                        prefix.as_str(),
                        "truncated listing without continuation token".into(),
                    ))
                }
            }
        }

        folders.sort();
        files.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(
            "list_children: {} -> {} folders, {} files in {} pages",
            prefix,
            folders.len(),
            files.len(),
            page_count
        );

        Ok(Children { folders, files })
    }
}
