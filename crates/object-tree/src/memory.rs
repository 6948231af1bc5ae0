//! In-process object store with S3 listing semantics

use crate::store::{ListPage, ObjectStore, StoreResult, StoredObject};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

const DEFAULT_PAGE_SIZE: usize = 1000;

// Continuation tokens name the last emitted entry, tagged by kind so a
// placeholder key is never confused with a common prefix.
const KEY_TOKEN: &str = "k:";
const PREFIX_TOKEN: &str = "p:";

#[derive(Debug, Clone)]
struct MemoryObject {
    body: Bytes,
    content_type: Option<String>,
}

pub struct MemoryStore {
    objects: Mutex<BTreeMap<String, MemoryObject>>,
    page_size: usize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    /// Page size is clamped to at least one entry.
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            objects: Mutex::new(BTreeMap::new()),
            page_size: page_size.max(1),
        }
    }

    pub async fn keys(&self) -> Vec<String> {
        self.objects.lock().await.keys().cloned().collect()
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.objects.lock().await.contains_key(key)
    }

    pub async fn content_type(&self, key: &str) -> Option<String> {
        self.objects
            .lock()
            .await
            .get(key)
            .and_then(|obj| obj.content_type.clone())
    }

    async fn page(
        &self,
        prefix: &str,
        delimiter: Option<&str>,
        continuation_token: Option<&str>,
    ) -> StoreResult<ListPage> {
        let resume = match continuation_token {
            None => None,
            Some(token) => Some(parse_token(token)?),
        };

        let objects = self.objects.lock().await;
        let mut page = ListPage::default();
        let mut emitted = 0usize;
        let mut last_token: Option<String> = None;
        let mut current_group: Option<String> = None;

        for (key, obj) in objects.range(prefix.to_string()..) {
            if !key.starts_with(prefix) {
                break;
            }
            match &resume {
                Some(Resume::AfterKey(last)) if key.as_str() <= last.as_str() => continue,
                Some(Resume::AfterPrefix(group))
                    if key.as_str() <= group.as_str() || key.starts_with(group.as_str()) =>
                {
                    continue
                }
                _ => {}
            }

            let rest = &key[prefix.len()..];
            let group = delimiter.and_then(|d| {
                rest.find(d)
                    .map(|idx| format!("{}{}", prefix, &rest[..idx + d.len()]))
            });

            if let (Some(group), Some(current)) = (&group, &current_group) {
                if group == current {
                    continue;
                }
            }

            if emitted == self.page_size {
                page.truncated = true;
                page.continuation_token = last_token;
                return Ok(page);
            }
            emitted += 1;

            match group {
                Some(group) => {
                    last_token = Some(format!("{}{}", PREFIX_TOKEN, group));
                    page.common_prefixes.push(group.clone());
                    current_group = Some(group);
                }
                None => {
                    last_token = Some(format!("{}{}", KEY_TOKEN, key));
                    page.contents.push(StoredObject {
                        key: key.clone(),
                        size: obj.body.len() as i64,
                    });
                }
            }
        }

        Ok(page)
    }
}

enum Resume {
    AfterKey(String),
    AfterPrefix(String),
}

fn parse_token(token: &str) -> StoreResult<Resume> {
    if let Some(key) = token.strip_prefix(KEY_TOKEN) {
        Ok(Resume::AfterKey(key.to_string()))
    } else if let Some(group) = token.strip_prefix(PREFIX_TOKEN) {
        Ok(Resume::AfterPrefix(group.to_string()))
    } else {
        Err(format!("invalid continuation token: {}", token).into())
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list_grouped(
        &self,
        prefix: &str,
        delimiter: &str,
        continuation_token: Option<&str>,
    ) -> StoreResult<ListPage> {
        self.page(prefix, Some(delimiter), continuation_token).await
    }

    async fn list_flat(
        &self,
        prefix: &str,
        continuation_token: Option<&str>,
    ) -> StoreResult<ListPage> {
        self.page(prefix, None, continuation_token).await
    }

    async fn delete_many(&self, keys: Vec<String>) -> StoreResult<Vec<String>> {
        let mut objects = self.objects.lock().await;
        // S3 reports missing keys as deleted too.
        for key in &keys {
            objects.remove(key);
        }
        Ok(keys)
    }

    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> StoreResult<()> {
        self.objects.lock().await.insert(
            key.to_string(),
            MemoryObject {
                body,
                content_type: content_type.map(str::to_string),
            },
        );
        Ok(())
    }

    async fn delete_one(&self, key: &str) -> StoreResult<()> {
        self.objects.lock().await.remove(key);
        Ok(())
    }
}
