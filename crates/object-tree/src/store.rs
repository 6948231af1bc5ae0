//! Object store capability used by the tree operations

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

pub type StoreResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    pub key: String,
    pub size: i64,
}

/// One page of a listing. `common_prefixes` is always empty for flat listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPage {
    pub contents: Vec<StoredObject>,
    pub common_prefixes: Vec<String>,
    pub truncated: bool,
    pub continuation_token: Option<String>,
}

/// A flat bucket addressed by string keys.
///
/// Implementations own the bucket they talk to and apply their own retry
/// policy; an `Err` means retries were exhausted.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List one page under `prefix`, grouping keys on `delimiter`.
    async fn list_grouped(
        &self,
        prefix: &str,
        delimiter: &str,
        continuation_token: Option<&str>,
    ) -> StoreResult<ListPage>;

    /// List one page of every key under `prefix`, without grouping.
    async fn list_flat(&self, prefix: &str, continuation_token: Option<&str>)
        -> StoreResult<ListPage>;

    /// Delete a batch of keys, returning the keys the store confirmed.
    async fn delete_many(&self, keys: Vec<String>) -> StoreResult<Vec<String>>;

    async fn put_object(&self, key: &str, body: Bytes, content_type: Option<&str>)
        -> StoreResult<()>;

    async fn delete_one(&self, key: &str) -> StoreResult<()>;
}
