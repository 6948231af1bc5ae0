//! S3-compatible object store (AWS, R2, MinIO, ...)

use crate::store::{ListPage, ObjectStore, StoreResult, StoredObject};
use async_trait::async_trait;
use aws_config::Region;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::retry::RetryConfig;
use aws_sdk_s3::config::Builder as S3ConfigBuilder;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{Delete, ObjectCannedAcl, ObjectIdentifier};
use aws_sdk_s3::Client;
use bytes::Bytes;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Largest page `list_objects_v2` and `delete_objects` accept.
pub const MAX_KEYS: i32 = 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Config {
    pub bucket: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    pub endpoint_url: Option<String>,
    pub force_path_style: bool,
    pub max_attempts: u32,
    pub public_read: bool,
}

pub struct S3ObjectStore {
    client: Client,
    bucket: String,
    public_read: bool,
}

pub fn create_s3_client(config: &S3Config) -> Client {
    let credentials = Credentials::new(
        &config.access_key_id,
        &config.secret_access_key,
        None,
        None,
        "appdrive",
    );

    let mut builder = S3ConfigBuilder::new()
        .credentials_provider(credentials)
        .region(Region::new(config.region.clone()))
        .retry_config(RetryConfig::standard().with_max_attempts(config.max_attempts.max(1)));

    if let Some(endpoint_url) = config.endpoint_url.as_deref() {
        if !endpoint_url.trim().is_empty() {
            builder = builder.endpoint_url(endpoint_url);
        }
    }

    if config.force_path_style {
        builder = builder.force_path_style(true);
    }

    Client::from_conf(builder.build())
}

impl S3ObjectStore {
    pub fn new(config: &S3Config) -> Self {
        Self {
            client: create_s3_client(config),
            bucket: config.bucket.clone(),
            public_read: config.public_read,
        }
    }

    async fn list(
        &self,
        prefix: &str,
        delimiter: Option<&str>,
        continuation_token: Option<&str>,
    ) -> StoreResult<ListPage> {
        let mut request = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix)
            .max_keys(MAX_KEYS);

        if let Some(d) = delimiter {
            request = request.delimiter(d);
        }
        if let Some(token) = continuation_token {
            request = request.continuation_token(token);
        }

        let response = request.send().await?;

        let contents = response
            .contents()
            .iter()
            .filter_map(|obj| {
                Some(StoredObject {
                    key: obj.key()?.to_string(),
                    size: obj.size().unwrap_or(0),
                })
            })
            .collect();

        let common_prefixes = response
            .common_prefixes()
            .iter()
            .filter_map(|prefix| prefix.prefix().map(|s| s.to_string()))
            .collect();

        Ok(ListPage {
            contents,
            common_prefixes,
            truncated: response.is_truncated().unwrap_or(false),
            continuation_token: response.next_continuation_token().map(|s| s.to_string()),
        })
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn list_grouped(
        &self,
        prefix: &str,
        delimiter: &str,
        continuation_token: Option<&str>,
    ) -> StoreResult<ListPage> {
        self.list(prefix, Some(delimiter), continuation_token).await
    }

    async fn list_flat(
        &self,
        prefix: &str,
        continuation_token: Option<&str>,
    ) -> StoreResult<ListPage> {
        self.list(prefix, None, continuation_token).await
    }

    async fn delete_many(&self, keys: Vec<String>) -> StoreResult<Vec<String>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let objects = keys
            .iter()
            .map(|key| ObjectIdentifier::builder().key(key).build())
            .collect::<Result<Vec<_>, _>>()?;

        let delete = Delete::builder().set_objects(Some(objects)).build()?;

        let response = self
            .client
            .delete_objects()
            .bucket(&self.bucket)
            .delete(delete)
            .send()
            .await?;

        for failure in response.errors() {
            warn!(
                "delete_objects: {} not deleted: {} {}",
                failure.key().unwrap_or_default(),
                failure.code().unwrap_or_default(),
                failure.message().unwrap_or_default()
            );
        }

        let deleted: Vec<String> = response
            .deleted()
            .iter()
            .filter_map(|obj| obj.key().map(|s| s.to_string()))
            .collect();
        debug!("delete_objects: {}/{} confirmed", deleted.len(), keys.len());

        Ok(deleted)
    }

    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> StoreResult<()> {
        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body));

        if let Some(ct) = content_type {
            request = request.content_type(ct);
        }
        if self.public_read {
            request = request.acl(ObjectCannedAcl::PublicRead);
        }

        request.send().await?;
        Ok(())
    }

    async fn delete_one(&self, key: &str) -> StoreResult<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await?;
        Ok(())
    }
}
