use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub type DriveResult<T> = Result<T, DriveError>;

#[derive(Debug, Error)]
pub enum DriveError {
    #[error("tenant not found: {0}")]
    TenantNotFound(String),

    #[error("invalid name: {0:?}")]
    InvalidName(String),

    #[error("key {key:?} does not start with prefix {prefix:?}")]
    MalformedKey { key: String, prefix: String },

    #[error("object store failed during {op} on {target:?}: {source}")]
    StoreUnavailable {
        op: &'static str,
        target: String,
        #[source]
        source: BoxError,
    },
}

impl DriveError {
    pub(crate) fn store(op: &'static str, target: impl Into<String>, source: BoxError) -> Self {
        DriveError::StoreUnavailable {
            op,
            target: target.into(),
            source,
        }
    }
}
