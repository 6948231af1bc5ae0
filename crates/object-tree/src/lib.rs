//! Folder and file tree on top of a flat object store
//!
//! This crate is organized into modules:
//! - `path`: key prefix construction and validation
//! - `store`: the object store capability and its listing types
//! - `drive`: tenant-scoped facade; `lister`, `deleter` and `folder` extend it
//! - `s3`: S3-compatible store backed by the AWS SDK
//! - `memory`: in-process store with S3 listing semantics

mod deleter;
mod drive;
mod error;
mod folder;
mod lister;
pub mod memory;
pub mod path;
pub mod s3;
mod store;

pub use drive::{Children, Drive, FileEntry};
pub use error::{BoxError, DriveError, DriveResult};
pub use memory::MemoryStore;
pub use s3::{S3Config, S3ObjectStore};
pub use store::{ListPage, ObjectStore, StoreResult, StoredObject};
