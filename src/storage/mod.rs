//! Object storage layer.
//!
//! The resolution engine talks to storage exclusively through the
//! [`ObjectStore`] trait. Backends report failures as a closed set of
//! [`StorageError`] variants so the engine can branch on the kind of failure
//! without knowing anything about S3 error codes.
//!
//! - [`S3ObjectStore`]: S3 or S3-compatible storage (MinIO, etc.)
//! - [`InMemoryStore`]: process-local store for tests and for embedding the
//!   engine in another program

mod memory;
mod s3;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StorageError;
use crate::keys::StorageKey;

pub use memory::{InMemoryStore, StoreStats};
pub use s3::{create_s3_client, S3ObjectStore};

/// An object downloaded from storage together with its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub data: Bytes,
    pub content_type: String,
}

impl StoredObject {
    pub fn new(data: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            content_type: content_type.into(),
        }
    }
}

/// Trait for the object store holding originals and resized variants.
///
/// Implementations must be thread-safe; a single instance is shared by all
/// in-flight requests.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Public URL clients are redirected to. Pure, performs no I/O.
    fn object_url(&self, key: &StorageKey) -> String;

    /// Check whether an object exists.
    ///
    /// A missing object is `Ok(false)`; errors are reserved for backend or
    /// network failures.
    async fn check_object(&self, key: &StorageKey) -> Result<bool, StorageError>;

    /// Download an object and its content type.
    ///
    /// Fails with `NotFound`, `Forbidden` or `Backend`.
    async fn download_object(&self, key: &StorageKey) -> Result<StoredObject, StorageError>;

    /// Upload an object with the given content type.
    ///
    /// Fails with `BadRequest` (e.g. entity too large) or `Backend`.
    async fn upload_object(
        &self,
        key: &StorageKey,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError>;
}
