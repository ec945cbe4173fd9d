use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use super::{ObjectStore, StoredObject};
use crate::error::StorageError;
use crate::keys::StorageKey;

/// Number of calls made against an [`InMemoryStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreStats {
    pub checks: usize,
    pub downloads: usize,
    pub uploads: usize,
}

/// Process-local [`ObjectStore`] backed by a hash map.
///
/// Used by tests and by programs embedding the engine without a bucket. Every
/// operation is counted so callers can verify which storage round trips a
/// request performed.
pub struct InMemoryStore {
    base_url: String,
    objects: RwLock<HashMap<StorageKey, StoredObject>>,
    checks: AtomicUsize,
    downloads: AtomicUsize,
    uploads: AtomicUsize,
}

impl InMemoryStore {
    /// Create an empty store whose public URLs start with `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            objects: RwLock::new(HashMap::new()),
            checks: AtomicUsize::new(0),
            downloads: AtomicUsize::new(0),
            uploads: AtomicUsize::new(0),
        }
    }

    /// Builder-style insert used while setting up a store.
    pub fn with_object(
        mut self,
        key: impl Into<String>,
        data: impl Into<Bytes>,
        content_type: impl Into<String>,
    ) -> Self {
        self.objects
            .get_mut()
            .insert(StorageKey::new(key), StoredObject::new(data, content_type));
        self
    }

    /// Insert or replace an object without counting it as an upload.
    pub async fn insert(&self, key: StorageKey, object: StoredObject) {
        self.objects.write().await.insert(key, object);
    }

    /// Read an object without counting it as a download.
    pub async fn get(&self, key: &StorageKey) -> Option<StoredObject> {
        self.objects.read().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            checks: self.checks.load(Ordering::SeqCst),
            downloads: self.downloads.load(Ordering::SeqCst),
            uploads: self.uploads.load(Ordering::SeqCst),
        }
    }

    pub fn reset_stats(&self) {
        self.checks.store(0, Ordering::SeqCst);
        self.downloads.store(0, Ordering::SeqCst);
        self.uploads.store(0, Ordering::SeqCst);
    }
}

#[async_trait]
impl ObjectStore for InMemoryStore {
    fn object_url(&self, key: &StorageKey) -> String {
        format!("{}/{}", self.base_url, key)
    }

    async fn check_object(&self, key: &StorageKey) -> Result<bool, StorageError> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        Ok(self.objects.read().await.contains_key(key))
    }

    async fn download_object(&self, key: &StorageKey) -> Result<StoredObject, StorageError> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        self.objects
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn upload_object(
        &self,
        key: &StorageKey,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        self.objects
            .write()
            .await
            .insert(key.clone(), StoredObject::new(data, content_type));
        Ok(())
    }
}
