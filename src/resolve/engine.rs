//! Resolution engine: decides, per request, whether to redirect to an
//! existing object, generate a new resized variant, or fail.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                         resolve()                                │
//! │  1. Parse slug             4. No size  → redirect to original    │
//! │  2. Original exists?       5. Resized exists → redirect (hit)    │
//! │  3. Parse w / h            6. Download → resize → upload → redir │
//! └──────────────────────────────────────────────────────────────────┘
//!         │                              │
//!         ▼                              ▼
//!   ┌─────────────┐              ┌────────────────┐
//!   │ ObjectStore │              │ ImageTransform │
//!   └─────────────┘              └────────────────┘
//! ```

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{ResolveError, StorageError};
use crate::keys::{parse_slug, Dimensions, KeyScheme, StorageKey};
use crate::storage::ObjectStore;
use crate::transform::ImageTransform;

use super::request::ImageRequest;

// =============================================================================
// Resolution
// =============================================================================

/// Which path a successful resolution took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No size requested; the original is served as-is
    Original,

    /// The resized variant already existed
    CacheHit,

    /// The resized variant was generated and uploaded by this request
    Generated,
}

impl Outcome {
    /// Value reported in the `X-Image-Cache` response header.
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Original => "original",
            Outcome::CacheHit => "hit",
            Outcome::Generated => "miss",
        }
    }
}

/// Where to redirect the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Public URL of the object to redirect to
    pub location: String,

    /// Key of the object the location points at
    pub key: StorageKey,

    pub outcome: Outcome,
}

// =============================================================================
// Resolution Engine
// =============================================================================

/// Stateless per-request orchestrator over an object store and a transform.
///
/// The object store is the only durable state: a "cache hit" is an existence
/// check against the bucket, never an in-process lookup. Concurrent requests
/// for the same uncached variant both generate and upload it; the store keeps
/// whichever write lands last. No storage call is retried.
pub struct ResolutionEngine<S: ObjectStore, T: ImageTransform> {
    store: Arc<S>,
    transform: Arc<T>,
    keys: KeyScheme,
}

impl<S: ObjectStore, T: ImageTransform> ResolutionEngine<S, T> {
    pub fn new(store: S, transform: T, keys: KeyScheme) -> Self {
        Self::with_shared_store(Arc::new(store), transform, keys)
    }

    /// Create an engine over a store that is also held elsewhere.
    pub fn with_shared_store(store: Arc<S>, transform: T, keys: KeyScheme) -> Self {
        Self {
            store,
            transform: Arc::new(transform),
            keys,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn keys(&self) -> &KeyScheme {
        &self.keys
    }

    /// Resolve a request to a redirect target.
    ///
    /// # Errors
    ///
    /// - `InvalidPath` if the slug is not `<name>.<jpeg|jpg|png>`; no storage
    ///   call is made
    /// - `NotFound` if the original does not exist
    /// - `InvalidQuery` if `w` or `h` is present but not a positive integer
    /// - `Forbidden` if storage refuses to serve the original
    /// - `TooLarge` if storage rejects the resized upload
    /// - `Internal` for any other storage or transform failure
    pub async fn resolve(&self, request: &ImageRequest) -> Result<Resolution, ResolveError> {
        let identity = parse_slug(&request.slug)?;

        let original_key = self.keys.original_key(&identity);
        if !self.exists(&original_key).await? {
            debug!(key = %original_key, "Original image not found");
            return Err(ResolveError::NotFound);
        }

        let dims = request.dimensions()?;
        if dims.is_unconstrained() {
            return Ok(self.redirect(original_key, Outcome::Original));
        }

        let resized_key = self.keys.resized_key(&identity, dims);
        if self.exists(&resized_key).await? {
            debug!(key = %resized_key, "Resized variant cache hit");
            return Ok(self.redirect(resized_key, Outcome::CacheHit));
        }

        debug!(key = %resized_key, "Resized variant cache miss");
        self.generate(&original_key, &resized_key, dims).await?;

        Ok(self.redirect(resized_key, Outcome::Generated))
    }

    /// Download the original, resize it and upload the result.
    ///
    /// Performs exactly one download and at most one upload.
    async fn generate(
        &self,
        original_key: &StorageKey,
        resized_key: &StorageKey,
        dims: Dimensions,
    ) -> Result<(), ResolveError> {
        let original = self
            .store
            .download_object(original_key)
            .await
            .map_err(|e| match e {
                StorageError::NotFound(_) => ResolveError::NotFound,
                StorageError::Forbidden(cause) => {
                    warn!(key = %original_key, "Download forbidden: {}", cause);
                    ResolveError::Forbidden
                }
                other => ResolveError::Internal(other.to_string()),
            })?;

        // Decoding and resampling are CPU-bound
        let transform = Arc::clone(&self.transform);
        let source = original.data.clone();
        let resized = tokio::task::spawn_blocking(move || transform.resize(&source, dims))
            .await
            .map_err(|e| ResolveError::Internal(format!("resize task failed: {}", e)))??;

        let size = resized.data.len();
        self.store
            .upload_object(resized_key, resized.data, &original.content_type)
            .await
            .map_err(|e| match e {
                StorageError::BadRequest(cause) => {
                    warn!(key = %resized_key, size, "Upload rejected: {}", cause);
                    ResolveError::TooLarge
                }
                other => ResolveError::Internal(other.to_string()),
            })?;

        info!(
            key = %resized_key,
            width = resized.width,
            height = resized.height,
            bytes = size,
            "Generated resized variant"
        );

        Ok(())
    }

    async fn exists(&self, key: &StorageKey) -> Result<bool, ResolveError> {
        self.store
            .check_object(key)
            .await
            .map_err(|e| ResolveError::Internal(e.to_string()))
    }

    fn redirect(&self, key: StorageKey, outcome: Outcome) -> Resolution {
        Resolution {
            location: self.store.object_url(&key),
            key,
            outcome,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
