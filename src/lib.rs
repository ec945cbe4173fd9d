//! # Image Gateway
//!
//! An on-demand image resizing gateway in front of S3-compatible object storage.
//!
//! Clients request `GET /{name}.{ext}?w=&h=` and are redirected to a stored
//! object: the original when no size is given, otherwise a resized rendition.
//! Renditions are generated on first request and stored next to the originals,
//! so the object store doubles as a persistent cache.
//!
//! ## Features
//!
//! - **Redirect-only serving**: image bytes never flow back through the gateway
//! - **Deterministic keys**: every (name, size, format) maps to one object key
//! - **Aspect-preserving resize**: an omitted dimension follows the original
//! - **Format preservation**: JPEG stays JPEG and PNG stays PNG
//!
//! ## Architecture
//!
//! - [`keys`] - Slug parsing and the storage key scheme
//! - [`storage`] - Object store trait with S3 and in-memory backends
//! - [`transform`] - Decode, resample and encode via the `image` crate
//! - [`resolve`] - The resolution engine tying keys, storage and transform together
//! - [`server`] - Axum-based HTTP server and routes
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use image_gateway::{create_router, InMemoryStore, KeyScheme, ResolutionEngine, ImageResizer, RouterConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = InMemoryStore::new("https://cdn.example.com");
//!     let engine = ResolutionEngine::new(store, ImageResizer::new(), KeyScheme::new("original", "resized"));
//!     let router = create_router(engine, RouterConfig::new());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod keys;
pub mod resolve;
pub mod server;
pub mod storage;
pub mod transform;

// Re-export commonly used types
pub use config::Config;
pub use error::{ResolveError, StorageError, TransformError};
pub use keys::{
    parse_slug, Dimensions, Extension, ImageFormat, ImageIdentity, KeyScheme, StorageKey,
};
pub use resolve::{ImageRequest, Outcome, Resolution, ResolutionEngine};
pub use server::{create_router, health_handler, image_handler, AppState, RouterConfig};
pub use storage::{
    create_s3_client, InMemoryStore, ObjectStore, S3ObjectStore, StoreStats, StoredObject,
};
pub use transform::{
    target_dimensions, ImageResizer, ImageTransform, ResampleFilter, TransformedImage,
    DEFAULT_JPEG_QUALITY, DEFAULT_MAX_OUTPUT_PIXELS,
};
