//! Request resolution.
//!
//! This module turns an [`ImageRequest`] into a redirect target. It sits
//! between the HTTP handlers and the storage and transform layers:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              HTTP Handlers              │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │           ResolutionEngine              │
//! │  ┌──────────────┐  ┌─────────────────┐  │
//! │  │  KeyScheme   │  │ ImageTransform  │  │
//! │  └──────────────┘  └─────────────────┘  │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │              ObjectStore                │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use image_gateway::keys::KeyScheme;
//! use image_gateway::resolve::{ImageRequest, Outcome, ResolutionEngine};
//! use image_gateway::storage::InMemoryStore;
//! use image_gateway::transform::ImageResizer;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = InMemoryStore::new("https://cdn.example.com")
//!         .with_object("original/cat.png", vec![0u8; 4], "image/png");
//!     let engine = ResolutionEngine::new(
//!         store,
//!         ImageResizer::new(),
//!         KeyScheme::new("original", "resized"),
//!     );
//!
//!     let resolution = engine.resolve(&ImageRequest::new("cat.png")).await.unwrap();
//!     assert_eq!(resolution.outcome, Outcome::Original);
//!     assert_eq!(resolution.location, "https://cdn.example.com/original/cat.png");
//! }
//! ```

mod engine;
mod request;

pub use engine::{Outcome, Resolution, ResolutionEngine};
pub use request::{ImageRequest, QUERY_HEIGHT, QUERY_WIDTH};
