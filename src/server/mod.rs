//! HTTP server layer for the image gateway.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                     HTTP Layer                      │
//! │                GET /{image}?w=&h=                   │
//! │                                                     │
//! │  ┌──────────────────────┐  ┌─────────────────────┐  │
//! │  │      handlers        │  │       routes        │  │
//! │  │ (redirect, errors)   │  │  (cors, tracing)    │  │
//! │  └──────────────────────┘  └─────────────────────┘  │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    health_handler, image_handler, AppState, HealthResponse, ImageQueryParams, IMAGE_CACHE_HEADER,
};
pub use routes::{create_router, RouterConfig};
