//! HTTP request handlers for the image gateway.
//!
//! # Endpoints
//!
//! - `GET /{image}?w=&h=` - Redirect to an original or resized image
//! - `GET /health` - Health check endpoint

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, error};

use crate::error::ResolveError;
use crate::resolve::{ImageRequest, Resolution, ResolutionEngine, QUERY_HEIGHT, QUERY_WIDTH};
use crate::storage::ObjectStore;
use crate::transform::ImageTransform;

/// Response header reporting how the request was resolved.
pub const IMAGE_CACHE_HEADER: &str = "x-image-cache";

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the resolution engine.
///
/// This is passed to all handlers via Axum's State extractor.
pub struct AppState<S: ObjectStore, T: ImageTransform> {
    pub engine: Arc<ResolutionEngine<S, T>>,
}

impl<S: ObjectStore, T: ImageTransform> AppState<S, T> {
    pub fn new(engine: ResolutionEngine<S, T>) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}

impl<S: ObjectStore, T: ImageTransform> Clone for AppState<S, T> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}

// =============================================================================
// Request / Response Types
// =============================================================================

/// Query parameters for image requests.
///
/// Values stay as strings so an empty or malformed value can be told apart
/// from an absent one. A repeated parameter keeps its first value; any other
/// parameter is ignored.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImageQueryParams {
    /// Target width in pixels
    pub w: Option<String>,

    /// Target height in pixels
    pub h: Option<String>,
}

impl ImageQueryParams {
    /// Collect the size parameters from decoded query pairs.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (name, value) in pairs {
            let slot = match name.as_str() {
                QUERY_WIDTH => &mut params.w,
                QUERY_HEIGHT => &mut params.h,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert ResolveError to a plain-text HTTP response.
///
/// Caller errors carry their message in the body. Backend-signaled conditions
/// answer with the status text only. Internal errors are logged with their
/// cause at ERROR level and answer with an opaque body.
impl IntoResponse for ResolveError {
    fn into_response(self) -> Response {
        let status = match &self {
            ResolveError::InvalidPath | ResolveError::InvalidQuery { .. } => {
                StatusCode::BAD_REQUEST
            }
            ResolveError::NotFound => StatusCode::NOT_FOUND,
            ResolveError::Forbidden => StatusCode::FORBIDDEN,
            ResolveError::TooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ResolveError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match &self {
            ResolveError::InvalidPath | ResolveError::InvalidQuery { .. } => self.to_string(),
            _ => status.canonical_reason().unwrap_or("Error").to_string(),
        };

        if let ResolveError::Internal(cause) = &self {
            error!(status = status.as_u16(), "Server error: {}", cause);
        } else {
            debug!(status = status.as_u16(), "Request rejected: {}", self);
        }

        (status, body).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle image requests.
///
/// # Endpoint
///
/// `GET /{image}`
///
/// # Path Parameters
///
/// - `image`: `<name>.<ext>` where ext is `jpeg`, `jpg` or `png`
///
/// # Query Parameters
///
/// - `w`: target width, positive integer (optional)
/// - `h`: target height, positive integer (optional)
///
/// With neither parameter the client is sent to the original. With one, the
/// other dimension follows the original aspect ratio. Size values are only
/// validated once the original is known to exist.
///
/// # Response
///
/// - `303 See Other`: `Location` points at the original or resized object
/// - `400 Bad Request`: Invalid image path or size
/// - `403 Forbidden`: Storage refused access to the original
/// - `404 Not Found`: Original does not exist
/// - `413 Payload Too Large`: Storage rejected the resized image
/// - `500 Internal Server Error`: Storage or processing error
///
/// # Headers
///
/// - `Location: <object URL>`
/// - `X-Image-Cache: original|hit|miss`
pub async fn image_handler<S, T>(
    State(state): State<AppState<S, T>>,
    Path(image): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, ResolveError>
where
    S: ObjectStore + 'static,
    T: ImageTransform,
{
    let query = ImageQueryParams::from_pairs(pairs);
    let request = ImageRequest {
        slug: image,
        width: query.w,
        height: query.h,
    };

    let resolution = state.engine.resolve(&request).await?;

    redirect_response(&resolution)
}

/// Build the `303 See Other` response for a resolution.
fn redirect_response(resolution: &Resolution) -> Result<Response, ResolveError> {
    let location = HeaderValue::try_from(resolution.location.as_str()).map_err(|e| {
        ResolveError::Internal(format!(
            "invalid redirect location {:?}: {}",
            resolution.location, e
        ))
    })?;

    Response::builder()
        .status(StatusCode::SEE_OTHER)
        .header(header::LOCATION, location)
        .header(IMAGE_CACHE_HEADER, resolution.outcome.as_str())
        .body(Body::empty())
        .map_err(|e| ResolveError::Internal(format!("failed to build redirect: {}", e)))
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Tests
// =============================================================================
