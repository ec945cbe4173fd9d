use thiserror::Error;

/// Errors reported by an object store backend.
///
/// This is a closed set: backends translate their own error codes into one of
/// these variants so the resolution engine never depends on a backend type.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    /// Object does not exist (download only; existence checks return `false`)
    #[error("Object not found: {0}")]
    NotFound(String),

    /// Access denied, or the object is in a state that cannot be read
    #[error("Access forbidden: {0}")]
    Forbidden(String),

    /// Backend rejected the request, e.g. an entity that is too large
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Any other backend or network failure
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Errors that can occur while decoding, resampling or encoding an image.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransformError {
    /// Source bytes could not be decoded
    #[error("Failed to decode image: {message}")]
    Decode { message: String },

    /// Decoded image is in a format we cannot re-encode
    #[error("Unsupported image format: {format}")]
    UnsupportedFormat { format: String },

    /// Requested output exceeds the configured pixel ceiling
    #[error("Output size {width}x{height} exceeds limit of {limit} pixels")]
    OutputTooLarge { width: u32, height: u32, limit: u64 },

    /// Resampled image could not be encoded
    #[error("Failed to encode image: {message}")]
    Encode { message: String },
}

/// Outcome of a failed image resolution.
///
/// Every variant maps to exactly one HTTP status in the server layer.
/// `InvalidPath` and `InvalidQuery` are caller errors detected from the
/// request shape alone. `Internal` carries the underlying cause for logging;
/// it is never sent to the client.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// Path is not `<name>.<jpeg|jpg|png>` (400)
    #[error("invalid image path")]
    InvalidPath,

    /// A dimension query parameter is malformed or not positive (400)
    #[error("{message}")]
    InvalidQuery { param: &'static str, message: String },

    /// Original image does not exist (404)
    #[error("image not found")]
    NotFound,

    /// Storage refused access to the original (403)
    #[error("access to image forbidden")]
    Forbidden,

    /// Storage rejected the resized upload (413)
    #[error("resized image rejected by storage")]
    TooLarge,

    /// Unexpected storage or transform failure (500)
    #[error("internal error: {0}")]
    Internal(String),
}

impl ResolveError {
    /// Create an `InvalidQuery` error for a value that is not an integer.
    pub fn not_an_integer(param: &'static str) -> Self {
        ResolveError::InvalidQuery {
            param,
            message: format!("failed converting {} into integer", param),
        }
    }

    /// Create an `InvalidQuery` error for a value that is zero or negative.
    pub fn not_positive(param: &'static str) -> Self {
        ResolveError::InvalidQuery {
            param,
            message: format!("if specified, {} must be larger than 0", param),
        }
    }

    /// Whether this error was caused by the shape of the request.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ResolveError::InvalidPath | ResolveError::InvalidQuery { .. }
        )
    }
}

impl From<TransformError> for ResolveError {
    fn from(err: TransformError) -> Self {
        ResolveError::Internal(err.to_string())
    }
}
