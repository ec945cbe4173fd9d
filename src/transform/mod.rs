//! Image transform layer.
//!
//! Decoding, resampling and re-encoding are delegated to the `image` crate.
//! The resolution engine only sees the [`ImageTransform`] trait, which keeps
//! the pixel work swappable and lets tests count invocations.
//!
//! ```text
//! original bytes ──► decode (detect format) ──► resample ──► encode (same format)
//! ```

mod resizer;

use bytes::Bytes;

use crate::error::TransformError;
use crate::keys::{Dimensions, ImageFormat};

pub use resizer::{
    target_dimensions, ImageResizer, ResampleFilter, DEFAULT_JPEG_QUALITY,
    DEFAULT_MAX_OUTPUT_PIXELS,
};

/// Result of a resize: encoded bytes plus what was produced.
#[derive(Debug, Clone)]
pub struct TransformedImage {
    /// Encoded image data
    pub data: Bytes,

    /// Format detected in the source and used for encoding
    pub format: ImageFormat,

    /// Output width in pixels
    pub width: u32,

    /// Output height in pixels
    pub height: u32,
}

/// Decode, resample and re-encode an image.
///
/// Implementations are synchronous and CPU-bound; callers are expected to run
/// them off the async executor.
pub trait ImageTransform: Send + Sync + 'static {
    /// Resize `source` to `target`.
    ///
    /// A zero dimension is derived from the source aspect ratio. When both
    /// dimensions are given the aspect ratio is not preserved. The output is
    /// encoded in the format detected from `source`.
    fn resize(&self, source: &[u8], target: Dimensions) -> Result<TransformedImage, TransformError>;
}
