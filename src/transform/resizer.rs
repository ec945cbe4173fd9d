use std::fmt;
use std::io::Cursor;
use std::str::FromStr;

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};

use super::{ImageTransform, TransformedImage};
use crate::error::TransformError;
use crate::keys::{Dimensions, ImageFormat};

/// Default JPEG quality (1-100) for generated variants.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Default ceiling on output pixels (width times height) for one variant.
pub const DEFAULT_MAX_OUTPUT_PIXELS: u64 = 50_000_000;

// =============================================================================
// Resample Filter
// =============================================================================

/// Resampling filter used for every variant the gateway generates.
///
/// The filter is a server-wide setting rather than a request parameter so the
/// key space stays a function of name, size and format only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResampleFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

impl ResampleFilter {
    fn filter_type(self) -> FilterType {
        match self {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Triangle => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Gaussian => FilterType::Gaussian,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResampleFilter::Nearest => "nearest",
            ResampleFilter::Triangle => "triangle",
            ResampleFilter::CatmullRom => "catmull-rom",
            ResampleFilter::Gaussian => "gaussian",
            ResampleFilter::Lanczos3 => "lanczos3",
        }
    }
}

impl FromStr for ResampleFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nearest" => Ok(ResampleFilter::Nearest),
            "triangle" | "linear" => Ok(ResampleFilter::Triangle),
            "catmull-rom" | "catmullrom" | "cubic" => Ok(ResampleFilter::CatmullRom),
            "gaussian" => Ok(ResampleFilter::Gaussian),
            "lanczos3" | "lanczos" => Ok(ResampleFilter::Lanczos3),
            other => Err(format!(
                "unknown filter '{}' (expected nearest, triangle, catmull-rom, gaussian or lanczos3)",
                other
            )),
        }
    }
}

impl fmt::Display for ResampleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Target Size
// =============================================================================

/// Compute the output size for a source image and a requested size.
///
/// A zero dimension is derived from the source aspect ratio, rounded to the
/// nearest pixel and never below 1. Both dimensions given means an exact
/// resize. Enlargement is allowed.
pub fn target_dimensions(src_width: u32, src_height: u32, requested: Dimensions) -> (u32, u32) {
    let Dimensions { width, height } = requested;

    if src_width == 0 || src_height == 0 {
        return (width.max(1), height.max(1));
    }

    match (width, height) {
        (0, 0) => (src_width, src_height),
        (w, 0) => (w, scale(src_height, w, src_width)),
        (0, h) => (scale(src_width, h, src_height), h),
        (w, h) => (w, h),
    }
}

/// `value * num / den`, rounded, at least 1.
fn scale(value: u32, num: u32, den: u32) -> u32 {
    let scaled = (value as f64 * num as f64 / den as f64).round();
    scaled.clamp(1.0, u32::MAX as f64) as u32
}

// =============================================================================
// Image Resizer
// =============================================================================

/// [`ImageTransform`] backed by the `image` crate.
///
/// Supports JPEG and PNG sources. The output format always matches the
/// format detected in the source bytes.
#[derive(Debug, Clone)]
pub struct ImageResizer {
    filter: ResampleFilter,
    jpeg_quality: u8,
    max_output_pixels: u64,
}

impl Default for ImageResizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageResizer {
    /// Create a resizer with Lanczos resampling and default JPEG quality.
    pub fn new() -> Self {
        Self {
            filter: ResampleFilter::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            max_output_pixels: DEFAULT_MAX_OUTPUT_PIXELS,
        }
    }

    pub fn with_filter(mut self, filter: ResampleFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Set JPEG output quality, clamped to 1-100.
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    /// Set the largest output (width times height) the resizer will produce.
    pub fn with_max_output_pixels(mut self, max_pixels: u64) -> Self {
        self.max_output_pixels = max_pixels;
        self
    }

    pub fn filter(&self) -> ResampleFilter {
        self.filter
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    pub fn max_output_pixels(&self) -> u64 {
        self.max_output_pixels
    }

    /// Reject targets whose buffers would not fit in memory.
    fn check_output_size(&self, width: u32, height: u32) -> Result<(), TransformError> {
        if width as u64 * height as u64 > self.max_output_pixels {
            return Err(TransformError::OutputTooLarge {
                width,
                height,
                limit: self.max_output_pixels,
            });
        }
        Ok(())
    }

    fn decode(&self, source: &[u8]) -> Result<(DynamicImage, ImageFormat), TransformError> {
        let reader = ImageReader::new(Cursor::new(source))
            .with_guessed_format()
            .map_err(|e| TransformError::Decode {
                message: e.to_string(),
            })?;

        let format = match reader.format() {
            Some(image::ImageFormat::Jpeg) => ImageFormat::Jpeg,
            Some(image::ImageFormat::Png) => ImageFormat::Png,
            Some(other) => {
                return Err(TransformError::UnsupportedFormat {
                    format: format!("{:?}", other),
                })
            }
            None => {
                return Err(TransformError::Decode {
                    message: "unrecognized image data".to_string(),
                })
            }
        };

        let img = reader.decode().map_err(|e| TransformError::Decode {
            message: e.to_string(),
        })?;

        Ok((img, format))
    }

    fn encode(&self, img: &DynamicImage, format: ImageFormat) -> Result<Bytes, TransformError> {
        let mut output = Vec::new();

        match format {
            ImageFormat::Jpeg => {
                // JPEG has no alpha channel
                let rgb = img.to_rgb8();
                let mut encoder = JpegEncoder::new_with_quality(&mut output, self.jpeg_quality);
                encoder
                    .encode_image(&rgb)
                    .map_err(|e| TransformError::Encode {
                        message: e.to_string(),
                    })?;
            }
            ImageFormat::Png => {
                img.write_to(&mut Cursor::new(&mut output), image::ImageFormat::Png)
                    .map_err(|e| TransformError::Encode {
                        message: e.to_string(),
                    })?;
            }
        }

        Ok(Bytes::from(output))
    }
}

impl ImageTransform for ImageResizer {
    fn resize(&self, source: &[u8], target: Dimensions) -> Result<TransformedImage, TransformError> {
        let (img, format) = self.decode(source)?;
        let (width, height) = target_dimensions(img.width(), img.height(), target);
        self.check_output_size(width, height)?;

        let resized = img.resize_exact(width, height, self.filter.filter_type());
        let data = self.encode(&resized, format)?;

        Ok(TransformedImage {
            data,
            format,
            width,
            height,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
