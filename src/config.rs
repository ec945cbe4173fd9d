//! Configuration management for the image gateway.
//!
//! This module provides a configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables with `GATEWAY_` prefix
//! - Defaults for all optional settings
//!
//! # Example
//!
//! ```ignore
//! use image_gateway::config::Config;
//!
//! let config = Config::parse();
//!
//! println!("Listening on {}", config.bind_address());
//! println!("S3 bucket: {}", config.s3_bucket);
//! ```
//!
//! # Environment Variables
//!
//! - `GATEWAY_HOST` - Server bind address (default: 0.0.0.0)
//! - `GATEWAY_PORT` - Server port (default: 3000)
//! - `GATEWAY_S3_BUCKET` - S3 bucket name (required)
//! - `GATEWAY_ORIGINAL_FOLDER` - Folder holding original images (required)
//! - `GATEWAY_RESIZED_FOLDER` - Folder receiving resized images (required)
//! - `GATEWAY_S3_ENDPOINT` - Custom S3 endpoint for S3-compatible services
//! - `GATEWAY_S3_REGION` - AWS region (default: us-east-1)
//! - `GATEWAY_PUBLIC_BASE_URL` - Base URL used in redirect locations
//! - `GATEWAY_JPEG_QUALITY` - JPEG output quality (default: 90)
//! - `GATEWAY_FILTER` - Resampling filter (default: lanczos3)
//! - `GATEWAY_MAX_OUTPUT_PIXELS` - Largest variant, width times height (default: 50000000)
//! - `GATEWAY_CORS_ORIGINS` - Allowed CORS origins, comma-separated

use clap::Parser;

use crate::keys::KeyScheme;
use crate::transform::{
    ImageResizer, ResampleFilter, DEFAULT_JPEG_QUALITY, DEFAULT_MAX_OUTPUT_PIXELS,
};

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default AWS region.
pub const DEFAULT_REGION: &str = "us-east-1";

// =============================================================================
// CLI Arguments
// =============================================================================

/// Image Gateway - on-demand image resizing in front of S3.
///
/// Redirects clients to original images or to resized renditions, generating
/// and storing each rendition the first time it is requested.
#[derive(Parser, Debug, Clone)]
#[command(name = "image-gateway")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "GATEWAY_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "GATEWAY_PORT")]
    pub port: u16,

    // =========================================================================
    // S3 Configuration
    // =========================================================================
    /// S3 bucket name holding original and resized images.
    #[arg(long, env = "GATEWAY_S3_BUCKET")]
    pub s3_bucket: String,

    /// Folder (key prefix) holding original images.
    #[arg(long, env = "GATEWAY_ORIGINAL_FOLDER")]
    pub original_folder: String,

    /// Folder (key prefix) receiving resized images.
    #[arg(long, env = "GATEWAY_RESIZED_FOLDER")]
    pub resized_folder: String,

    /// Custom S3 endpoint URL for S3-compatible services (MinIO, etc.).
    ///
    /// If not specified, uses the default AWS S3 endpoint.
    #[arg(long, env = "GATEWAY_S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,

    /// AWS region for S3.
    #[arg(long, default_value = DEFAULT_REGION, env = "GATEWAY_S3_REGION")]
    pub s3_region: String,

    /// Base URL for redirect locations, e.g. a CDN in front of the bucket.
    ///
    /// Object keys are appended to it. If not specified, the bucket URL is used.
    #[arg(long, env = "GATEWAY_PUBLIC_BASE_URL")]
    pub public_base_url: Option<String>,

    // =========================================================================
    // Resize Configuration
    // =========================================================================
    /// JPEG quality for resized images (1-100).
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY, env = "GATEWAY_JPEG_QUALITY")]
    pub jpeg_quality: u8,

    /// Resampling filter: nearest, triangle, catmull-rom, gaussian or lanczos3.
    #[arg(long, default_value = "lanczos3", env = "GATEWAY_FILTER")]
    pub filter: ResampleFilter,

    /// Largest variant the gateway will generate, as width times height.
    ///
    /// Requests above it fail without allocating the output buffers.
    #[arg(long, default_value_t = DEFAULT_MAX_OUTPUT_PIXELS, env = "GATEWAY_MAX_OUTPUT_PIXELS")]
    pub max_output_pixels: u64,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "GATEWAY_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.s3_bucket.is_empty() {
            return Err(
                "S3 bucket name is required. Set --s3-bucket or GATEWAY_S3_BUCKET".to_string(),
            );
        }

        let original = self.original_folder.trim_matches('/');
        let resized = self.resized_folder.trim_matches('/');

        if original.is_empty() {
            return Err(
                "Original folder is required. Set --original-folder or GATEWAY_ORIGINAL_FOLDER"
                    .to_string(),
            );
        }
        if resized.is_empty() {
            return Err(
                "Resized folder is required. Set --resized-folder or GATEWAY_RESIZED_FOLDER"
                    .to_string(),
            );
        }
        if original == resized {
            return Err("original_folder and resized_folder must differ".to_string());
        }

        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err("jpeg_quality must be between 1 and 100".to_string());
        }

        if self.max_output_pixels == 0 {
            return Err("max_output_pixels must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Key layout for the configured folders.
    pub fn key_scheme(&self) -> KeyScheme {
        KeyScheme::new(&self.original_folder, &self.resized_folder)
    }

    /// Resizer using the configured filter and quality.
    pub fn resizer(&self) -> ImageResizer {
        ImageResizer::new()
            .with_filter(self.filter)
            .with_jpeg_quality(self.jpeg_quality)
            .with_max_output_pixels(self.max_output_pixels)
    }
}

// =============================================================================
// Tests
// =============================================================================
