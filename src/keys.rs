//! Storage key derivation for originals and resized variants.
//!
//! Every object the gateway reads or writes is addressed by a key computed
//! here, purely from the request shape:
//!
//! ```text
//! original:  <original_folder>/<name>.<ext>
//! resized:   <resized_folder>/<name>/w<width>h<height>.<ext>
//! ```
//!
//! An omitted dimension is encoded as `0`, so `?w=600`, `?h=600` and
//! `?w=600&h=600` each get their own key even when they happen to produce
//! identical pixels. Equal inputs always produce equal keys, which is what
//! makes a resized variant safe to reuse once it exists in the bucket.

use std::fmt;

use crate::error::ResolveError;

// =============================================================================
// Image Identity
// =============================================================================

/// Pixel format of an original image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

/// File extension as written in the request path.
///
/// `jpg` and `jpeg` are both JPEG but address different objects, so the
/// spelling is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extension {
    Jpeg,
    Jpg,
    Png,
}

impl Extension {
    /// Parse a lowercase extension without the leading dot.
    pub fn parse(ext: &str) -> Option<Self> {
        match ext {
            "jpeg" => Some(Extension::Jpeg),
            "jpg" => Some(Extension::Jpg),
            "png" => Some(Extension::Png),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Extension::Jpeg => "jpeg",
            Extension::Jpg => "jpg",
            Extension::Png => "png",
        }
    }

    pub fn format(&self) -> ImageFormat {
        match self {
            Extension::Jpeg | Extension::Jpg => ImageFormat::Jpeg,
            Extension::Png => ImageFormat::Png,
        }
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The (name, format) pair extracted from a request path.
///
/// All keys for an image derive from this value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageIdentity {
    name: String,
    extension: Extension,
}

impl ImageIdentity {
    pub fn new(name: impl Into<String>, extension: Extension) -> Self {
        Self {
            name: name.into(),
            extension,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extension(&self) -> Extension {
        self.extension
    }

    pub fn format(&self) -> ImageFormat {
        self.extension.format()
    }
}

/// Parse a request path segment of the form `<name>.<ext>`.
///
/// The extension is whatever follows the last dot and must be one of
/// `jpeg`, `jpg` or `png`. The name must be non-empty and may not contain `/`.
pub fn parse_slug(slug: &str) -> Result<ImageIdentity, ResolveError> {
    if slug.contains('/') {
        return Err(ResolveError::InvalidPath);
    }

    let (name, ext) = slug.rsplit_once('.').ok_or(ResolveError::InvalidPath)?;
    if name.is_empty() {
        return Err(ResolveError::InvalidPath);
    }

    let extension = Extension::parse(ext).ok_or(ResolveError::InvalidPath)?;

    Ok(ImageIdentity::new(name, extension))
}

// =============================================================================
// Dimensions
// =============================================================================

/// Requested output size. A zero dimension means "derive from aspect ratio".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Neither dimension was requested; the original is served as-is.
    pub fn is_unconstrained(&self) -> bool {
        self.width == 0 && self.height == 0
    }
}

// =============================================================================
// Storage Keys
// =============================================================================

/// An object key within the configured bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Folder layout used to derive keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyScheme {
    original_folder: String,
    resized_folder: String,
}

impl KeyScheme {
    /// Create a key scheme from the two folder prefixes.
    ///
    /// Leading and trailing slashes are stripped so `original/` and
    /// `original` produce the same keys.
    pub fn new(original_folder: impl AsRef<str>, resized_folder: impl AsRef<str>) -> Self {
        Self {
            original_folder: trim_folder(original_folder.as_ref()),
            resized_folder: trim_folder(resized_folder.as_ref()),
        }
    }

    pub fn original_folder(&self) -> &str {
        &self.original_folder
    }

    pub fn resized_folder(&self) -> &str {
        &self.resized_folder
    }

    /// `<original_folder>/<name>.<ext>`
    pub fn original_key(&self, identity: &ImageIdentity) -> StorageKey {
        let file = format!("{}.{}", identity.name(), identity.extension());
        StorageKey(join(&self.original_folder, &file))
    }

    /// `<resized_folder>/<name>/w<width>h<height>.<ext>`
    pub fn resized_key(&self, identity: &ImageIdentity, dims: Dimensions) -> StorageKey {
        let file = format!(
            "{}/w{}h{}.{}",
            identity.name(),
            dims.width,
            dims.height,
            identity.extension()
        );
        StorageKey(join(&self.resized_folder, &file))
    }
}

fn trim_folder(folder: &str) -> String {
    folder.trim_matches('/').to_string()
}

fn join(folder: &str, file: &str) -> String {
    if folder.is_empty() {
        file.to_string()
    } else {
        format!("{}/{}", folder, file)
    }
}

// =============================================================================
// Tests
// =============================================================================
