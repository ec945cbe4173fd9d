use crate::error::ResolveError;
use crate::keys::Dimensions;

/// Query parameter carrying the requested width.
pub const QUERY_WIDTH: &str = "w";

/// Query parameter carrying the requested height.
pub const QUERY_HEIGHT: &str = "h";

/// A request for an image at an optional size.
///
/// Width and height are kept as the raw query strings. They are only parsed
/// once the original is known to exist, so a malformed size on a missing
/// image still answers 404.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageRequest {
    /// Path segment, e.g. `cat.jpeg`
    pub slug: String,

    /// Raw `w` query value, if the parameter was present
    pub width: Option<String>,

    /// Raw `h` query value, if the parameter was present
    pub height: Option<String>,
}

impl ImageRequest {
    /// Create a request for the original image.
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            width: None,
            height: None,
        }
    }

    pub fn with_width(mut self, width: impl Into<String>) -> Self {
        self.width = Some(width.into());
        self
    }

    pub fn with_height(mut self, height: impl Into<String>) -> Self {
        self.height = Some(height.into());
        self
    }

    /// Parse the requested size. An absent parameter becomes 0.
    ///
    /// Width is validated before height.
    pub fn dimensions(&self) -> Result<Dimensions, ResolveError> {
        let width = parse_dimension(QUERY_WIDTH, self.width.as_deref())?;
        let height = parse_dimension(QUERY_HEIGHT, self.height.as_deref())?;
        Ok(Dimensions::new(width, height))
    }
}

/// Parse one dimension. Present values must be integers greater than 0;
/// an explicit `0` is rejected, unlike an omitted parameter.
fn parse_dimension(param: &'static str, raw: Option<&str>) -> Result<u32, ResolveError> {
    let Some(raw) = raw else {
        return Ok(0);
    };

    let value: i64 = raw
        .parse()
        .map_err(|_| ResolveError::not_an_integer(param))?;

    if value <= 0 {
        return Err(ResolveError::not_positive(param));
    }

    u32::try_from(value).map_err(|_| ResolveError::not_an_integer(param))
}
