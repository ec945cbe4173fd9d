use async_trait::async_trait;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use tracing::debug;

use super::{ObjectStore, StoredObject};
use crate::error::StorageError;
use crate::keys::StorageKey;

/// Content type recorded when the backend does not report one.
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// S3-backed implementation of [`ObjectStore`].
///
/// All objects live in a single bucket. Public URLs are derived from, in
/// order of preference: an explicit public base URL, the custom endpoint
/// (path-style, as used by MinIO), or the AWS virtual-hosted style URL.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
    url_base: String,
}

impl S3ObjectStore {
    /// Create a store for an AWS S3 bucket in the given region.
    pub fn new(client: Client, bucket: impl Into<String>, region: &str) -> Self {
        let bucket = bucket.into();
        let url_base = format!("https://{}.s3.{}.amazonaws.com", bucket, region);
        Self {
            client,
            bucket,
            url_base,
        }
    }

    /// Use path-style URLs on a custom endpoint (`<endpoint>/<bucket>/<key>`).
    pub fn with_endpoint_url(mut self, endpoint: &str) -> Self {
        self.url_base = format!("{}/{}", endpoint.trim_end_matches('/'), self.bucket);
        self
    }

    /// Serve objects from a fixed base URL, e.g. a CDN in front of the bucket.
    pub fn with_public_base_url(mut self, base_url: &str) -> Self {
        self.url_base = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Get the bucket name.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Get the underlying S3 client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    fn location(&self, key: &StorageKey) -> String {
        format!("s3://{}/{}", self.bucket, key)
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    fn object_url(&self, key: &StorageKey) -> String {
        let path: Vec<_> = key
            .as_str()
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        format!("{}/{}", self.url_base, path.join("/"))
    }

    async fn check_object(&self, key: &StorageKey) -> Result<bool, StorageError> {
        let result = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(e) => {
                let is_not_found = e
                    .as_service_error()
                    .map(|se| se.is_not_found())
                    .unwrap_or(false);

                // HEAD responses have no body, so some S3-compatible services
                // only signal a missing object through the status code.
                let status_is_404 = e
                    .raw_response()
                    .map(|r| r.status().as_u16() == 404)
                    .unwrap_or(false);

                if is_not_found || status_is_404 {
                    debug!(key = %key, "Object does not exist");
                    return Ok(false);
                }

                Err(StorageError::Backend(format!(
                    "HEAD {}: {}",
                    self.location(key),
                    DisplayErrorContext(&e)
                )))
            }
        }
    }

    async fn download_object(&self, key: &StorageKey) -> Result<StoredObject, StorageError> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .send()
            .await
            .map_err(|e| {
                let status = e.raw_response().map(|r| r.status().as_u16());
                let (no_such_key, invalid_state, code) = match e.as_service_error() {
                    Some(se) => (
                        se.is_no_such_key(),
                        se.is_invalid_object_state(),
                        se.code().map(str::to_string),
                    ),
                    None => (false, false, None),
                };
                let message = format!("GET {}: {}", self.location(key), DisplayErrorContext(&e));

                if no_such_key || status == Some(404) {
                    StorageError::NotFound(self.location(key))
                } else if invalid_state
                    || status == Some(403)
                    || code.as_deref() == Some("AccessDenied")
                {
                    StorageError::Forbidden(message)
                } else {
                    StorageError::Backend(message)
                }
            })?;

        let content_type = resp
            .content_type()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        let data = resp
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Backend(format!("reading {}: {}", self.location(key), e)))?
            .into_bytes();

        Ok(StoredObject { data, content_type })
    }

    async fn upload_object(
        &self,
        key: &StorageKey,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .body(ByteStream::from(data))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                let status = e.raw_response().map(|r| r.status().as_u16());
                let code = e
                    .as_service_error()
                    .and_then(|se| se.code())
                    .map(str::to_string);
                let message = format!("PUT {}: {}", self.location(key), DisplayErrorContext(&e));

                if status == Some(400) || code.as_deref() == Some("EntityTooLarge") {
                    StorageError::BadRequest(message)
                } else {
                    StorageError::Backend(message)
                }
            })?;

        Ok(())
    }
}

/// Create an S3 client with optional custom endpoint and region.
///
/// Use a custom endpoint for S3-compatible services like MinIO:
/// ```ignore
/// let client = create_s3_client(Some("http://localhost:9000"), "us-east-1").await;
/// ```
///
/// For AWS S3, pass `None` to use the default endpoint:
/// ```ignore
/// let client = create_s3_client(None, "us-east-1").await;
/// ```
pub async fn create_s3_client(endpoint_url: Option<&str>, region: &str) -> Client {
    let region = aws_config::Region::new(region.to_string());
    let mut config_loader =
        aws_config::defaults(aws_config::BehaviorVersion::latest()).region(region);

    if let Some(endpoint) = endpoint_url {
        config_loader = config_loader.endpoint_url(endpoint);
    }

    let sdk_config = config_loader.load().await;

    // S3-compatible services generally need path-style addressing
    let s3_config = if endpoint_url.is_some() {
        aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build()
    } else {
        aws_sdk_s3::config::Builder::from(&sdk_config).build()
    };

    Client::from_conf(s3_config)
}
