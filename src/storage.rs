use async_trait::async_trait;
use aws_sdk_s3 as s3;
use s3::presigning::PresigningConfig;
use std::{sync::Arc, time::Duration};

use crate::config::AppConfig;

/// Upload URLs stay valid for ten minutes.
const PRESIGN_TTL: Duration = Duration::from_secs(600);

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("invalid presigning configuration: {0}")]
    Presigning(String),
    #[error("object storage request failed: {0}")]
    Request(String),
}

/// StorageService
///
/// Abstract contract for the media bucket that holds uploaded images. Handlers
/// use it to turn a stored object key into a public URL and to hand out
/// presigned upload URLs, without knowing whether S3, MinIO or the in-memory
/// mock sits behind it.
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Ensures the configured bucket exists. Used at local start-up against MinIO.
    async fn ensure_bucket_exists(&self);

    /// Generates a temporary signed URL allowing a client to PUT a file under `key`,
    /// constrained to `content_type`.
    async fn get_presigned_upload_url(
        &self,
        key: &str,
        content_type: &str,
    ) -> Result<String, StorageError>;

    /// Absolute public URL for an uploaded object key.
    fn public_url(&self, key: &str) -> String;
}

/// S3StorageClient
///
/// Media bucket on the AWS SDK. Path-style addressing keeps it compatible
/// with MinIO and other S3-compatible gateways.
#[derive(Clone)]
pub struct S3StorageClient {
    client: s3::Client,
    bucket: String,
    /// Prefix under which the bucket's objects are publicly readable, no trailing slash.
    public_base_url: String,
}

impl S3StorageClient {
    /// from_config
    ///
    /// Builds the client from the `s3_*` settings and `media_base_url`.
    /// Nothing is sent over the network here.
    pub async fn from_config(config: &AppConfig) -> Self {
        let credentials = s3::config::Credentials::new(
            &config.s3_key,
            &config.s3_secret,
            None,
            None,
            "portfolio-config",
        );

        let sdk_config = s3::Config::builder()
            .behavior_version_latest()
            .region(s3::config::Region::new(config.s3_region.clone()))
            .endpoint_url(&config.s3_endpoint)
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        Self {
            client: s3::Client::from_conf(sdk_config),
            bucket: config.s3_bucket.clone(),
            public_base_url: config.media_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl StorageService for S3StorageClient {
    /// ensure_bucket_exists
    ///
    /// Creates the bucket only when `HeadBucket` cannot see it. Failures are
    /// logged and otherwise ignored; uploads will surface them later.
    async fn ensure_bucket_exists(&self) {
        if self.client.head_bucket().bucket(&self.bucket).send().await.is_ok() {
            tracing::debug!(bucket = %self.bucket, "media bucket present");
            return;
        }
        match self.client.create_bucket().bucket(&self.bucket).send().await {
            Ok(_) => tracing::info!(bucket = %self.bucket, "media bucket created"),
            Err(e) => {
                tracing::warn!(bucket = %self.bucket, error = %e, "could not create media bucket")
            }
        }
    }

    async fn get_presigned_upload_url(
        &self,
        key: &str,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let expiry = PresigningConfig::expires_in(PRESIGN_TTL)
            .map_err(|e| StorageError::Presigning(e.to_string()))?;

        let request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(sanitize_key(key))
            .content_type(content_type)
            .presigned(expiry)
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;

        Ok(request.uri().to_string())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, sanitize_key(key))
    }
}

/// sanitize_key
///
/// Drops empty, `.` and `..` segments so a key can never walk out of the bucket root.
pub fn sanitize_key(key: &str) -> String {
    key.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".." && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// MockStorageService
///
/// Deterministic stand-in for tests. Never touches the network; public URLs
/// point at a fixed `mock-bucket` prefix.
#[derive(Clone, Default)]
pub struct MockStorageService {
    /// When true, presigning returns a simulated failure.
    pub should_fail: bool,
}

impl MockStorageService {
    pub fn new() -> Self {
        Self { should_fail: false }
    }

    pub fn new_failing() -> Self {
        Self { should_fail: true }
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    async fn ensure_bucket_exists(&self) {}

    async fn get_presigned_upload_url(
        &self,
        key: &str,
        _content_type: &str,
    ) -> Result<String, StorageError> {
        if self.should_fail {
            return Err(StorageError::Request(
                "mock storage configured to fail".to_string(),
            ));
        }

        Ok(format!(
            "http://localhost:9000/mock-bucket/{}?signature=fake",
            sanitize_key(key)
        ))
    }

    fn public_url(&self, key: &str) -> String {
        format!("http://localhost:9000/mock-bucket/{}", sanitize_key(key))
    }
}

/// StorageState
///
/// The concrete type used to share the storage service across the application state.
pub type StorageState = Arc<dyn StorageService>;
