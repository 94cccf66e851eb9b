// Presigned URLs para upload direto no S3. Os bytes nunca passam por este serviço.

use async_trait::async_trait;
use aws_credential_types::Credentials;
use aws_sdk_s3::{
    config::{BehaviorVersion, Region},
    presigning::PresigningConfig,
    Client,
};
use std::time::Duration;
use uuid::Uuid;

use crate::{config::S3Config, utils::AppError};

/// Upper bound for one batch request.
pub const MAX_FILE_COUNT: usize = 20;

#[async_trait]
pub trait UploadUrlSigner: Send + Sync {
    /// Prefix prepended to every generated object key.
    fn key_prefix(&self) -> &str;

    /// Time-limited PUT URL for `key`.
    async fn presign_upload(&self, key: &str) -> Result<String, AppError>;
}

#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
    key_prefix: String,
    expires_in_secs: u64,
}

impl S3Storage {
    pub fn new(config: &S3Config) -> Self {
        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "commerce-service",
        );

        let mut builder = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials);

        if let Some(endpoint) = &config.endpoint {
            // MinIO/LocalStack
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        log::info!(
            "🪣 S3 storage initialized (bucket: {}, region: {})",
            config.bucket,
            config.region
        );

        Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
            key_prefix: config.key_prefix.clone(),
            expires_in_secs: config.presign_expires_secs,
        }
    }
}

#[async_trait]
impl UploadUrlSigner for S3Storage {
    fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    async fn presign_upload(&self, key: &str) -> Result<String, AppError> {
        let presigning_config = PresigningConfig::expires_in(Duration::from_secs(self.expires_in_secs))
            .map_err(|e| AppError::StorageError(format!("Invalid presign duration: {}", e)))?;

        let presigned = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning_config)
            .await
            .map_err(|e| AppError::StorageError(format!("Failed to presign {}: {}", key, e)))?;

        Ok(presigned.uri().to_string())
    }
}

/// `<prefix>/<uuid>`, or just `<uuid>` with an empty prefix.
pub fn new_upload_key(prefix: &str) -> String {
    let id = Uuid::new_v4();
    if prefix.is_empty() {
        id.to_string()
    } else {
        format!("{}/{}", prefix, id)
    }
}

/// `?fileCount=` arrives as text.
pub fn parse_file_count(raw: Option<&str>) -> Result<usize, AppError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::InvalidRequest("fileCount is required".into()))?;

    let count: usize = raw
        .parse()
        .map_err(|_| AppError::InvalidRequest(format!("fileCount must be a number, got '{}'", raw)))?;

    if count == 0 || count > MAX_FILE_COUNT {
        return Err(AppError::InvalidRequest(format!(
            "fileCount must be between 1 and {}",
            MAX_FILE_COUNT
        )));
    }

    Ok(count)
}

pub async fn create_presigned_url(signer: &dyn UploadUrlSigner) -> Result<String, AppError> {
    let key = new_upload_key(signer.key_prefix());
    let url = signer.presign_upload(&key).await?;
    log::debug!("🔗 Presigned upload URL generated for {}", key);
    Ok(url)
}

pub async fn create_multi_presigned_urls(
    signer: &dyn UploadUrlSigner,
    file_count: usize,
) -> Result<Vec<String>, AppError> {
    let mut urls = Vec::with_capacity(file_count);
    for _ in 0..file_count {
        urls.push(create_presigned_url(signer).await?);
    }

    log::info!("🔗 {} presigned upload URLs generated", urls.len());
    Ok(urls)
}
