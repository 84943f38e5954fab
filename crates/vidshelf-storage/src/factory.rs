#[cfg(feature = "storage-s3")]
use crate::s3::S3Credentials;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{Storage, StorageError, StorageResult};
use std::sync::Arc;
use vidshelf_core::Config;

/// Create the object storage backend from configuration
#[cfg(feature = "storage-s3")]
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    let endpoint = config.storage_endpoint().ok_or_else(|| {
        StorageError::ConfigError("R2_ACCOUNT_ID or S3_ENDPOINT not configured".to_string())
    })?;

    let credentials = match (&config.r2_access_key_id, &config.r2_secret_access_key) {
        (Some(access_key_id), Some(secret_access_key)) => Some(S3Credentials {
            access_key_id: access_key_id.clone(),
            secret_access_key: secret_access_key.clone(),
        }),
        _ => None,
    };

    let storage = S3Storage::new(
        config.r2_bucket_name.clone(),
        config.s3_region.clone(),
        Some(endpoint),
        credentials,
    )
    .await?;
    Ok(Arc::new(storage))
}

#[cfg(not(feature = "storage-s3"))]
pub async fn create_storage(_config: &Config) -> StorageResult<Arc<dyn Storage>> {
    Err(StorageError::ConfigError(
        "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
    ))
}
