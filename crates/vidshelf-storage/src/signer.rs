//! Upload permission issuance.

use crate::traits::{Storage, StorageError, StorageResult};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use vidshelf_core::models::UploadGrant;

/// Default lifetime of an upload permission.
pub const DEFAULT_UPLOAD_URL_TTL: Duration = Duration::from_secs(15 * 60);

/// Issues presigned PUT grants with a fixed lifetime.
#[derive(Clone)]
pub struct UploadSigner {
    storage: Arc<dyn Storage>,
    ttl: Duration,
}

impl UploadSigner {
    pub fn new(storage: Arc<dyn Storage>, ttl: Duration) -> Self {
        Self { storage, ttl }
    }

    /// When a grant issued at `issued_at` stops being valid.
    pub fn expires_at(&self, issued_at: DateTime<Utc>) -> StorageResult<DateTime<Utc>> {
        let ttl = chrono::Duration::from_std(self.ttl)
            .map_err(|e| StorageError::ConfigError(format!("invalid upload TTL: {}", e)))?;
        Ok(issued_at + ttl)
    }

    /// Sign a PUT for `object_key`, valid from `issued_at` for the configured TTL.
    #[tracing::instrument(skip(self), fields(backend = self.storage.backend_type()))]
    pub async fn issue(
        &self,
        object_key: &str,
        issued_at: DateTime<Utc>,
    ) -> StorageResult<UploadGrant> {
        let expires_at = self.expires_at(issued_at)?;
        let signed_url = self
            .storage
            .presigned_put_url(object_key, self.ttl)
            .await?;

        Ok(UploadGrant {
            object_key: object_key.to_string(),
            signed_url,
            expires_at,
        })
    }
}
