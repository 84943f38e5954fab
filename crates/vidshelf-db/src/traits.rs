//! Record store abstraction
//!
//! The API depends on [`VideoStore`] rather than on [`VideoRepository`] so that
//! handlers can be exercised without a database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use vidshelf_core::models::{NewVideo, VideoRecord};
use vidshelf_core::{AdmissionPolicy, AppError};

use crate::db::VideoRepository;

#[async_trait]
pub trait VideoStore: Send + Sync {
    /// All records ordered by id ascending
    async fn find_all(&self) -> Result<Vec<VideoRecord>, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<VideoRecord>, AppError>;

    /// Persist a record, consuming any reservation held for its key
    async fn create(&self, video: NewVideo) -> Result<VideoRecord, AppError>;

    /// Remove a record; `false` when no row had this id
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    /// Total bytes over all retained records
    async fn sum_sizes(&self) -> Result<u64, AppError>;

    /// Admission with a held reservation (reserved mode only)
    async fn reserve_upload(
        &self,
        storage_key: &str,
        size: u64,
        expires_at: DateTime<Utc>,
        policy: &AdmissionPolicy,
    ) -> Result<(), AppError>;

    async fn release_reservation(&self, storage_key: &str) -> Result<(), AppError>;

    /// Connectivity check for health probes
    async fn ping(&self) -> Result<(), AppError>;
}

#[async_trait]
impl VideoStore for VideoRepository {
    async fn find_all(&self) -> Result<Vec<VideoRecord>, AppError> {
        VideoRepository::find_all(self).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<VideoRecord>, AppError> {
        VideoRepository::find_by_id(self, id).await
    }

    async fn create(&self, video: NewVideo) -> Result<VideoRecord, AppError> {
        VideoRepository::create(self, video).await
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        VideoRepository::delete(self, id).await
    }

    async fn sum_sizes(&self) -> Result<u64, AppError> {
        VideoRepository::sum_sizes(self).await
    }

    async fn reserve_upload(
        &self,
        storage_key: &str,
        size: u64,
        expires_at: DateTime<Utc>,
        policy: &AdmissionPolicy,
    ) -> Result<(), AppError> {
        VideoRepository::reserve_upload(self, storage_key, size, expires_at, policy).await
    }

    async fn release_reservation(&self, storage_key: &str) -> Result<(), AppError> {
        VideoRepository::release_reservation(self, storage_key).await
    }

    async fn ping(&self) -> Result<(), AppError> {
        VideoRepository::ping(self).await
    }
}
