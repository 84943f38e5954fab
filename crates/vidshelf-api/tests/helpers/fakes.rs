//! In-memory implementations of the record store and object storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use vidshelf_core::models::{NewVideo, VideoRecord};
use vidshelf_core::{AdmissionPolicy, AppError};
use vidshelf_db::VideoStore;
use vidshelf_storage::{Storage, StorageError, StorageResult};

/// Record store over a map keyed by id, with a reservation ledger.
#[derive(Clone)]
pub struct InMemoryVideoStore {
    videos: Arc<Mutex<BTreeMap<i64, VideoRecord>>>,
    reservations: Arc<Mutex<HashMap<String, (u64, DateTime<Utc>)>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryVideoStore {
    pub fn new() -> Self {
        Self {
            videos: Arc::new(Mutex::new(BTreeMap::new())),
            reservations: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    /// Insert a record directly, bypassing the API.
    pub fn add_video(&self, video_key: &str, size: i64) -> VideoRecord {
        let now = Utc::now();
        let record = VideoRecord {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            title: format!("seeded {}", video_key),
            url: format!("https://cdn.example.com/{}", video_key),
            video_key: video_key.to_string(),
            size,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.videos
            .lock()
            .unwrap()
            .insert(record.id, record.clone());
        record
    }

    pub fn video_count(&self) -> usize {
        self.videos.lock().unwrap().len()
    }

    pub fn reservation_keys(&self) -> Vec<String> {
        self.reservations.lock().unwrap().keys().cloned().collect()
    }
}

#[async_trait]
impl VideoStore for InMemoryVideoStore {
    async fn find_all(&self) -> Result<Vec<VideoRecord>, AppError> {
        Ok(self.videos.lock().unwrap().values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<VideoRecord>, AppError> {
        Ok(self.videos.lock().unwrap().get(&id).cloned())
    }

    async fn create(&self, video: NewVideo) -> Result<VideoRecord, AppError> {
        let mut videos = self.videos.lock().unwrap();
        if videos.values().any(|v| v.video_key == video.video_key) {
            return Err(AppError::InvalidInput(format!(
                "Video key '{}' is already registered",
                video.video_key
            )));
        }

        let now = Utc::now();
        let record = VideoRecord {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            title: video.title,
            url: video.url,
            video_key: video.video_key,
            size: video.size,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        videos.insert(record.id, record.clone());
        self.reservations.lock().unwrap().remove(&record.video_key);
        Ok(record)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.videos.lock().unwrap().remove(&id).is_some())
    }

    async fn sum_sizes(&self) -> Result<u64, AppError> {
        let total: i64 = self.videos.lock().unwrap().values().map(|v| v.size).sum();
        Ok(u64::try_from(total).unwrap_or(0))
    }

    async fn reserve_upload(
        &self,
        storage_key: &str,
        size: u64,
        expires_at: DateTime<Utc>,
        policy: &AdmissionPolicy,
    ) -> Result<(), AppError> {
        // Same order as VideoRepository::reserve_upload: cap, conversion, total.
        policy.check_upload_size(size)?;
        i64::try_from(size)
            .map_err(|_| AppError::InvalidInput("Size is out of range".to_string()))?;

        let videos = self.videos.lock().unwrap();
        let mut reservations = self.reservations.lock().unwrap();

        let now = Utc::now();
        reservations.retain(|_, (_, expiry)| *expiry > now);

        let committed = videos
            .values()
            .map(|v| u64::try_from(v.size).unwrap())
            .fold(0u64, u64::saturating_add);
        let reserved = reservations
            .values()
            .map(|(s, _)| *s)
            .fold(0u64, u64::saturating_add);
        let current_total = committed.saturating_add(reserved);

        policy.evaluate(size, current_total)?;
        reservations.insert(storage_key.to_string(), (size, expires_at));
        Ok(())
    }

    async fn release_reservation(&self, storage_key: &str) -> Result<(), AppError> {
        self.reservations.lock().unwrap().remove(storage_key);
        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Object storage that signs deterministic URLs and records calls.
pub struct FakeStorage {
    pub signed: Mutex<Vec<(String, Duration)>>,
    pub deleted: Mutex<Vec<String>>,
    pub fail_delete: AtomicBool,
    pub fail_sign: AtomicBool,
}

impl FakeStorage {
    pub fn new() -> Self {
        Self {
            signed: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            fail_delete: AtomicBool::new(false),
            fail_sign: AtomicBool::new(false),
        }
    }

    pub fn deleted_keys(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn signed_count(&self) -> usize {
        self.signed.lock().unwrap().len()
    }
}

#[async_trait]
impl Storage for FakeStorage {
    async fn presigned_put_url(
        &self,
        storage_key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        if self.fail_sign.load(Ordering::SeqCst) {
            return Err(StorageError::SigningFailed("credentials rejected".to_string()));
        }
        self.signed
            .lock()
            .unwrap()
            .push((storage_key.to_string(), expires_in));
        Ok(format!(
            "https://videos.test-account.r2.cloudflarestorage.com/{}?X-Amz-Expires={}",
            storage_key,
            expires_in.as_secs()
        ))
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(StorageError::DeleteFailed("connection reset".to_string()));
        }
        self.deleted.lock().unwrap().push(storage_key.to_string());
        Ok(())
    }

    async fn exists(&self, _storage_key: &str) -> StorageResult<bool> {
        Ok(false)
    }

    fn backend_type(&self) -> &'static str {
        "fake"
    }
}
