//! Application state and sub-state extractors.
//!
//! Collaborators are injected at construction so handlers never reach for
//! globals, and tests can swap in in-memory stores.

use axum::extract::FromRef;
use std::sync::Arc;
use std::time::Duration;
use vidshelf_core::{AdmissionMode, AdmissionPolicy, Config};
use vidshelf_db::VideoStore;
use vidshelf_storage::{Storage, UploadSigner};

/// Record store, object storage and the public URL base for registered videos.
#[derive(Clone)]
pub struct VideoState {
    pub store: Arc<dyn VideoStore>,
    pub storage: Arc<dyn Storage>,
    /// `None` when `PUBLIC_DOMAIN` is unset; registration then fails.
    pub public_domain: Option<String>,
}

/// Everything needed to admit an upload and sign its URL.
#[derive(Clone)]
pub struct UploadState {
    pub store: Arc<dyn VideoStore>,
    pub signer: UploadSigner,
    pub policy: AdmissionPolicy,
    pub mode: AdmissionMode,
}

pub struct AppState {
    pub videos: VideoState,
    pub uploads: UploadState,
}

impl AppState {
    pub fn new(config: &Config, store: Arc<dyn VideoStore>, storage: Arc<dyn Storage>) -> Self {
        let signer = UploadSigner::new(
            storage.clone(),
            Duration::from_secs(config.upload_url_ttl_seconds),
        );

        Self {
            videos: VideoState {
                store: store.clone(),
                storage,
                public_domain: config.public_domain.clone(),
            },
            uploads: UploadState {
                store,
                signer,
                policy: config.admission_policy(),
                mode: config.admission_mode,
            },
        }
    }
}

impl FromRef<Arc<AppState>> for VideoState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.videos.clone()
    }
}

impl FromRef<Arc<AppState>> for UploadState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.uploads.clone()
    }
}
