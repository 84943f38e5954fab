//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::Result;
use std::sync::Arc;
use vidshelf_core::Config;
use vidshelf_db::VideoRepository;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry(&config.environment)?;

    tracing::info!(
        admission_mode = %config.admission_mode,
        max_upload_size_bytes = config.max_upload_size_bytes,
        max_storage_capacity_bytes = config.max_storage_capacity_bytes,
        public_domain_configured = config.public_domain.is_some(),
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;
    let storage = storage::setup_storage(&config).await?;

    let state = Arc::new(AppState::new(
        &config,
        Arc::new(VideoRepository::new(pool)),
        storage,
    ));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
