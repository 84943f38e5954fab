//! Storage setup and initialization

use anyhow::{Context, Result};
use std::sync::Arc;
use vidshelf_core::Config;
use vidshelf_storage::{create_storage, Storage};

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!("Initializing object storage...");
    let storage = create_storage(config)
        .await
        .context("Failed to initialize object storage")?;
    tracing::info!(
        backend = storage.backend_type(),
        bucket = %config.r2_bucket_name,
        "Object storage initialized successfully"
    );
    Ok(storage)
}
