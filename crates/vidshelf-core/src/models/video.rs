use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::AppError;

/// A registered video whose bytes live in object storage under `video_key`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct VideoRecord {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub video_key: String,
    pub size: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Always `None`: deletion removes the row.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Request body for registering an uploaded video
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateVideoRequest {
    #[validate(custom(function = "crate::models::upload::validate_not_blank"))]
    pub title: String,
    #[validate(custom(function = "crate::models::upload::validate_not_blank"))]
    pub video_key: String,
    #[validate(custom(function = "validate_size_fits_i64"))]
    pub size: u64,
}

/// Sizes are stored as `BIGINT`.
fn validate_size_fits_i64(size: u64) -> Result<(), ValidationError> {
    if i64::try_from(size).is_err() {
        let mut err = ValidationError::new("size_out_of_range");
        err.message = Some("Size is out of range".into());
        return Err(err);
    }
    Ok(())
}

/// Fields persisted for a new record; `url` is already derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVideo {
    pub title: String,
    pub url: String,
    pub video_key: String,
    pub size: i64,
}

impl NewVideo {
    /// Derive the public URL as `{public_domain}/{video_key}`.
    ///
    /// `public_domain` is expected without a trailing slash.
    pub fn from_request(request: CreateVideoRequest, public_domain: &str) -> Result<Self, AppError> {
        let size = i64::try_from(request.size)
            .map_err(|_| AppError::InvalidInput("Size is out of range".to_string()))?;
        let url = format!("{}/{}", public_domain, request.video_key);
        Ok(Self {
            title: request.title,
            url,
            video_key: request.video_key,
            size,
        })
    }
}
