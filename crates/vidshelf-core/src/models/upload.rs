use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Request body for an upload permission
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UploadUrlRequest {
    #[validate(
        length(max = 255, message = "Filename must be at most 255 characters"),
        custom(function = "validate_filename")
    )]
    pub filename: String,
    pub size: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlResponse {
    pub upload_url: String,
    pub key: String,
    pub expires_at: DateTime<Utc>,
}

/// A time-limited permission to PUT one object. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadGrant {
    pub object_key: String,
    pub signed_url: String,
    pub expires_at: DateTime<Utc>,
}

impl From<UploadGrant> for UploadUrlResponse {
    fn from(grant: UploadGrant) -> Self {
        Self {
            upload_url: grant.signed_url,
            key: grant.object_key,
            expires_at: grant.expires_at,
        }
    }
}

/// Object key for a new upload: `{unix_seconds}-{filename}`.
pub fn object_key_for(filename: &str, at: DateTime<Utc>) -> String {
    format!("{}-{}", at.timestamp(), filename)
}

pub(crate) fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be empty".into());
        return Err(err);
    }
    Ok(())
}

fn validate_filename(filename: &str) -> Result<(), ValidationError> {
    validate_not_blank(filename)?;
    if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
        let mut err = ValidationError::new("path");
        err.message = Some("Filename must not contain path separators or '..'".into());
        return Err(err);
    }
    if filename.chars().any(|c| c.is_control()) {
        let mut err = ValidationError::new("control");
        err.message = Some("Filename must not contain control characters".into());
        return Err(err);
    }
    Ok(())
}
