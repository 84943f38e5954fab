//! Upload permission issuance guarded by the storage quota.

use crate::error::{HttpAppError, ValidatedJson};
use crate::state::UploadState;
use axum::{extract::State, Json};
use chrono::Utc;
use validator::Validate;
use vidshelf_core::models::{object_key_for, UploadGrant, UploadUrlRequest, UploadUrlResponse};
use vidshelf_core::AdmissionMode;

#[tracing::instrument(
    skip(state, request),
    fields(filename = %request.filename, size = request.size, mode = %state.mode)
)]
pub async fn create_upload_url(
    State(state): State<UploadState>,
    ValidatedJson(request): ValidatedJson<UploadUrlRequest>,
) -> Result<Json<UploadUrlResponse>, HttpAppError> {
    request.validate()?;

    let issued_at = Utc::now();
    let key = object_key_for(&request.filename, issued_at);

    let grant = match state.mode {
        AdmissionMode::BestEffort => {
            let current_total = state.store.sum_sizes().await?;
            state.policy.evaluate(request.size, current_total)?;
            state.signer.issue(&key, issued_at).await?
        }
        AdmissionMode::Reserved => issue_reserved(&state, &key, request.size, issued_at).await?,
    };

    tracing::info!(
        key = %grant.object_key,
        expires_at = %grant.expires_at,
        "Upload URL issued"
    );

    Ok(Json(grant.into()))
}

/// Reserve capacity, then sign. A failed signature releases the reservation.
async fn issue_reserved(
    state: &UploadState,
    key: &str,
    size: u64,
    issued_at: chrono::DateTime<Utc>,
) -> Result<UploadGrant, HttpAppError> {
    let expires_at = state.signer.expires_at(issued_at)?;
    state
        .store
        .reserve_upload(key, size, expires_at, &state.policy)
        .await?;

    match state.signer.issue(key, issued_at).await {
        Ok(grant) => Ok(grant),
        Err(e) => {
            if let Err(release_err) = state.store.release_reservation(key).await {
                tracing::warn!(
                    error = %release_err,
                    key = %key,
                    "Failed to release reservation after signing failure; it will lapse at expiry"
                );
            }
            Err(e.into())
        }
    }
}
