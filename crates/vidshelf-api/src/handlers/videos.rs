//! Video record handlers: list, register, delete.

use crate::error::{HttpAppError, ValidatedJson};
use crate::state::VideoState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;
use vidshelf_core::models::{CreateVideoRequest, MessageResponse, NewVideo, VideoRecord};
use vidshelf_core::AppError;

#[tracing::instrument(skip(state), fields(operation = "list_videos"))]
pub async fn list_videos(
    State(state): State<VideoState>,
) -> Result<Json<Vec<VideoRecord>>, HttpAppError> {
    let videos = state.store.find_all().await?;
    Ok(Json(videos))
}

#[tracing::instrument(
    skip(state, request),
    fields(video_key = %request.video_key, size = request.size, operation = "create_video")
)]
pub async fn create_video(
    State(state): State<VideoState>,
    ValidatedJson(request): ValidatedJson<CreateVideoRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate()?;

    let public_domain = state.public_domain.as_deref().ok_or_else(|| {
        AppError::Misconfigured("Public domain configuration missing".to_string())
    })?;

    let video = state
        .store
        .create(NewVideo::from_request(request, public_domain)?)
        .await?;

    tracing::info!(video_id = video.id, url = %video.url, "Video created");

    Ok((StatusCode::CREATED, Json(video)))
}

/// Storage object first, then the row. If storage fails the record is kept so
/// the client can retry.
#[tracing::instrument(skip(state), fields(operation = "delete_video"))]
pub async fn delete_video(
    State(state): State<VideoState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, HttpAppError> {
    let id: i64 = id
        .parse()
        .map_err(|_| AppError::InvalidInput("Invalid video ID".to_string()))?;

    let video = state
        .store
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    state.storage.delete(&video.video_key).await.map_err(|e| {
        tracing::error!(
            error = %e,
            video_id = id,
            video_key = %video.video_key,
            "Failed to delete video from storage; record kept"
        );
        e
    })?;

    if !state.store.delete(id).await? {
        // Removed concurrently between lookup and delete
        return Err(AppError::NotFound("Video not found".to_string()).into());
    }

    tracing::info!(video_id = id, video_key = %video.video_key, "Video deleted");

    Ok(Json(MessageResponse::new("Video deleted successfully")))
}
