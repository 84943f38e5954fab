use crate::constants::LIVENESS_MESSAGE;
use axum::Json;
use vidshelf_core::models::MessageResponse;

/// `GET /` - plain liveness message.
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new(LIVENESS_MESSAGE))
}
