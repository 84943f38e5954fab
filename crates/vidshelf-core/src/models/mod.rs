//! Data models for the application

mod upload;
mod video;

pub use upload::*;
pub use video::*;

use serde::{Deserialize, Serialize};

/// Plain `{"message": ...}` body used by liveness and delete responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
