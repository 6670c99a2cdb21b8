use std::path::PathBuf;

use shared::{domain::VideoId, error::ErrorReason};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("upload policy request failed for video {video_id}: {message}")]
    AuthFailure { video_id: VideoId, message: String },
    #[error("storage submit failed (status {status:?}): {message}")]
    StorageSubmitFailure { status: Option<u16>, message: String },
    #[error("failed to update video {video_id}: {message}")]
    VideoUpdateFailure { video_id: VideoId, message: String },
    #[error("invalid endpoint url '{url}': {message}")]
    InvalidEndpoint { url: String, message: String },
    #[error("failed to read upload file '{}': {source}", path.display())]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ClientError {
    /// Reason code of the error view this failure lands on, if it has one.
    /// Video updates fail inline and never redirect.
    pub fn error_reason(&self) -> Option<ErrorReason> {
        match self {
            ClientError::AuthFailure { .. } | ClientError::InvalidEndpoint { .. } => {
                Some(ErrorReason::Policy)
            }
            ClientError::StorageSubmitFailure { .. } | ClientError::FileRead { .. } => {
                Some(ErrorReason::Upload)
            }
            ClientError::VideoUpdateFailure { .. } => None,
        }
    }
}
