use thiserror::Error;

use crate::api::models::MessageDraft;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error ({status}): {detail}")]
    Api { status: u16, detail: String },

    #[error("Authentication required: {0}")]
    AuthRequired(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// A failed send, carrying the unsent draft back to the caller.
///
/// The client keeps no UI state; whoever owns the input decides whether to
/// restore the draft and retry.
#[derive(Debug, Error)]
#[error("failed to send message")]
pub struct SendFailure {
    pub draft: MessageDraft,
    #[source]
    pub error: ApiError,
}
