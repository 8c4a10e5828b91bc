//! Wire models for the AISSAM REST API.
//!
//! Field names follow the backend JSON contract verbatim; timestamps are
//! RFC 3339 and deserialize through chrono.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length of a session title derived from its first message.
const DERIVED_TITLE_LEN: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    /// School grade label, e.g. "고1".."고3"
    pub grade: String,
}

/// Registration payload for `POST /register`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password: String,
    pub grade: String,
}

/// Bearer token returned by `POST /token`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: i64,
    pub user_id: i64,
    pub subject_id: i64,
    pub subject: Subject,
    pub title: String,
    pub message_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Creation payload for `POST /chat-sessions`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewChatSession {
    pub subject_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub session_id: i64,
    pub content: String,
    pub is_user: bool,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Both sides of one send: the echoed user message and the tutor's reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatExchange {
    pub user_message: Message,
    pub ai_response: Message,
}

/// An image to attach to an outgoing message.
#[derive(Debug, Clone)]
pub struct ImageAttachment {
    pub file_name: String,
    /// MIME type, e.g. "image/png"
    pub media_type: String,
    pub bytes: Vec<u8>,
}

/// An unsent message as composed by the user.
///
/// Returned inside `SendFailure` when sending fails, so the caller can
/// restore the input state instead of losing the draft.
#[derive(Debug, Clone, Default)]
pub struct MessageDraft {
    pub content: String,
    pub image: Option<ImageAttachment>,
}

impl MessageDraft {
    /// Create a text-only draft
    pub fn text(content: impl Into<String>) -> Self {
        MessageDraft {
            content: content.into(),
            image: None,
        }
    }

    /// Attach an image to the draft
    pub fn with_image(mut self, image: ImageAttachment) -> Self {
        self.image = Some(image);
        self
    }

    /// True when there is nothing to send
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty() && self.image.is_none()
    }

    /// Session title derived from the draft: the first 50 characters,
    /// with an ellipsis when truncated.
    pub fn derived_title(&self) -> String {
        let content = self.content.trim();
        let mut title: String = content.chars().take(DERIVED_TITLE_LEN).collect();
        if content.chars().count() > DERIVED_TITLE_LEN {
            title.push_str("...");
        }
        title
    }
}
