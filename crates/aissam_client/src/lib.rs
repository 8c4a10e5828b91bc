pub mod api;
pub mod client_trait;
pub mod error;

pub use aissam_core::ClientConfig;
pub use api::client::ApiClient;
pub use api::models::{
    ChatExchange, ChatSession, ImageAttachment, Message, MessageDraft, NewChatSession, NewUser,
    Subject, Token, User,
};
pub use client_trait::ApiClientTrait;
pub use error::{ApiError, Result, SendFailure};
