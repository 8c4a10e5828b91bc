use async_trait::async_trait;

use crate::api::models::{
    ChatExchange, ChatSession, Message, MessageDraft, NewChatSession, NewUser, Subject, Token,
    User,
};
use crate::error::{Result, SendFailure};

/// Object-safe surface of the AISSAM API client, for callers that want to
/// swap in a test double.
#[async_trait]
pub trait ApiClientTrait: Send + Sync {
    async fn register(&self, new_user: &NewUser) -> Result<User>;

    /// Exchange credentials for a bearer token and store it for
    /// subsequent calls.
    async fn login(&self, email: &str, password: &str) -> Result<Token>;

    /// Drop the stored bearer token.
    async fn logout(&self);

    async fn me(&self) -> Result<User>;

    async fn subjects(&self) -> Result<Vec<Subject>>;

    async fn sessions(&self) -> Result<Vec<ChatSession>>;

    async fn session(&self, session_id: i64) -> Result<ChatSession>;

    async fn create_session(&self, new_session: &NewChatSession) -> Result<ChatSession>;

    async fn messages(&self, session_id: i64) -> Result<Vec<Message>>;

    /// Send a message, optionally with an image attachment. On failure the
    /// draft is handed back inside the error.
    async fn send_message(
        &self,
        session_id: i64,
        draft: MessageDraft,
    ) -> std::result::Result<ChatExchange, SendFailure>;
}
