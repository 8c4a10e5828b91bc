use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{multipart, Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::RwLock;

use aissam_core::ClientConfig;

use crate::api::models::{
    ChatExchange, ChatSession, Message, MessageDraft, NewChatSession, NewUser, Subject, Token,
    User,
};
use crate::client_trait::ApiClientTrait;
use crate::error::{ApiError, Result, SendFailure};

/// Error body shape used by the backend, `{"detail": ...}`. The detail is
/// usually a string but validation errors arrive as structured values.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

impl ErrorBody {
    fn detail_text(self) -> String {
        match self.detail {
            serde_json::Value::String(text) => text,
            other => other.to_string(),
        }
    }
}

/// Async client for the AISSAM REST API.
///
/// Holds a shared HTTP client plus the bearer token established by
/// `login`. All configuration is passed in through `ClientConfig`; nothing
/// is read from or written to process-wide state.
#[derive(Debug)]
pub struct ApiClient {
    http: Client,
    config: ClientConfig,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Self::build_http_client(&config)?;
        Ok(ApiClient {
            http,
            config,
            token: RwLock::new(None),
        })
    }

    /// Create a client that resumes an already-authenticated session.
    pub fn with_token(config: ClientConfig, token: impl Into<String>) -> Result<Self> {
        let http = Self::build_http_client(&config)?;
        Ok(ApiClient {
            http,
            config,
            token: RwLock::new(Some(token.into())),
        })
    }

    fn build_http_client(config: &ClientConfig) -> Result<Client> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(ApiError::from)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base, path)
    }

    async fn bearer(&self) -> Result<String> {
        self.token.read().await.clone().ok_or_else(|| {
            ApiError::AuthRequired("no access token stored; call login first".to_string())
        })
    }

    async fn get_authed<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let token = self.bearer().await?;
        debug!("GET {path}");
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn error_from(response: Response) -> ApiError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let detail = match serde_json::from_str::<ErrorBody>(&body) {
            Ok(error_body) => error_body.detail_text(),
            Err(_) if body.trim().is_empty() => "no error detail".to_string(),
            Err(_) => body.trim().to_string(),
        };
        ApiError::Api { status, detail }
    }

    async fn try_send(&self, session_id: i64, draft: &MessageDraft) -> Result<ChatExchange> {
        let token = self.bearer().await?;

        let mut form = multipart::Form::new().text("content", draft.content.clone());
        if let Some(image) = &draft.image {
            let part = multipart::Part::bytes(image.bytes.clone())
                .file_name(image.file_name.clone())
                .mime_str(&image.media_type)?;
            form = form.part("image", part);
        }

        info!(
            "Sending message to session {session_id} ({} bytes of text, image: {})",
            draft.content.len(),
            draft.image.is_some()
        );
        let response = self
            .http
            .post(self.url(&format!("/chat-sessions/{session_id}/messages")))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;
        Self::decode(response).await
    }
}

#[async_trait]
impl ApiClientTrait for ApiClient {
    async fn register(&self, new_user: &NewUser) -> Result<User> {
        info!("Registering user {}", new_user.email);
        let response = self
            .http
            .post(self.url("/register"))
            .json(new_user)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<Token> {
        // OAuth2 password form: the backend expects the email in the
        // `username` field.
        let form = [("username", email), ("password", password)];
        info!("Logging in as {email}");
        let response = self
            .http
            .post(self.url("/token"))
            .form(&form)
            .send()
            .await?;
        let token: Token = Self::decode(response).await?;
        *self.token.write().await = Some(token.access_token.clone());
        Ok(token)
    }

    async fn logout(&self) {
        *self.token.write().await = None;
    }

    async fn me(&self) -> Result<User> {
        self.get_authed("/me").await
    }

    async fn subjects(&self) -> Result<Vec<Subject>> {
        self.get_authed("/subjects").await
    }

    async fn sessions(&self) -> Result<Vec<ChatSession>> {
        self.get_authed("/chat-sessions").await
    }

    async fn session(&self, session_id: i64) -> Result<ChatSession> {
        self.get_authed(&format!("/chat-sessions/{session_id}")).await
    }

    async fn create_session(&self, new_session: &NewChatSession) -> Result<ChatSession> {
        let token = self.bearer().await?;
        info!("Creating chat session for subject {}", new_session.subject_id);
        let response = self
            .http
            .post(self.url("/chat-sessions"))
            .bearer_auth(token)
            .json(new_session)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn messages(&self, session_id: i64) -> Result<Vec<Message>> {
        self.get_authed(&format!("/chat-sessions/{session_id}/messages"))
            .await
    }

    async fn send_message(
        &self,
        session_id: i64,
        draft: MessageDraft,
    ) -> std::result::Result<ChatExchange, SendFailure> {
        match self.try_send(session_id, &draft).await {
            Ok(exchange) => Ok(exchange),
            Err(error) => {
                warn!("Send to session {session_id} failed: {error}");
                Err(SendFailure { draft, error })
            }
        }
    }
}
