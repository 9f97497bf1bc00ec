pub mod http;

use async_trait::async_trait;
use thiserror::Error;
use crate::models::api::{ ChatResponse, DeleteConversationResponse };
use crate::models::chat::Conversation;

pub use self::http::HttpBackend;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("backend returned HTTP {status}: {message}")]
    Status {
        status: u16,
        message: String,
    },
    #[error("could not decode backend response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid backend url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl BackendError {
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The chat backend's four endpoints. Every call is a single request with no
/// retry, timeout or cancellation.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn list_conversations(&self) -> Result<Vec<Conversation>, BackendError>;

    async fn create_conversation(&self) -> Result<String, BackendError>;

    async fn send_message(
        &self,
        message: &str,
        conversation_id: Option<&str>
    ) -> Result<ChatResponse, BackendError>;

    async fn delete_conversation(
        &self,
        conversation_id: &str
    ) -> Result<DeleteConversationResponse, BackendError>;
}
