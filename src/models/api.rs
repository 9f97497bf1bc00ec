use serde::{ Serialize, Deserialize };
use crate::models::chat::Conversation;

#[derive(Serialize, Debug)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    /// `None` serializes as `null`, asking the backend to start a new conversation.
    pub conversation_id: Option<&'a str>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatResponse {
    pub response: String,
    pub conversation_id: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ConversationList {
    pub conversations: Vec<Conversation>,
}

#[derive(Serialize, Debug, Default)]
pub struct CreateConversationRequest {}

#[derive(Deserialize, Debug, Clone)]
pub struct CreateConversationResponse {
    pub conversation_id: String,
}

#[derive(Serialize, Debug)]
pub struct DeleteConversationRequest<'a> {
    pub conversation_id: &'a str,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct DeleteConversationResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body the backend attaches to non-2xx replies.
#[derive(Deserialize, Debug, Clone)]
pub struct ErrorBody {
    pub error: String,
}
