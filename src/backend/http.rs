use async_trait::async_trait;
use log::debug;
use reqwest::{ Client as HttpClient, Method, Response };
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;
use super::{ Backend, BackendError };
use crate::models::api::{
    ChatRequest,
    ChatResponse,
    ConversationList,
    CreateConversationRequest,
    CreateConversationResponse,
    DeleteConversationRequest,
    DeleteConversationResponse,
    ErrorBody,
};
use crate::models::chat::Conversation;

const LIST_ROUTE: &str = "get_conversations";
const CREATE_ROUTE: &str = "create_conversation";
const CHAT_ROUTE: &str = "chat";
const DELETE_ROUTE: &str = "delete_conversation";

#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: HttpClient,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        Ok(Self {
            http: HttpClient::new(),
            base_url: normalize_base(base_url)?,
        })
    }

    fn endpoint(&self, route: &str) -> Result<Url, BackendError> {
        Ok(self.base_url.join(route)?)
    }

    async fn request<B, T>(&self, method: Method, route: &str, body: Option<&B>) -> Result<T, BackendError>
        where B: Serialize + ?Sized, T: DeserializeOwned
    {
        let url = self.endpoint(route)?;
        debug!("{} {}", method, url);
        let mut req = self.http.request(method, url);
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().await?;
        decode(resp).await
    }
}

/// Joining relative routes onto a base without a trailing slash would drop its
/// last path segment, so one is added.
fn normalize_base(base_url: &str) -> Result<Url, BackendError> {
    let mut url = Url::parse(base_url)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, BackendError> {
    let status = resp.status();
    let bytes = resp.bytes().await?;
    if !status.is_success() {
        let message = serde_json
            ::from_slice::<ErrorBody>(&bytes)
            .map(|b| b.error)
            .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).trim().to_string());
        return Err(BackendError::Status { status: status.as_u16(), message });
    }
    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait]
impl Backend for HttpBackend {
    async fn list_conversations(&self) -> Result<Vec<Conversation>, BackendError> {
        let list: ConversationList = self.request::<(), _>(Method::GET, LIST_ROUTE, None).await?;
        Ok(list.conversations)
    }

    async fn create_conversation(&self) -> Result<String, BackendError> {
        let created: CreateConversationResponse = self.request(
            Method::POST,
            CREATE_ROUTE,
            Some(&CreateConversationRequest::default())
        ).await?;
        Ok(created.conversation_id)
    }

    async fn send_message(
        &self,
        message: &str,
        conversation_id: Option<&str>
    ) -> Result<ChatResponse, BackendError> {
        let body = ChatRequest { message, conversation_id };
        self.request(Method::POST, CHAT_ROUTE, Some(&body)).await
    }

    async fn delete_conversation(
        &self,
        conversation_id: &str
    ) -> Result<DeleteConversationResponse, BackendError> {
        let body = DeleteConversationRequest { conversation_id };
        self.request(Method::DELETE, DELETE_ROUTE, Some(&body)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_keeps_path_prefix() {
        let backend = HttpBackend::new("http://localhost:5000/chatbot").unwrap();
        assert_eq!(
            backend.endpoint(CHAT_ROUTE).unwrap().as_str(),
            "http://localhost:5000/chatbot/chat"
        );
    }

    #[test]
    fn base_url_without_path() {
        let backend = HttpBackend::new("http://127.0.0.1:5000").unwrap();
        assert_eq!(
            backend.endpoint(LIST_ROUTE).unwrap().as_str(),
            "http://127.0.0.1:5000/get_conversations"
        );
    }

    #[test]
    fn rejects_unparseable_base() {
        assert!(matches!(HttpBackend::new("not a url"), Err(BackendError::InvalidUrl(_))));
    }
}
