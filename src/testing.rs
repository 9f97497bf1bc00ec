//! Mock collaborators for exercising the store and session without a
//! backend, a terminal or speech engines.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{ AtomicBool, AtomicUsize, Ordering };
use crate::backend::{ Backend, BackendError };
use crate::models::api::{ ChatResponse, DeleteConversationResponse };
use crate::models::chat::{ ChatMessage, Conversation, Role };
use crate::speech::{ SpeechError, SpeechRecognizer, SpeechSynthesizer };
use crate::view::{ ChatView, ListEntry, ListPlaceholder, PanelPlaceholder };

pub fn conversation(id: &str, messages: Vec<ChatMessage>) -> Conversation {
    Conversation {
        id: id.to_string(),
        name: None,
        messages,
    }
}

fn network_error(msg: &str) -> BackendError {
    BackendError::Status { status: 503, message: msg.to_string() }
}

/// In-memory backend that behaves like the real one and records every call.
#[derive(Default)]
pub struct MockBackend {
    conversations: Mutex<Vec<Conversation>>,
    calls: Mutex<Vec<String>>,
    next_id: AtomicUsize,
    pub fail_list: AtomicBool,
    pub fail_send: AtomicBool,
    pub fail_create: AtomicBool,
    /// Replies to deletes with 200 but no `message` field.
    pub delete_without_message: AtomicBool,
}

impl MockBackend {
    pub fn with_conversations(conversations: Vec<Conversation>) -> Self {
        Self {
            conversations: Mutex::new(conversations),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == call || c.starts_with(&format!("{}:", call))).count()
    }

    pub fn stored(&self) -> Vec<Conversation> {
        self.conversations.lock().unwrap().clone()
    }

    /// Removes a conversation behind the client's back.
    pub fn forget(&self, id: &str) {
        self.conversations.lock().unwrap().retain(|c| c.id != id);
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn new_id(&self) -> String {
        format!("conv-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn list_conversations(&self) -> Result<Vec<Conversation>, BackendError> {
        self.record("list".to_string());
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(network_error("list unavailable"));
        }
        Ok(self.stored())
    }

    async fn create_conversation(&self) -> Result<String, BackendError> {
        self.record("create".to_string());
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(network_error("create unavailable"));
        }
        let id = self.new_id();
        self.conversations.lock().unwrap().push(conversation(&id, Vec::new()));
        Ok(id)
    }

    async fn send_message(
        &self,
        message: &str,
        conversation_id: Option<&str>
    ) -> Result<ChatResponse, BackendError> {
        self.record(format!("chat:{}", conversation_id.unwrap_or("null")));
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(network_error("chat unavailable"));
        }
        let id = conversation_id.map(str::to_string).unwrap_or_else(|| self.new_id());
        let reply = format!("echo: {}", message);
        let mut conversations = self.conversations.lock().unwrap();
        let turns = [ChatMessage::user(message), ChatMessage::bot(reply.clone())];
        match conversations.iter().position(|c| c.id == id) {
            Some(idx) => conversations[idx].messages.extend(turns),
            None => conversations.push(conversation(&id, turns.to_vec())),
        }
        Ok(ChatResponse { response: reply, conversation_id: id })
    }

    async fn delete_conversation(
        &self,
        conversation_id: &str
    ) -> Result<DeleteConversationResponse, BackendError> {
        self.record(format!("delete:{}", conversation_id));
        if self.delete_without_message.load(Ordering::SeqCst) {
            return Ok(DeleteConversationResponse {
                message: None,
                error: Some("Unknown error".to_string()),
            });
        }
        let mut conversations = self.conversations.lock().unwrap();
        let before = conversations.len();
        conversations.retain(|c| c.id != conversation_id);
        if conversations.len() == before {
            return Err(BackendError::Status {
                status: 404,
                message: "Conversation not found".to_string(),
            });
        }
        Ok(DeleteConversationResponse {
            message: Some("Conversation deleted successfully".to_string()),
            error: None,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PanelItem {
    Message(Role, String),
    Placeholder(PanelPlaceholder),
    Typing,
}

/// View that keeps the rendered state in memory.
pub struct RecordingView {
    pub entries: Mutex<Vec<ListEntry>>,
    pub list_placeholder: Mutex<Option<ListPlaceholder>>,
    pub panel: Mutex<Vec<PanelItem>>,
    pub input: Mutex<String>,
    pub voice_tooltip: Mutex<Option<String>>,
    pub modal_open: AtomicBool,
    pub confirms: AtomicUsize,
    pub scrolls: AtomicUsize,
    pub list_renders: AtomicUsize,
    pub answer: AtomicBool,
}

impl Default for RecordingView {
    fn default() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            list_placeholder: Mutex::new(None),
            panel: Mutex::new(Vec::new()),
            input: Mutex::new(String::new()),
            voice_tooltip: Mutex::new(None),
            modal_open: AtomicBool::new(false),
            confirms: AtomicUsize::new(0),
            scrolls: AtomicUsize::new(0),
            list_renders: AtomicUsize::new(0),
            answer: AtomicBool::new(true),
        }
    }
}

impl RecordingView {
    pub fn entries(&self) -> Vec<ListEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn active_ids(&self) -> Vec<String> {
        self.entries().into_iter().filter(|e| e.active).map(|e| e.id).collect()
    }

    pub fn panel(&self) -> Vec<PanelItem> {
        self.panel.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<(Role, String)> {
        self.panel()
            .into_iter()
            .filter_map(|item| match item {
                PanelItem::Message(role, content) => Some((role, content)),
                _ => None,
            })
            .collect()
    }

    pub fn list_placeholder(&self) -> Option<ListPlaceholder> {
        *self.list_placeholder.lock().unwrap()
    }

    pub fn set_input_text(&self, text: &str) {
        *self.input.lock().unwrap() = text.to_string();
    }

    pub fn input(&self) -> String {
        self.input.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatView for RecordingView {
    fn render_conversation_list(&self, entries: &[ListEntry]) {
        self.list_renders.fetch_add(1, Ordering::SeqCst);
        *self.list_placeholder.lock().unwrap() = None;
        *self.entries.lock().unwrap() = entries.to_vec();
    }

    fn show_list_placeholder(&self, placeholder: ListPlaceholder) {
        self.entries.lock().unwrap().clear();
        *self.list_placeholder.lock().unwrap() = Some(placeholder);
    }

    fn remove_conversation_entry(&self, id: &str) {
        self.entries.lock().unwrap().retain(|e| e.id != id);
    }

    fn update_active_markers(&self, entries: &[ListEntry]) {
        *self.entries.lock().unwrap() = entries.to_vec();
    }

    fn clear_messages(&self) {
        self.panel.lock().unwrap().clear();
    }

    fn show_panel_placeholder(&self, placeholder: PanelPlaceholder) {
        *self.panel.lock().unwrap() = vec![PanelItem::Placeholder(placeholder)];
    }

    fn append_message(&self, role: Role, content: &str) {
        self.panel.lock().unwrap().push(PanelItem::Message(role, content.to_string()));
    }

    fn show_typing_indicator(&self) {
        self.panel.lock().unwrap().push(PanelItem::Typing);
    }

    fn remove_typing_indicator(&self) {
        self.panel.lock().unwrap().retain(|item| *item != PanelItem::Typing);
    }

    fn scroll_to_end(&self) {
        self.scrolls.fetch_add(1, Ordering::SeqCst);
    }

    async fn confirm_delete(&self, _display_name: &str) -> bool {
        self.confirms.fetch_add(1, Ordering::SeqCst);
        self.modal_open.store(true, Ordering::SeqCst);
        self.answer.load(Ordering::SeqCst)
    }

    fn dismiss_confirmation(&self) {
        self.modal_open.store(false, Ordering::SeqCst);
    }

    fn set_input(&self, text: &str) {
        self.set_input_text(text);
    }

    fn clear_input(&self) {
        self.input.lock().unwrap().clear();
    }

    fn disable_voice_input(&self, tooltip: &str) {
        *self.voice_tooltip.lock().unwrap() = Some(tooltip.to_string());
    }
}

#[derive(Default)]
pub struct RecordingSynthesizer {
    pub spoken: Mutex<Vec<String>>,
}

impl RecordingSynthesizer {
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

impl SpeechSynthesizer for RecordingSynthesizer {
    fn speak(&self, text: &str) {
        self.spoken.lock().unwrap().push(text.to_string());
    }
}

pub struct FixedRecognizer {
    pub transcript: Option<String>,
}

#[async_trait]
impl SpeechRecognizer for FixedRecognizer {
    async fn recognize(&self) -> Result<String, SpeechError> {
        self.transcript.clone().ok_or(SpeechError::Failed("no-speech".to_string()))
    }
}
