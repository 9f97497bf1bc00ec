use log::{ debug, error, info, warn };
use std::sync::Arc;
use crate::backend::Backend;
use crate::models::chat::Role;
use crate::speech::{ SpeechRecognizer, SpeechSynthesizer, VOICE_UNSUPPORTED_TOOLTIP };
use crate::store::{ ConversationStore, DeleteOutcome, StoreError };
use crate::view::{ ChatView, PanelPlaceholder };

pub const SEND_FAILURE_REPLY: &str = "Sorry, I encountered an error. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input, nothing was rendered or sent.
    Skipped,
    Replied,
    Failed,
}

/// Owns the active conversation pointer and drives every user action.
pub struct ChatSession {
    backend: Arc<dyn Backend>,
    store: ConversationStore,
    view: Arc<dyn ChatView>,
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    recognizer: Option<Arc<dyn SpeechRecognizer>>,
    current_conversation_id: Option<String>,
}

impl ChatSession {
    pub fn new(backend: Arc<dyn Backend>, view: Arc<dyn ChatView>) -> Self {
        Self {
            store: ConversationStore::new(backend.clone()),
            backend,
            view,
            synthesizer: None,
            recognizer: None,
            current_conversation_id: None,
        }
    }

    pub fn with_synthesizer(mut self, synthesizer: Option<Arc<dyn SpeechSynthesizer>>) -> Self {
        self.synthesizer = synthesizer;
        self
    }

    pub fn with_recognizer(mut self, recognizer: Option<Arc<dyn SpeechRecognizer>>) -> Self {
        self.recognizer = recognizer;
        self
    }

    pub fn current_conversation_id(&self) -> Option<&str> {
        self.current_conversation_id.as_deref()
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// First load: reports missing speech capabilities, then fills the list.
    pub async fn start(&mut self) -> Result<(), StoreError> {
        if self.synthesizer.is_none() {
            info!("Text-to-speech is not available; bot replies will not be spoken.");
        }
        if self.recognizer.is_none() {
            info!("Speech recognition is not available; voice input disabled.");
            self.view.disable_voice_input(VOICE_UNSUPPORTED_TOOLTIP);
        }
        self.refresh().await
    }

    /// Reloads the list and, when nothing is active, opens the first conversation.
    pub async fn refresh(&mut self) -> Result<(), StoreError> {
        let current = self.current_conversation_id.clone();
        let first = self.store.refresh(self.view.as_ref(), current.as_deref()).await?;
        if let Some(id) = first {
            self.select(&id).await?;
        }
        Ok(())
    }

    pub async fn select(&mut self, id: &str) -> Result<bool, StoreError> {
        self.current_conversation_id = Some(id.to_string());
        self.view.show_panel_placeholder(PanelPlaceholder::Loading);

        if let Err(e) = self.store.fetch().await {
            error!("Error loading conversation {}: {}", id, e);
            self.view.show_panel_placeholder(PanelPlaceholder::LoadError);
            return Err(e);
        }
        self.store.render(self.view.as_ref(), Some(id));

        let messages = match self.store.find_by_id(id) {
            Some(conv) => conv.messages.clone(),
            None => {
                warn!("Conversation {} not found", id);
                self.view.show_panel_placeholder(PanelPlaceholder::NotFound);
                return Ok(false);
            }
        };

        self.view.clear_messages();
        for message in &messages {
            self.render_message(message.role, &message.content);
        }
        Ok(true)
    }

    /// Optimistic append, request, then reconcile. The user's message is never
    /// retracted.
    pub async fn send_message(&mut self, text: &str) -> SendOutcome {
        let message = text.trim();
        if message.is_empty() {
            return SendOutcome::Skipped;
        }

        self.render_message(Role::User, message);
        self.view.clear_input();
        self.view.show_typing_indicator();
        self.view.scroll_to_end();

        let result = self.backend.send_message(message, self.current_conversation_id.as_deref()).await;
        self.view.remove_typing_indicator();

        match result {
            Ok(reply) => {
                self.render_message(Role::Bot, &reply.response);
                self.current_conversation_id = Some(reply.conversation_id);
                if let Err(e) = self.refresh().await {
                    debug!("List refresh after send failed: {}", e);
                }
                SendOutcome::Replied
            }
            Err(e) => {
                error!("Error sending message: {}", e);
                self.render_message(Role::Bot, SEND_FAILURE_REPLY);
                SendOutcome::Failed
            }
        }
    }

    pub async fn create_conversation(&mut self) -> Result<(), StoreError> {
        match self.store.create().await {
            Ok(id) => {
                self.current_conversation_id = Some(id);
                self.view.clear_messages();
                self.refresh().await
            }
            Err(e) => {
                error!("Error creating new chat: {}", e);
                Err(e)
            }
        }
    }

    pub async fn delete_conversation(&mut self, id: &str) -> Result<DeleteOutcome, StoreError> {
        let outcome = self.store.delete(self.view.as_ref(), id).await?;
        if outcome == DeleteOutcome::Deleted && self.current_conversation_id.as_deref() == Some(id) {
            self.current_conversation_id = None;
            self.view.show_panel_placeholder(PanelPlaceholder::NoSelection);
        }
        Ok(outcome)
    }

    /// Single-shot recognition into the input field. Returns the transcript
    /// when one was placed there.
    pub async fn start_voice_input(&self) -> Option<String> {
        let recognizer = match &self.recognizer {
            Some(r) => r.clone(),
            None => {
                warn!("Voice input requested but speech recognition is unavailable");
                self.view.disable_voice_input(VOICE_UNSUPPORTED_TOOLTIP);
                return None;
            }
        };

        match recognizer.recognize().await {
            Ok(transcript) => {
                self.view.set_input(&transcript);
                Some(transcript)
            }
            Err(e) => {
                error!("Speech recognition error: {}", e);
                None
            }
        }
    }

    fn render_message(&self, role: Role, content: &str) {
        self.view.append_message(role, content);
        self.view.scroll_to_end();
        if role == Role::Bot {
            self.speak(content);
        }
    }

    fn speak(&self, text: &str) {
        match &self.synthesizer {
            Some(synth) => synth.speak(text),
            None => debug!("Text-to-speech is not supported, skipping bot reply"),
        }
    }
}
