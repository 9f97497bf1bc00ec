pub mod terminal;

use async_trait::async_trait;
use crate::models::chat::Role;

pub use self::terminal::TerminalView;

/// One row of the conversation list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListEntry {
    pub id: String,
    pub display_name: String,
    pub active: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListPlaceholder {
    Empty,
    LoadError,
}

impl ListPlaceholder {
    pub fn text(&self) -> &'static str {
        match self {
            ListPlaceholder::Empty => "No previous chats found",
            ListPlaceholder::LoadError => "Error loading conversations",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelPlaceholder {
    Loading,
    NotFound,
    LoadError,
    /// Shown after the active conversation is deleted.
    NoSelection,
}

impl PanelPlaceholder {
    pub fn text(&self) -> &'static str {
        match self {
            PanelPlaceholder::Loading => "Loading...",
            PanelPlaceholder::NotFound => "Conversation not found",
            PanelPlaceholder::LoadError => "Error loading conversation",
            PanelPlaceholder::NoSelection => "Select a conversation to start chatting",
        }
    }
}

/// The display surface the store and session render into.
///
/// Panel placeholders replace the panel contents; `append_message` adds to it.
#[async_trait]
pub trait ChatView: Send + Sync {
    fn render_conversation_list(&self, entries: &[ListEntry]);
    fn show_list_placeholder(&self, placeholder: ListPlaceholder);
    fn remove_conversation_entry(&self, id: &str);
    fn update_active_markers(&self, entries: &[ListEntry]);

    fn clear_messages(&self);
    fn show_panel_placeholder(&self, placeholder: PanelPlaceholder);
    fn append_message(&self, role: Role, content: &str);
    fn show_typing_indicator(&self);
    fn remove_typing_indicator(&self);
    fn scroll_to_end(&self);

    /// Confirm/cancel modal for deletion. Resolves once the user picks.
    async fn confirm_delete(&self, display_name: &str) -> bool;
    fn dismiss_confirmation(&self);

    fn set_input(&self, text: &str);
    fn clear_input(&self);
    fn disable_voice_input(&self, tooltip: &str);
}
