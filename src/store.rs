use log::{ debug, error, info };
use std::sync::Arc;
use thiserror::Error;
use crate::backend::{ Backend, BackendError };
use crate::models::chat::Conversation;
use crate::view::{ ChatView, ListEntry, ListPlaceholder };

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("backend refused the request: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

/// Local mirror of the backend's conversation list.
///
/// `conversations` is always the body of the last successful fetch; `entries`
/// is what the list currently shows, which only diverges from it after a
/// delete removes a row.
pub struct ConversationStore {
    backend: Arc<dyn Backend>,
    conversations: Vec<Conversation>,
    entries: Vec<ListEntry>,
}

impl ConversationStore {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            conversations: Vec::new(),
            entries: Vec::new(),
        }
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn entries(&self) -> &[ListEntry] {
        &self.entries
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    /// Replaces the cache with the backend's current list without touching the view.
    pub async fn fetch(&mut self) -> Result<(), StoreError> {
        let conversations = self.backend.list_conversations().await?;
        debug!("Fetched {} conversations", conversations.len());
        self.conversations = conversations;
        Ok(())
    }

    /// Rebuilds the visible list from the cache.
    pub fn render(&mut self, view: &dyn ChatView, active: Option<&str>) {
        self.entries = self.conversations
            .iter()
            .map(|conv| ListEntry {
                id: conv.id.clone(),
                display_name: conv.display_name(),
                active: false,
            })
            .collect();

        if self.entries.is_empty() {
            view.show_list_placeholder(ListPlaceholder::Empty);
            return;
        }
        view.render_conversation_list(&self.entries);
        self.mark_active(view, active);
    }

    /// Fetches and re-renders the list. Returns the conversation that should be
    /// selected when nothing is active yet.
    pub async fn refresh(
        &mut self,
        view: &dyn ChatView,
        active: Option<&str>
    ) -> Result<Option<String>, StoreError> {
        if let Err(e) = self.fetch().await {
            error!("Error fetching conversations: {}", e);
            self.entries.clear();
            view.show_list_placeholder(ListPlaceholder::LoadError);
            return Err(e);
        }
        self.render(view, active);

        if active.is_none() {
            return Ok(self.conversations.first().map(|c| c.id.clone()));
        }
        Ok(None)
    }

    /// Flags the entry matching `active` and clears every other flag.
    pub fn mark_active(&mut self, view: &dyn ChatView, active: Option<&str>) {
        for entry in &mut self.entries {
            entry.active = active == Some(entry.id.as_str());
        }
        view.update_active_markers(&self.entries);
    }

    pub async fn create(&self) -> Result<String, StoreError> {
        let id = self.backend.create_conversation().await?;
        info!("Created conversation {}", id);
        Ok(id)
    }

    /// Asks for confirmation, then deletes. The confirmation is dismissed on
    /// every path; the list is only touched when the backend confirms, and is
    /// then redrawn with the remaining entries.
    pub async fn delete(&mut self, view: &dyn ChatView, id: &str) -> Result<DeleteOutcome, StoreError> {
        let name = self.entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.display_name.clone())
            .unwrap_or_else(|| id.to_string());

        if !view.confirm_delete(&name).await {
            debug!("Delete of {} cancelled", id);
            view.dismiss_confirmation();
            return Ok(DeleteOutcome::Cancelled);
        }

        let result = self.backend.delete_conversation(id).await;
        view.dismiss_confirmation();

        match result {
            Ok(resp) if resp.message.is_some() => {
                info!("Deleted conversation {}", id);
                self.conversations.retain(|c| c.id != id);
                self.entries.retain(|e| e.id != id);
                view.remove_conversation_entry(id);
                // Positions shift after a removal, so the list is redrawn.
                if self.entries.is_empty() {
                    view.show_list_placeholder(ListPlaceholder::Empty);
                } else {
                    view.render_conversation_list(&self.entries);
                }
                Ok(DeleteOutcome::Deleted)
            }
            Ok(resp) => {
                let reason = resp.error.unwrap_or_else(|| "Unknown error".to_string());
                error!("Error from server while deleting {}: {}", id, reason);
                Err(StoreError::Rejected(reason))
            }
            Err(e) => {
                error!("Error during deletion of {}: {}", id, e);
                Err(e.into())
            }
        }
    }
}
