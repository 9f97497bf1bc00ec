use serde::{ Serialize, Deserialize };

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    /// Anything the backend sends that is not a user turn renders as a bot turn.
    #[serde(other)]
    Bot,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self { role: Role::Bot, content: content.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    #[serde(rename = "conversation_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

const NAME_PREVIEW_CHARS: usize = 20;
const ID_PREVIEW_CHARS: usize = 8;

impl Conversation {
    /// Name shown in the conversation list. Falls back to a preview of the
    /// first user message, then to a shortened id.
    pub fn display_name(&self) -> String {
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }

        if let Some(first) = self.messages.iter().find(|m| m.role == Role::User) {
            let preview: String = first.content.chars().take(NAME_PREVIEW_CHARS).collect();
            if first.content.chars().count() > NAME_PREVIEW_CHARS {
                return format!("{}...", preview);
            }
            return preview;
        }

        let short_id: String = self.id.chars().take(ID_PREVIEW_CHARS).collect();
        format!("Chat {}", short_id)
    }
}
