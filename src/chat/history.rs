//! Role-tagged conversation history.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorRole {
    System,
    User,
    Assistant,
    Tool,
}

impl fmt::Display for AuthorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
            Self::Tool => write!(f, "tool"),
        }
    }
}

/// A single message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: AuthorRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: AuthorRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Ordered message list sent to the inference engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatHistory {
    messages: Vec<ChatMessage>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A history holding only the system preamble.
    pub fn with_system(preamble: impl Into<String>) -> Self {
        let mut history = Self::new();
        history.add_message(AuthorRole::System, preamble);
        history
    }

    pub fn add_message(&mut self, role: AuthorRole, content: impl Into<String>) {
        self.messages.push(ChatMessage::new(role, content));
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_system() {
        let history = ChatHistory::with_system("be brief");
        assert_eq!(history.len(), 1);
        assert_eq!(history.messages()[0].role, AuthorRole::System);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let msg = ChatMessage::new(AuthorRole::Tool, "Current Time: now");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "tool");
        assert_eq!(json["content"], "Current Time: now");
    }
}
