use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::message::{Message, MessageId};

/// Opaque identifier of a conversation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(String);

impl ConversationId {
    /// Generates a fresh unique id.
    #[inline]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the id as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ConversationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ConversationId {
    #[inline]
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A conversation: an ordered list of messages plus bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique identifier of this conversation.
    pub id: ConversationId,
    /// User-visible title.
    pub title: String,
    /// The model identifier used for completions in this conversation.
    pub model: String,
    /// Messages in chronological order.
    pub messages: Vec<Message>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Time of the last change.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker. Deleted conversations are excluded from
    /// summaries but remain fetchable.
    #[serde(default)]
    pub deleted: bool,
}

impl Conversation {
    /// Creates an empty conversation.
    pub fn new<T: Into<String>, M: Into<String>>(title: T, model: M) -> Self {
        let now = Utc::now();
        Self {
            id: ConversationId::generate(),
            title: title.into(),
            model: model.into(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
            deleted: false,
        }
    }

    /// Appends a message and bumps `updated_at`.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
        self.updated_at = Utc::now();
    }

    /// Returns the message with the given id, if present.
    pub fn message(&self, id: &MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| &m.id == id)
    }

    /// Returns a mutable reference to the message with the given id.
    pub fn message_mut(&mut self, id: &MessageId) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| &m.id == id)
    }

    /// Forces `has_animated` on every message.
    ///
    /// Applied to conversations loaded from persisted storage:
    /// historical messages must never re-trigger a reveal session,
    /// regardless of the persisted flag value.
    pub fn force_animated(&mut self) {
        for message in &mut self.messages {
            message.has_animated = true;
        }
    }

    /// Produces a lightweight summary of this conversation.
    #[inline]
    pub fn summary(&self) -> ConversationSummary {
        ConversationSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            model: self.model.clone(),
            updated_at: self.updated_at,
        }
    }
}

/// A lightweight listing entry for a conversation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSummary {
    /// Unique identifier of the conversation.
    pub id: ConversationId,
    /// User-visible title.
    pub title: String,
    /// The model identifier used in the conversation.
    pub model: String,
    /// Time of the last change.
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_force_animated() {
        let mut conversation = Conversation::new("Chat", "gpt-5.2");
        conversation.push(Message::user("Hi"));
        conversation.push(Message::assistant("Hello!"));
        assert!(!conversation.messages[1].has_animated);

        conversation.force_animated();
        assert!(conversation.messages.iter().all(|m| m.has_animated));
    }

    #[test]
    fn test_push_bumps_updated_at() {
        let mut conversation = Conversation::new("Chat", "gpt-5.2");
        let created = conversation.updated_at;
        conversation.push(Message::user("Hi"));
        assert!(conversation.updated_at >= created);
        assert_eq!(conversation.messages.len(), 1);
    }
}
