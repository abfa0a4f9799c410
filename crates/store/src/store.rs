use std::error::Error;
use std::fmt::{self, Display, Formatter};

use async_trait::async_trait;
use inkflow_model::{
    Conversation, ConversationId, ConversationSummary, Message, MessageId,
};

/// Errors returned by a conversation store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// No conversation exists for the given id.
    ConversationNotFound(ConversationId),
    /// No message exists for the given id in the conversation.
    MessageNotFound(MessageId),
    /// A conversation with this id already exists.
    AlreadyExists(ConversationId),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConversationNotFound(id) => {
                write!(f, "conversation {id} not found")
            }
            Self::MessageNotFound(id) => write!(f, "message {id} not found"),
            Self::AlreadyExists(id) => {
                write!(f, "conversation {id} already exists")
            }
        }
    }
}

impl Error for StoreError {}

/// CRUD surface of the conversation store.
///
/// Implementations own their persistence semantics (file, database,
/// or in-memory); callers treat every operation as fire-and-forget
/// durability-wise and keep their own in-memory working copy.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Persists a new conversation.
    async fn create(&self, conversation: Conversation)
    -> Result<(), StoreError>;

    /// Fetches a conversation by id.
    ///
    /// Note that fetching returns the raw persisted state; forcing
    /// `has_animated` on loaded messages is the caller's job.
    async fn fetch(
        &self,
        id: &ConversationId,
    ) -> Result<Conversation, StoreError>;

    /// Lists summaries of all conversations that are not soft-deleted,
    /// most recently updated first.
    async fn list_summaries(
        &self,
    ) -> Result<Vec<ConversationSummary>, StoreError>;

    /// Renames a conversation.
    async fn rename(
        &self,
        id: &ConversationId,
        title: String,
    ) -> Result<(), StoreError>;

    /// Marks a conversation as deleted without destroying it.
    async fn soft_delete(&self, id: &ConversationId) -> Result<(), StoreError>;

    /// Appends a message to a conversation.
    async fn append_message(
        &self,
        id: &ConversationId,
        message: Message,
    ) -> Result<(), StoreError>;

    /// Removes a message and everything after it.
    ///
    /// Used by edit/regenerate flows, which replace the tail of the
    /// conversation with a fresh entry.
    async fn truncate_from(
        &self,
        id: &ConversationId,
        message_id: &MessageId,
    ) -> Result<(), StoreError>;

    /// Sets `has_animated` on a message.
    ///
    /// The flag is monotonic; implementations never clear it.
    async fn set_animated(
        &self,
        id: &ConversationId,
        message_id: &MessageId,
    ) -> Result<(), StoreError>;
}
