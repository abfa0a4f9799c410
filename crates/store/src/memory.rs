use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use inkflow_model::{
    Conversation, ConversationId, ConversationSummary, Message, MessageId,
};

use crate::store::{ConversationStore, StoreError};

/// An in-memory conversation store.
///
/// Used by tests and the demo binary. All operations are effectively
/// synchronous; the async surface exists only to satisfy the trait.
#[derive(Default)]
pub struct MemoryStore {
    conversations: Mutex<HashMap<ConversationId, Conversation>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_conversation<R>(
        &self,
        id: &ConversationId,
        f: impl FnOnce(&mut Conversation) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let mut conversations = self.conversations.lock().unwrap();
        let conversation = conversations
            .get_mut(id)
            .ok_or_else(|| StoreError::ConversationNotFound(id.clone()))?;
        f(conversation)
    }
}

#[async_trait]
impl ConversationStore for MemoryStore {
    async fn create(
        &self,
        conversation: Conversation,
    ) -> Result<(), StoreError> {
        let mut conversations = self.conversations.lock().unwrap();
        if conversations.contains_key(&conversation.id) {
            return Err(StoreError::AlreadyExists(conversation.id.clone()));
        }
        conversations.insert(conversation.id.clone(), conversation);
        Ok(())
    }

    async fn fetch(
        &self,
        id: &ConversationId,
    ) -> Result<Conversation, StoreError> {
        let conversations = self.conversations.lock().unwrap();
        conversations
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::ConversationNotFound(id.clone()))
    }

    async fn list_summaries(
        &self,
    ) -> Result<Vec<ConversationSummary>, StoreError> {
        let conversations = self.conversations.lock().unwrap();
        let mut summaries: Vec<ConversationSummary> = conversations
            .values()
            .filter(|c| !c.deleted)
            .map(Conversation::summary)
            .collect();
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }

    async fn rename(
        &self,
        id: &ConversationId,
        title: String,
    ) -> Result<(), StoreError> {
        self.with_conversation(id, |conversation| {
            conversation.title = title;
            Ok(())
        })
    }

    async fn soft_delete(&self, id: &ConversationId) -> Result<(), StoreError> {
        self.with_conversation(id, |conversation| {
            conversation.deleted = true;
            Ok(())
        })
    }

    async fn append_message(
        &self,
        id: &ConversationId,
        message: Message,
    ) -> Result<(), StoreError> {
        self.with_conversation(id, |conversation| {
            conversation.push(message);
            Ok(())
        })
    }

    async fn truncate_from(
        &self,
        id: &ConversationId,
        message_id: &MessageId,
    ) -> Result<(), StoreError> {
        self.with_conversation(id, |conversation| {
            let idx = conversation
                .messages
                .iter()
                .position(|m| &m.id == message_id)
                .ok_or_else(|| {
                    StoreError::MessageNotFound(message_id.clone())
                })?;
            conversation.messages.truncate(idx);
            Ok(())
        })
    }

    async fn set_animated(
        &self,
        id: &ConversationId,
        message_id: &MessageId,
    ) -> Result<(), StoreError> {
        self.with_conversation(id, |conversation| {
            let message =
                conversation.message_mut(message_id).ok_or_else(|| {
                    StoreError::MessageNotFound(message_id.clone())
                })?;
            message.has_animated = true;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_conversation() -> Conversation {
        let mut conversation = Conversation::new("Chat", "gpt-5.2");
        conversation.push(Message::user("Hi"));
        conversation.push(Message::assistant("Hello!"));
        conversation
    }

    #[tokio::test]
    async fn test_create_and_fetch() {
        let store = MemoryStore::new();
        let conversation = sample_conversation();
        let id = conversation.id.clone();

        store.create(conversation.clone()).await.unwrap();
        let fetched = store.fetch(&id).await.unwrap();
        assert_eq!(fetched, conversation);

        assert_eq!(
            store.create(conversation).await,
            Err(StoreError::AlreadyExists(id))
        );
    }

    #[tokio::test]
    async fn test_soft_delete_hides_from_summaries() {
        let store = MemoryStore::new();
        let conversation = sample_conversation();
        let id = conversation.id.clone();
        store.create(conversation).await.unwrap();

        assert_eq!(store.list_summaries().await.unwrap().len(), 1);
        store.soft_delete(&id).await.unwrap();
        assert!(store.list_summaries().await.unwrap().is_empty());

        // Still fetchable after soft delete.
        assert!(store.fetch(&id).await.unwrap().deleted);
    }

    #[tokio::test]
    async fn test_set_animated() {
        let store = MemoryStore::new();
        let conversation = sample_conversation();
        let id = conversation.id.clone();
        let message_id = conversation.messages[1].id.clone();
        store.create(conversation).await.unwrap();

        store.set_animated(&id, &message_id).await.unwrap();
        let fetched = store.fetch(&id).await.unwrap();
        assert!(fetched.messages[1].has_animated);
    }

    #[tokio::test]
    async fn test_truncate_from() {
        let store = MemoryStore::new();
        let conversation = sample_conversation();
        let id = conversation.id.clone();
        let assistant_id = conversation.messages[1].id.clone();
        store.create(conversation).await.unwrap();

        store.truncate_from(&id, &assistant_id).await.unwrap();
        let fetched = store.fetch(&id).await.unwrap();
        assert_eq!(fetched.messages.len(), 1);
        assert_eq!(fetched.messages[0].content, "Hi");
    }

    #[tokio::test]
    async fn test_rename() {
        let store = MemoryStore::new();
        let conversation = sample_conversation();
        let id = conversation.id.clone();
        store.create(conversation).await.unwrap();

        store.rename(&id, "Renamed".to_owned()).await.unwrap();
        assert_eq!(store.fetch(&id).await.unwrap().title, "Renamed");
    }
}
