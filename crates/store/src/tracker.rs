use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use inkflow_model::{Conversation, ConversationId, MessageId};

use crate::store::ConversationStore;

/// Runtime authority for which messages have finished animating.
///
/// UI code queries the tracker synchronously on every render; the
/// persisted `has_animated` flag only seeds the initial set and is
/// written back asynchronously in the background. Marks are monotonic:
/// once a message is animated it stays animated for the lifetime of
/// the tracker.
#[derive(Clone)]
pub struct AnimationTracker {
    animated: Arc<Mutex<HashSet<MessageId>>>,
    persist_tx: mpsc::UnboundedSender<MessageId>,
}

impl AnimationTracker {
    /// Creates a tracker seeded from the conversation's messages.
    ///
    /// Spawns a background task that writes marks through to the
    /// store. Persistence failures are logged and ignored; the
    /// in-memory set remains correct for the current run.
    pub fn new(
        store: Arc<dyn ConversationStore>,
        conversation: &Conversation,
    ) -> Self {
        let animated: HashSet<MessageId> = conversation
            .messages
            .iter()
            .filter(|m| m.has_animated)
            .map(|m| m.id.clone())
            .collect();
        let (persist_tx, persist_rx) = mpsc::unbounded_channel();
        tokio::spawn(persist_marks(
            store,
            conversation.id.clone(),
            persist_rx,
        ));
        Self {
            animated: Arc::new(Mutex::new(animated)),
            persist_tx,
        }
    }

    /// Returns whether the message has already animated.
    #[inline]
    pub fn is_animated(&self, id: &MessageId) -> bool {
        self.animated.lock().unwrap().contains(id)
    }

    /// Marks a message as animated.
    ///
    /// The first mark for a given id is forwarded to the store;
    /// repeated marks are no-ops.
    pub fn mark_animated(&self, id: &MessageId) {
        let newly_marked = self.animated.lock().unwrap().insert(id.clone());
        if newly_marked {
            // The receiver only goes away at runtime shutdown.
            let _ = self.persist_tx.send(id.clone());
        }
    }
}

async fn persist_marks(
    store: Arc<dyn ConversationStore>,
    conversation_id: ConversationId,
    mut rx: mpsc::UnboundedReceiver<MessageId>,
) {
    while let Some(message_id) = rx.recv().await {
        if let Err(err) = store.set_animated(&conversation_id, &message_id).await
        {
            warn!(%message_id, "failed to persist animation mark: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use inkflow_model::Message;

    use super::*;
    use crate::memory::MemoryStore;

    async fn wait_for_flag(
        store: &Arc<dyn ConversationStore>,
        conversation_id: &ConversationId,
        message_id: &MessageId,
    ) -> bool {
        for _ in 0..100 {
            tokio::time::sleep(Duration::from_millis(1)).await;
            let conversation = store.fetch(conversation_id).await.unwrap();
            if conversation.message(message_id).unwrap().has_animated {
                return true;
            }
        }
        false
    }

    #[tokio::test]
    async fn test_mark_is_visible_synchronously() {
        let store: Arc<dyn ConversationStore> = Arc::new(MemoryStore::new());
        let mut conversation = Conversation::new("Chat", "gpt-5.2");
        conversation.push(Message::assistant("Hello!"));
        let message_id = conversation.messages[0].id.clone();
        store.create(conversation.clone()).await.unwrap();

        let tracker = AnimationTracker::new(store, &conversation);
        assert!(!tracker.is_animated(&message_id));
        tracker.mark_animated(&message_id);
        assert!(tracker.is_animated(&message_id));
    }

    #[tokio::test]
    async fn test_mark_reaches_the_store() {
        let store: Arc<dyn ConversationStore> = Arc::new(MemoryStore::new());
        let mut conversation = Conversation::new("Chat", "gpt-5.2");
        conversation.push(Message::assistant("Hello!"));
        let message_id = conversation.messages[0].id.clone();
        store.create(conversation.clone()).await.unwrap();

        let tracker = AnimationTracker::new(store.clone(), &conversation);
        tracker.mark_animated(&message_id);
        assert!(wait_for_flag(&store, &conversation.id, &message_id).await);
    }

    #[tokio::test]
    async fn test_seeded_from_persisted_flags() {
        let store: Arc<dyn ConversationStore> = Arc::new(MemoryStore::new());
        let mut conversation = Conversation::new("Chat", "gpt-5.2");
        conversation.push(Message::user("Hi"));
        conversation.push(Message::assistant("Hello!"));
        // A load flow forces every historical message to animated.
        conversation.force_animated();
        store.create(conversation.clone()).await.unwrap();

        let tracker = AnimationTracker::new(store, &conversation);
        assert!(conversation
            .messages
            .iter()
            .all(|m| tracker.is_animated(&m.id)));
    }

    #[tokio::test]
    async fn test_unknown_message_is_not_animated() {
        let store: Arc<dyn ConversationStore> = Arc::new(MemoryStore::new());
        let conversation = Conversation::new("Chat", "gpt-5.2");
        store.create(conversation.clone()).await.unwrap();

        let tracker = AnimationTracker::new(store, &conversation);
        assert!(!tracker.is_animated(&MessageId::generate()));
    }
}
