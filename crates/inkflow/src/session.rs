use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

use inkflow_model::{
    CompletionError, CompletionProvider, CompletionRequest, Conversation,
    ConversationId, Message, MessageId, Role,
};
use inkflow_reveal::RevealSession;
use inkflow_store::{
    AnimationTracker, ConversationStore, MemoryStore, StoreError,
};

use crate::client::CompletionClient;

/// Errors surfaced by a [`ChatSession`].
#[derive(Debug)]
pub enum ChatError {
    /// The completion provider failed.
    Provider(Box<dyn CompletionError>),
    /// The conversation store failed.
    Store(StoreError),
    /// No message with the given id exists in the conversation.
    UnknownMessage(MessageId),
    /// The conversation has no assistant message to regenerate.
    NothingToRegenerate,
}

impl Display for ChatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provider(err) => write!(f, "provider error: {err}"),
            Self::Store(err) => write!(f, "store error: {err}"),
            Self::UnknownMessage(id) => write!(f, "unknown message {id}"),
            Self::NothingToRegenerate => {
                write!(f, "no assistant message to regenerate")
            }
        }
    }
}

impl StdError for ChatError {}

impl From<StoreError> for ChatError {
    #[inline]
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

/// A chat session builder.
///
/// See [`ChatSession`].
pub struct ChatSessionBuilder {
    client: CompletionClient,
    store: Option<Arc<dyn ConversationStore>>,
    model: Option<String>,
    system_prompt: Option<String>,
    title: Option<String>,
}

impl ChatSessionBuilder {
    /// Creates a session builder with a specified completion provider.
    pub fn with_provider<P: CompletionProvider + 'static>(
        provider: P,
    ) -> Self {
        Self {
            client: CompletionClient::new(provider),
            store: None,
            model: None,
            system_prompt: None,
            title: None,
        }
    }

    /// Sets the conversation store. Defaults to an in-memory store.
    #[inline]
    pub fn with_store(mut self, store: Arc<dyn ConversationStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets the model identifier for completion requests.
    #[inline]
    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the system prompt to prepend to the conversation.
    #[inline]
    pub fn with_system_prompt<S: Into<String>>(mut self, prompt: S) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Sets the user-visible conversation title.
    #[inline]
    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Builds a new session with a fresh conversation.
    ///
    /// Must be called within a Tokio runtime; the session spawns a
    /// background task that persists animation marks.
    pub fn build(self) -> ChatSession {
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()));
        let mut conversation = Conversation::new(
            self.title.unwrap_or_else(|| "New chat".to_owned()),
            self.model.unwrap_or_else(|| "gpt-5.2".to_owned()),
        );
        if let Some(prompt) = self.system_prompt {
            conversation.push(Message::system(prompt));
        }
        let tracker = AnimationTracker::new(store.clone(), &conversation);
        ChatSession {
            client: self.client,
            store,
            conversation,
            tracker,
            created: false,
        }
    }
}

/// A chat session, like a window that displays messages and has an
/// input box.
///
/// The session owns the in-memory working copy of one conversation,
/// writes every change through to the store, and hands out
/// [`RevealSession`]s for assistant messages that have not animated
/// yet.
pub struct ChatSession {
    client: CompletionClient,
    store: Arc<dyn ConversationStore>,
    conversation: Conversation,
    tracker: AnimationTracker,
    created: bool,
}

impl ChatSession {
    /// Reopens a persisted conversation.
    ///
    /// Every loaded message is forced to the animated state: history
    /// never replays its typewriter reveal.
    pub async fn resume<P: CompletionProvider + 'static>(
        provider: P,
        store: Arc<dyn ConversationStore>,
        id: &ConversationId,
    ) -> Result<Self, ChatError> {
        let mut conversation = store.fetch(id).await?;
        conversation.force_animated();
        let tracker = AnimationTracker::new(store.clone(), &conversation);
        Ok(Self {
            client: CompletionClient::new(provider),
            store,
            conversation,
            tracker,
            created: true,
        })
    }

    /// Returns the conversation this session operates on.
    #[inline]
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Returns whether the message's reveal has already run.
    #[inline]
    pub fn is_animated(&self, id: &MessageId) -> bool {
        self.tracker.is_animated(id)
            || self
                .conversation
                .message(id)
                .is_some_and(|m| m.has_animated)
    }

    /// Sends a user message and returns the assistant's reply.
    ///
    /// The user message is committed before the completion request is
    /// sent, so it survives a provider failure and the exchange can be
    /// retried.
    pub async fn send_message<S: Into<String>>(
        &mut self,
        content: S,
    ) -> Result<Message, ChatError> {
        self.push_user_message(Message::user(content)).await?;
        self.request_completion().await
    }

    /// Sends a user message with attached images.
    pub async fn send_message_with_images<S: Into<String>>(
        &mut self,
        content: S,
        images: Vec<inkflow_model::Attachment>,
    ) -> Result<Message, ChatError> {
        self.push_user_message(Message::user(content).with_images(images))
            .await?;
        self.request_completion().await
    }

    /// Discards the last assistant message and generates a new one.
    ///
    /// The replacement carries a fresh id, so its reveal runs from
    /// scratch.
    pub async fn regenerate(&mut self) -> Result<Message, ChatError> {
        let last_assistant_id = self
            .conversation
            .messages
            .last()
            .filter(|m| m.role == Role::Assistant)
            .map(|m| m.id.clone())
            .ok_or(ChatError::NothingToRegenerate)?;
        self.truncate_from(&last_assistant_id).await?;
        self.request_completion().await
    }

    /// Replaces a user message's content and regenerates the reply.
    ///
    /// Everything from the edited message onward is discarded; the
    /// edit is a new message under a fresh id.
    pub async fn edit_message<S: Into<String>>(
        &mut self,
        id: &MessageId,
        content: S,
    ) -> Result<Message, ChatError> {
        let is_user_message = self
            .conversation
            .message(id)
            .is_some_and(|m| m.role == Role::User);
        if !is_user_message {
            return Err(ChatError::UnknownMessage(id.clone()));
        }
        self.truncate_from(id).await?;
        self.push_user_message(Message::user(content)).await?;
        self.request_completion().await
    }

    /// Starts a reveal session for the given assistant message.
    ///
    /// Returns `None` if the message is unknown, is not an assistant
    /// message, or has already animated. At most one reveal ever runs
    /// for a given message id: completion marks the id animated before
    /// another call can observe it unanimated.
    pub fn begin_reveal(&self, id: &MessageId) -> Option<RevealSession> {
        let message = self.conversation.message(id)?;
        if message.role != Role::Assistant
            || message.has_animated
            || self.tracker.is_animated(id)
        {
            return None;
        }
        let tracker = self.tracker.clone();
        Some(RevealSession::begin(
            message.id.clone(),
            &message.content,
            move |id| tracker.mark_animated(&id),
        ))
    }

    async fn ensure_created(&mut self) -> Result<(), ChatError> {
        if !self.created {
            self.store.create(self.conversation.clone()).await?;
            self.created = true;
        }
        Ok(())
    }

    async fn push_user_message(
        &mut self,
        message: Message,
    ) -> Result<(), ChatError> {
        self.ensure_created().await?;
        self.store
            .append_message(&self.conversation.id, message.clone())
            .await?;
        self.conversation.push(message);
        Ok(())
    }

    async fn truncate_from(&mut self, id: &MessageId) -> Result<(), ChatError> {
        self.store.truncate_from(&self.conversation.id, id).await?;
        let idx = self
            .conversation
            .messages
            .iter()
            .position(|m| &m.id == id)
            .ok_or_else(|| ChatError::UnknownMessage(id.clone()))?;
        self.conversation.messages.truncate(idx);
        Ok(())
    }

    async fn request_completion(&mut self) -> Result<Message, ChatError> {
        let req = CompletionRequest::from_messages(
            self.conversation.model.clone(),
            &self.conversation.messages,
        );
        let resp =
            self.client.complete(req).await.map_err(ChatError::Provider)?;
        debug!(
            total_tokens = resp.usage.total(),
            "received a completion"
        );

        let assistant = Message::assistant(resp.text);
        self.store
            .append_message(&self.conversation.id, assistant.clone())
            .await?;
        self.conversation.push(assistant.clone());
        Ok(assistant)
    }
}
