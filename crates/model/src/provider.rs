use std::error::Error;

use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;
use crate::message::{Attachment, Message, Role};

/// The error type for a completion provider.
pub trait CompletionError: Error + Send + Sync + 'static {
    /// Returns the kind of this error.
    fn kind(&self) -> ErrorKind;
}

/// A type that can produce a model completion for a conversation.
///
/// Requests are atomic: the provider returns an already-complete
/// response, there is no partial/streaming delivery. The typewriter
/// reveal the client shows is a simulation over the completed text,
/// not true network streaming.
///
/// Once the provider is created, it should behave like a stateless
/// object. It can still have internal state, but callers should not
/// rely on it, and the provider should be prepared for being dropped
/// anytime.
pub trait CompletionProvider: Send + Sync {
    /// The error type that may be returned by the provider.
    type Error: CompletionError;

    /// Requests a completion for the conversation so far.
    fn complete(
        &self,
        req: &CompletionRequest,
    ) -> impl Future<Output = Result<CompletionResponse, Self::Error>> + Send + 'static;
}

/// A request to be sent to the completion provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CompletionRequest {
    /// The model identifier to use.
    pub model: String,
    /// The conversation so far, oldest first.
    pub turns: Vec<Turn>,
}

impl CompletionRequest {
    /// Builds a request from a slice of conversation messages.
    pub fn from_messages<M: Into<String>>(
        model: M,
        messages: &[Message],
    ) -> Self {
        Self {
            model: model.into(),
            turns: messages
                .iter()
                .map(|m| Turn {
                    role: m.role,
                    content: m.content.clone(),
                    images: m.images.clone(),
                })
                .collect(),
        }
    }
}

/// One turn of the request payload.
///
/// This is a projection of [`Message`] that omits the client-side
/// bookkeeping fields the provider has no business seeing.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Turn {
    /// Who produced this turn.
    pub role: Role,
    /// Text of the turn.
    pub content: String,
    /// Attached images, if any.
    pub images: Vec<Attachment>,
}

/// A complete response from the completion provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// The assistant message text.
    pub text: String,
    /// Token accounting reported by the provider.
    pub usage: TokenUsage,
}

/// Token usage accounting for one completion.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct TokenUsage {
    /// Tokens consumed by the prompt.
    pub prompt_tokens: u64,
    /// Tokens produced by the completion.
    pub completion_tokens: u64,
}

impl TokenUsage {
    /// Total tokens for the request.
    #[inline]
    pub fn total(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_from_messages() {
        let messages =
            [Message::system("Be brief."), Message::user("Hello?")];
        let req = CompletionRequest::from_messages("gpt-5.2", &messages);
        assert_eq!(req.model, "gpt-5.2");
        assert_eq!(req.turns.len(), 2);
        assert_eq!(req.turns[0].role, Role::System);
        assert_eq!(req.turns[1].content, "Hello?");
    }

    #[test]
    fn test_usage_total() {
        let usage = TokenUsage {
            prompt_tokens: 12,
            completion_tokens: 30,
        };
        assert_eq!(usage.total(), 42);
    }
}
