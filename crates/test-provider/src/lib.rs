//! A local fake completion provider for testing purpose.

mod preset;

use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use inkflow_model::{
    CompletionError, CompletionProvider, CompletionRequest,
    CompletionResponse, ErrorKind,
};
use tokio::time::sleep;

pub use preset::*;

/// Error type for [`TestProvider`].
#[derive(Debug)]
pub struct Error {
    message: &'static str,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl CompletionError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

#[derive(Clone)]
enum ConversationStep {
    UserInput,
    AssistantCompletion(PresetCompletion),
}

/// A local fake completion provider for testing purpose.
///
/// Before sending requests, you need to setup the conversation script,
/// which is how the provider should respond to a request. The added
/// steps will be selected according to the turns in your request. If
/// there are no enough steps in the script, an error will be returned.
///
/// # Note
///
/// This type is not optimized for production use, there are heavy
/// memory copies involved. You should only use it for testing.
#[derive(Clone, Default)]
pub struct TestProvider {
    conversation_script: Vec<ConversationStep>,
    delay: Option<Duration>,
    attempts: Arc<Mutex<HashMap<usize, u64>>>,
}

impl TestProvider {
    #[inline]
    pub fn add_assistant_completion_step(&mut self, preset: PresetCompletion) {
        self.conversation_script
            .push(ConversationStep::AssistantCompletion(preset));
    }

    #[inline]
    pub fn add_user_input_step(&mut self) {
        self.conversation_script.push(ConversationStep::UserInput);
    }

    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    fn complete_step(&self, step_idx: usize) -> Result<CompletionResponse, Error> {
        let Some(step) = self.conversation_script.get(step_idx) else {
            return Err(Error {
                message: "no enough steps",
                kind: ErrorKind::Other,
            });
        };
        let preset = match step {
            ConversationStep::UserInput => {
                return Err(Error {
                    message: "not an assistant completion step",
                    kind: ErrorKind::Other,
                });
            }
            ConversationStep::AssistantCompletion(preset) => preset,
        };

        if let Some(failures) = preset.failures {
            let mut attempts = self.attempts.lock().unwrap();
            let attempt = attempts.entry(step_idx).or_insert(0);
            *attempt += 1;
            if failures == 0 || *attempt <= failures {
                return Err(Error {
                    message: "preset failure",
                    kind: ErrorKind::RateLimitExceeded,
                });
            }
        }

        Ok(CompletionResponse {
            text: preset.text.clone(),
            usage: preset.usage,
        })
    }
}

impl CompletionProvider for TestProvider {
    type Error = Error;

    fn complete(
        &self,
        req: &CompletionRequest,
    ) -> impl Future<Output = Result<CompletionResponse, Self::Error>> + Send + 'static
    {
        let provider = self.clone();
        let step_idx = req.turns.len();
        async move {
            if let Some(delay) = provider.delay {
                sleep(delay).await;
            }
            provider.complete_step(step_idx)
        }
    }
}
