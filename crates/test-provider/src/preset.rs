use inkflow_model::TokenUsage;
use serde::{Deserialize, Serialize};

/// The preset completion for an assistant step.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetCompletion {
    /// The full completion text.
    pub text: String,
    /// Token accounting to report alongside the text.
    pub usage: TokenUsage,
    /// If set, the request will fail in the first `failures` attempts.
    /// `Some(0)` means the request will fail infinitely.
    pub failures: Option<u64>,
}

impl PresetCompletion {
    /// Creates a `PresetCompletion` with the specified text.
    #[inline]
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: TokenUsage::default(),
            failures: None,
        }
    }

    /// Sets the token usage to report.
    #[inline]
    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = usage;
        self
    }

    /// Sets failure times before a successful response. `0` means the
    /// response will always be a failure.
    #[inline]
    pub fn with_failures(mut self, failures: u64) -> Self {
        self.failures = Some(failures);
        self
    }
}
