//! A completion provider for OpenAI-compatible APIs.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod config;
mod proto;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use inkflow_model::{
    CompletionError, CompletionProvider, CompletionRequest,
    CompletionResponse, ErrorKind, TokenUsage,
};
use mime::Mime;
use reqwest::{Client, StatusCode, header};

pub use config::{OpenAIConfig, OpenAIConfigBuilder};

/// Error type for [`OpenAIProvider`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
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

/// OpenAI-compatible completion provider.
///
/// Requests are non-streaming: the provider waits for the whole
/// completion and hands it back in one piece. The typewriter reveal
/// shown by the client is simulated over the completed text.
#[derive(Clone, Debug)]
pub struct OpenAIProvider {
    client: Client,
    config: Arc<OpenAIConfig>,
}

impl OpenAIProvider {
    /// Creates a new `OpenAIProvider` with the given configuration.
    #[inline]
    pub fn new(config: OpenAIConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }
}

impl CompletionProvider for OpenAIProvider {
    type Error = Error;

    fn complete(
        &self,
        req: &CompletionRequest,
    ) -> impl Future<Output = Result<CompletionResponse, Self::Error>> + Send + 'static
    {
        let openai_req = proto::create_request(req);
        let resp_fut = self
            .client
            .post(format!("{}{}", self.config.base_url, "/chat/completions"))
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.config.api_key),
            )
            .header(header::CONTENT_TYPE, "application/json")
            .json(&openai_req)
            .send();

        async move {
            let resp = match resp_fut.await {
                Ok(resp) => resp,
                Err(err) => {
                    return Err(Error::new(format!("{err}"), ErrorKind::Other));
                }
            };

            let status = resp.status();
            if !status.is_success() {
                let kind = error_kind_for_status(status);
                let body = resp.text().await.unwrap_or_default();
                debug!(%status, "completion request failed: {body}");
                return Err(Error::new(
                    format!("Server returned status {status}"),
                    kind,
                ));
            }

            let content_type = resp
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok());
            let is_valid_content_type = content_type
                .and_then(|v| v.parse().ok())
                .map(|m: Mime| m.subtype() == mime::JSON)
                .unwrap_or(false);
            if !is_valid_content_type {
                return Err(Error::new(
                    format!("Unexpected content type: {content_type:?}"),
                    ErrorKind::Other,
                ));
            }

            let completion: proto::ChatCompletion =
                match resp.json().await {
                    Ok(completion) => completion,
                    Err(err) => {
                        return Err(Error::new(
                            format!("Malformed response body: {err}"),
                            ErrorKind::Other,
                        ));
                    }
                };
            into_response(completion)
        }
    }
}

fn error_kind_for_status(status: StatusCode) -> ErrorKind {
    if status == StatusCode::TOO_MANY_REQUESTS {
        ErrorKind::RateLimitExceeded
    } else if status == StatusCode::FORBIDDEN {
        // Providers signal content policy rejections with 400-level
        // codes; 403 is the common one.
        ErrorKind::Moderated
    } else {
        ErrorKind::Other
    }
}

fn into_response(
    completion: proto::ChatCompletion,
) -> Result<CompletionResponse, Error> {
    let Some(choice) = completion.choices.into_iter().next() else {
        return Err(Error::new(
            "Response contains no choices",
            ErrorKind::Other,
        ));
    };
    if choice.finish_reason.as_deref() == Some("content_filter") {
        return Err(Error::new(
            "Completion was cut off by the content filter",
            ErrorKind::Moderated,
        ));
    }
    let Some(text) = choice.message.content else {
        return Err(Error::new(
            "Response message has no content",
            ErrorKind::Other,
        ));
    };
    let usage = completion
        .usage
        .map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
        })
        .unwrap_or_default();
    Ok(CompletionResponse { text, usage })
}
