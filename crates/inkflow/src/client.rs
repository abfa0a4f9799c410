use std::pin::Pin;
use std::sync::Arc;

use inkflow_model::{
    CompletionError, CompletionProvider, CompletionRequest, CompletionResponse,
};
use tracing::Instrument;

type CompleteResult = Result<CompletionResponse, Box<dyn CompletionError>>;
type BoxedCompleteFuture =
    Pin<Box<dyn Future<Output = CompleteResult> + Send>>;
type HandlerFn =
    Arc<dyn Fn(CompletionRequest) -> BoxedCompleteFuture + Send + Sync>;

/// A wrapper around a completion provider that provides a type-erased
/// interface for the other modules.
#[derive(Clone)]
pub struct CompletionClient {
    handler_fn: HandlerFn,
}

impl CompletionClient {
    /// Wraps the given provider.
    #[inline]
    pub fn new<P: CompletionProvider + 'static>(provider: P) -> Self {
        // We have to erase the type `P`, since `CompletionClient`
        // doesn't have a generic parameter and we don't want it either.
        let handler_fn: HandlerFn = Arc::new(move |req| {
            let fut = provider.complete(&req);
            Box::pin(
                async move {
                    trace!("got a request: {:?}", req);
                    let resp_or_err = fut.await;
                    match resp_or_err {
                        Ok(resp) => {
                            trace!("finished a request");
                            Ok(resp)
                        }
                        Err(err) => {
                            error!("got an error: {err:?}");
                            Err(Box::new(err) as Box<dyn CompletionError>)
                        }
                    }
                }
                .instrument(trace_span!("completion client req")),
            )
        });
        Self { handler_fn }
    }

    /// Sends a request and returns the completed response.
    ///
    /// # Cancel safety
    ///
    /// This method is cancel safe. The underlying request is dropped
    /// when this operation is cancelled.
    #[inline]
    pub async fn complete(&self, req: CompletionRequest) -> CompleteResult {
        (self.handler_fn)(req).await
    }
}

#[cfg(test)]
mod tests {
    use inkflow_model::{ErrorKind, Message};
    use inkflow_test_provider::{PresetCompletion, TestProvider};

    use super::*;

    #[tokio::test]
    async fn test_complete() {
        let mut provider = TestProvider::default();
        provider.add_user_input_step();
        provider.add_assistant_completion_step(PresetCompletion::with_text(
            "How are you?",
        ));

        let client = CompletionClient::new(provider);

        for _ in 0..3 {
            let req = CompletionRequest::from_messages(
                "test-model",
                &[Message::user("Hi")],
            );
            let resp = client.complete(req).await.unwrap();
            assert_eq!(resp.text, "How are you?");
        }
    }

    #[tokio::test]
    async fn test_error_handling() {
        let client = CompletionClient::new(TestProvider::default());
        let req = CompletionRequest::from_messages(
            "test-model",
            &[Message::user("Hi")],
        );
        let err = client.complete(req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
    }
}
