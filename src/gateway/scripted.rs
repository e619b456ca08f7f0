//! Gateway replaying canned replies, for tests and offline dry runs.

use super::{CompletionGateway, CompletionReply, CompletionRequest};
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Number of most recent requests kept for inspection.
const MAX_RECORDED_REQUESTS: usize = 256;

/// One canned gateway response.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptedReply {
    /// Reply with this message text.
    Text(String),
    /// Reply whose message has no text content (`"content": null`), which the
    /// gateway reports as a validation error.
    NoContent,
    /// Fail as the remote would with this HTTP status and message.
    Failure { status: u16, message: String },
}

impl ScriptedReply {
    pub fn text(content: impl Into<String>) -> Self {
        ScriptedReply::Text(content.into())
    }

    pub fn failure(status: u16, message: impl Into<String>) -> Self {
        ScriptedReply::Failure {
            status,
            message: message.into(),
        }
    }
}

/// Replays queued replies in order, then the fallback reply if one is set.
///
/// The most recent requests are recorded so tests can inspect what the classifier sent.
pub struct ScriptedGateway {
    replies: Mutex<VecDeque<ScriptedReply>>,
    fallback: Option<ScriptedReply>,
    requests: Mutex<VecDeque<CompletionRequest>>,
    calls: AtomicUsize,
}

impl ScriptedGateway {
    pub fn new(replies: impl IntoIterator<Item = ScriptedReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            fallback: None,
            requests: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Gateway answering every request with the same reply.
    pub fn repeating(reply: ScriptedReply) -> Self {
        Self::new(Vec::new()).with_fallback(reply)
    }

    pub fn with_fallback(mut self, reply: ScriptedReply) -> Self {
        self.fallback = Some(reply);
        self
    }

    /// Recorded requests, oldest first.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        lock(&self.requests).iter().cloned().collect()
    }

    /// Total number of `complete` calls, including ones no longer recorded.
    pub fn request_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self, request: &CompletionRequest) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut requests = lock(&self.requests);
        requests.push_back(request.clone());
        if requests.len() > MAX_RECORDED_REQUESTS {
            requests.pop_front();
        }
    }

    fn next_reply(&self) -> Option<ScriptedReply> {
        lock(&self.replies)
            .pop_front()
            .or_else(|| self.fallback.clone())
    }
}

// A panic while holding the lock leaves plain data behind; keep serving it.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl CompletionGateway for ScriptedGateway {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionReply> {
        self.record(request);
        match self.next_reply() {
            Some(ScriptedReply::Text(text)) => Ok(CompletionReply::text(text)),
            Some(ScriptedReply::NoContent) => Err(Error::validation_with_context(
                "Completion reply carried no text content",
                ErrorContext::new()
                    .with_field_path("choices[0].message.content")
                    .with_source("scripted_gateway"),
            )),
            Some(ScriptedReply::Failure { status, message }) => {
                Err(Error::Remote { status, message })
            }
            None => Err(Error::configuration("Scripted gateway has no replies left")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Message;

    fn request() -> CompletionRequest {
        CompletionRequest::new("gpt-3.5-turbo", vec![Message::user("hi")])
    }

    #[tokio::test]
    async fn replays_in_order_then_runs_dry() {
        let gateway = ScriptedGateway::new([
            ScriptedReply::text("Category: spam"),
            ScriptedReply::failure(503, "overloaded"),
        ]);

        let first = gateway.complete(&request()).await.unwrap();
        assert_eq!(first.content, "Category: spam");

        let second = gateway.complete(&request()).await.unwrap_err();
        assert!(matches!(second, Error::Remote { status: 503, .. }));

        assert!(gateway.complete(&request()).await.is_err());
        assert_eq!(gateway.request_count(), 3);
    }

    #[tokio::test]
    async fn recorded_history_is_bounded() {
        let gateway = ScriptedGateway::repeating(ScriptedReply::text("Category: spam"));
        for _ in 0..MAX_RECORDED_REQUESTS + 10 {
            gateway.complete(&request()).await.unwrap();
        }
        assert_eq!(gateway.request_count(), MAX_RECORDED_REQUESTS + 10);
        assert_eq!(gateway.requests().len(), MAX_RECORDED_REQUESTS);
    }

    #[tokio::test]
    async fn repeating_gateway_never_runs_dry() {
        let gateway = ScriptedGateway::repeating(ScriptedReply::text("Category: marketing"));
        for _ in 0..3 {
            let reply = gateway.complete(&request()).await.unwrap();
            assert_eq!(reply.content, "Category: marketing");
        }
    }

    #[tokio::test]
    async fn missing_content_is_a_validation_error() {
        let gateway = ScriptedGateway::new([ScriptedReply::NoContent]);
        let err = gateway.complete(&request()).await.unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert_eq!(
            err.context().and_then(|c| c.field_path.as_deref()),
            Some("choices[0].message.content")
        );
    }
}
