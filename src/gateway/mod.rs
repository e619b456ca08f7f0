//! Completion gateways: the chat-completion capability the classifier calls out to.
//!
//! The classifier only depends on [`CompletionGateway`]. [`OpenAiGateway`] talks to an
//! OpenAI-compatible `/v1/chat/completions` endpoint; [`ScriptedGateway`] replays
//! canned replies for tests and dry runs.

mod openai;
mod scripted;

pub use openai::{OpenAiGateway, OpenAiGatewayBuilder};
pub use scripted::{ScriptedGateway, ScriptedReply};

use crate::types::Message;
use crate::Result;
use async_trait::async_trait;
use serde::Serialize;

/// A single chat-completion call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: f64,
    /// Correlation id forwarded as a request header; not part of the body.
    #[serde(skip)]
    pub request_id: Option<String>,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            max_tokens: crate::config::DEFAULT_MAX_TOKENS,
            temperature: crate::config::DEFAULT_TEMPERATURE,
            request_id: None,
        }
    }

    pub fn max_tokens(mut self, n: u32) -> Self {
        self.max_tokens = n;
        self
    }

    pub fn temperature(mut self, t: f64) -> Self {
        self.temperature = t;
        self
    }

    pub fn request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }
}

/// The first choice of a completion response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionReply {
    pub content: String,
    pub finish_reason: Option<String>,
}

impl CompletionReply {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            finish_reason: Some("stop".to_string()),
        }
    }
}

/// Chat-completion capability: system + user messages in, reply text out.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Gateway name for logging.
    fn name(&self) -> &str;

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionReply>;
}
