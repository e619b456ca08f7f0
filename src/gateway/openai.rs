//! OpenAI-compatible chat-completion gateway.

use super::{CompletionGateway, CompletionReply, CompletionRequest};
use crate::config::{ClassifierConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use reqwest::Proxy;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const ENDPOINT_PATH: &str = "/v1/chat/completions";

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Gateway calling `POST {base_url}/v1/chat/completions` with bearer auth.
pub struct OpenAiGateway {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiGateway {
    pub fn builder() -> OpenAiGatewayBuilder {
        OpenAiGatewayBuilder::new()
    }

    /// Build a gateway from a validated configuration, resolving the API key.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self> {
        config.validate()?;
        let mut builder = Self::builder()
            .api_key(config.resolve_api_key()?)
            .base_url(config.base_url.clone())
            .timeout_secs(config.timeout_secs);
        if let Some(proxy) = &config.proxy_url {
            builder = builder.proxy_url(proxy.clone());
        }
        builder.build()
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), ENDPOINT_PATH)
    }
}

#[async_trait]
impl CompletionGateway for OpenAiGateway {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionReply> {
        let endpoint = self.endpoint();
        let mut req = self
            .http_client
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .json(request);
        if let Some(id) = &request.request_id {
            req = req.header("x-request-id", id);
        }

        let response = req.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(%status, bytes = body.len(), "completion response received");

        if !status.is_success() {
            return Err(Error::Remote {
                status: status.as_u16(),
                message: remote_error_message(&body),
            });
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body)?;
        let choice = parsed.choices.into_iter().next().ok_or_else(|| {
            Error::validation_with_context(
                "Completion response contained no choices",
                ErrorContext::new()
                    .with_field_path("choices")
                    .with_source("openai_gateway"),
            )
        })?;

        let content = choice.message.content.ok_or_else(|| {
            Error::validation_with_context(
                "Completion reply carried no text content",
                ErrorContext::new()
                    .with_field_path("choices[0].message.content")
                    .with_details(format!(
                        "finish_reason: {}",
                        choice.finish_reason.as_deref().unwrap_or("none")
                    ))
                    .with_source("openai_gateway"),
            )
        })?;

        Ok(CompletionReply {
            content,
            finish_reason: choice.finish_reason,
        })
    }
}

// Prefer the provider's `{"error": {"message": ...}}`; fall back to the raw body.
fn remote_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

pub struct OpenAiGatewayBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    proxy_url: Option<String>,
    timeout_secs: u64,
}

impl OpenAiGatewayBuilder {
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: None,
            proxy_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }
    pub fn proxy_url(mut self, url: impl Into<String>) -> Self {
        self.proxy_url = Some(url.into());
        self
    }
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn build(self) -> Result<OpenAiGateway> {
        let api_key = self
            .api_key
            .ok_or_else(|| Error::configuration("API key required (OPENAI_API_KEY)"))?;
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let mut builder = reqwest::Client::builder().timeout(Duration::from_secs(self.timeout_secs));
        if let Some(proxy_url) = &self.proxy_url {
            let proxy = Proxy::all(proxy_url).map_err(|e| {
                Error::configuration_with_context(
                    format!("Invalid proxy URL: {}", e),
                    ErrorContext::new().with_field_path("proxy_url"),
                )
            })?;
            builder = builder.proxy(proxy);
        }
        let http_client = builder
            .build()
            .map_err(|e| Error::configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(OpenAiGateway {
            http_client,
            base_url,
            api_key,
        })
    }
}

impl Default for OpenAiGatewayBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_requires_api_key() {
        let err = OpenAiGateway::builder().build().err().unwrap();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn endpoint_ignores_trailing_slash() {
        let gateway = OpenAiGateway::builder()
            .api_key("sk-test")
            .base_url("http://localhost:4010/")
            .build()
            .unwrap();
        assert_eq!(gateway.endpoint(), "http://localhost:4010/v1/chat/completions");

        let default = OpenAiGateway::builder().api_key("sk-test").build().unwrap();
        assert_eq!(default.endpoint(), "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn remote_message_prefers_provider_error() {
        assert_eq!(
            remote_error_message(r#"{"error":{"message":"Rate limit exceeded","type":"rate_limit_error"}}"#),
            "Rate limit exceeded"
        );
        assert_eq!(remote_error_message("Bad Gateway\n"), "Bad Gateway");
    }
}
