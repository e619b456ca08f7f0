//! The email classifier: prompt, one gateway call, parse.

use super::parse::parse_reply;
use super::prompt::{build_classification_prompt, SYSTEM_PROMPT};
use super::result::ClassificationResult;
use crate::config::ClassifierConfig;
use crate::gateway::{CompletionGateway, CompletionRequest, OpenAiGateway};
use crate::types::{Category, EmailMessage, Message};
use crate::Result;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};

/// Classifies emails into the fixed [`Category`] vocabulary.
///
/// Classification never returns an error: gateway and parse failures come back as
/// failed [`ClassificationResult`]s.
pub struct EmailClassifier {
    gateway: Arc<dyn CompletionGateway>,
    model: String,
    temperature: f64,
    max_tokens: u32,
}

impl EmailClassifier {
    /// Classifier over `gateway` with the default model settings.
    pub fn new(gateway: Arc<dyn CompletionGateway>) -> Self {
        Self::with_gateway(gateway, &ClassifierConfig::default())
    }

    /// Classifier over `gateway`, taking model settings from `config`.
    pub fn with_gateway(gateway: Arc<dyn CompletionGateway>, config: &ClassifierConfig) -> Self {
        Self {
            gateway,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    /// Classifier backed by the OpenAI gateway described by `config`.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self> {
        let gateway = OpenAiGateway::from_config(config)?;
        Ok(Self::with_gateway(Arc::new(gateway), config))
    }

    /// Live classifier using `api_key`, or `OPENAI_API_KEY` when it is `None` or empty.
    pub fn with_api_key(api_key: Option<&str>) -> Result<Self> {
        let mut config = ClassifierConfig::from_env();
        if let Some(key) = api_key {
            config.api_key = Some(key.to_string());
        }
        Self::from_config(&config)
    }

    pub fn categories(&self) -> &'static [Category] {
        &Category::ALL
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// The completion request `classify_email` would send.
    pub fn build_request(&self, subject: &str, body: &str) -> CompletionRequest {
        let messages = vec![
            Message::system(SYSTEM_PROMPT),
            Message::user(build_classification_prompt(subject, body)),
        ];
        CompletionRequest::new(self.model.clone(), messages)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
    }

    pub async fn classify_email(&self, subject: &str, body: &str) -> ClassificationResult {
        let request_id = uuid::Uuid::new_v4().to_string();
        let span = info_span!(
            "classify_email",
            request_id = %request_id,
            gateway = self.gateway.name(),
        );
        let request = self.build_request(subject, body).request_id(request_id);

        async move {
            debug!(
                prompt_chars = request.messages.last().map_or(0, |m| m.content.chars().count()),
                "sending classification prompt"
            );
            let reply = match self.gateway.complete(&request).await {
                Ok(reply) => reply,
                Err(e) => {
                    warn!(error = %e, "completion gateway failed");
                    return ClassificationResult::gateway_failed(e.to_string());
                }
            };

            let result = parse_reply(&reply.content);
            debug!(
                category = result.category(),
                confidence = result.confidence(),
                "email classified"
            );
            result
        }
        .instrument(span)
        .await
    }

    /// Classify `emails` one after another, in order.
    ///
    /// Each result carries its email's subject; a failed item does not stop the batch.
    pub async fn classify_batch(&self, emails: &[EmailMessage]) -> Vec<ClassificationResult> {
        let start = Instant::now();
        let mut results = Vec::with_capacity(emails.len());
        for email in emails {
            let result = self
                .classify_email(&email.subject, &email.body)
                .await
                .with_original_subject(email.subject.clone());
            results.push(result);
        }

        let succeeded = results.iter().filter(|r| r.success()).count();
        info!(
            total = results.len(),
            succeeded,
            failed = results.len() - succeeded,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "batch classification finished"
        );
        results
    }
}
