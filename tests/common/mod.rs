//! Mock HTTP server setup for integration tests

#![allow(dead_code)]

use email_classifier::{ClassifierConfig, EmailClassifier};
use mockito::{Matcher, Mock, Server, ServerGuard};
use std::sync::Arc;
use tokio::sync::Mutex;

pub const CHAT_PATH: &str = "/v1/chat/completions";
pub const TEST_API_KEY: &str = "sk-test";

/// Test fixture that manages a mock chat-completion server
pub struct MockServerFixture {
    pub server: Arc<Mutex<ServerGuard>>,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self {
            server: Arc::new(Mutex::new(server)),
            base_url,
        }
    }

    pub fn config(&self) -> ClassifierConfig {
        ClassifierConfig::default()
            .with_api_key(TEST_API_KEY)
            .with_base_url(&self.base_url)
    }

    /// Create a classifier whose live gateway points at the mock server
    pub fn create_classifier(&self) -> EmailClassifier {
        EmailClassifier::from_config(&self.config()).expect("Failed to build classifier")
    }

    /// Mock a successful completion whose first choice has `content`
    pub async fn mock_completion(&self, content: serde_json::Value) -> Mock {
        let body = serde_json::json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        });
        self.mock_json_response(200, &body.to_string()).await
    }

    /// Mock a raw JSON response with the given status
    pub async fn mock_json_response(&self, status: usize, body: &str) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock("POST", CHAT_PATH)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    /// Mock that only answers when the request carries the expected auth and body shape
    pub async fn mock_expecting(&self, expected_body: serde_json::Value, content: &str) -> Mock {
        let body = serde_json::json!({
            "choices": [{
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        });
        let mut server = self.server.lock().await;
        server
            .mock("POST", CHAT_PATH)
            .match_header("authorization", format!("Bearer {TEST_API_KEY}").as_str())
            .match_header("x-request-id", Matcher::Any)
            .match_body(Matcher::PartialJson(expected_body))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await
    }
}
