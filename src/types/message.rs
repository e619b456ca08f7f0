//! Chat message format sent to OpenAI-compatible completion endpoints.

use serde::{Deserialize, Serialize};

/// Unified message structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: text.into(),
        }
    }

}

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_lowercase_role() {
        let json = serde_json::to_value(Message::system("You are an expert email classifier."))
            .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"role": "system", "content": "You are an expert email classifier."})
        );
    }

    #[test]
    fn deserializes_assistant_reply() {
        let msg: Message =
            serde_json::from_str(r#"{"role":"assistant","content":"Category: spam"}"#).unwrap();
        assert_eq!(msg.role, MessageRole::Assistant);
        assert_eq!(msg.content, "Category: spam");
    }
}
