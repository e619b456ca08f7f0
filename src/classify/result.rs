//! Classification outcome and the flat result record handed to callers.

use crate::types::Category;
use serde::{Serialize, Serializer};

/// Category reported when the reply carried no `Category:` line or the request failed.
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// Reasoning reported when the completion gateway call failed.
pub const GATEWAY_FAILURE_REASONING: &str = "Classification failed due to error";

/// Reasoning reported when the reply could not be parsed.
pub const PARSE_FAILURE_REASONING: &str = "Response parsing failed";

/// Prefix of the error text for parse failures.
pub const PARSE_FAILURE_PREFIX: &str = "Failed to parse response: ";

/// Fields extracted from a successfully parsed reply.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Lowercased label as reported by the model; not checked against [`Category`].
    pub category: String,
    /// Self-reported score, neither validated nor clamped.
    pub confidence: f64,
    pub reasoning: String,
}

impl Default for Classification {
    fn default() -> Self {
        Self {
            category: UNKNOWN_CATEGORY.to_string(),
            confidence: 0.0,
            reasoning: String::new(),
        }
    }
}

/// What happened to a single classification request.
///
/// Gateway and parse failures stay distinct because they report different
/// reasoning text.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassificationOutcome {
    Classified(Classification),
    GatewayFailed { message: String },
    ParseFailed { message: String },
}

/// Result of classifying one email.
///
/// Accessors give every consumer the same fixed shape: failures read as category
/// `"unknown"` with confidence `0.0` and a domain-specific reasoning string.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    outcome: ClassificationOutcome,
    original_subject: Option<String>,
}

impl ClassificationResult {
    pub fn new(outcome: ClassificationOutcome) -> Self {
        Self {
            outcome,
            original_subject: None,
        }
    }

    pub fn gateway_failed(message: impl Into<String>) -> Self {
        Self::new(ClassificationOutcome::GatewayFailed {
            message: message.into(),
        })
    }

    pub fn parse_failed(message: impl Into<String>) -> Self {
        Self::new(ClassificationOutcome::ParseFailed {
            message: message.into(),
        })
    }

    /// Tag the result with the subject of the email it was produced for.
    pub fn with_original_subject(mut self, subject: impl Into<String>) -> Self {
        self.original_subject = Some(subject.into());
        self
    }

    pub fn outcome(&self) -> &ClassificationOutcome {
        &self.outcome
    }

    pub fn success(&self) -> bool {
        matches!(self.outcome, ClassificationOutcome::Classified(_))
    }

    pub fn category(&self) -> &str {
        match &self.outcome {
            ClassificationOutcome::Classified(c) => &c.category,
            _ => UNKNOWN_CATEGORY,
        }
    }

    /// The category as one of the known labels, if the model used one.
    pub fn known_category(&self) -> Option<Category> {
        self.category().parse().ok()
    }

    pub fn confidence(&self) -> f64 {
        match &self.outcome {
            ClassificationOutcome::Classified(c) => c.confidence,
            _ => 0.0,
        }
    }

    pub fn reasoning(&self) -> &str {
        match &self.outcome {
            ClassificationOutcome::Classified(c) => &c.reasoning,
            ClassificationOutcome::GatewayFailed { .. } => GATEWAY_FAILURE_REASONING,
            ClassificationOutcome::ParseFailed { .. } => PARSE_FAILURE_REASONING,
        }
    }

    pub fn error(&self) -> Option<String> {
        match &self.outcome {
            ClassificationOutcome::Classified(_) => None,
            ClassificationOutcome::GatewayFailed { message } => Some(message.clone()),
            ClassificationOutcome::ParseFailed { message } => {
                Some(format!("{PARSE_FAILURE_PREFIX}{message}"))
            }
        }
    }

    pub fn original_subject(&self) -> Option<&str> {
        self.original_subject.as_deref()
    }
}

impl From<ClassificationOutcome> for ClassificationResult {
    fn from(outcome: ClassificationOutcome) -> Self {
        Self::new(outcome)
    }
}

impl From<Classification> for ClassificationResult {
    fn from(classification: Classification) -> Self {
        Self::new(ClassificationOutcome::Classified(classification))
    }
}

#[derive(Serialize)]
struct FlatResult<'a> {
    success: bool,
    category: &'a str,
    confidence: f64,
    reasoning: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    original_subject: Option<&'a str>,
}

impl Serialize for ClassificationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        FlatResult {
            success: self.success(),
            category: self.category(),
            confidence: self.confidence(),
            reasoning: self.reasoning(),
            error: self.error(),
            original_subject: self.original_subject(),
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn gateway_failure_reads_with_defaults() {
        let result = ClassificationResult::gateway_failed("connection refused");
        assert!(!result.success());
        assert_eq!(result.category(), "unknown");
        assert_eq!(result.confidence(), 0.0);
        assert_eq!(result.reasoning(), "Classification failed due to error");
        assert_eq!(result.error().as_deref(), Some("connection refused"));
    }

    #[test]
    fn parse_failure_error_is_prefixed() {
        let result = ClassificationResult::parse_failed("reply was cut off mid-line");
        assert_eq!(result.reasoning(), "Response parsing failed");
        assert_eq!(
            result.error().as_deref(),
            Some("Failed to parse response: reply was cut off mid-line")
        );
    }

    #[test]
    fn known_category_only_for_vocabulary_labels() {
        let urgent = ClassificationResult::from(Classification {
            category: "urgent".to_string(),
            ..Classification::default()
        });
        assert_eq!(urgent.known_category(), Some(Category::Urgent));

        let invented = ClassificationResult::from(Classification {
            category: "newsletter".to_string(),
            ..Classification::default()
        });
        assert_eq!(invented.category(), "newsletter");
        assert_eq!(invented.known_category(), None);
    }

    #[test]
    fn serializes_to_flat_record() {
        let ok = ClassificationResult::from(Classification {
            category: "spam".to_string(),
            confidence: 0.95,
            reasoning: "prize scam".to_string(),
        })
        .with_original_subject("You've won!");
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({
                "success": true,
                "category": "spam",
                "confidence": 0.95,
                "reasoning": "prize scam",
                "original_subject": "You've won!"
            })
        );

        let failed = ClassificationResult::gateway_failed("timeout");
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({
                "success": false,
                "category": "unknown",
                "confidence": 0.0,
                "reasoning": "Classification failed due to error",
                "error": "timeout"
            })
        );
    }
}
