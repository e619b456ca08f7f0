//! Classification prompt construction.

use crate::types::Category;

/// Maximum number of body characters embedded in a prompt.
pub const MAX_BODY_CHARS: usize = 500;

/// Appended to the body excerpt when the body was cut.
pub const TRUNCATION_MARKER: &str = "...";

/// System message sent alongside every classification prompt.
pub const SYSTEM_PROMPT: &str = "You are an expert email classifier.";

/// Comma-separated category labels in their fixed order.
pub fn category_list() -> String {
    Category::ALL
        .iter()
        .map(Category::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// First [`MAX_BODY_CHARS`] characters of `body`, plus [`TRUNCATION_MARKER`] when
/// anything was dropped.
pub fn body_excerpt(body: &str) -> String {
    match body.char_indices().nth(MAX_BODY_CHARS) {
        Some((cut, _)) => format!("{}{}", &body[..cut], TRUNCATION_MARKER),
        None => body.to_string(),
    }
}

/// Build the user prompt asking for a `Category:` / `Confidence:` / `Reasoning:` reply.
pub fn build_classification_prompt(subject: &str, body: &str) -> String {
    format!(
        r#"
Please classify the following email into one of these categories: {categories}

Email Subject: {subject}
Email Body: {body}

Respond in the following format:
Category: [category_name]
Confidence: [0.0-1.0]
Reasoning: [brief explanation]
"#,
        categories = category_list(),
        subject = subject,
        body = body_excerpt(body),
    )
}
