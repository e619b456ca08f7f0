//! Line-oriented parsing of the model's classification reply.
//!
//! The reply is expected to hold `Category:`, `Confidence:` and `Reasoning:` lines.
//! Headers are matched as exact, case-sensitive line prefixes; a line that does not
//! start with one of them is ignored, and a field without a matching line keeps its
//! default (see [`Classification::default`]).

use super::result::{Classification, ClassificationResult};

pub const CATEGORY_PREFIX: &str = "Category:";
pub const CONFIDENCE_PREFIX: &str = "Confidence:";
pub const REASONING_PREFIX: &str = "Reasoning:";

/// Confidence used when a `Confidence:` line is present but not a number.
///
/// Differs from the 0.0 used when the line is absent.
pub const CONFIDENCE_FALLBACK: f64 = 0.5;

/// Extract the classification fields from reply text. Later lines win.
pub fn parse_classification(reply: &str) -> Classification {
    let mut parsed = Classification::default();

    for line in reply.trim().split('\n') {
        if line.starts_with(CATEGORY_PREFIX) {
            parsed.category = field_value(line).to_lowercase();
        } else if line.starts_with(CONFIDENCE_PREFIX) {
            parsed.confidence = field_value(line)
                .parse::<f64>()
                .unwrap_or(CONFIDENCE_FALLBACK);
        } else if line.starts_with(REASONING_PREFIX) {
            parsed.reasoning = field_value(line).to_string();
        }
    }

    parsed
}

/// Turn reply text into a successful result. Any text, even empty, parses.
pub fn parse_reply(content: &str) -> ClassificationResult {
    parse_classification(content).into()
}

// Text after the first colon, trimmed.
fn field_value(line: &str) -> &str {
    line.split_once(':').map_or("", |(_, value)| value).trim()
}
