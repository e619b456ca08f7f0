//! Email classification: prompt building, reply parsing and the classifier itself.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`prompt`] | Builds the instruction sent as the user message |
//! | [`parse`] | Reads `Category:` / `Confidence:` / `Reasoning:` lines from the reply |
//! | [`ClassificationResult`] | Fixed-shape result with per-domain failure defaults |
//! | [`EmailClassifier`] | Ties prompt, gateway and parser together |

mod classifier;
pub mod parse;
pub mod prompt;
mod result;

pub use classifier::EmailClassifier;
pub use result::{
    Classification, ClassificationOutcome, ClassificationResult, GATEWAY_FAILURE_REASONING,
    PARSE_FAILURE_PREFIX, PARSE_FAILURE_REASONING, UNKNOWN_CATEGORY,
};
