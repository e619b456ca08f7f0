//! # email-classifier
//!
//! Classifies emails into a fixed category vocabulary by asking a hosted
//! chat-completion model and reading its three-line reply.
//!
//! ## Overview
//!
//! Each classification builds one prompt from the subject and a bounded body excerpt,
//! makes one call through a [`CompletionGateway`], and parses the reply's
//! `Category:`, `Confidence:` and `Reasoning:` lines into a [`ClassificationResult`].
//! Batches are classified sequentially in input order.
//!
//! Failures never escape `classify_email`: a failed gateway call and an unparseable
//! reply each produce a failed result with category `"unknown"`, confidence `0.0` and
//! their own reasoning text.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use email_classifier::{ClassifierConfig, EmailClassifier};
//!
//! #[tokio::main]
//! async fn main() -> email_classifier::Result<()> {
//!     let classifier = EmailClassifier::from_config(&ClassifierConfig::from_env())?;
//!
//!     let result = classifier
//!         .classify_email("URGENT: Server down", "Customers cannot reach the website.")
//!         .await;
//!     println!("{} ({:.2})", result.category(), result.confidence());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`classify`] | Prompt building, reply parsing, results and the classifier |
//! | [`gateway`] | Completion gateway trait, OpenAI and scripted implementations |
//! | [`config`] | Model, endpoint and credential configuration |
//! | [`types`] | Messages, emails and categories |

pub mod classify;
pub mod config;
pub mod gateway;
pub mod types;

pub use classify::{
    Classification, ClassificationOutcome, ClassificationResult, EmailClassifier,
};
pub use config::ClassifierConfig;
pub use gateway::{
    CompletionGateway, CompletionReply, CompletionRequest, OpenAiGateway, ScriptedGateway,
    ScriptedReply,
};
pub use types::{Category, EmailMessage, Message, MessageRole};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
