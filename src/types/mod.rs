//! Core data types shared by the classifier and its completion gateways.
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Message`] | Chat message with role and text content |
//! | [`MessageRole`] | Message role (system, user, assistant) |
//! | [`EmailMessage`] | Subject and body of an email to classify |
//! | [`Category`] | The fixed classification vocabulary |
//!
//! ## Example
//!
//! ```rust
//! use email_classifier::types::{Category, EmailMessage, Message};
//!
//! let system = Message::system("You are an expert email classifier.");
//! let email = EmailMessage::new("Weekly project status update", "Three features shipped.");
//! assert_eq!(Category::ProjectUpdate.as_str(), "project_update");
//! ```

pub mod email;
pub mod message;

pub use email::{Category, EmailMessage};
pub use message::{Message, MessageRole};
