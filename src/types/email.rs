//! Email input and the fixed category vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An email to classify.
///
/// Missing fields deserialize to the empty string so a loosely shaped batch file
/// still yields one classification per entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
}

impl EmailMessage {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Classification label offered to the model.
///
/// The set and its order are fixed; the order is the one the prompt lists them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Urgent,
    MeetingRequest,
    ProjectUpdate,
    Administrative,
    CustomerInquiry,
    Marketing,
    Spam,
    Personal,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Urgent,
        Category::MeetingRequest,
        Category::ProjectUpdate,
        Category::Administrative,
        Category::CustomerInquiry,
        Category::Marketing,
        Category::Spam,
        Category::Personal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Urgent => "urgent",
            Category::MeetingRequest => "meeting_request",
            Category::ProjectUpdate => "project_update",
            Category::Administrative => "administrative",
            Category::CustomerInquiry => "customer_inquiry",
            Category::Marketing => "marketing",
            Category::Spam => "spam",
            Category::Personal => "personal",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| crate::Error::validation(format!("Unknown category: {s}")))
    }
}
