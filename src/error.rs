use std::fmt;
use thiserror::Error;

/// Where a configuration or validation error came from.
///
/// `field_path` names the config key (`base_url`, `api_key`) or the reply field
/// (`choices[0].message.content`) at fault; `source` names the component that raised
/// it (`openai_gateway`, `scripted_gateway`). Rendered after the message as
/// `(field: .., details: .., source: ..)`, omitting unset parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    pub field_path: Option<String>,
    /// Offending value or a hint for fixing it.
    pub details: Option<String>,
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    fn is_empty(&self) -> bool {
        self.field_path.is_none() && self.details.is_none() && self.source.is_none()
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        let parts = [
            ("field", &self.field_path),
            ("details", &self.details),
            ("source", &self.source),
        ];
        let rendered: Vec<String> = parts
            .iter()
            .filter_map(|(label, value)| value.as_ref().map(|v| format!("{label}: {v}")))
            .collect();
        write!(f, " ({})", rendered.join(", "))
    }
}

/// Unified error type for the classifier and its completion gateways.
///
/// `classify_email` never returns this type: gateway errors are folded into a
/// failed [`ClassificationResult`](crate::ClassificationResult). It surfaces from
/// construction, configuration loading and direct gateway calls.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}{context}")]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Validation error: {message}{context}")]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("Network transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Remote error: HTTP {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::configuration_with_context(msg, ErrorContext::new())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::validation_with_context(msg, ErrorContext::new())
    }

    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    /// Context of a configuration or validation error.
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } | Error::Validation { context, .. } => {
                Some(context)
            }
            _ => None,
        }
    }
}
