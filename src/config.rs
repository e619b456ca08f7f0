//! Classifier configuration.
//!
//! Defaults match the live OpenAI setup. [`ClassifierConfig::from_env`] applies
//! environment overrides and [`ClassifierConfig::from_yaml_file`] reads a YAML file
//! where every key is optional.
//!
//! | Variable | Field |
//! |----------|-------|
//! | `OPENAI_API_KEY` | `api_key` |
//! | `OPENAI_BASE_URL` | `base_url` |
//! | `EMAIL_CLASSIFIER_MODEL` | `model` |
//! | `AI_HTTP_TIMEOUT_SECS` / `AI_TIMEOUT_SECS` | `timeout_secs` |
//! | `AI_PROXY_URL` | `proxy_url` |

use crate::{Error, ErrorContext, Result};
use serde::Deserialize;
use std::env;
use std::fmt;
use std::path::Path;

/// Environment variable holding the API key when none is configured explicitly.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_TEMPERATURE: f64 = 0.3;
pub const DEFAULT_MAX_TOKENS: u32 = 150;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Explicit credential; `OPENAI_API_KEY` is consulted when unset.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    pub proxy_url: Option<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            proxy_url: None,
        }
    }
}

// Keep credentials out of logs.
impl fmt::Debug for ClassifierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifierConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .field("proxy_url", &self.proxy_url)
            .finish()
    }
}

impl ClassifierConfig {
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Defaults overridden from the process environment.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| env::var(key).ok())
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Apply overrides from `lookup` (normally the environment) on top of `self`.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(url) = lookup("OPENAI_BASE_URL") {
            self.base_url = url;
        }
        if let Some(model) = lookup("EMAIL_CLASSIFIER_MODEL") {
            self.model = model;
        }
        if let Some(secs) = lookup("AI_HTTP_TIMEOUT_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .or_else(|| lookup("AI_TIMEOUT_SECS").and_then(|s| s.parse::<u64>().ok()))
        {
            self.timeout_secs = secs;
        }
        if let Some(proxy) = lookup("AI_PROXY_URL") {
            self.proxy_url = Some(proxy);
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.base_url).map_err(|e| {
            Error::configuration_with_context(
                "Invalid base URL",
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_details(e.to_string()),
            )
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::configuration_with_context(
                "Base URL must use http or https",
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_details(url.scheme().to_string()),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(Error::configuration_with_context(
                "Model must be specified",
                ErrorContext::new().with_field_path("model"),
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(Error::configuration_with_context(
                "Temperature must be within [0.0, 2.0]",
                ErrorContext::new()
                    .with_field_path("temperature")
                    .with_details(self.temperature.to_string()),
            ));
        }
        if self.max_tokens == 0 {
            return Err(Error::configuration_with_context(
                "max_tokens must be positive",
                ErrorContext::new().with_field_path("max_tokens"),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(Error::configuration_with_context(
                "timeout_secs must be positive",
                ErrorContext::new().with_field_path("timeout_secs"),
            ));
        }
        Ok(())
    }

    /// The configured key, else `OPENAI_API_KEY`. An empty key counts as unset.
    pub fn resolve_api_key(&self) -> Result<String> {
        self.resolve_api_key_with(|key| env::var(key).ok())
    }

    fn resolve_api_key_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| lookup(API_KEY_ENV))
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                Error::configuration_with_context(
                    "API key required",
                    ErrorContext::new()
                        .with_field_path("api_key")
                        .with_details(format!("set {API_KEY_ENV} or pass a key explicitly")),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_live_setup() {
        let config = ClassifierConfig::default();
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert_eq!(config.temperature, 0.3);
        assert_eq!(config.max_tokens, 150);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn overrides_apply_with_timeout_fallback() {
        let config = ClassifierConfig::default().with_overrides(lookup_from(&[
            ("OPENAI_API_KEY", "sk-env"),
            ("EMAIL_CLASSIFIER_MODEL", "gpt-4o-mini"),
            ("AI_HTTP_TIMEOUT_SECS", "not-a-number"),
            ("AI_TIMEOUT_SECS", "12"),
        ]));
        assert_eq!(config.api_key.as_deref(), Some("sk-env"));
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.timeout_secs, 12);
    }

    #[test]
    fn explicit_key_wins_over_environment() {
        let config = ClassifierConfig::default().with_api_key("sk-explicit");
        let key = config
            .resolve_api_key_with(lookup_from(&[("OPENAI_API_KEY", "sk-env")]))
            .unwrap();
        assert_eq!(key, "sk-explicit");
    }

    #[test]
    fn environment_key_is_the_fallback() {
        let key = ClassifierConfig::default()
            .resolve_api_key_with(lookup_from(&[("OPENAI_API_KEY", "sk-env")]))
            .unwrap();
        assert_eq!(key, "sk-env");
    }

    #[test]
    fn empty_explicit_key_falls_back_to_environment() {
        let config = ClassifierConfig::default().with_api_key("");
        let key = config
            .resolve_api_key_with(lookup_from(&[("OPENAI_API_KEY", "sk-env")]))
            .unwrap();
        assert_eq!(key, "sk-env");

        let err = config.resolve_api_key_with(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn missing_key_is_a_configuration_error() {
        let err = ClassifierConfig::default()
            .resolve_api_key_with(lookup_from(&[]))
            .unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
        assert_eq!(
            err.context().and_then(|c| c.field_path.as_deref()),
            Some("api_key")
        );
    }

    #[test]
    fn yaml_keys_are_optional() {
        let config = ClassifierConfig::from_yaml_str("model: gpt-4o\nmax_tokens: 200\n").unwrap();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.max_tokens, 200);
        assert_eq!(config.temperature, DEFAULT_TEMPERATURE);
    }

    #[test]
    fn yaml_rejects_unknown_keys() {
        assert!(ClassifierConfig::from_yaml_str("modle: gpt-4o\n").is_err());
    }

    #[test]
    fn validation_rejects_bad_values() {
        let bad_url = ClassifierConfig::default().with_base_url("ftp://example.com");
        assert!(bad_url.validate().is_err());

        let bad_temp = ClassifierConfig {
            temperature: 3.5,
            ..ClassifierConfig::default()
        };
        assert!(bad_temp.validate().is_err());

        let zero_tokens = ClassifierConfig {
            max_tokens: 0,
            ..ClassifierConfig::default()
        };
        assert!(zero_tokens.validate().is_err());
    }

    #[test]
    fn debug_redacts_api_key() {
        let rendered = format!("{:?}", ClassifierConfig::default().with_api_key("sk-secret"));
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
