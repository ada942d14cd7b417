use crate::errors::{Result, StoryForgeError};

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const SERVICE_URL_VAR: &str = "OPENAI_SERVICE_URL";
pub const MODEL_VAR: &str = "OPENAI_MODEL";

/// Everything needed to build a chat client. Constructed once at the
/// service boundary and passed down explicitly.
#[derive(Clone, PartialEq)]
pub struct LlmSettings {
    pub api_key: String,
    /// Overrides the provider default endpoint when set.
    pub base_url: Option<String>,
    pub model: String,
    pub temperature: Option<f32>,
}

impl std::fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmSettings")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl LlmSettings {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            model: model.into(),
            temperature: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Read `OPENAI_API_KEY`, `OPENAI_SERVICE_URL` and `OPENAI_MODEL` from the
    /// process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`LlmSettings::from_env`] but against an arbitrary lookup.
    /// Blank values are treated as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let api_key = read(API_KEY_VAR).ok_or(StoryForgeError::MissingConfig(API_KEY_VAR))?;
        let model = read(MODEL_VAR).ok_or(StoryForgeError::MissingConfig(MODEL_VAR))?;
        let settings = Self {
            api_key,
            base_url: read(SERVICE_URL_VAR),
            model,
            temperature: None,
        };
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(StoryForgeError::MissingConfig(API_KEY_VAR));
        }
        if self.model.trim().is_empty() {
            return Err(StoryForgeError::MissingConfig(MODEL_VAR));
        }
        Ok(())
    }

    /// The base URL override, ignoring blank strings.
    pub fn base_url_override(&self) -> Option<&str> {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn reads_all_three_values() {
        let settings = LlmSettings::from_lookup(lookup(&[
            (API_KEY_VAR, "test-key"),
            (SERVICE_URL_VAR, "http://test-url"),
            (MODEL_VAR, "gpt-test"),
        ]))
        .unwrap();

        assert_eq!(settings.api_key, "test-key");
        assert_eq!(settings.base_url.as_deref(), Some("http://test-url"));
        assert_eq!(settings.model, "gpt-test");
    }

    #[test]
    fn service_url_is_optional() {
        let settings = LlmSettings::from_lookup(lookup(&[
            (API_KEY_VAR, "test-key"),
            (MODEL_VAR, "gpt-test"),
            (SERVICE_URL_VAR, "   "),
        ]))
        .unwrap();

        assert!(settings.base_url.is_none());
        assert!(settings.base_url_override().is_none());
    }

    #[test]
    fn missing_key_names_the_variable() {
        let err = LlmSettings::from_lookup(lookup(&[(MODEL_VAR, "gpt-test")])).unwrap_err();
        assert!(matches!(err, StoryForgeError::MissingConfig(API_KEY_VAR)));
        assert_eq!(err.code(), "CFG-1001");

        let err = LlmSettings::from_lookup(lookup(&[(API_KEY_VAR, "k")])).unwrap_err();
        assert!(matches!(err, StoryForgeError::MissingConfig(MODEL_VAR)));
    }

    #[test]
    fn validate_rejects_blank_key() {
        let settings = LlmSettings::new("  ", "gpt-test");
        assert!(settings.validate().is_err());
        assert!(LlmSettings::new("k", "gpt-test").validate().is_ok());
    }

    #[test]
    fn debug_output_hides_the_api_key() {
        let settings = LlmSettings::new("sk-secret-value", "gpt-test");
        let printed = format!("{settings:?}");
        assert!(!printed.contains("sk-secret-value"));
        assert!(printed.contains("gpt-test"));
    }
}
