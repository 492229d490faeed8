//! Configuration models.
//!
//! `RootConfig` mirrors `config.toml`; `SecretConfig` mirrors `secret.json`.
//! Loading lives in `artbuddy-infrastructure`.

use serde::{Deserialize, Serialize};

use crate::capture::DEFAULT_MAX_IMAGE_BYTES;
use crate::locale::Locale;

pub const DEFAULT_MODEL_NAME: &str = "gemini-1.5-flash-latest";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8765";
pub const DEFAULT_SESSION_IDLE_TIMEOUT_SECS: u64 = 30 * 60;

/// Root of `config.toml`. Every section and field is optional.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct RootConfig {
    pub model: ModelConfig,
    pub ui: UiConfig,
    pub server: ServerConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ModelConfig {
    pub name: String,
    pub request_timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_MODEL_NAME.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct UiConfig {
    pub locale: Locale,
    /// Page title; the locale's title when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub max_image_bytes: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            title: None,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

impl UiConfig {
    pub fn resolved_title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| self.locale.strings().title.to_string())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub session_idle_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND_ADDRESS.to_string(),
            session_idle_timeout_secs: DEFAULT_SESSION_IDLE_TIMEOUT_SECS,
        }
    }
}

/// Root of `secret.json`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretConfig {
    #[serde(default)]
    pub gemini: Option<GeminiConfig>,
}

/// Gemini API configuration
#[derive(Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    pub api_key: String,
    #[serde(default)]
    pub model_name: Option<String>,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model_name", &self.model_name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: RootConfig = toml::from_str("").unwrap();
        assert_eq!(config, RootConfig::default());
        assert_eq!(config.model.name, "gemini-1.5-flash-latest");
        assert_eq!(config.ui.locale, Locale::Ko);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: RootConfig = toml::from_str(
            r#"
            [ui]
            locale = "en"

            [model]
            request_timeout_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.ui.locale, Locale::En);
        assert_eq!(config.ui.max_image_bytes, DEFAULT_MAX_IMAGE_BYTES);
        assert_eq!(config.model.request_timeout_secs, 5);
        assert_eq!(config.model.name, DEFAULT_MODEL_NAME);
        assert_eq!(config.server.bind, DEFAULT_BIND_ADDRESS);
    }

    #[test]
    fn title_falls_back_to_locale() {
        let mut ui = UiConfig::default();
        assert_eq!(ui.resolved_title(), "곡수초 O학년 그림 이야기 챗봇~");
        ui.title = Some("3학년 그림방".into());
        assert_eq!(ui.resolved_title(), "3학년 그림방");
    }

    #[test]
    fn api_key_is_not_debug_printed() {
        let config = GeminiConfig {
            api_key: "secret-key".into(),
            model_name: None,
        };
        assert!(!format!("{config:?}").contains("secret-key"));
    }
}
