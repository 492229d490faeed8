//! Secret management service trait.
//!
//! Defines the interface for loading the model API key.

use crate::config::SecretConfig;
use crate::error::{ArtbuddyError, Result};

/// Service for loading secret configuration.
///
/// Implementations must never log secrets or put them in error messages.
#[async_trait::async_trait]
pub trait SecretService: Send + Sync {
    /// Loads the secret configuration.
    async fn load_secrets(&self) -> Result<SecretConfig>;

    /// Returns the Gemini API key, or a `Security` error when none is set.
    async fn gemini_api_key(&self) -> Result<String> {
        let secrets = self.load_secrets().await?;
        secrets
            .gemini
            .map(|gemini| gemini.api_key)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ArtbuddyError::security("Gemini API key is not configured"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeminiConfig;

    struct FixedSecrets(SecretConfig);

    #[async_trait::async_trait]
    impl SecretService for FixedSecrets {
        async fn load_secrets(&self) -> Result<SecretConfig> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn blank_key_is_a_security_error() {
        let service = FixedSecrets(SecretConfig {
            gemini: Some(GeminiConfig {
                api_key: "   ".into(),
                model_name: None,
            }),
        });
        let err = service.gemini_api_key().await.unwrap_err();
        assert!(matches!(err, ArtbuddyError::Security(_)));
    }

    #[tokio::test]
    async fn missing_section_is_a_security_error() {
        let service = FixedSecrets(SecretConfig::default());
        assert!(service.gemini_api_key().await.unwrap_err().is_config());
    }

    #[tokio::test]
    async fn configured_key_is_returned() {
        let service = FixedSecrets(SecretConfig {
            gemini: Some(GeminiConfig {
                api_key: "k".into(),
                model_name: None,
            }),
        });
        assert_eq!(service.gemini_api_key().await.unwrap(), "k");
    }
}
