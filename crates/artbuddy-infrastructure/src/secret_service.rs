//! Secret service implementation.
//!
//! Reads the Gemini API key from `secret.json`, with the `GOOGLE_API_KEY`
//! environment variable taking precedence.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use artbuddy_core::config::{GeminiConfig, SecretConfig};
use artbuddy_core::error::{ArtbuddyError, Result};
use artbuddy_core::secret::SecretService;

use crate::paths::ArtbuddyPaths;

/// Environment variable that overrides the key in `secret.json`.
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Service for loading secret configuration.
///
/// The merged configuration is cached after the first successful load.
#[derive(Clone)]
pub struct SecretServiceImpl {
    path: PathBuf,
    env_api_key: Option<String>,
    secrets: Arc<RwLock<Option<SecretConfig>>>,
}

impl SecretServiceImpl {
    /// Reads `secret.json` under `paths` and the process environment.
    pub fn new(paths: &ArtbuddyPaths) -> Result<Self> {
        let env_api_key = std::env::var(API_KEY_ENV).ok();
        Ok(Self::with_path(paths.secret_file()?, env_api_key))
    }

    /// Explicit file and environment override.
    pub fn with_path(path: impl Into<PathBuf>, env_api_key: Option<String>) -> Self {
        Self {
            path: path.into(),
            env_api_key: env_api_key.filter(|key| !key.trim().is_empty()),
            secrets: Arc::new(RwLock::new(None)),
        }
    }

    fn load_secrets_internal(&self) -> Result<SecretConfig> {
        {
            let read_lock = self.secrets.read().unwrap_or_else(|e| e.into_inner());
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let mut loaded = if self.path.exists() {
            let content = std::fs::read_to_string(&self.path).map_err(|e| {
                ArtbuddyError::security(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e.kind()
                ))
            })?;
            // serde_json errors never echo the offending value, only its position.
            serde_json::from_str::<SecretConfig>(&content)?
        } else {
            SecretConfig::default()
        };

        if let Some(api_key) = &self.env_api_key {
            let model_name = loaded.gemini.as_ref().and_then(|g| g.model_name.clone());
            loaded.gemini = Some(GeminiConfig {
                api_key: api_key.clone(),
                model_name,
            });
            tracing::debug!("[Secret] Using {} from environment", API_KEY_ENV);
        }

        let mut write_lock = self.secrets.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = Some(loaded.clone());
        Ok(loaded)
    }
}

#[async_trait::async_trait]
impl SecretService for SecretServiceImpl {
    async fn load_secrets(&self) -> Result<SecretConfig> {
        self.load_secrets_internal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_key_from_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("secret.json");
        std::fs::write(
            &path,
            r#"{"gemini":{"api_key":"file-key","model_name":"gemini-pro-vision"}}"#,
        )
        .unwrap();

        let service = SecretServiceImpl::with_path(&path, None);
        assert_eq!(service.gemini_api_key().await.unwrap(), "file-key");
        let secrets = service.load_secrets().await.unwrap();
        assert_eq!(
            secrets.gemini.unwrap().model_name.as_deref(),
            Some("gemini-pro-vision")
        );
    }

    #[tokio::test]
    async fn environment_overrides_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("secret.json");
        std::fs::write(&path, r#"{"gemini":{"api_key":"file-key"}}"#).unwrap();

        let service = SecretServiceImpl::with_path(&path, Some("env-key".into()));
        assert_eq!(service.gemini_api_key().await.unwrap(), "env-key");
    }

    #[tokio::test]
    async fn missing_file_and_env_is_a_security_error() {
        let temp = tempfile::tempdir().unwrap();
        let service = SecretServiceImpl::with_path(temp.path().join("secret.json"), None);
        let err = service.gemini_api_key().await.unwrap_err();
        assert!(err.is_config());
    }

    #[tokio::test]
    async fn blank_env_value_is_ignored() {
        let temp = tempfile::tempdir().unwrap();
        let service =
            SecretServiceImpl::with_path(temp.path().join("secret.json"), Some("  ".into()));
        assert!(service.gemini_api_key().await.is_err());
    }
}
