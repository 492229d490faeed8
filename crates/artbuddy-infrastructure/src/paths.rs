//! Path management for artbuddy configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/artbuddy/          # Config directory (dirs::config_dir)
//! ├── config.toml              # Application configuration
//! └── secret.json              # API keys
//! ```

use std::path::{Path, PathBuf};

use artbuddy_core::config::{GeminiConfig, RootConfig, SecretConfig};
use artbuddy_core::error::{ArtbuddyError, Result};

const APP_DIR_NAME: &str = "artbuddy";
const CONFIG_FILE_NAME: &str = "config.toml";
const SECRET_FILE_NAME: &str = "secret.json";

/// Resolves artbuddy's files, either under the platform config directory or
/// under an explicit base directory.
#[derive(Debug, Clone)]
pub struct ArtbuddyPaths {
    base: Option<PathBuf>,
}

impl ArtbuddyPaths {
    /// `None` uses the platform config directory; `Some(dir)` roots every
    /// path at `dir` (tests, portable installs).
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Returns the artbuddy configuration directory.
    pub fn config_dir(&self) -> Result<PathBuf> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or_else(|| ArtbuddyError::config("Cannot find config directory")),
        }
    }

    /// Returns the path to the main configuration file.
    pub fn config_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Returns the path to the secrets file.
    pub fn secret_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join(SECRET_FILE_NAME))
    }

    /// Writes a default `config.toml` unless one exists. Returns its path.
    pub fn ensure_config_file(&self) -> Result<PathBuf> {
        let config_path = self.config_file()?;
        if config_path.exists() {
            return Ok(config_path);
        }
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let body = toml::to_string_pretty(&RootConfig::default())?;
        std::fs::write(&config_path, body)?;
        Ok(config_path)
    }

    /// Ensures the secret file exists, creating a template with an empty
    /// key if it doesn't.
    ///
    /// On Unix the file is restricted to mode 600.
    pub fn ensure_secret_file(&self) -> Result<PathBuf> {
        let secret_path = self.secret_file()?;
        if secret_path.exists() {
            return Ok(secret_path);
        }
        if let Some(parent) = secret_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let template = SecretConfig {
            gemini: Some(GeminiConfig {
                api_key: String::new(),
                model_name: None,
            }),
        };
        std::fs::write(&secret_path, serde_json::to_string_pretty(&template)?)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&secret_path, permissions)?;
        }

        Ok(secret_path)
    }
}

impl Default for ArtbuddyPaths {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_live_under_app_dir() {
        let paths = ArtbuddyPaths::default();
        if let Ok(dir) = paths.config_dir() {
            assert!(dir.ends_with("artbuddy"));
            assert!(paths.config_file().unwrap().starts_with(&dir));
        }
    }

    #[test]
    fn ensure_files_write_templates_once() {
        let temp = tempfile::tempdir().unwrap();
        let paths = ArtbuddyPaths::new(Some(temp.path()));

        let config = paths.ensure_config_file().unwrap();
        let parsed: RootConfig = toml::from_str(&std::fs::read_to_string(&config).unwrap()).unwrap();
        assert_eq!(parsed, RootConfig::default());

        let secret = paths.ensure_secret_file().unwrap();
        let template: SecretConfig =
            serde_json::from_str(&std::fs::read_to_string(&secret).unwrap()).unwrap();
        assert_eq!(template.gemini.unwrap().api_key, "");

        std::fs::write(&secret, r#"{"gemini":{"api_key":"kept"}}"#).unwrap();
        paths.ensure_secret_file().unwrap();
        assert!(std::fs::read_to_string(&secret).unwrap().contains("kept"));
    }

    #[cfg(unix)]
    #[test]
    fn secret_template_is_private() {
        use std::os::unix::fs::PermissionsExt;
        let temp = tempfile::tempdir().unwrap();
        let secret = ArtbuddyPaths::new(Some(temp.path()))
            .ensure_secret_file()
            .unwrap();
        let mode = std::fs::metadata(secret).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
