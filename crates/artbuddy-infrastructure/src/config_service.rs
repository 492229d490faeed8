//! Configuration service implementation.
//!
//! Loads the root configuration from `config.toml` and caches it.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use artbuddy_core::config::RootConfig;
use artbuddy_core::error::Result;

use crate::paths::ArtbuddyPaths;

/// Configuration service that loads and caches the root configuration.
///
/// A missing file yields the defaults; a malformed one is an error.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<RootConfig>>>,
}

impl ConfigService {
    /// Uses `config.toml` under the given paths.
    pub fn new(paths: &ArtbuddyPaths) -> Result<Self> {
        Ok(Self::with_path(paths.config_file()?))
    }

    /// Uses an explicit file (the `--config` flag).
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Gets the root configuration, loading from file if not cached.
    pub fn get_config(&self) -> Result<RootConfig> {
        {
            let read_lock = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = self.load_config()?;

        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = Some(loaded.clone());
        Ok(loaded)
    }

    fn load_config(&self) -> Result<RootConfig> {
        if !self.path.exists() {
            tracing::info!(
                "[Config] {} not found, using defaults",
                self.path.display()
            );
            return Ok(RootConfig::default());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let config: RootConfig = toml::from_str(&content)?;
        tracing::debug!("[Config] Loaded {}", self.path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artbuddy_core::locale::Locale;

    #[test]
    fn missing_file_gives_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let service = ConfigService::with_path(temp.path().join("config.toml"));
        assert_eq!(service.get_config().unwrap(), RootConfig::default());
    }

    #[test]
    fn file_is_parsed_and_cached() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[ui]\nlocale = \"en\"\n").unwrap();

        let service = ConfigService::with_path(&path);
        assert_eq!(service.get_config().unwrap().ui.locale, Locale::En);

        std::fs::write(&path, "[ui]\nlocale = \"ko\"\n").unwrap();
        assert_eq!(service.get_config().unwrap().ui.locale, Locale::En);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[model\nname = 3").unwrap();
        let err = ConfigService::with_path(&path).get_config().unwrap_err();
        assert!(err.to_string().contains("TOML"));
    }
}
