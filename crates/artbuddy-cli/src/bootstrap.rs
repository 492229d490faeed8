//! Wires configuration, secrets and the model into a [`SessionDirectory`].

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use artbuddy_application::{SessionDirectory, SessionSettings};
use artbuddy_core::config::RootConfig;
use artbuddy_core::locale::Locale;
use artbuddy_core::model::VisionModel;
use artbuddy_core::secret::SecretService;
use artbuddy_infrastructure::{ArtbuddyPaths, ConfigService, SecretServiceImpl};
use artbuddy_interaction::{DryrunAgent, GeminiApiAgent};

/// Command-line values that take precedence over `config.toml`.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_dir: Option<PathBuf>,
    pub locale: Option<Locale>,
    pub model: Option<String>,
    pub bind: Option<String>,
    pub dry_run: bool,
}

impl Overrides {
    pub fn paths(&self) -> ArtbuddyPaths {
        ArtbuddyPaths::new(self.config_dir.as_deref())
    }

    /// Applies the overrides on top of a loaded config.
    pub fn apply(&self, mut config: RootConfig) -> RootConfig {
        if let Some(locale) = self.locale {
            config.ui.locale = locale;
        }
        if let Some(model) = &self.model {
            config.model.name = model.clone();
        }
        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
        config
    }
}

/// Everything a transport needs to run.
pub struct App {
    pub config: RootConfig,
    pub directory: Arc<SessionDirectory>,
}

pub async fn build_app(overrides: &Overrides) -> Result<App> {
    let paths = overrides.paths();
    let config = load_config(&paths, overrides)?;
    let model = if overrides.dry_run {
        tracing::info!("[Bootstrap] Dry run: using the offline model");
        Arc::new(DryrunAgent::new()) as Arc<dyn VisionModel>
    } else {
        let secrets = SecretServiceImpl::new(&paths).context("Failed to locate secret.json")?;
        gemini_model(&config, overrides, &secrets).await?
    };

    let settings = SessionSettings::from_config(&config);
    tracing::info!(
        model = model.name(),
        locale = %settings.locale,
        request_timeout_secs = settings.request_timeout.as_secs(),
        "[Bootstrap] Ready"
    );
    Ok(App {
        config,
        directory: Arc::new(SessionDirectory::new(settings, model)),
    })
}

pub fn load_config(paths: &ArtbuddyPaths, overrides: &Overrides) -> Result<RootConfig> {
    let service = ConfigService::new(paths).context("Failed to locate config.toml")?;
    let config = service
        .get_config()
        .with_context(|| format!("Failed to load {}", service.path().display()))?;
    Ok(overrides.apply(config))
}

/// Builds the Gemini client. The model name comes from the command line,
/// then `secret.json`, then `config.toml`.
pub async fn gemini_model(
    config: &RootConfig,
    overrides: &Overrides,
    secrets: &dyn SecretService,
) -> Result<Arc<dyn VisionModel>> {
    let api_key = secrets.gemini_api_key().await.context(
        "Gemini API key missing: set GOOGLE_API_KEY or run `artbuddy init` and fill in secret.json",
    )?;
    let secret_model = secrets
        .load_secrets()
        .await?
        .gemini
        .and_then(|gemini| gemini.model_name)
        .filter(|name| !name.trim().is_empty());

    let model_name = match (&overrides.model, secret_model) {
        (Some(cli), _) => cli.clone(),
        (None, Some(from_secret)) => from_secret,
        (None, None) => config.model.name.clone(),
    };
    Ok(Arc::new(GeminiApiAgent::new(api_key, model_name)))
}
