use std::time::Duration;

use artbuddy_core::capture::DEFAULT_MAX_IMAGE_BYTES;
use artbuddy_core::config::{
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SESSION_IDLE_TIMEOUT_SECS, RootConfig,
};
use artbuddy_core::locale::{Locale, UiStrings};

/// Per-session knobs, resolved once from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub locale: Locale,
    pub title: String,
    pub max_image_bytes: usize,
    /// Upper bound for one model call.
    pub request_timeout: Duration,
    /// A session with no commands for this long shuts down.
    pub idle_timeout: Duration,
}

impl SessionSettings {
    pub fn from_config(config: &RootConfig) -> Self {
        Self {
            locale: config.ui.locale,
            title: config.ui.resolved_title(),
            max_image_bytes: config.ui.max_image_bytes,
            request_timeout: Duration::from_secs(config.model.request_timeout_secs),
            idle_timeout: Duration::from_secs(config.server.session_idle_timeout_secs),
        }
    }

    pub fn strings(&self) -> &'static UiStrings {
        self.locale.strings()
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        let locale = Locale::default();
        Self {
            locale,
            title: locale.strings().title.to_string(),
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            idle_timeout: Duration::from_secs(DEFAULT_SESSION_IDLE_TIMEOUT_SECS),
        }
    }
}
