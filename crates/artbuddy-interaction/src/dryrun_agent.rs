//! Offline stand-in for the Gemini agent.
//!
//! Answers every picture with a canned, deterministic message so the whole
//! session flow can run without credentials or network access.

use std::time::Duration;

use artbuddy_core::model::{CritiqueRequest, ModelError, VisionModel};
use async_trait::async_trait;

const DRYRUN_NAME: &str = "dryrun";
const PRAISE: &str = "🎨 What a wonderful picture! I love the colors you chose. Keep drawing! 🌟";

/// Vision model that never leaves the process.
#[derive(Debug, Clone, Default)]
pub struct DryrunAgent {
    latency: Duration,
}

impl DryrunAgent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleeps this long before answering, to exercise the working state.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

#[async_trait]
impl VisionModel for DryrunAgent {
    fn name(&self) -> &str {
        DRYRUN_NAME
    }

    async fn generate(&self, request: CritiqueRequest) -> Result<String, ModelError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(format!(
            "{PRAISE}\n\n_({DRYRUN_NAME}: {}, {} bytes)_",
            request.image.mime_type(),
            request.image.len()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artbuddy_core::locale::Locale;
    use artbuddy_core::session::ImageData;

    #[tokio::test]
    async fn answers_deterministically() {
        let agent = DryrunAgent::new();
        let request =
            CritiqueRequest::for_image(ImageData::new("image/gif", vec![0; 7]), Locale::En.strings());
        let first = agent.generate(request.clone()).await.unwrap();
        let second = agent.generate(request).await.unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with(PRAISE));
        assert!(first.contains("image/gif"));
        assert!(first.contains("7 bytes"));
    }
}
