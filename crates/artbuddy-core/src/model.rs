//! Boundary to the multimodal model.
//!
//! The model is a black box: one image plus instructions in, text or a
//! [`ModelError`] out. Implementations live in `artbuddy-interaction`.

use async_trait::async_trait;
use thiserror::Error;

use crate::locale::UiStrings;
use crate::session::ImageData;

/// Everything sent to the model for one critique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CritiqueRequest {
    /// Persona and policy, sent as the system instruction.
    pub system_instruction: String,
    /// The submitted picture.
    pub image: ImageData,
    /// User-turn instruction sent after the image.
    pub prompt: String,
}

impl CritiqueRequest {
    /// Builds the fixed request for `image` using the locale's copy.
    pub fn for_image(image: ImageData, strings: &UiStrings) -> Self {
        Self {
            system_instruction: strings.system_instruction.to_string(),
            image,
            prompt: strings.critique_prompt.to_string(),
        }
    }
}

/// Any failure of the external call. All variants take the same handled
/// failure path; the split only feeds logs and the embedded detail text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// The request never got a response (DNS, TLS, connection reset).
    #[error("transport error: {0}")]
    Transport(String),

    /// No answer within the configured timeout.
    #[error("request timed out after {secs}s")]
    Timeout { secs: u64 },

    /// Non-success HTTP status from the provider.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The provider answered but without any text.
    #[error("model returned no text")]
    EmptyResponse,

    /// Anything else reported by the provider or the client.
    #[error("{0}")]
    Provider(String),
}

impl ModelError {
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider(message.into())
    }

    /// Whether a manual resubmit has a fair chance of succeeding.
    pub fn is_transient(&self) -> bool {
        match self {
            ModelError::Transport(_) | ModelError::Timeout { .. } => true,
            ModelError::Http { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
            ModelError::EmptyResponse | ModelError::Provider(_) => false,
        }
    }
}

/// A multimodal model able to critique one picture.
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Short name for logs, e.g. `gemini-1.5-flash-latest`.
    fn name(&self) -> &str;

    async fn generate(&self, request: CritiqueRequest) -> Result<String, ModelError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::Locale;

    #[test]
    fn request_uses_locale_instructions() {
        let strings = Locale::Ko.strings();
        let request = CritiqueRequest::for_image(ImageData::new("image/png", vec![1]), strings);
        assert!(request.system_instruction.contains("그림 선생님"));
        assert!(request.prompt.starts_with("이 그림/사진을"));
        assert_eq!(request.image.mime_type(), "image/png");
    }

    #[test]
    fn provider_detail_is_displayed_verbatim() {
        assert_eq!(ModelError::provider("ProviderTimeout").to_string(), "ProviderTimeout");
    }

    #[test]
    fn transient_classification() {
        assert!(ModelError::Timeout { secs: 60 }.is_transient());
        assert!(
            ModelError::Http {
                status: 429,
                message: "quota".into()
            }
            .is_transient()
        );
        assert!(!ModelError::EmptyResponse.is_transient());
    }
}
