//! Response pipeline: one picture in, one assistant message out.
//!
//! The pipeline is split in three steps so a session actor can keep
//! serving refreshes while the model call is in flight:
//!
//! 1. [`ResponsePipeline::begin`] appends the user's picture and builds the request.
//! 2. [`ResponsePipeline::invoke`] calls the model under the request timeout.
//! 3. [`ResponsePipeline::complete`] appends the answer or the failure notice.

use std::sync::Arc;
use std::time::Duration;

use artbuddy_core::capture::CapturePayload;
use artbuddy_core::locale::UiStrings;
use artbuddy_core::model::{CritiqueRequest, ModelError, VisionModel};
use artbuddy_core::session::{ChatEntry, SessionState};

/// How a submission ended. Both variants leave the session usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The model's critique was appended.
    Answered,
    /// The failure notice was appended.
    Failed(ModelError),
}

#[derive(Clone)]
pub struct ResponsePipeline {
    model: Arc<dyn VisionModel>,
    strings: &'static UiStrings,
    request_timeout: Duration,
}

impl ResponsePipeline {
    pub fn new(
        model: Arc<dyn VisionModel>,
        strings: &'static UiStrings,
        request_timeout: Duration,
    ) -> Self {
        Self {
            model,
            strings,
            request_timeout,
        }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Appends the user's picture and returns the request to send.
    pub fn begin(&self, state: &mut SessionState, payload: CapturePayload) -> CritiqueRequest {
        let image = payload.into_image();
        tracing::info!(
            model = self.model.name(),
            mime_type = image.mime_type(),
            image_bytes = image.len(),
            "[Pipeline] Submitting picture"
        );
        state.append(ChatEntry::user_image(image.clone()));
        CritiqueRequest::for_image(image, self.strings)
    }

    /// Calls the model. Exceeding the request timeout is a [`ModelError::Timeout`].
    pub async fn invoke(&self, request: CritiqueRequest) -> Result<String, ModelError> {
        match tokio::time::timeout(self.request_timeout, self.model.generate(request)).await {
            Ok(result) => result,
            Err(_) => Err(ModelError::Timeout {
                secs: self.request_timeout.as_secs(),
            }),
        }
    }

    /// Appends exactly one assistant text entry for `result`.
    pub fn complete(
        &self,
        state: &mut SessionState,
        result: Result<String, ModelError>,
    ) -> SubmitOutcome {
        match result {
            Ok(text) => {
                tracing::info!(chars = text.chars().count(), "[Pipeline] Critique received");
                state.append(ChatEntry::assistant_text(text));
                SubmitOutcome::Answered
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    transient = err.is_transient(),
                    "[Pipeline] Model call failed"
                );
                state.append(ChatEntry::assistant_text(
                    self.strings.failure_message(&err.to_string()),
                ));
                SubmitOutcome::Failed(err)
            }
        }
    }
}
