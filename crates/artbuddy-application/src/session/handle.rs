use std::sync::Arc;

use artbuddy_core::capture::{CapturePayload, InputWarning};
use artbuddy_core::error::{ArtbuddyError, Result};
use artbuddy_core::model::VisionModel;
use artbuddy_core::render::RenderSnapshot;
use artbuddy_core::session::InputMode;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::Instrument;

use super::actor::{SessionActor, SessionCommand};
use super::settings::SessionSettings;
use crate::pipeline::ResponsePipeline;

const COMMAND_BUFFER: usize = 32;

/// Outcome of a user action: done, or a warning to show.
pub type ActionResult<T> = std::result::Result<T, InputWarning>;

/// Cloneable handle to a running session actor.
///
/// Methods return `Err(SessionClosed)` once the actor has stopped (idle
/// timeout or runtime shutdown); user-level rejections come back as the
/// inner [`ActionResult`].
#[derive(Clone)]
pub struct SessionHandle {
    id: Arc<str>,
    commands: mpsc::Sender<SessionCommand>,
    renders: watch::Receiver<Arc<RenderSnapshot>>,
}

impl SessionHandle {
    /// Starts a new session actor on the current tokio runtime.
    pub fn spawn(
        id: impl Into<String>,
        settings: SessionSettings,
        model: Arc<dyn VisionModel>,
    ) -> Self {
        let id = id.into();
        let pipeline = ResponsePipeline::new(model, settings.strings(), settings.request_timeout);
        let (actor, renders) = SessionActor::new(id.clone(), settings, pipeline);
        let (commands, command_rx) = mpsc::channel(COMMAND_BUFFER);

        let span = tracing::info_span!("session", id = %id);
        tokio::spawn(actor.run(command_rx).instrument(span));

        Self {
            id: id.into(),
            commands,
            renders,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// True once the actor has stopped.
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    /// Latest published snapshot, without a round trip to the actor.
    pub fn current(&self) -> Arc<RenderSnapshot> {
        self.renders.borrow().clone()
    }

    /// Receiver that yields every snapshot the session publishes.
    pub fn subscribe(&self) -> watch::Receiver<Arc<RenderSnapshot>> {
        self.renders.clone()
    }

    pub async fn toggle_mode(&self) -> Result<ActionResult<InputMode>> {
        self.request(|reply| SessionCommand::ToggleMode { reply }).await
    }

    pub async fn capture(&self, payload: CapturePayload) -> Result<ActionResult<()>> {
        self.request(|reply| SessionCommand::Capture { payload, reply }).await
    }

    pub async fn clear_capture(&self) -> Result<ActionResult<()>> {
        self.request(|reply| SessionCommand::ClearCapture { reply }).await
    }

    /// Submits the held picture. Returns as soon as the picture is in the
    /// history; the answer arrives as a later snapshot.
    pub async fn submit(&self) -> Result<ActionResult<()>> {
        self.request(|reply| SessionCommand::Submit { reply }).await
    }

    /// Re-renders the session and returns the snapshot.
    pub async fn refresh(&self) -> Result<Arc<RenderSnapshot>> {
        self.request(|reply| SessionCommand::Refresh { reply }).await
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> SessionCommand,
    ) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .await
            .map_err(|_| ArtbuddyError::session_closed(self.id.to_string()))?;
        response
            .await
            .map_err(|_| ArtbuddyError::session_closed(self.id.to_string()))
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("id", &self.id)
            .field("closed", &self.is_closed())
            .finish()
    }
}
