//! The task that owns one session's state.
//!
//! Commands arrive over an mpsc channel and are handled one at a time.
//! A submit starts the model call on its own task and moves the session to
//! `Submitting`; the answer comes back over a oneshot and is folded in by
//! the same loop, so no two submissions can ever touch the history at once.

use std::sync::Arc;

use artbuddy_core::capture::{CaptureForm, CapturePayload, InputWarning};
use artbuddy_core::model::ModelError;
use artbuddy_core::render::{ChatRenderer, RenderSnapshot};
use artbuddy_core::session::{InputMode, SessionPhase, SessionState};
use tokio::sync::{mpsc, oneshot, watch};

use super::handle::ActionResult;
use super::settings::SessionSettings;
use crate::pipeline::{ResponsePipeline, SubmitOutcome};

type ModelAnswer = Result<String, ModelError>;

pub(crate) enum SessionCommand {
    ToggleMode {
        reply: oneshot::Sender<ActionResult<InputMode>>,
    },
    Capture {
        payload: CapturePayload,
        reply: oneshot::Sender<ActionResult<()>>,
    },
    ClearCapture {
        reply: oneshot::Sender<ActionResult<()>>,
    },
    Submit {
        reply: oneshot::Sender<ActionResult<()>>,
    },
    Refresh {
        reply: oneshot::Sender<Arc<RenderSnapshot>>,
    },
}

pub(crate) struct SessionActor {
    id: String,
    settings: SessionSettings,
    state: SessionState,
    form: CaptureForm,
    phase: SessionPhase,
    pipeline: ResponsePipeline,
    pending: Option<oneshot::Receiver<ModelAnswer>>,
    renders: watch::Sender<Arc<RenderSnapshot>>,
}

impl SessionActor {
    /// Builds a fresh session and the snapshot channel it publishes to.
    pub(crate) fn new(
        id: String,
        settings: SessionSettings,
        pipeline: ResponsePipeline,
    ) -> (Self, watch::Receiver<Arc<RenderSnapshot>>) {
        let strings = settings.strings();
        let state = SessionState::init(strings.greeting);
        let form = CaptureForm::new(state.input_mode(), settings.max_image_bytes);
        let initial = ChatRenderer::new(strings, &settings.title).render(
            &id,
            &state,
            &form,
            SessionPhase::Idle,
        );
        let (renders, receiver) = watch::channel(Arc::new(initial));

        let actor = Self {
            id,
            settings,
            state,
            form,
            phase: SessionPhase::Idle,
            pipeline,
            pending: None,
            renders,
        };
        (actor, receiver)
    }

    pub(crate) async fn run(mut self, mut commands: mpsc::Receiver<SessionCommand>) {
        tracing::info!(model = self.pipeline.model_name(), "[Session] Started");

        loop {
            let idle = tokio::time::sleep(self.settings.idle_timeout);
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle(command),
                    None => {
                        tracing::info!("[Session] All handles dropped");
                        break;
                    }
                },
                answer = wait_for_answer(&mut self.pending), if self.pending.is_some() => {
                    self.finish_submission(answer);
                }
                _ = idle, if !self.phase.is_submitting() => {
                    tracing::info!(
                        idle_secs = self.settings.idle_timeout.as_secs(),
                        "[Session] Idle timeout"
                    );
                    break;
                }
            }
        }

        tracing::info!(entries = self.state.history().len(), "[Session] Closed");
    }

    fn handle(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::ToggleMode { reply } => {
                let _ = reply.send(self.toggle_mode());
            }
            SessionCommand::Capture { payload, reply } => {
                let _ = reply.send(self.capture(payload));
            }
            SessionCommand::ClearCapture { reply } => {
                let _ = reply.send(self.clear_capture());
            }
            SessionCommand::Submit { reply } => {
                let result = self.submit();
                if let Err(warning) = &result {
                    tracing::warn!(%warning, "[Session] Submit rejected");
                }
                let _ = reply.send(result);
            }
            SessionCommand::Refresh { reply } => {
                let snapshot = self.publish();
                let _ = reply.send(snapshot);
            }
        }
    }

    fn ensure_idle(&self) -> ActionResult<()> {
        if self.phase.is_submitting() {
            Err(InputWarning::Busy)
        } else {
            Ok(())
        }
    }

    fn toggle_mode(&mut self) -> ActionResult<InputMode> {
        self.ensure_idle()?;
        let mode = self.state.toggle_mode();
        self.form.switch_to(mode);
        tracing::debug!(%mode, "[Session] Input mode toggled");
        self.publish();
        Ok(mode)
    }

    fn capture(&mut self, payload: CapturePayload) -> ActionResult<()> {
        self.ensure_idle()?;
        if let Err(warning) = self.form.capture(payload) {
            tracing::warn!(%warning, "[Session] Capture rejected");
            return Err(warning);
        }
        self.publish();
        Ok(())
    }

    fn clear_capture(&mut self) -> ActionResult<()> {
        self.ensure_idle()?;
        self.form.clear();
        self.publish();
        Ok(())
    }

    fn submit(&mut self) -> ActionResult<()> {
        self.ensure_idle()?;
        let payload = self.form.payload_for_submit()?;

        let request = self.pipeline.begin(&mut self.state, payload);
        self.phase = SessionPhase::Submitting;

        let (answer_tx, answer_rx) = oneshot::channel();
        let pipeline = self.pipeline.clone();
        tokio::spawn(async move {
            let _ = answer_tx.send(pipeline.invoke(request).await);
        });
        self.pending = Some(answer_rx);

        self.publish();
        Ok(())
    }

    fn finish_submission(&mut self, answer: ModelAnswer) {
        self.pending = None;
        let outcome = self.pipeline.complete(&mut self.state, answer);
        // Cleared on failure too, so a stale picture is never resent by accident.
        self.form.clear();
        self.phase = SessionPhase::Idle;
        if let SubmitOutcome::Failed(err) = &outcome {
            tracing::debug!(error = %err, "[Session] Submission ended with a handled failure");
        }
        self.publish();
    }

    fn publish(&self) -> Arc<RenderSnapshot> {
        let snapshot = Arc::new(
            ChatRenderer::new(self.settings.strings(), &self.settings.title).render(
                &self.id,
                &self.state,
                &self.form,
                self.phase,
            ),
        );
        self.renders.send_replace(snapshot.clone());
        snapshot
    }
}

async fn wait_for_answer(pending: &mut Option<oneshot::Receiver<ModelAnswer>>) -> ModelAnswer {
    match pending.as_mut() {
        Some(receiver) => receiver.await.unwrap_or_else(|_| {
            Err(ModelError::provider(
                "model task ended before producing an answer",
            ))
        }),
        None => std::future::pending().await,
    }
}
