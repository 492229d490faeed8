//! Chat renderer.
//!
//! Projects a session into a [`RenderSnapshot`], the full description of
//! what a client should draw. Rendering reads state and never changes it;
//! a refresh is simply a new snapshot.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::Serialize;

use crate::capture::{ACCEPTED_FILE_EXTENSIONS, CaptureForm};
use crate::locale::UiStrings;
use crate::session::{ChatHistory, ChatRole, EntryContent, InputMode, SessionPhase, SessionState};

/// One drawn chat bubble.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderedBlock {
    /// Markdown text block.
    Text { role: ChatRole, markdown: String },
    /// Inline image with the fixed caption.
    Image {
        role: ChatRole,
        mime_type: String,
        /// Base64 (standard alphabet) image bytes.
        data: String,
        caption: String,
    },
}

/// The capture area under the chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptureView {
    pub mode: InputMode,
    pub widget_label: String,
    /// Usage hint, only present for the camera widget.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Extensions the file picker accepts; empty for the camera.
    pub accepted_extensions: Vec<String>,
    pub has_payload: bool,
    pub submit_label: String,
}

/// Everything a client needs to redraw the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderSnapshot {
    pub session_id: String,
    pub title: String,
    pub blocks: Vec<RenderedBlock>,
    pub toggle_label: String,
    pub current_mode: String,
    pub capture: CaptureView,
    /// True while a model call is in flight.
    pub working: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Stateless projection from session state to snapshots.
#[derive(Debug, Clone, Copy)]
pub struct ChatRenderer<'a> {
    strings: &'a UiStrings,
    title: &'a str,
}

impl<'a> ChatRenderer<'a> {
    pub fn new(strings: &'a UiStrings, title: &'a str) -> Self {
        Self { strings, title }
    }

    /// Replays the history in order.
    pub fn render_history(&self, history: &ChatHistory) -> Vec<RenderedBlock> {
        history
            .iter()
            .map(|entry| match entry.content() {
                EntryContent::Text(text) => RenderedBlock::Text {
                    role: entry.role(),
                    markdown: text.clone(),
                },
                EntryContent::Image(image) => RenderedBlock::Image {
                    role: entry.role(),
                    mime_type: image.mime_type().to_string(),
                    data: BASE64_STANDARD.encode(image.bytes()),
                    caption: self.strings.image_caption.to_string(),
                },
            })
            .collect()
    }

    pub fn render(
        &self,
        session_id: &str,
        state: &SessionState,
        form: &CaptureForm,
        phase: SessionPhase,
    ) -> RenderSnapshot {
        let mode = state.input_mode();
        let working = phase.is_submitting();

        RenderSnapshot {
            session_id: session_id.to_string(),
            title: self.title.to_string(),
            blocks: self.render_history(state.history()),
            toggle_label: self.strings.toggle_label(mode).to_string(),
            current_mode: self.strings.current_mode_line(mode),
            capture: CaptureView {
                mode,
                widget_label: self.strings.widget_label(mode).to_string(),
                hint: mode
                    .is_camera()
                    .then(|| self.strings.camera_hint.to_string()),
                accepted_extensions: match mode {
                    InputMode::File => ACCEPTED_FILE_EXTENSIONS
                        .iter()
                        .map(|ext| ext.to_string())
                        .collect(),
                    InputMode::Camera => Vec::new(),
                },
                has_payload: form.held().is_some(),
                submit_label: self.strings.submit_label.to_string(),
            },
            working,
            status: working.then(|| self.strings.working.to_string()),
        }
    }
}
