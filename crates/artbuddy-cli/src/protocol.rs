//! JSON-lines wire protocol.
//!
//! Every line is one JSON object tagged by `type`. Clients send
//! [`ClientMessage`]s; the server answers with [`ServerMessage`]s and pushes
//! a `render` line after every state change of the attached session.

use std::sync::Arc;

use artbuddy_core::capture::{CapturePayload, InputWarning, WarningKind};
use artbuddy_core::locale::UiStrings;
use artbuddy_core::render::RenderSnapshot;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Attach to `session_id` if it is live, otherwise start a new session.
    Open {
        #[serde(default)]
        session_id: Option<String>,
    },
    ToggleMode,
    Capture {
        /// Base64 image bytes.
        data: String,
        mime_type: String,
        #[serde(default)]
        file_name: Option<String>,
    },
    ClearCapture,
    Submit,
    Refresh,
}

impl ClientMessage {
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(line).map_err(|err| ProtocolError::InvalidMessage(err.to_string()))
    }

    /// Name used in logs; never includes image data.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientMessage::Open { .. } => "open",
            ClientMessage::ToggleMode => "toggle_mode",
            ClientMessage::Capture { .. } => "capture",
            ClientMessage::ClearCapture => "clear_capture",
            ClientMessage::Submit => "submit",
            ClientMessage::Refresh => "refresh",
        }
    }
}

/// Decodes the base64 body of a `capture` message.
pub fn decode_capture(
    data: &str,
    mime_type: &str,
    file_name: Option<String>,
) -> Result<CapturePayload, ProtocolError> {
    let bytes = BASE64_STANDARD
        .decode(data.trim())
        .map_err(|err| ProtocolError::InvalidImageData(err.to_string()))?;
    let payload = CapturePayload::new(bytes, mime_type);
    Ok(match file_name {
        Some(name) => payload.with_file_name(name),
        None => payload,
    })
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Opened { session_id: String },
    Render { snapshot: Arc<RenderSnapshot> },
    /// A user-level rejection; the session is unchanged.
    Warning { kind: WarningKind, message: String },
    /// A protocol-level problem with the last line.
    Error { message: String },
}

impl ServerMessage {
    pub fn warning(warning: &InputWarning, strings: &UiStrings) -> Self {
        ServerMessage::Warning {
            kind: warning.kind(),
            message: warning.message(strings),
        }
    }

    pub fn error(err: impl std::fmt::Display) -> Self {
        ServerMessage::Error {
            message: err.to_string(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ServerMessage::Opened { .. } => "opened",
            ServerMessage::Render { .. } => "render",
            ServerMessage::Warning { .. } => "warning",
            ServerMessage::Error { .. } => "error",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    #[error("invalid image data: {0}")]
    InvalidImageData(String),

    #[error("line exceeds {limit} bytes")]
    LineTooLong { limit: usize },
}
