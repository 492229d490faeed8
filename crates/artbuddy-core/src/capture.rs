//! Capture form: holds the picture the user is about to submit.
//!
//! Exactly one capture widget is active at a time, selected by the
//! session's [`InputMode`]. The form keeps at most one payload for that
//! widget; switching widgets throws it away.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::locale::UiStrings;
use crate::session::{ImageData, InputMode};

/// File extensions the file picker accepts.
pub const ACCEPTED_FILE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// MIME types the file picker accepts.
pub const ACCEPTED_FILE_MIME_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/gif"];

/// Default ceiling for one picture (the hosted uploader's 200 MiB limit).
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 200 * 1024 * 1024;

/// One captured picture, as yielded by a capture widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturePayload {
    image: ImageData,
    file_name: Option<String>,
}

impl CapturePayload {
    pub fn new(bytes: impl Into<Vec<u8>>, mime_type: impl Into<String>) -> Self {
        let mime_type = normalize_mime(&mime_type.into());
        let bytes: Vec<u8> = bytes.into();
        Self {
            image: ImageData::new(mime_type, bytes),
            file_name: None,
        }
    }

    /// Attaches the original file name reported by the file picker.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn image(&self) -> &ImageData {
        &self.image
    }

    pub fn mime_type(&self) -> &str {
        self.image.mime_type()
    }

    pub fn bytes(&self) -> &[u8] {
        self.image.bytes()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn into_image(self) -> ImageData {
        self.image
    }
}

/// A user-visible warning. None of these touch the chat history.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputWarning {
    /// Submit pressed with nothing captured in the active widget.
    #[error("no picture captured in {mode} mode")]
    MissingInput { mode: InputMode },

    #[error("unsupported image type '{mime_type}' for {mode} mode")]
    UnsupportedImage { mode: InputMode, mime_type: String },

    #[error("captured image is empty")]
    EmptyImage,

    #[error("image is {size} bytes, limit is {limit}")]
    ImageTooLarge { size: usize, limit: usize },

    /// A model call is already in flight for this session.
    #[error("session is busy with a previous submission")]
    Busy,
}

/// Stable identifier of a warning for clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    MissingInput,
    UnsupportedImage,
    EmptyImage,
    ImageTooLarge,
    Busy,
}

impl InputWarning {
    pub fn kind(&self) -> WarningKind {
        match self {
            InputWarning::MissingInput { .. } => WarningKind::MissingInput,
            InputWarning::UnsupportedImage { .. } => WarningKind::UnsupportedImage,
            InputWarning::EmptyImage => WarningKind::EmptyImage,
            InputWarning::ImageTooLarge { .. } => WarningKind::ImageTooLarge,
            InputWarning::Busy => WarningKind::Busy,
        }
    }

    /// Localized text shown to the user.
    pub fn message(&self, strings: &UiStrings) -> String {
        match self {
            InputWarning::MissingInput { mode } => strings.missing_input(*mode).to_string(),
            InputWarning::UnsupportedImage { .. } => strings.unsupported_image.to_string(),
            InputWarning::EmptyImage => strings.empty_image.to_string(),
            InputWarning::ImageTooLarge { .. } => strings.image_too_large.to_string(),
            InputWarning::Busy => strings.busy.to_string(),
        }
    }
}

/// The capture form of one session.
#[derive(Debug, Clone)]
pub struct CaptureForm {
    active: InputMode,
    held: Option<CapturePayload>,
    max_image_bytes: usize,
}

impl CaptureForm {
    pub fn new(active: InputMode, max_image_bytes: usize) -> Self {
        Self {
            active,
            held: None,
            max_image_bytes,
        }
    }

    pub fn held(&self) -> Option<&CapturePayload> {
        self.held.as_ref()
    }

    /// Activates the widget for `mode`, discarding whatever the previous
    /// widget held.
    pub fn switch_to(&mut self, mode: InputMode) {
        if self.active != mode {
            self.active = mode;
            self.held = None;
        }
    }

    /// Stores a payload from the active widget, replacing any previous one.
    pub fn capture(&mut self, payload: CapturePayload) -> Result<(), InputWarning> {
        self.validate(&payload)?;
        self.held = Some(payload);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.held = None;
    }

    /// Returns the payload a submit should send.
    ///
    /// The held value stays in place; callers clear it once the pipeline
    /// has finished with it.
    pub fn payload_for_submit(&self) -> Result<CapturePayload, InputWarning> {
        self.held.clone().ok_or(InputWarning::MissingInput { mode: self.active })
    }

    fn validate(&self, payload: &CapturePayload) -> Result<(), InputWarning> {
        let size = payload.bytes().len();
        if size == 0 {
            return Err(InputWarning::EmptyImage);
        }
        if size > self.max_image_bytes {
            return Err(InputWarning::ImageTooLarge {
                size,
                limit: self.max_image_bytes,
            });
        }

        let unsupported = || InputWarning::UnsupportedImage {
            mode: self.active,
            mime_type: payload.mime_type().to_string(),
        };

        match self.active {
            InputMode::Camera => {
                if !payload.mime_type().starts_with("image/") {
                    return Err(unsupported());
                }
            }
            InputMode::File => {
                if !ACCEPTED_FILE_MIME_TYPES.contains(&payload.mime_type()) {
                    return Err(unsupported());
                }
                if let Some(name) = payload.file_name() {
                    if !has_accepted_extension(name) {
                        return Err(unsupported());
                    }
                }
            }
        }
        Ok(())
    }
}

fn has_accepted_extension(file_name: &str) -> bool {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .is_some_and(|ext| ACCEPTED_FILE_EXTENSIONS.contains(&ext.as_str()))
}

fn normalize_mime(raw: &str) -> String {
    let lower = raw.trim().to_ascii_lowercase();
    match lower.as_str() {
        "image/jpg" | "image/pjpeg" => "image/jpeg".to_string(),
        _ => lower,
    }
}
