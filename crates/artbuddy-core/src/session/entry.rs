//! Chat history entry types.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Author of a chat entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    /// The child sharing a picture.
    User,
    /// The feedback assistant.
    Assistant,
}

/// Discriminant of [`EntryContent`], as exposed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Text,
    Image,
}

/// Raw image bytes plus their MIME type.
///
/// Bytes are reference counted so history snapshots stay cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    mime_type: String,
    bytes: Arc<[u8]>,
}

impl ImageData {
    pub fn new(mime_type: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Content of a chat entry. The variant is the entry's type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryContent {
    Text(String),
    Image(ImageData),
}

impl EntryContent {
    pub fn kind(&self) -> EntryKind {
        match self {
            EntryContent::Text(_) => EntryKind::Text,
            EntryContent::Image(_) => EntryKind::Image,
        }
    }
}

/// A single entry in a session's chat history.
///
/// Entries have no setters; once appended to a
/// [`ChatHistory`](super::ChatHistory) they never change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    role: ChatRole,
    content: EntryContent,
    /// Timestamp when the entry was created (ISO 8601 format).
    timestamp: String,
}

impl ChatEntry {
    fn new(role: ChatRole, content: EntryContent) -> Self {
        Self {
            role,
            content,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// An assistant text message (greeting, critique, or failure notice).
    pub fn assistant_text(text: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, EntryContent::Text(text.into()))
    }

    /// The picture a user submitted.
    pub fn user_image(image: ImageData) -> Self {
        Self::new(ChatRole::User, EntryContent::Image(image))
    }

    pub fn role(&self) -> ChatRole {
        self.role
    }

    pub fn kind(&self) -> EntryKind {
        self.content.kind()
    }

    pub fn content(&self) -> &EntryContent {
        &self.content
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Text of a text entry, `None` for images.
    pub fn as_text(&self) -> Option<&str> {
        match &self.content {
            EntryContent::Text(text) => Some(text),
            EntryContent::Image(_) => None,
        }
    }

    /// Image of an image entry, `None` for text.
    pub fn as_image(&self) -> Option<&ImageData> {
        match &self.content {
            EntryContent::Image(image) => Some(image),
            EntryContent::Text(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_content() {
        let text = ChatEntry::assistant_text("hello");
        assert_eq!(text.kind(), EntryKind::Text);
        assert_eq!(text.role(), ChatRole::Assistant);
        assert_eq!(text.as_text(), Some("hello"));
        assert!(text.as_image().is_none());

        let image = ChatEntry::user_image(ImageData::new("image/png", b"\x89PNG".to_vec()));
        assert_eq!(image.kind(), EntryKind::Image);
        assert_eq!(image.role(), ChatRole::User);
        assert_eq!(image.as_image().map(ImageData::bytes), Some(&b"\x89PNG"[..]));
    }

    #[test]
    fn timestamp_is_rfc3339() {
        let entry = ChatEntry::assistant_text("hi");
        assert!(chrono::DateTime::parse_from_rfc3339(entry.timestamp()).is_ok());
    }
}
