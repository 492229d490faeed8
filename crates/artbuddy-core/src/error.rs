//! Error types for the ArtBuddy workspace.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the non-user-facing failures of ArtBuddy.
///
/// User-facing conditions (missing input, rejected images, model failures)
/// have their own types in [`crate::capture`] and [`crate::model`] because
/// they are recovered inside a session instead of propagated.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum ArtbuddyError {
    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Security/authentication error
    #[error("Security error: {0}")]
    Security(String),

    /// The session actor is gone (idle timeout or teardown)
    #[error("Session closed: {0}")]
    SessionClosed(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ArtbuddyError {
    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Security error
    pub fn security(message: impl Into<String>) -> Self {
        Self::Security(message.into())
    }

    /// Creates a SessionClosed error
    pub fn session_closed(session_id: impl Into<String>) -> Self {
        Self::SessionClosed(session_id.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Security(_))
    }

    /// Check if this is a session-closed error
    pub fn is_session_closed(&self) -> bool {
        matches!(self, Self::SessionClosed(_))
    }
}

impl From<std::io::Error> for ArtbuddyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ArtbuddyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ArtbuddyError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ArtbuddyError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, ArtbuddyError>`.
pub type Result<T> = std::result::Result<T, ArtbuddyError>;
