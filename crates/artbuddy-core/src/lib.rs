pub mod capture;
pub mod config;
pub mod error;
pub mod locale;
pub mod model;
pub mod render;
pub mod secret;
pub mod session;

// Re-export common error type
pub use error::ArtbuddyError;
