//! File-backed configuration and secrets for artbuddy.

pub mod config_service;
pub mod paths;
pub mod secret_service;

pub use config_service::ConfigService;
pub use paths::ArtbuddyPaths;
pub use secret_service::SecretServiceImpl;
