//! Model clients implementing [`artbuddy_core::model::VisionModel`].

pub mod dryrun_agent;
pub mod gemini_api_agent;

pub use dryrun_agent::DryrunAgent;
pub use gemini_api_agent::GeminiApiAgent;
