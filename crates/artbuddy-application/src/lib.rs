//! Application layer for ArtBuddy.
//!
//! Runs sessions as actors and drives the response pipeline against a
//! [`VisionModel`](artbuddy_core::model::VisionModel).

pub mod pipeline;
pub mod session;

pub use pipeline::{ResponsePipeline, SubmitOutcome};
pub use session::{ActionResult, SessionDirectory, SessionHandle, SessionSettings};
