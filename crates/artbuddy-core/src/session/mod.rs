//! Session domain module.
//!
//! # Module Structure
//!
//! - `entry`: Chat history entries (`ChatEntry`, `EntryContent`, `ChatRole`)
//! - `history`: Append-only history container (`ChatHistory`)
//! - `input_mode`: Capture source flag (`InputMode`)
//! - `state`: Per-session state and its phase (`SessionState`, `SessionPhase`)

mod entry;
mod history;
mod input_mode;
mod state;

pub use entry::{ChatEntry, ChatRole, EntryContent, EntryKind, ImageData};
pub use history::ChatHistory;
pub use input_mode::InputMode;
pub use state::{SessionPhase, SessionState};
