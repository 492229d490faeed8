//! Session runtime.
//!
//! Each session is owned by one actor task ([`actor`]); everything else
//! talks to it through a cloneable [`SessionHandle`]. A [`SessionDirectory`]
//! maps session ids to live handles so a reconnecting client finds its
//! history again.

mod actor;
mod directory;
mod handle;
mod settings;

pub use directory::SessionDirectory;
pub use handle::{ActionResult, SessionHandle};
pub use settings::SessionSettings;
