//! Library half of the `artbuddy` binary: bootstrap, logging and the
//! JSON-lines transport, kept here so they can be tested directly.

pub mod bootstrap;
pub mod logging;
pub mod protocol;
pub mod transport;

pub use bootstrap::{App, Overrides, build_app};
pub use transport::{serve_connection, serve_tcp};
