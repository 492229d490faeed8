//! Capture source selection.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Which capture widget is active for a session.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InputMode {
    /// Camera capture widget.
    Camera,
    /// File picker widget. Sessions start here.
    #[default]
    File,
}

impl InputMode {
    /// The mode a toggle would switch to.
    pub fn next(self) -> Self {
        match self {
            InputMode::Camera => InputMode::File,
            InputMode::File => InputMode::Camera,
        }
    }

    pub fn is_camera(self) -> bool {
        matches!(self, InputMode::Camera)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_is_an_involution() {
        assert_eq!(InputMode::File.next(), InputMode::Camera);
        assert_eq!(InputMode::File.next().next(), InputMode::File);
    }

    #[test]
    fn wire_names() {
        assert_eq!(serde_json::to_string(&InputMode::Camera).unwrap(), "\"camera\"");
        assert_eq!(InputMode::File.to_string(), "file");
    }
}
