// Gesture labels shared by the classifiers, the stability engine and the wire format

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete gesture classification for a frame or for the debounced state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GestureLabel {
    #[default]
    None,
    Pinch,
    OpenPalm,
}

impl GestureLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            GestureLabel::None => "NONE",
            GestureLabel::Pinch => "PINCH",
            GestureLabel::OpenPalm => "OPEN_PALM",
        }
    }
}

impl fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
