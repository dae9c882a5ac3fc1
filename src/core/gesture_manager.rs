// Temporal debounce over per-frame gesture classifications

use crate::core::config::Config;
use crate::core::gestures::{default_classifiers, GestureClassifier};
use crate::models::gesture::GestureLabel;
use crate::models::pose::Keypoint3D;
use std::collections::VecDeque;
use tracing::debug;

/// Default number of frames that must agree before the stable state changes
pub const DEFAULT_HISTORY_LENGTH: usize = 5;

/// Stability engine: turns noisy per-frame labels into a stable gesture state
///
/// The stable state only moves when every label in the history window equals
/// the newest raw label. A mixed window freezes the current state instead of
/// resetting it, so a single noisy frame never flips or clears a gesture.
/// The check also applies while the window is still filling, so the very
/// first frame is promoted immediately.
pub struct GestureManager {
    classifiers: Vec<Box<dyn GestureClassifier>>,
    history: VecDeque<GestureLabel>,
    history_length: usize,
    current_state: GestureLabel,
}

impl GestureManager {
    /// Create a manager with the default classifiers and thresholds
    pub fn new() -> Self {
        Self::with_classifiers(
            default_classifiers(
                crate::core::gestures::pinch::DEFAULT_PINCH_THRESHOLD,
                crate::core::gestures::open_palm::DEFAULT_OPEN_PALM_THRESHOLD,
            ),
            DEFAULT_HISTORY_LENGTH,
        )
    }

    /// Create a manager from validated configuration
    pub fn from_config(config: &Config) -> Self {
        Self::with_classifiers(
            default_classifiers(config.pinch_threshold, config.open_palm_threshold),
            config.history_length,
        )
    }

    /// Create a manager with an explicit priority-ordered classifier list
    ///
    /// A zero `history_length` is treated as one.
    pub fn with_classifiers(
        classifiers: Vec<Box<dyn GestureClassifier>>,
        history_length: usize,
    ) -> Self {
        let history_length = history_length.max(1);
        Self {
            classifiers,
            history: VecDeque::with_capacity(history_length),
            history_length,
            current_state: GestureLabel::None,
        }
    }

    /// Raw label for a single frame: first matching classifier wins
    pub fn classify(&self, points: &[Keypoint3D]) -> GestureLabel {
        self.classifiers
            .iter()
            .find(|classifier| classifier.detect(points))
            .map(|classifier| classifier.label())
            .unwrap_or(GestureLabel::None)
    }

    /// Feed one frame and return the (possibly unchanged) stable state
    pub fn update(&mut self, points: &[Keypoint3D]) -> GestureLabel {
        let detected = self.classify(points);
        self.push_raw(detected)
    }

    /// Feed an already-computed raw label
    pub fn push_raw(&mut self, detected: GestureLabel) -> GestureLabel {
        if self.history.len() == self.history_length {
            self.history.pop_front();
        }
        self.history.push_back(detected);

        if self.history.iter().all(|label| *label == detected) && self.current_state != detected {
            debug!(from = %self.current_state, to = %detected, "stable gesture changed");
            self.current_state = detected;
        }

        self.current_state
    }

    pub fn current_state(&self) -> GestureLabel {
        self.current_state
    }

    /// Raw labels currently in the window, oldest first
    pub fn history(&self) -> impl Iterator<Item = GestureLabel> + '_ {
        self.history.iter().copied()
    }

    pub fn history_length(&self) -> usize {
        self.history_length
    }

    /// Clear the window and return to `NONE`
    pub fn reset(&mut self) {
        self.history.clear();
        self.current_state = GestureLabel::None;
    }
}

impl Default for GestureManager {
    fn default() -> Self {
        Self::new()
    }
}
