// Pinch: thumb tip touching the index fingertip

use super::GestureClassifier;
use crate::core::geometry::landmark_distance;
use crate::models::gesture::GestureLabel;
use crate::models::pose::{HandLandmark, Keypoint3D};

/// Default pinch threshold in normalized image units
pub const DEFAULT_PINCH_THRESHOLD: f32 = 0.06;

#[derive(Debug, Clone)]
pub struct PinchGesture {
    threshold: f32,
}

impl PinchGesture {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }
}

impl Default for PinchGesture {
    fn default() -> Self {
        Self::new(DEFAULT_PINCH_THRESHOLD)
    }
}

impl GestureClassifier for PinchGesture {
    fn label(&self) -> GestureLabel {
        GestureLabel::Pinch
    }

    fn detect(&self, points: &[Keypoint3D]) -> bool {
        landmark_distance(points, HandLandmark::ThumbTip, HandLandmark::IndexFingerTip)
            .map(|d| d < self.threshold)
            .unwrap_or(false)
    }
}
