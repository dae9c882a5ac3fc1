// Open palm: every non-thumb fingertip extended away from the palm base

use super::GestureClassifier;
use crate::core::geometry::landmark_distance;
use crate::models::gesture::GestureLabel;
use crate::models::pose::{HandLandmark, Keypoint3D};

/// Default palm-to-fingertip distance in normalized image units
pub const DEFAULT_OPEN_PALM_THRESHOLD: f32 = 0.15;

#[derive(Debug, Clone)]
pub struct OpenPalmGesture {
    threshold: f32,
}

impl OpenPalmGesture {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }
}

impl Default for OpenPalmGesture {
    fn default() -> Self {
        Self::new(DEFAULT_OPEN_PALM_THRESHOLD)
    }
}

impl GestureClassifier for OpenPalmGesture {
    fn label(&self) -> GestureLabel {
        GestureLabel::OpenPalm
    }

    fn detect(&self, points: &[Keypoint3D]) -> bool {
        // Short-circuits on the first folded (or missing) fingertip
        HandLandmark::FINGERTIPS.iter().all(|&tip| {
            landmark_distance(points, HandLandmark::PALM_BASE, tip)
                .map(|d| d > self.threshold)
                .unwrap_or(false)
        })
    }
}
