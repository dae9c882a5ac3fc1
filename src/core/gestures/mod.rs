//! Single-frame gesture classifiers.
//!
//! Each classifier is a pure predicate over a hand point set. The stability
//! engine consults them in priority order and the first match wins, so new
//! gestures are added by implementing [`GestureClassifier`] and inserting the
//! classifier at the right position in the list.

pub mod open_palm;
pub mod pinch;

pub use open_palm::OpenPalmGesture;
pub use pinch::PinchGesture;

use crate::models::gesture::GestureLabel;
use crate::models::pose::Keypoint3D;

/// Stateless single-frame gesture predicate
pub trait GestureClassifier: Send + Sync {
    /// Label produced when this classifier matches
    fn label(&self) -> GestureLabel;

    /// Whether the point set shows this gesture
    ///
    /// Must return `false` for point sets missing any landmark it inspects.
    fn detect(&self, points: &[Keypoint3D]) -> bool;
}

/// Default classifiers in priority order: pinch before open palm
pub fn default_classifiers(
    pinch_threshold: f32,
    open_palm_threshold: f32,
) -> Vec<Box<dyn GestureClassifier>> {
    vec![
        Box::new(PinchGesture::new(pinch_threshold)),
        Box::new(OpenPalmGesture::new(open_palm_threshold)),
    ]
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::pose::{HandLandmark, Keypoint3D, HAND_LANDMARK_COUNT};

    /// Full 21-point hand with every landmark at the origin
    pub fn make_hand() -> Vec<Keypoint3D> {
        vec![Keypoint3D::new(0.0, 0.0, 0.0); HAND_LANDMARK_COUNT]
    }

    pub fn set_point(points: &mut [Keypoint3D], landmark: HandLandmark, x: f32, y: f32, z: f32) {
        points[landmark.index()] = Keypoint3D::new(x, y, z);
    }

    /// Thumb and index tips touching, other fingers folded
    pub fn pinch_hand() -> Vec<Keypoint3D> {
        let mut points = make_hand();
        set_point(&mut points, HandLandmark::ThumbTip, 0.40, 0.40, 0.0);
        set_point(&mut points, HandLandmark::IndexFingerTip, 0.41, 0.40, 0.0);
        points
    }

    /// All four fingertips well away from the palm base, thumb tucked
    pub fn open_palm_hand() -> Vec<Keypoint3D> {
        let mut points = make_hand();
        set_point(&mut points, HandLandmark::Wrist, 0.5, 0.9, 0.0);
        set_point(&mut points, HandLandmark::ThumbTip, 0.3, 0.7, 0.0);
        set_point(&mut points, HandLandmark::IndexFingerTip, 0.4, 0.5, 0.0);
        set_point(&mut points, HandLandmark::MiddleFingerTip, 0.5, 0.45, 0.0);
        set_point(&mut points, HandLandmark::RingFingerTip, 0.6, 0.5, 0.0);
        set_point(&mut points, HandLandmark::PinkyTip, 0.7, 0.6, 0.0);
        points
    }

    /// Loose fist: nothing close enough to pinch, nothing far enough to be open
    pub fn neutral_hand() -> Vec<Keypoint3D> {
        let mut points = make_hand();
        set_point(&mut points, HandLandmark::Wrist, 0.5, 0.9, 0.0);
        set_point(&mut points, HandLandmark::ThumbTip, 0.3, 0.8, 0.0);
        set_point(&mut points, HandLandmark::IndexFingerTip, 0.45, 0.85, 0.0);
        set_point(&mut points, HandLandmark::MiddleFingerTip, 0.5, 0.84, 0.0);
        set_point(&mut points, HandLandmark::RingFingerTip, 0.55, 0.85, 0.0);
        set_point(&mut points, HandLandmark::PinkyTip, 0.6, 0.86, 0.0);
        points
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_default_priority_order() {
        let classifiers = default_classifiers(0.06, 0.15);
        let labels: Vec<GestureLabel> = classifiers.iter().map(|c| c.label()).collect();
        assert_eq!(labels, vec![GestureLabel::Pinch, GestureLabel::OpenPalm]);
    }

    #[test]
    fn test_fixture_hands_match_expected_classifiers() {
        let classifiers = default_classifiers(0.06, 0.15);
        let first_match = |points: &[Keypoint3D]| {
            classifiers
                .iter()
                .find(|c| c.detect(points))
                .map(|c| c.label())
                .unwrap_or_default()
        };

        assert_eq!(first_match(&pinch_hand()), GestureLabel::Pinch);
        assert_eq!(first_match(&open_palm_hand()), GestureLabel::OpenPalm);
        assert_eq!(first_match(&neutral_hand()), GestureLabel::None);
    }
}
