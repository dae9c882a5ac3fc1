// Distance helpers over hand landmark point sets

use crate::models::pose::{HandLandmark, Keypoint3D};

/// Euclidean distance between two keypoints in their native (normalized) scale
pub fn distance(a: &Keypoint3D, b: &Keypoint3D) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let dz = a.z - b.z;
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Distance between two landmarks of a point set
///
/// Returns `None` when the point set is too short to contain either landmark,
/// so callers can fail closed on truncated model output.
pub fn landmark_distance(points: &[Keypoint3D], a: HandLandmark, b: HandLandmark) -> Option<f32> {
    let first = points.get(a.index())?;
    let second = points.get(b.index())?;
    Some(distance(first, second))
}
