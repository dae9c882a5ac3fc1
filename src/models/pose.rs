// Data models for hand tracking results produced by the landmark model

use serde::{Deserialize, Serialize};

// ==============================================================================
// Hand Tracking (21 keypoints per hand)
// ==============================================================================

/// Hand pose tracking result for a single detected hand
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandPose {
    pub handedness: Handedness,
    pub landmarks: Vec<Keypoint3D>, // 21 hand landmarks, indexed by HandLandmark
    pub confidence: f32,
}

impl HandPose {
    pub fn new(handedness: Handedness, landmarks: Vec<Keypoint3D>, confidence: f32) -> Self {
        Self {
            handedness,
            landmarks,
            confidence,
        }
    }

    /// Flatten landmarks into `[x, y, z]` triples for the wire format
    pub fn landmark_triples(&self) -> Vec<[f32; 3]> {
        self.landmarks.iter().map(Keypoint3D::to_array).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Handedness::Left => "left",
            Handedness::Right => "right",
        }
    }
}

/// MediaPipe Hand Landmark indices (21 total)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum HandLandmark {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexFingerMcp = 5,
    IndexFingerPip = 6,
    IndexFingerDip = 7,
    IndexFingerTip = 8,
    MiddleFingerMcp = 9,
    MiddleFingerPip = 10,
    MiddleFingerDip = 11,
    MiddleFingerTip = 12,
    RingFingerMcp = 13,
    RingFingerPip = 14,
    RingFingerDip = 15,
    RingFingerTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

/// Number of landmarks in a complete hand point set
pub const HAND_LANDMARK_COUNT: usize = 21;

impl HandLandmark {
    /// Palm base used as the reference point for open-hand measurements
    pub const PALM_BASE: HandLandmark = HandLandmark::Wrist;

    /// The four non-thumb fingertips
    pub const FINGERTIPS: [HandLandmark; 4] = [
        HandLandmark::IndexFingerTip,
        HandLandmark::MiddleFingerTip,
        HandLandmark::RingFingerTip,
        HandLandmark::PinkyTip,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

// ==============================================================================
// Shared: 3D Keypoint
// ==============================================================================

/// A 3D landmark in normalized image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint3D {
    pub x: f32, // Normalized [0, 1] for image coordinates
    pub y: f32, // Normalized [0, 1] for image coordinates
    pub z: f32, // Depth relative to the wrist, roughly the same scale as x
}

impl Keypoint3D {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f32; 3]> for Keypoint3D {
    fn from(value: [f32; 3]) -> Self {
        Self::new(value[0], value[1], value[2])
    }
}

// ==============================================================================
// Error Types
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PoseError {
    #[error("Inference failed: {0}")]
    InferenceFailed(String),

    #[error("Invalid landmark recording at line {line}: {reason}")]
    InvalidRecording { line: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PoseResult<T> = Result<T, PoseError>;
