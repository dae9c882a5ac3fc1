// Wire payload and error types for the subscriber broadcast layer

use crate::models::gesture::GestureLabel;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier assigned to each live subscriber connection
pub type SubscriberId = Uuid;

/// Per-frame message pushed to every subscriber
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FramePayload {
    pub hand_detected: bool,
    pub gesture: GestureLabel,
    pub landmarks: Vec<[f32; 3]>, // Empty when no hand was detected
    pub image: String,            // Base64 JPEG preview, empty when not encoded
}

impl FramePayload {
    /// Payload for a frame without a detected hand
    pub fn no_hand(image: String) -> Self {
        Self {
            hand_detected: false,
            gesture: GestureLabel::None,
            landmarks: Vec::new(),
            image,
        }
    }

    /// Payload for a frame with a tracked hand and its stable gesture
    pub fn with_hand(gesture: GestureLabel, landmarks: Vec<[f32; 3]>, image: String) -> Self {
        Self {
            hand_detected: true,
            gesture,
            landmarks,
            image,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BroadcastError {
    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type BroadcastResult<T> = Result<T, BroadcastError>;
