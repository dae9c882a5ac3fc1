// Landmark model bridge
// The hand landmark model runs out of process or behind a native binding; the
// producer loop only sees this trait

use crate::models::capture::RawFrame;
use crate::models::pose::{HandPose, PoseResult};

/// Landmark model output for one frame
#[derive(Debug, Clone, Default)]
pub struct MediaPipeResult {
    pub hands: Vec<HandPose>,
    pub processing_time_ms: u64,
}

impl MediaPipeResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has_hand(&self) -> bool {
        !self.hands.is_empty()
    }
}

/// Hand landmark bridge trait
/// Implement this for whichever backend produces landmarks
pub trait MediaPipeBridge: Send {
    /// Run inference on a frame
    fn process_frame(&mut self, frame: &RawFrame) -> PoseResult<MediaPipeResult>;

    /// Check if the model is loaded
    fn is_initialized(&self) -> bool;

    /// Get model info
    fn get_model_info(&self) -> String;
}

impl<B: MediaPipeBridge + ?Sized> MediaPipeBridge for Box<B> {
    fn process_frame(&mut self, frame: &RawFrame) -> PoseResult<MediaPipeResult> {
        (**self).process_frame(frame)
    }

    fn is_initialized(&self) -> bool {
        (**self).is_initialized()
    }

    fn get_model_info(&self) -> String {
        (**self).get_model_info()
    }
}

// ==============================================================================
// Dummy Implementation (no model attached)
// ==============================================================================

/// Bridge that never detects a hand
#[derive(Debug, Default)]
pub struct DummyMediaPipe;

impl DummyMediaPipe {
    pub fn new() -> Self {
        tracing::info!("Using dummy landmark model (no inference)");
        Self
    }
}

impl MediaPipeBridge for DummyMediaPipe {
    fn process_frame(&mut self, _frame: &RawFrame) -> PoseResult<MediaPipeResult> {
        Ok(MediaPipeResult::empty())
    }

    fn is_initialized(&self) -> bool {
        false
    }

    fn get_model_info(&self) -> String {
        "Dummy MediaPipe (no landmark inference)".to_string()
    }
}
