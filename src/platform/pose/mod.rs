// Hand landmark sources: a model bridge or a recorded landmark stream

pub mod mediapipe_bridge;
pub mod replay;

pub use mediapipe_bridge::{DummyMediaPipe, MediaPipeBridge, MediaPipeResult};
pub use replay::ReplayMediaPipe;
