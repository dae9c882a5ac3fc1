pub mod broadcast_server;
pub mod config;
pub mod frame_encoder;
pub mod geometry;
pub mod gesture_manager;
pub mod pipeline;

// Per-frame gesture classifiers
pub mod gestures;
