// Data models for frame capture, hand tracking, gestures and the broadcast payload

pub mod broadcast;
pub mod capture;
pub mod gesture;
pub mod pose;
