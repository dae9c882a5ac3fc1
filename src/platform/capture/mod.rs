// Frame sources feeding the producer loop
// Camera acquisition itself lives outside this crate; sources only hand out RawFrames

pub mod image_sequence;
pub mod synthetic;

pub use image_sequence::ImageSequenceSource;
pub use synthetic::SyntheticCamera;

use crate::models::capture::{CaptureResult, RawFrame};

/// Sequential frame source
pub trait FrameSource: Send {
    /// Next frame, or `None` at end of stream
    fn read(&mut self) -> CaptureResult<Option<RawFrame>>;

    /// Release acquisition resources; called once when the producer stops
    fn release(&mut self) {}

    /// Human-readable description for logs
    fn describe(&self) -> String;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn read(&mut self) -> CaptureResult<Option<RawFrame>> {
        (**self).read()
    }

    fn release(&mut self) {
        (**self).release()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
