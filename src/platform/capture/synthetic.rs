// Synthetic camera: solid frames at a fixed size, for headless runs and replays

use super::FrameSource;
use crate::models::capture::{CaptureResult, RawFrame};

pub struct SyntheticCamera {
    width: u32,
    height: u32,
    color: [u8; 4],
    max_frames: Option<u64>,
    frames_read: u64,
    released: bool,
}

impl SyntheticCamera {
    /// Create a camera producing `max_frames` frames, or frames forever when `None`
    pub fn new(width: u32, height: u32, max_frames: Option<u64>) -> Self {
        Self {
            width,
            height,
            color: [32, 32, 32, 255],
            max_frames,
            frames_read: 0,
            released: false,
        }
    }

    pub fn with_color(mut self, color: [u8; 4]) -> Self {
        self.color = color;
        self
    }

    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl FrameSource for SyntheticCamera {
    fn read(&mut self) -> CaptureResult<Option<RawFrame>> {
        if self.released {
            return Ok(None);
        }
        if let Some(max) = self.max_frames {
            if self.frames_read >= max {
                return Ok(None);
            }
        }

        self.frames_read += 1;
        let timestamp = chrono::Utc::now().timestamp_millis();
        Ok(Some(RawFrame::solid(self.width, self.height, self.color, timestamp)))
    }

    fn release(&mut self) {
        self.released = true;
    }

    fn describe(&self) -> String {
        match self.max_frames {
            Some(max) => format!("synthetic {}x{} ({} frames)", self.width, self.height, max),
            None => format!("synthetic {}x{} (unbounded)", self.width, self.height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_camera_ends_stream() {
        let mut camera = SyntheticCamera::new(8, 4, Some(2)).with_color([1, 2, 3, 255]);
        let frame = camera.read().unwrap().unwrap();
        assert_eq!((frame.width, frame.height), (8, 4));
        assert_eq!(&frame.data[..4], &[1, 2, 3, 255]);
        assert!(camera.read().unwrap().is_some());
        assert!(camera.read().unwrap().is_none());
        assert_eq!(camera.frames_read(), 2);
    }

    #[test]
    fn test_released_camera_yields_nothing() {
        let mut camera = SyntheticCamera::new(2, 2, None);
        assert!(camera.read().unwrap().is_some());
        camera.release();
        assert!(camera.is_released());
        assert!(camera.read().unwrap().is_none());
    }
}
