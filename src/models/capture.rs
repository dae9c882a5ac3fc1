// Data structures for frame acquisition

/// A single camera frame handed to the landmark model
#[derive(Debug, Clone)]
pub struct RawFrame {
    pub timestamp: i64,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub format: PixelFormat,
}

impl RawFrame {
    /// Build a frame filled with a single RGBA colour
    pub fn solid(width: u32, height: u32, color: [u8; 4], timestamp: i64) -> Self {
        let pixel_count = (width as usize) * (height as usize);
        let mut data = Vec::with_capacity(pixel_count * 4);
        for _ in 0..pixel_count {
            data.extend_from_slice(&color);
        }

        Self {
            timestamp,
            width,
            height,
            data,
            format: PixelFormat::RGBA8,
        }
    }

    /// Expected buffer length for the frame dimensions
    pub fn expected_len(&self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }
}

/// Pixel format of acquired frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    RGBA8,
    BGRA8,
}

/// Error types for frame acquisition and preview encoding
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Frame source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Frame read failed: {0}")]
    ReadFailed(String),

    #[error("Preview encoding failed: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CaptureResult<T> = Result<T, CaptureError>;
