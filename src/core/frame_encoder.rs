// Preview encoding: raw frame -> JPEG -> base64 text for the wire payload

use crate::models::capture::{CaptureError, CaptureResult, PixelFormat, RawFrame};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageBuffer, Rgba};

/// Encode a frame as a base64 JPEG at the given quality (1-100)
pub fn encode_preview(frame: &RawFrame, quality: u8) -> CaptureResult<String> {
    let jpeg = encode_jpeg(frame, quality)?;
    Ok(BASE64.encode(jpeg))
}

/// Encode a frame as JPEG bytes
pub fn encode_jpeg(frame: &RawFrame, quality: u8) -> CaptureResult<Vec<u8>> {
    if frame.width == 0 || frame.height == 0 {
        return Err(CaptureError::Encode(format!(
            "Empty frame: {}x{}",
            frame.width, frame.height
        )));
    }

    if frame.data.len() < frame.expected_len() {
        return Err(CaptureError::Encode(format!(
            "Frame buffer too short: {} bytes for {}x{}",
            frame.data.len(),
            frame.width,
            frame.height
        )));
    }

    let mut data = frame.data[..frame.expected_len()].to_vec();
    if frame.format == PixelFormat::BGRA8 {
        for pixel in data.chunks_exact_mut(4) {
            pixel.swap(0, 2);
        }
    }

    let buffer: ImageBuffer<Rgba<u8>, Vec<u8>> =
        ImageBuffer::from_raw(frame.width, frame.height, data)
            .ok_or_else(|| CaptureError::Encode("Invalid frame dimensions".to_string()))?;

    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgba8(buffer).to_rgb8();

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, quality.clamp(1, 100))
        .encode_image(&rgb)
        .map_err(|e| CaptureError::Encode(e.to_string()))?;

    Ok(jpeg)
}
