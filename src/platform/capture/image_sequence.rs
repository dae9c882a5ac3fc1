// Frame source reading still images from a directory in file-name order

use super::FrameSource;
use crate::models::capture::{CaptureError, CaptureResult, PixelFormat, RawFrame};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tracing::debug;

const SUPPORTED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

pub struct ImageSequenceSource {
    directory: PathBuf,
    pending: VecDeque<PathBuf>,
    total: usize,
}

impl ImageSequenceSource {
    /// Scan `directory` for supported images
    pub fn open(directory: &Path) -> CaptureResult<Self> {
        if !directory.is_dir() {
            return Err(CaptureError::SourceUnavailable(format!(
                "{} is not a directory",
                directory.display()
            )));
        }

        let mut files: Vec<PathBuf> = std::fs::read_dir(directory)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && is_supported(path))
            .collect();
        files.sort();

        if files.is_empty() {
            return Err(CaptureError::SourceUnavailable(format!(
                "No images found in {}",
                directory.display()
            )));
        }

        Ok(Self {
            directory: directory.to_path_buf(),
            total: files.len(),
            pending: files.into(),
        })
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

impl FrameSource for ImageSequenceSource {
    fn read(&mut self) -> CaptureResult<Option<RawFrame>> {
        let Some(path) = self.pending.pop_front() else {
            return Ok(None);
        };

        debug!(path = %path.display(), "reading frame");
        let image = image::open(&path)
            .map_err(|e| CaptureError::ReadFailed(format!("{}: {}", path.display(), e)))?
            .to_rgba8();

        Ok(Some(RawFrame {
            timestamp: chrono::Utc::now().timestamp_millis(),
            width: image.width(),
            height: image.height(),
            data: image.into_raw(),
            format: PixelFormat::RGBA8,
        }))
    }

    fn release(&mut self) {
        self.pending.clear();
    }

    fn describe(&self) -> String {
        format!("{} ({} images)", self.directory.display(), self.total)
    }
}
