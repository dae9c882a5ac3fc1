// Replays recorded hand landmarks, one JSON object per frame:
//   {"hands": [[[x, y, z], ... 21 points], ...]}
// A blank line or an empty "hands" array is a frame with no hand.

use super::mediapipe_bridge::{MediaPipeBridge, MediaPipeResult};
use crate::models::capture::RawFrame;
use crate::models::pose::{HandPose, Handedness, Keypoint3D, PoseError, PoseResult};
use serde::Deserialize;
use std::collections::VecDeque;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RecordedFrame {
    #[serde(default)]
    hands: Vec<Vec<[f32; 3]>>,
    #[serde(default)]
    handedness: Vec<Handedness>,
}

pub struct ReplayMediaPipe {
    frames: VecDeque<Vec<HandPose>>,
    total: usize,
}

impl ReplayMediaPipe {
    pub fn open(path: &Path) -> PoseResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> PoseResult<Self> {
        let mut frames = VecDeque::new();

        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                frames.push_back(Vec::new());
                continue;
            }

            let recorded: RecordedFrame =
                serde_json::from_str(line).map_err(|e| PoseError::InvalidRecording {
                    line: index + 1,
                    reason: e.to_string(),
                })?;

            let hands = recorded
                .hands
                .into_iter()
                .enumerate()
                .map(|(i, points)| {
                    let handedness = recorded
                        .handedness
                        .get(i)
                        .copied()
                        .unwrap_or(Handedness::Right);
                    let landmarks = points.into_iter().map(Keypoint3D::from).collect();
                    HandPose::new(handedness, landmarks, 1.0)
                })
                .collect();
            frames.push_back(hands);
        }

        let total = frames.len();
        Ok(Self { frames, total })
    }

    /// Frames not yet replayed
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl MediaPipeBridge for ReplayMediaPipe {
    fn process_frame(&mut self, _frame: &RawFrame) -> PoseResult<MediaPipeResult> {
        let start = std::time::Instant::now();
        // Exhausted recordings keep reporting no hand
        let hands = self.frames.pop_front().unwrap_or_default();
        Ok(MediaPipeResult {
            hands,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn is_initialized(&self) -> bool {
        true
    }

    fn get_model_info(&self) -> String {
        format!("Landmark replay ({} recorded frames)", self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand_line(x: f32) -> String {
        let points: Vec<[f32; 3]> = (0..21).map(|_| [x, 0.5, 0.0]).collect();
        serde_json::json!({ "hands": [points], "handedness": ["left"] }).to_string()
    }

    #[test]
    fn test_parse_frames_and_blank_lines() {
        let text = format!("{}\n\n{{\"hands\": []}}\n", hand_line(0.25));
        let mut replay = ReplayMediaPipe::parse(&text).unwrap();
        assert_eq!(replay.len(), 3);

        let frame = RawFrame::solid(1, 1, [0, 0, 0, 255], 0);
        let first = replay.process_frame(&frame).unwrap();
        assert_eq!(first.hands.len(), 1);
        assert_eq!(first.hands[0].landmarks.len(), 21);
        assert_eq!(first.hands[0].handedness, Handedness::Left);
        assert_eq!(first.hands[0].landmarks[3], Keypoint3D::new(0.25, 0.5, 0.0));

        assert!(!replay.process_frame(&frame).unwrap().has_hand());
        assert!(!replay.process_frame(&frame).unwrap().has_hand());
        assert!(replay.is_empty());

        // Exhausted
        assert!(!replay.process_frame(&frame).unwrap().has_hand());
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let text = format!("{}\nnot json\n", hand_line(0.1));
        match ReplayMediaPipe::parse(&text) {
            Err(PoseError::InvalidRecording { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected result: {:?}", other.map(|r| r.len())),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("handcast_missing_recording.jsonl");
        let _ = std::fs::remove_file(&path);
        assert!(matches!(ReplayMediaPipe::open(&path), Err(PoseError::Io(_))));
    }
}
