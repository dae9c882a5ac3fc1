// Producer loop: frame -> landmarks -> stable gesture -> payload -> subscribers

use crate::core::broadcast_server::FramePublisher;
use crate::core::config::Config;
use crate::core::frame_encoder;
use crate::core::gesture_manager::GestureManager;
use crate::models::broadcast::FramePayload;
use crate::models::capture::RawFrame;
use crate::models::gesture::GestureLabel;
use crate::platform::capture::FrameSource;
use crate::platform::pose::MediaPipeBridge;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Counters reported when the producer loop stops
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineStats {
    pub frames: u64,
    pub frames_with_hand: u64,
    pub gesture_changes: u64,
    /// Frames the source failed to deliver; the loop skips past them
    pub read_errors: u64,
    /// Landmark model time summed over all frames
    pub inference_ms: u64,
    pub final_gesture: GestureLabel,
}

pub struct GesturePipeline<S: FrameSource, B: MediaPipeBridge> {
    source: S,
    bridge: B,
    manager: GestureManager,
    max_hands: usize,
    jpeg_quality: u8,
    frame_interval: Duration,
    stop: Arc<AtomicBool>,
    stats: PipelineStats,
}

impl<S: FrameSource, B: MediaPipeBridge> GesturePipeline<S, B> {
    pub fn new(source: S, bridge: B, config: &Config) -> Self {
        Self {
            source,
            bridge,
            manager: GestureManager::from_config(config),
            max_hands: config.max_hands.max(1),
            jpeg_quality: config.jpeg_quality,
            frame_interval: Duration::from_millis(config.frame_interval_ms),
            stop: Arc::new(AtomicBool::new(false)),
            stats: PipelineStats::default(),
        }
    }

    /// Flag that ends the loop after the frame in flight
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Turn one frame into its payload
    ///
    /// Only the first detected hand drives the stability engine. A frame
    /// without a hand leaves the engine untouched and reports `NONE`.
    pub fn process_frame(&mut self, frame: &RawFrame, encode_image: bool) -> FramePayload {
        self.stats.frames += 1;

        let hands = match self.bridge.process_frame(frame) {
            Ok(result) => {
                self.stats.inference_ms += result.processing_time_ms;
                debug!(
                    inference_ms = result.processing_time_ms,
                    hands = result.hands.len(),
                    "landmarks inferred"
                );
                result.hands
            }
            Err(e) => {
                warn!(error = %e, "landmark inference failed, treating frame as no hand");
                Vec::new()
            }
        };

        let image = if encode_image {
            match frame_encoder::encode_preview(frame, self.jpeg_quality) {
                Ok(image) => image,
                Err(e) => {
                    warn!(error = %e, "preview encoding failed");
                    String::new()
                }
            }
        } else {
            String::new()
        };

        let Some(hand) = hands.into_iter().take(self.max_hands).next() else {
            return FramePayload::no_hand(image);
        };

        self.stats.frames_with_hand += 1;
        let previous = self.manager.current_state();
        let gesture = self.manager.update(&hand.landmarks);
        if gesture != previous {
            self.stats.gesture_changes += 1;
        }
        debug!(handedness = hand.handedness.as_str(), %gesture, "tracked hand classified");

        FramePayload::with_hand(gesture, hand.landmark_triples(), image)
    }

    /// Run until the source ends or the stop flag is set
    ///
    /// Blocking; run it on a dedicated thread. A frame the source fails to
    /// read is logged and skipped.
    pub fn run(&mut self, publisher: &dyn FramePublisher) -> PipelineStats {
        info!(
            source = %self.source.describe(),
            model = %self.bridge.get_model_info(),
            "producer loop started"
        );
        if !self.bridge.is_initialized() {
            warn!("landmark model not initialized, no hands will be detected");
        }

        while !self.stop.load(Ordering::Relaxed) {
            match self.source.read() {
                Ok(Some(frame)) => {
                    let payload = self.process_frame(&frame, publisher.has_subscribers());
                    debug!(
                        hand_detected = payload.hand_detected,
                        gesture = %payload.gesture,
                        "frame processed"
                    );
                    publisher.publish(&payload);
                }
                Ok(None) => {
                    info!(frames = self.stats.frames, "frame source ended");
                    break;
                }
                Err(e) => {
                    self.stats.read_errors += 1;
                    warn!(error = %e, "frame read failed, skipping");
                }
            }

            if !self.frame_interval.is_zero() {
                std::thread::sleep(self.frame_interval);
            }
        }

        self.source.release();
        self.stats.final_gesture = self.manager.current_state();
        self.stats.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::gestures::test_support::{neutral_hand, open_palm_hand, pinch_hand};
    use crate::models::pose::{HandPose, Handedness, Keypoint3D, PoseError, PoseResult};
    use crate::models::capture::{CaptureError, CaptureResult};
    use crate::platform::capture::SyntheticCamera;
    use crate::platform::pose::{DummyMediaPipe, MediaPipeResult};
    use parking_lot::Mutex;
    use std::collections::VecDeque;

    /// Bridge returning a scripted hand list per frame
    struct ScriptedBridge {
        frames: VecDeque<PoseResult<Vec<Vec<Keypoint3D>>>>,
    }

    impl ScriptedBridge {
        fn new(frames: Vec<PoseResult<Vec<Vec<Keypoint3D>>>>) -> Self {
            Self { frames: frames.into() }
        }
    }

    impl MediaPipeBridge for ScriptedBridge {
        fn process_frame(&mut self, _frame: &RawFrame) -> PoseResult<MediaPipeResult> {
            let hands = self.frames.pop_front().unwrap_or(Ok(Vec::new()))?;
            Ok(MediaPipeResult {
                hands: hands
                    .into_iter()
                    .map(|points| HandPose::new(Handedness::Right, points, 1.0))
                    .collect(),
                processing_time_ms: 3,
            })
        }

        fn is_initialized(&self) -> bool {
            true
        }

        fn get_model_info(&self) -> String {
            "scripted".to_string()
        }
    }

    #[derive(Default)]
    struct RecordingPublisher {
        subscribed: bool,
        published: Mutex<Vec<FramePayload>>,
    }

    impl FramePublisher for RecordingPublisher {
        fn has_subscribers(&self) -> bool {
            self.subscribed
        }

        fn publish(&self, payload: &FramePayload) {
            self.published.lock().push(payload.clone());
        }
    }

    fn test_config() -> Config {
        Config {
            frame_interval_ms: 0,
            ..Config::default()
        }
    }

    fn pipeline(
        frames: Vec<PoseResult<Vec<Vec<Keypoint3D>>>>,
    ) -> GesturePipeline<SyntheticCamera, ScriptedBridge> {
        let count = frames.len() as u64;
        GesturePipeline::new(
            SyntheticCamera::new(8, 8, Some(count)),
            ScriptedBridge::new(frames),
            &test_config(),
        )
    }

    #[test]
    fn test_no_hand_frame_publishes_none() {
        let mut pipeline = pipeline(vec![Ok(vec![])]);
        let publisher = RecordingPublisher::default();
        let stats = pipeline.run(&publisher);

        let published = publisher.published.lock();
        assert_eq!(published.len(), 1);
        assert!(!published[0].hand_detected);
        assert_eq!(published[0].gesture, GestureLabel::None);
        assert!(published[0].landmarks.is_empty());
        assert!(published[0].image.is_empty());
        assert_eq!(stats.frames, 1);
        assert_eq!(stats.frames_with_hand, 0);
    }

    #[test]
    fn test_no_hand_frames_do_not_touch_engine() {
        let mut pipeline = pipeline(vec![
            Ok(vec![pinch_hand()]),
            Ok(vec![]),
            Ok(vec![]),
            Ok(vec![pinch_hand()]),
        ]);
        let publisher = RecordingPublisher::default();
        let stats = pipeline.run(&publisher);

        let gestures: Vec<GestureLabel> =
            publisher.published.lock().iter().map(|p| p.gesture).collect();
        assert_eq!(
            gestures,
            vec![
                GestureLabel::Pinch,
                GestureLabel::None,
                GestureLabel::None,
                GestureLabel::Pinch
            ]
        );
        assert_eq!(stats.frames_with_hand, 2);
        assert_eq!(stats.gesture_changes, 1);
        assert_eq!(stats.final_gesture, GestureLabel::Pinch);
    }

    #[test]
    fn test_only_first_hand_feeds_engine() {
        let mut pipeline = pipeline(vec![Ok(vec![open_palm_hand(), pinch_hand()])]);
        let publisher = RecordingPublisher::default();
        pipeline.run(&publisher);

        let published = publisher.published.lock();
        assert!(published[0].hand_detected);
        assert_eq!(published[0].gesture, GestureLabel::OpenPalm);
        assert_eq!(published[0].landmarks.len(), 21);
    }

    #[test]
    fn test_stable_gesture_needs_full_window_to_switch() {
        let mut frames = vec![Ok(vec![pinch_hand()])];
        frames.extend((0..5).map(|_| Ok(vec![neutral_hand()])));
        let mut pipeline = pipeline(frames);
        let publisher = RecordingPublisher::default();
        let stats = pipeline.run(&publisher);

        let gestures: Vec<GestureLabel> =
            publisher.published.lock().iter().map(|p| p.gesture).collect();
        assert_eq!(&gestures[..5], &[GestureLabel::Pinch; 5]);
        assert_eq!(gestures[5], GestureLabel::None);
        assert_eq!(stats.gesture_changes, 2);
    }

    #[test]
    fn test_inference_error_is_treated_as_no_hand() {
        let mut pipeline = pipeline(vec![
            Err(PoseError::InferenceFailed("model crashed".to_string())),
            Ok(vec![pinch_hand()]),
        ]);
        let publisher = RecordingPublisher::default();
        let stats = pipeline.run(&publisher);

        let published = publisher.published.lock();
        assert_eq!(published.len(), 2);
        assert!(!published[0].hand_detected);
        assert_eq!(published[1].gesture, GestureLabel::Pinch);
        assert_eq!(stats.frames, 2);
    }

    #[test]
    fn test_preview_encoded_only_with_subscribers() {
        let mut pipeline = pipeline(vec![Ok(vec![]), Ok(vec![])]);
        let publisher = RecordingPublisher {
            subscribed: true,
            ..Default::default()
        };
        pipeline.run(&publisher);

        let published = publisher.published.lock();
        assert!(published.iter().all(|p| !p.image.is_empty()));
    }

    #[test]
    fn test_stop_flag_ends_loop() {
        let mut pipeline = GesturePipeline::new(
            SyntheticCamera::new(4, 4, None),
            ScriptedBridge::new(vec![]),
            &test_config(),
        );
        pipeline.stop_handle().store(true, Ordering::Relaxed);
        let publisher = RecordingPublisher::default();
        let stats = pipeline.run(&publisher);
        assert_eq!(stats.frames, 0);
        assert!(publisher.published.lock().is_empty());
    }

    /// Source that fails on the listed reads and yields a frame otherwise
    struct FlakySource {
        reads: usize,
        failing: Vec<usize>,
        total: usize,
    }

    impl FrameSource for FlakySource {
        fn read(&mut self) -> CaptureResult<Option<RawFrame>> {
            if self.reads == self.total {
                return Ok(None);
            }
            self.reads += 1;
            if self.failing.contains(&self.reads) {
                return Err(CaptureError::ReadFailed(format!("corrupt frame {}", self.reads)));
            }
            Ok(Some(RawFrame::solid(4, 4, [0, 0, 0, 255], 0)))
        }

        fn describe(&self) -> String {
            "flaky".to_string()
        }
    }

    #[test]
    fn test_read_error_skips_frame() {
        let source = FlakySource {
            reads: 0,
            failing: vec![2],
            total: 3,
        };
        let bridge = ScriptedBridge::new(vec![Ok(vec![pinch_hand()]), Ok(vec![pinch_hand()])]);
        let mut pipeline = GesturePipeline::new(source, bridge, &test_config());
        let publisher = RecordingPublisher::default();
        let stats = pipeline.run(&publisher);

        assert_eq!(stats.read_errors, 1);
        assert_eq!(stats.frames, 2);
        assert_eq!(publisher.published.lock().len(), 2);
        assert_eq!(stats.final_gesture, GestureLabel::Pinch);
    }

    #[test]
    fn test_inference_time_is_accumulated() {
        let mut pipeline = pipeline(vec![
            Ok(vec![pinch_hand()]),
            Ok(vec![]),
            Err(PoseError::InferenceFailed("timeout".to_string())),
        ]);
        let stats = pipeline.run(&RecordingPublisher::default());
        // Two successful inferences at 3ms each; the failed one reports nothing
        assert_eq!(stats.inference_ms, 6);
    }

    #[test]
    fn test_uninitialized_model_still_publishes() {
        let mut pipeline = GesturePipeline::new(
            SyntheticCamera::new(4, 4, Some(2)),
            DummyMediaPipe::new(),
            &test_config(),
        );
        let publisher = RecordingPublisher::default();
        let stats = pipeline.run(&publisher);

        assert_eq!(stats.frames, 2);
        assert_eq!(stats.frames_with_hand, 0);
        assert!(publisher.published.lock().iter().all(|p| !p.hand_detected));
    }
}
