//! Pipeline integration tests
//!
//! Drives face-mesh frames through extraction, mapping, blink detection and
//! the actuation thread.

use parking_lot::Mutex;
use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use gaze_pointer::config::{Config, SharedConfig};
use gaze_pointer::cursor::{
    ActuationThread, Actuator, ChannelFeedback, CursorDispatcher, DispatchError, FeedbackEvent,
    Stroke,
};
use gaze_pointer::gesture::{GestureEvent, ManualClock};
use gaze_pointer::mapping::ScreenPoint;
use gaze_pointer::pipeline::GazePipeline;
use gaze_pointer::replay::{load_frames, FrameRecord};
use gaze_pointer::tracking::{LandmarkFrame, LandmarkSchema, NormalizedPoint};

/// Records strokes; readiness can be toggled from the test
#[derive(Clone)]
struct RecordingActuator {
    ready: Arc<AtomicBool>,
    ready_checks: Arc<AtomicUsize>,
    strokes: Arc<Mutex<Vec<Stroke>>>,
}

impl RecordingActuator {
    fn new(ready: bool) -> Self {
        Self {
            ready: Arc::new(AtomicBool::new(ready)),
            ready_checks: Arc::default(),
            strokes: Arc::default(),
        }
    }

    fn strokes(&self) -> Vec<Stroke> {
        self.strokes.lock().clone()
    }

    /// Block until the actuation thread has asked for readiness `n` times
    fn wait_for_ready_checks(&self, n: usize) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while self.ready_checks.load(Ordering::SeqCst) < n {
            assert!(Instant::now() < deadline, "actuation thread stalled");
            std::thread::sleep(Duration::from_millis(1));
        }
    }
}

impl Actuator for RecordingActuator {
    fn is_ready(&self) -> bool {
        self.ready_checks.fetch_add(1, Ordering::SeqCst);
        self.ready.load(Ordering::SeqCst)
    }

    fn dispatch(&mut self, stroke: Stroke) -> Result<(), DispatchError> {
        self.strokes.lock().push(stroke);
        Ok(())
    }
}

/// Face-mesh frame without iris refinement: two elliptical eye contours
/// centered at `left_x` and `left_x + 0.3`, lids `openness * 0.04` apart
fn face_mesh_frame(left_x: f32, openness: f32) -> LandmarkFrame {
    let mut points = vec![NormalizedPoint::new(0.5, 0.8); 468];
    let schema = LandmarkSchema::FACE_MESH;
    let h = 0.02 * openness;

    for (eye, cx) in [(schema.left, left_x), (schema.right, left_x + 0.3)] {
        let n = eye.contour.len() as f32;
        for (j, &index) in eye.contour.iter().enumerate() {
            let angle = std::f32::consts::TAU * j as f32 / n;
            points[index] = NormalizedPoint::new(cx + 0.05 * angle.cos(), 0.5 + h * angle.sin());
        }
    }

    LandmarkFrame::new(points)
}

fn tap_sensitive_config() -> Config {
    let mut config = Config::default();
    config.detector.half_blink_accel_threshold = 1000.0;
    config
}

#[test]
fn test_blink_taps_through_actuation_thread() {
    let clock = Arc::new(ManualClock::new(0));
    let shared = SharedConfig::new(tap_sensitive_config());
    let actuator = RecordingActuator::new(true);
    let (feedback, feedback_rx) = ChannelFeedback::bounded(64);

    let dispatcher = CursorDispatcher::new(actuator.clone(), shared.clone(), clock.clone())
        .with_feedback(Arc::new(feedback));
    let mut actuation = ActuationThread::spawn(dispatcher).unwrap();
    let mut pipeline = GazePipeline::new(
        LandmarkSchema::FACE_MESH,
        shared,
        clock.clone(),
        actuation.handle(),
    );

    let mut gestures = Vec::new();
    for (t, openness) in [(0, 1.0), (100, 1.0), (200, 1.0), (300, 0.5), (400, 0.9)] {
        clock.set(t);
        let outcome = pipeline
            .process_frame(Some(&face_mesh_frame(0.35, openness)))
            .unwrap();
        gestures.extend(outcome.gesture);
    }
    actuation.shutdown().unwrap();

    assert_eq!(gestures.len(), 1);
    assert!(matches!(gestures[0], GestureEvent::Tap { .. }));

    let strokes = actuator.strokes();
    assert_eq!(strokes.first().map(|s| s.duration_ms), Some(1));
    assert_eq!(strokes.last().map(|s| s.duration_ms), Some(50));

    let events: Vec<FeedbackEvent> = feedback_rx.try_iter().collect();
    assert!(events
        .iter()
        .any(|e| matches!(e, FeedbackEvent::Tap(_))));
}

#[test]
fn test_config_update_applies_on_next_frame() {
    let clock = Arc::new(ManualClock::new(0));
    let shared = SharedConfig::new(Config::default());
    let dispatcher =
        CursorDispatcher::new(RecordingActuator::new(true), shared.clone(), clock.clone());
    let mut pipeline =
        GazePipeline::new(LandmarkSchema::FACE_MESH, shared.clone(), clock.clone(), dispatcher);

    // eyes centered at x = 0.3 → movement -0.2 of the screen width
    let frame = face_mesh_frame(0.15, 1.0);
    let before = pipeline.process_frame(Some(&frame)).unwrap().target.unwrap();
    assert!((before.x - 324.0).abs() < 1.0);

    shared.update(|c| c.mapping.x_movement_multiplier = 2.0);
    clock.advance(16);
    let after = pipeline.process_frame(Some(&frame)).unwrap().target.unwrap();
    assert!((after.x - 108.0).abs() < 1.0);
}

#[test]
fn test_reconnect_replays_pending_position() {
    let clock = Arc::new(ManualClock::new(0));
    let shared = SharedConfig::new(Config::default());
    let actuator = RecordingActuator::new(false);

    let dispatcher = CursorDispatcher::new(actuator.clone(), shared, clock);
    let mut actuation = ActuationThread::spawn(dispatcher).unwrap();
    let handle = actuation.handle();

    handle.move_cursor(ScreenPoint::new(100.0, 100.0)).unwrap();
    handle.move_cursor(ScreenPoint::new(700.0, 900.0)).unwrap();
    handle.click().unwrap();
    assert_eq!(handle.pending(), Some(ScreenPoint::new(700.0, 900.0)));

    // two moves and the click were all refused while disconnected
    actuator.wait_for_ready_checks(3);
    actuator.ready.store(true, Ordering::SeqCst);
    handle.actuator_ready().unwrap();
    actuation.shutdown().unwrap();

    assert_eq!(
        actuator.strokes(),
        vec![Stroke::point(ScreenPoint::new(700.0, 900.0), 1)]
    );
}

#[test]
fn test_replay_recording_from_file() {
    let records = vec![
        FrameRecord {
            timestamp_ms: 0,
            landmarks: Some(face_mesh_frame(0.35, 1.0)),
            eye_area: None,
        },
        FrameRecord {
            timestamp_ms: 33,
            landmarks: None,
            eye_area: None,
        },
        FrameRecord {
            timestamp_ms: 66,
            landmarks: Some(face_mesh_frame(0.35, 1.0)),
            eye_area: None,
        },
    ];

    let mut file = tempfile::NamedTempFile::new().unwrap();
    for record in &records {
        writeln!(file, "{}", serde_json::to_string(record).unwrap()).unwrap();
    }

    let frames = load_frames(file.path()).unwrap();
    assert_eq!(frames.len(), 3);

    let clock = Arc::new(ManualClock::new(0));
    let shared = SharedConfig::new(Config::default());
    let actuator = RecordingActuator::new(true);
    let dispatcher = CursorDispatcher::new(actuator.clone(), shared.clone(), clock.clone());
    let mut pipeline = GazePipeline::new(LandmarkSchema::FACE_MESH, shared, clock.clone(), dispatcher);

    for record in &frames {
        clock.set(record.timestamp_ms);
        pipeline.process_frame(record.landmarks.as_ref()).unwrap();
    }

    let stats = pipeline.stats();
    assert_eq!(stats.frames, 3);
    assert_eq!(stats.frames_without_face, 1);
    assert_eq!(stats.moves, 2);
    // second move lands on the same target and stays inside the dead zone
    assert_eq!(actuator.strokes().len(), 1);
}
