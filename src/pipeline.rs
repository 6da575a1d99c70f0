//! Gaze-to-action pipeline
//!
//! Wires the four stages together for one frame at a time:
//!
//! ```text
//! LandmarkFrame
//!   └─> GazeExtractor ──> position-effect input, distance ──> map_to_screen
//!   │                                                            │
//!   │                                                            ▼
//!   └─> eyelids ──> BlinkGestureDetector ──> GestureEvent       CursorSink
//!                                                │               ▲
//!                                                └───────────────┘
//! ```
//!
//! The pipeline holds the prior gaze point, used when a frame contains a face
//! but no usable eye landmarks. Configuration is re-read on every frame.
//! Frames without a face send [`ScreenPoint::HIDDEN`] so overlays hide the
//! pointer.
//!
//! A stroke the actuator fails to inject is logged and the frame carries on;
//! the blink detector still sees every sample. Only a closed actuation queue
//! is returned as an error.
//!
//! Commands go to a [`CursorSink`]: normally a [`DispatcherHandle`] onto the
//! actuation thread, or a [`CursorDispatcher`](crate::cursor::CursorDispatcher)
//! driven inline when replaying recordings.

use std::sync::Arc;
use tracing::{debug, trace, warn};

use crate::config::SharedConfig;
use crate::cursor::{CursorSink, DispatchError, DispatcherHandle};
use crate::gesture::{BlinkGestureDetector, Clock, GestureEvent};
use crate::mapping::{map_to_screen, ScreenPoint};
use crate::tracking::{
    FallbackChain, GazeExtractor, LandmarkFrame, LandmarkSchema, NormalizedPoint, TrackingResult,
};

/// Per-pipeline counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Frames processed
    pub frames: u64,
    /// Frames in which no face was detected
    pub frames_without_face: u64,
    /// Move requests issued
    pub moves: u64,
    /// Taps detected
    pub taps: u64,
    /// Drags started
    pub drag_starts: u64,
    /// Drags ended
    pub drag_ends: u64,
}

/// What one frame produced
#[derive(Debug, Clone, Default)]
pub struct FrameOutcome {
    /// Extraction result, if a face was present
    pub tracking: Option<TrackingResult>,
    /// Requested pointer target
    pub target: Option<ScreenPoint>,
    /// Detected gesture
    pub gesture: Option<GestureEvent>,
}

/// Frame-by-frame driver of extraction, mapping, detection and dispatch
#[derive(Debug)]
pub struct GazePipeline<S = DispatcherHandle> {
    extractor: GazeExtractor,
    detector: BlinkGestureDetector,
    config: SharedConfig,
    dispatcher: S,
    prior_gaze: Option<NormalizedPoint>,
    stats: PipelineStats,
}

impl<S: CursorSink> GazePipeline<S> {
    /// Create a pipeline feeding `dispatcher`
    pub fn new(
        schema: LandmarkSchema,
        config: SharedConfig,
        clock: Arc<dyn Clock>,
        dispatcher: S,
    ) -> Self {
        Self {
            extractor: GazeExtractor::new(schema),
            detector: BlinkGestureDetector::new(clock),
            config,
            dispatcher,
            prior_gaze: None,
            stats: PipelineStats::default(),
        }
    }

    /// Process one camera frame; `None` means no face was detected
    pub fn process_frame(
        &mut self,
        frame: Option<&LandmarkFrame>,
    ) -> Result<FrameOutcome, DispatchError> {
        self.stats.frames += 1;

        let Some(frame) = frame else {
            self.stats.frames_without_face += 1;
            trace!("No face in frame {}", self.stats.frames);
            tolerate_actuation(self.dispatcher.move_cursor(ScreenPoint::HIDDEN))?;
            return Ok(FrameOutcome::default());
        };

        let config = self.config.snapshot();
        let tracking = self.extractor.track(frame, config.tracking.use_one_eye);

        let input = FallbackChain::new("position effect input")
            .then_value("tracked", tracking.position_effect_input)
            .then_value("prior gaze", self.prior_gaze)
            .resolve_or(NormalizedPoint::CENTER);

        if let Some(gaze) = tracking.gaze_point {
            self.prior_gaze = Some(gaze);
        }

        let target = map_to_screen(input, tracking.distance, config.screen.size(), &config.mapping);
        tolerate_actuation(self.dispatcher.move_cursor(target))?;
        self.stats.moves += 1;

        let gesture = match tracking.eyelids {
            Some(eyelids) => self
                .detector
                .process_eyelids(&config.detector, eyelids, target),
            None => None,
        };
        if let Some(event) = gesture {
            self.route(event)?;
        }

        Ok(FrameOutcome {
            tracking: Some(tracking),
            target: Some(target),
            gesture,
        })
    }

    /// Feed an eye-area signal from a source without eyelid landmarks
    pub fn process_eye_area(&mut self, eye_area: f32) -> Result<Option<GestureEvent>, DispatchError> {
        let detector_config = self.config.read(|c| c.detector.clone());
        let gesture = self.detector.process_eye_area(&detector_config, eye_area);
        if let Some(event) = gesture {
            self.route(event)?;
        }
        Ok(gesture)
    }

    fn route(&mut self, event: GestureEvent) -> Result<(), DispatchError> {
        debug!("Routing gesture {:?}", event);
        let routed = match event {
            GestureEvent::Tap { .. } => {
                self.stats.taps += 1;
                self.dispatcher.click()
            }
            GestureEvent::DragStart { .. } => {
                self.stats.drag_starts += 1;
                self.dispatcher.start_drag()
            }
            GestureEvent::DragEnd => {
                self.stats.drag_ends += 1;
                self.dispatcher.end_drag()
            }
        };
        tolerate_actuation(routed)
    }

    /// Forget the blink baseline and the prior gaze point
    pub fn reset(&mut self) {
        self.detector.reset();
        self.prior_gaze = None;
    }

    /// Counters so far
    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    /// The command sink
    pub fn sink(&self) -> &S {
        &self.dispatcher
    }

    /// Give back the command sink
    pub fn into_sink(self) -> S {
        self.dispatcher
    }
}

/// Log a failed stroke and carry on; anything else is returned
fn tolerate_actuation(result: Result<(), DispatchError>) -> Result<(), DispatchError> {
    match result {
        Err(DispatchError::ActuationFailed(reason)) => {
            warn!("Stroke not injected: {}", reason);
            Ok(())
        }
        other => other,
    }
}
