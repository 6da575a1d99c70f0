//! Blink Gesture Detector
//!
//! Classifies the eyelid-openness signal into taps (a quick full blink) and
//! half-blink drags. Detection works on the *acceleration* of openness rather
//! than on absolute thresholds alone, which keeps slow drowsy closures from
//! registering as clicks.
//!
//! # State Machine
//!
//! ```text
//!                 accel jump, closing
//!        ┌──────────────────────────────────┐
//!        │                                  ▼
//!     ┌──────┐                       ┌──────────────┐
//!     │ Idle │                       │ HalfBlinking │
//!     └──────┘                       └──────────────┘
//!        ▲                                  │
//!        └──────────────────────────────────┘
//!            reopening (accel > 0.05 or openness > 0.7)
//!
//!     Idle ── close + reopen within 3 samples ──> Tap (stays Idle)
//! ```
//!
//! Each sample is evaluated once: a fired tap ends the cycle, otherwise the
//! half-blink checks run. Taps and drag starts share a 250ms cooldown.
//!
//! The transition itself is the pure [`DetectorState::step`]; the
//! [`BlinkGestureDetector`] wrapper only adds a clock.

use std::sync::Arc;
use tracing::{debug, info, trace};

use super::clock::Clock;
use super::history::{GazeSample, SampleHistory, HISTORY_WINDOW_MS};
use crate::config::DetectorConfig;
use crate::mapping::ScreenPoint;
use crate::tracking::EyelidLandmarks;

/// Minimum time between two emitted actions (tap or drag start)
pub const ACTION_COOLDOWN_MS: u64 = 250;

/// Samples needed before a tap can be recognized
const TAP_MIN_SAMPLES: usize = 3;

/// Reopen threshold sits this far above the close threshold
const REOPEN_MARGIN: f32 = 0.15;

/// Reopening acceleration must exceed this fraction of the blink threshold
const REOPEN_ACCEL_FACTOR: f32 = 0.6;

/// Closing acceleration must be below this fraction of the half-blink threshold
const HALF_BLINK_CLOSE_FACTOR: f32 = 0.8;

/// A half-blink ends once acceleration turns positive past this
const HALF_BLINK_RELEASE_ACCEL: f32 = 0.05;

/// ...or once the eye is this open again
const HALF_BLINK_RELEASE_OPENNESS: f32 = 0.7;

/// Gesture mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureMode {
    /// No gesture in progress
    #[default]
    Idle,
    /// A half-blink drag is in progress
    HalfBlinking,
}

/// Openness baseline recorded from the first valid sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    /// Raw lid separation treated as "fully open"
    pub baseline_openness: f32,
    /// Whether a baseline has been recorded
    pub is_set: bool,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            baseline_openness: 1.0,
            is_set: false,
        }
    }
}

impl Calibration {
    /// Openness relative to baseline, clamped into `[0, 1]`.
    /// A zero baseline yields a neutral ratio of 1.
    pub fn normalize(&self, openness: f32) -> f32 {
        if self.baseline_openness <= 0.0 {
            return 1.0;
        }
        (openness / self.baseline_openness).clamp(0.0, 1.0)
    }
}

/// Gesture recognized from the openness signal
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    /// Quick full blink
    Tap {
        /// Cursor position when the blink completed
        position: ScreenPoint,
    },
    /// Half-blink began
    DragStart {
        /// Cursor position when the half-blink began
        position: ScreenPoint,
    },
    /// Half-blink released
    DragEnd,
}

/// One eyelid observation fed to the state machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// When the frame was observed
    pub timestamp_ms: u64,
    /// Upper lid Y (normalized)
    pub upper_lid_y: f32,
    /// Lower lid Y (normalized)
    pub lower_lid_y: f32,
    /// Where a resulting gesture should act
    pub position: ScreenPoint,
}

/// Complete detector state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectorState {
    /// Recent samples
    pub history: SampleHistory,
    /// Openness baseline
    pub calibration: Calibration,
    /// Current gesture mode
    pub mode: GestureMode,
    /// Time of the last tap or drag start
    pub last_action_ms: Option<u64>,
}

impl DetectorState {
    /// Feed one observation, returning the next state and at most one event
    pub fn step(
        mut self,
        config: &DetectorConfig,
        observation: Observation,
    ) -> (Self, Option<GestureEvent>) {
        let now = observation.timestamp_ms;
        let openness = (observation.lower_lid_y - observation.upper_lid_y).clamp(0.0, 1.0);

        if !self.calibration.is_set {
            if openness > 0.0 {
                self.calibration = Calibration {
                    baseline_openness: openness,
                    is_set: true,
                };
                self.history.clear();
                debug!("Blink baseline calibrated: openness={:.4}", openness);
            }
            return (self, None);
        }

        let sample = self.ingest(now, self.calibration.normalize(openness));
        trace!(
            "Openness sample: t={} open={:.3} vel={:.3} accel={:.3} history={}",
            sample.timestamp_ms,
            sample.openness,
            sample.velocity,
            sample.acceleration,
            self.history.len()
        );

        if let Some(event) = self.detect_tap(config, now, observation.position) {
            return (self, Some(event));
        }

        let event = self.detect_half_blink(config, now, observation.position);
        (self, event)
    }

    /// True if the action cooldown has elapsed
    pub fn cooldown_elapsed(&self, now_ms: u64) -> bool {
        self.last_action_ms
            .map_or(true, |last| now_ms.saturating_sub(last) >= ACTION_COOLDOWN_MS)
    }

    fn ingest(&mut self, now: u64, openness: f32) -> GazeSample {
        let velocity = match self.history.newest(0) {
            Some(last) => (openness - last.openness) / seconds_since(last.timestamp_ms, now),
            None => 0.0,
        };

        let acceleration = match (self.history.newest(0), self.history.newest(1)) {
            (Some(last), Some(before)) => {
                (velocity - last.velocity) / seconds_since(before.timestamp_ms, now)
            }
            _ => 0.0,
        };

        let sample = GazeSample {
            timestamp_ms: now,
            openness,
            velocity,
            acceleration,
        };
        self.history.push(sample);
        self.history.evict_older_than(now, HISTORY_WINDOW_MS);
        sample
    }

    fn detect_tap(
        &mut self,
        config: &DetectorConfig,
        now: u64,
        position: ScreenPoint,
    ) -> Option<GestureEvent> {
        if self.history.len() < TAP_MIN_SAMPLES || !self.cooldown_elapsed(now) {
            return None;
        }

        let closed_sample = self.history.newest(1)?;
        let reopened_sample = self.history.newest(0)?;

        let close_threshold = 1.0 - config.blink_threshold;
        let reopen_threshold = (close_threshold + REOPEN_MARGIN).min(1.0);

        let closing = closed_sample.acceleration < -config.blink_threshold;
        let reopening = reopened_sample.acceleration > config.blink_threshold * REOPEN_ACCEL_FACTOR;
        let was_closed = closed_sample.openness < close_threshold;
        let reopened = reopened_sample.openness > reopen_threshold;

        if closing && reopening && was_closed && reopened {
            self.last_action_ms = Some(now);
            info!("Tap detected at ({:.1}, {:.1})", position.x, position.y);
            return Some(GestureEvent::Tap { position });
        }
        None
    }

    fn detect_half_blink(
        &mut self,
        config: &DetectorConfig,
        now: u64,
        position: ScreenPoint,
    ) -> Option<GestureEvent> {
        let current = *self.history.newest(0)?;
        let previous = *self.history.newest(1)?;

        match self.mode {
            GestureMode::Idle => {
                let threshold = config.half_blink_accel_threshold;
                let accel_change = (current.acceleration - previous.acceleration).abs();
                if accel_change >= threshold
                    && current.acceleration < -threshold * HALF_BLINK_CLOSE_FACTOR
                {
                    self.mode = GestureMode::HalfBlinking;
                    self.last_action_ms = Some(now);
                    info!(
                        "Half-blink drag started at ({:.1}, {:.1})",
                        position.x, position.y
                    );
                    return Some(GestureEvent::DragStart { position });
                }
                None
            }
            GestureMode::HalfBlinking => {
                if current.acceleration > HALF_BLINK_RELEASE_ACCEL
                    || current.openness > HALF_BLINK_RELEASE_OPENNESS
                {
                    self.mode = GestureMode::Idle;
                    info!("Half-blink drag ended");
                    return Some(GestureEvent::DragEnd);
                }
                None
            }
        }
    }
}

/// Elapsed seconds, floored at 1ms
fn seconds_since(then_ms: u64, now_ms: u64) -> f32 {
    now_ms.saturating_sub(then_ms).max(1) as f32 / 1000.0
}

/// Clocked wrapper around [`DetectorState`]
#[derive(Debug)]
pub struct BlinkGestureDetector {
    state: DetectorState,
    clock: Arc<dyn Clock>,
}

impl BlinkGestureDetector {
    /// Detector reading time from `clock`
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: DetectorState::default(),
            clock,
        }
    }

    /// Feed one frame's eyelid positions
    pub fn process_eyelids(
        &mut self,
        config: &DetectorConfig,
        eyelids: EyelidLandmarks,
        position: ScreenPoint,
    ) -> Option<GestureEvent> {
        let observation = Observation {
            timestamp_ms: self.clock.now_ms(),
            upper_lid_y: eyelids.upper_lid_y,
            lower_lid_y: eyelids.lower_lid_y,
            position,
        };

        let (next, event) = std::mem::take(&mut self.state).step(config, observation);
        self.state = next;
        event
    }

    /// Feed a normalized eye-area signal when no eyelid landmarks exist.
    /// The area is converted into a synthetic lid pair that opens as the
    /// area grows; gestures act at the origin.
    pub fn process_eye_area(
        &mut self,
        config: &DetectorConfig,
        eye_area: f32,
    ) -> Option<GestureEvent> {
        let area = eye_area.clamp(0.0, 1.0);
        let eyelids = EyelidLandmarks {
            upper_lid_y: 0.4 - area * 0.2,
            lower_lid_y: 0.6 + area * 0.2,
        };
        self.process_eyelids(config, eyelids, ScreenPoint::default())
    }

    /// Forget history, mode and baseline; the next sample re-calibrates
    pub fn reset(&mut self) {
        self.state = DetectorState::default();
        debug!("Blink detector reset");
    }

    /// Current state, for inspection
    pub fn state(&self) -> &DetectorState {
        &self.state
    }

    /// Current gesture mode
    pub fn mode(&self) -> GestureMode {
        self.state.mode
    }
}
