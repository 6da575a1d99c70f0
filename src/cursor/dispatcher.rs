//! Cursor Dispatcher
//!
//! Turns target coordinates into smoothed, rate-limited pointer strokes and
//! gesture decisions into tap and drag strokes.
//!
//! # Move Filtering
//!
//! ```text
//! target ──> negative? ──────────────> Rejected   (pointer hidden)
//!   │
//!   ├──> store in PendingPosition
//!   ├──> actuator not ready? ────────> NotReady   (warned once per outage)
//!   ├──> < update interval? ─────────> Throttled  (unless forced)
//!   ├──> smooth toward target              (skipped if forced / no previous)
//!   ├──> |Δx| < 1 and |Δy| < 1? ─────> DeadZone   (unless forced)
//!   └──> dispatch Point, or Line from drag origin while dragging
//! ```
//!
//! A dispatcher is owned by exactly one thread; see
//! [`ActuationThread`](super::ActuationThread) for the shared handle.

use std::sync::Arc;
use tracing::{debug, info, trace, warn};

use super::actuator::{Actuator, Stroke};
use super::error::{DispatchError, Result};
use super::feedback::{FeedbackSink, NoopFeedback};
use super::mailbox::PendingPosition;
use crate::config::SharedConfig;
use crate::gesture::Clock;
use crate::mapping::ScreenPoint;

/// Pointer state owned by the dispatcher
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CursorState {
    /// Last actuated X
    pub last_x: f32,
    /// Last actuated Y
    pub last_y: f32,
    /// Time of the last accepted move
    pub last_update_ms: Option<u64>,
    /// Whether a drag is in progress
    pub is_dragging: bool,
    /// Drag origin X
    pub drag_start_x: f32,
    /// Drag origin Y
    pub drag_start_y: f32,
}

impl CursorState {
    /// A position counts as valid only when strictly positive on both axes
    pub fn has_position(&self) -> bool {
        self.last_x > 0.0 && self.last_y > 0.0
    }

    /// Last actuated position
    pub fn last(&self) -> ScreenPoint {
        ScreenPoint::new(self.last_x, self.last_y)
    }

    /// Where the current drag started
    pub fn drag_origin(&self) -> ScreenPoint {
        ScreenPoint::new(self.drag_start_x, self.drag_start_y)
    }
}

/// What happened to a move request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOutcome {
    /// Negative coordinates ("no detection")
    Rejected,
    /// No actuator; the position is kept for replay
    NotReady,
    /// Within the minimum update interval
    Throttled,
    /// Smoothed movement below one pixel
    DeadZone,
    /// Stroke injected; the pointer is now here
    Dispatched(ScreenPoint),
}

/// Smoothing, rate limiting and gesture strokes over one [`Actuator`]
pub struct CursorDispatcher<A> {
    actuator: A,
    state: CursorState,
    config: SharedConfig,
    clock: Arc<dyn Clock>,
    feedback: Arc<dyn FeedbackSink>,
    pending: PendingPosition,
    unavailable_logged: bool,
}

impl<A: Actuator> CursorDispatcher<A> {
    /// Dispatcher over `actuator`, reading settings from `config` on every call
    pub fn new(actuator: A, config: SharedConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            actuator,
            state: CursorState::default(),
            config,
            clock,
            feedback: Arc::new(NoopFeedback),
            pending: PendingPosition::new(),
            unavailable_logged: false,
        }
    }

    /// Report pointer and gesture activity to `feedback`
    pub fn with_feedback(mut self, feedback: Arc<dyn FeedbackSink>) -> Self {
        self.feedback = feedback;
        self
    }

    /// Mailbox holding the last requested position
    pub fn pending(&self) -> &PendingPosition {
        &self.pending
    }

    /// Current pointer state
    pub fn state(&self) -> &CursorState {
        &self.state
    }

    /// The wrapped actuator
    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    fn actuator_available(&mut self) -> bool {
        if self.actuator.is_ready() {
            return true;
        }
        if !self.unavailable_logged {
            warn!("Actuator not available, pointer actions are suspended");
            self.unavailable_logged = true;
        }
        false
    }

    /// Move the pointer toward `target`.
    ///
    /// `force` bypasses the update interval, smoothing and the dead zone.
    pub fn move_to(&mut self, target: ScreenPoint, force: bool) -> Result<MoveOutcome> {
        if !target.is_visible() {
            trace!("Hiding pointer for ({:.1}, {:.1})", target.x, target.y);
            self.feedback.on_cursor_hidden();
            return Ok(MoveOutcome::Rejected);
        }

        self.pending.store(target);

        if !self.actuator_available() {
            return Ok(MoveOutcome::NotReady);
        }

        let (cursor, screen) = self
            .config
            .read(|c| (c.cursor.clone(), c.screen.size()));

        let now = self.clock.now_ms();
        if !force {
            if let Some(last) = self.state.last_update_ms {
                if now.saturating_sub(last) < cursor.update_interval_ms {
                    return Ok(MoveOutcome::Throttled);
                }
            }
        }
        self.state.last_update_ms = Some(now);

        let target = screen.clamp(target);
        let last = self.state.last();
        let next = if force || !self.state.has_position() {
            target
        } else {
            let k = 1.0 - cursor.smoothing_factor;
            ScreenPoint::new(
                last.x + (target.x - last.x) * k,
                last.y + (target.y - last.y) * k,
            )
        };

        if !force && (next.x - last.x).abs() < 1.0 && (next.y - last.y).abs() < 1.0 {
            return Ok(MoveOutcome::DeadZone);
        }

        let stroke = if self.state.is_dragging {
            Stroke::line(self.state.drag_origin(), next, cursor.drag_stroke_ms)
        } else {
            Stroke::point(next, cursor.move_stroke_ms)
        };

        self.actuator.dispatch(stroke)?;
        self.state.last_x = next.x;
        self.state.last_y = next.y;
        debug!(
            "Pointer moved to ({:.1}, {:.1}){}",
            next.x,
            next.y,
            if self.state.is_dragging { " (dragging)" } else { "" }
        );
        self.feedback.on_cursor_update(next);

        Ok(MoveOutcome::Dispatched(next))
    }

    /// Tap at the last pointer position. Returns false if nothing was injected.
    pub fn click(&mut self) -> Result<bool> {
        if !self.actuator_available() {
            return Ok(false);
        }
        if !self.state.has_position() {
            debug!("Click ignored: no pointer position yet");
            return Ok(false);
        }

        let at = self.state.last();
        let duration_ms = self.config.read(|c| c.cursor.tap_stroke_ms);
        self.actuator.dispatch(Stroke::point(at, duration_ms))?;

        info!("Tap at ({:.1}, {:.1})", at.x, at.y);
        self.feedback.on_tap(at);
        Ok(true)
    }

    /// Begin dragging from the last pointer position
    pub fn start_drag(&mut self) -> bool {
        if !self.actuator_available() {
            return false;
        }
        if !self.state.has_position() {
            debug!("Drag ignored: no pointer position yet");
            return false;
        }

        self.state.is_dragging = true;
        self.state.drag_start_x = self.state.last_x;
        self.state.drag_start_y = self.state.last_y;

        let origin = self.state.drag_origin();
        info!("Drag started at ({:.1}, {:.1})", origin.x, origin.y);
        self.feedback.on_drag_start(origin);
        true
    }

    /// Stop dragging
    pub fn end_drag(&mut self) {
        let was_dragging = self.state.is_dragging;
        self.state.is_dragging = false;
        self.state.drag_start_x = 0.0;
        self.state.drag_start_y = 0.0;

        if was_dragging {
            info!("Drag ended");
            self.feedback.on_drag_end();
        }
    }

    /// The actuator (re)connected: reset pointer state and replay the pending
    /// position without smoothing.
    ///
    /// Fails with [`DispatchError::ActuatorUnavailable`] if the actuator still
    /// reports itself as not ready.
    pub fn actuator_ready(&mut self) -> Result<Option<MoveOutcome>> {
        self.state = CursorState::default();
        self.unavailable_logged = false;
        if !self.actuator.is_ready() {
            return Err(DispatchError::ActuatorUnavailable);
        }
        info!("Actuator ready");

        match self.pending.latest() {
            Some(position) => self.move_to(position, true).map(Some),
            None => Ok(None),
        }
    }
}

impl<A> std::fmt::Debug for CursorDispatcher<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CursorDispatcher")
            .field("state", &self.state)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}
