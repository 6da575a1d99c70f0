//! Actuation boundary
//!
//! The host's gesture-injection primitive: a path on screen plus a duration.

use serde::{Deserialize, Serialize};

use super::error::Result;
use crate::mapping::ScreenPoint;

/// Geometry of an injected stroke
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StrokePath {
    /// Touch down and up at one position
    Point(ScreenPoint),
    /// Press at `from`, move to `to`, release
    Line {
        /// Press position
        from: ScreenPoint,
        /// Release position
        to: ScreenPoint,
    },
}

/// One injected gesture stroke
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Stroke geometry
    pub path: StrokePath,
    /// Stroke duration in milliseconds
    pub duration_ms: u64,
}

impl Stroke {
    /// Stroke at a single point
    pub fn point(at: ScreenPoint, duration_ms: u64) -> Self {
        Self {
            path: StrokePath::Point(at),
            duration_ms,
        }
    }

    /// Stroke along a line
    pub fn line(from: ScreenPoint, to: ScreenPoint, duration_ms: u64) -> Self {
        Self {
            path: StrokePath::Line { from, to },
            duration_ms,
        }
    }
}

/// Pointer actuation capability provided by the host
#[cfg_attr(test, mockall::automock)]
pub trait Actuator: Send {
    /// Whether strokes can currently be injected
    fn is_ready(&self) -> bool;

    /// Inject one stroke
    fn dispatch(&mut self, stroke: Stroke) -> Result<()>;
}

/// Actuator that logs every stroke instead of injecting it
#[derive(Debug, Default)]
pub struct TracingActuator {
    dispatched: u64,
}

impl TracingActuator {
    /// New logging actuator
    pub fn new() -> Self {
        Self::default()
    }

    /// Strokes seen so far
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }
}

impl Actuator for TracingActuator {
    fn is_ready(&self) -> bool {
        true
    }

    fn dispatch(&mut self, stroke: Stroke) -> Result<()> {
        self.dispatched += 1;
        match stroke.path {
            StrokePath::Point(p) => tracing::info!(
                "stroke #{}: point ({:.1}, {:.1}) for {}ms",
                self.dispatched,
                p.x,
                p.y,
                stroke.duration_ms
            ),
            StrokePath::Line { from, to } => tracing::info!(
                "stroke #{}: line ({:.1}, {:.1}) -> ({:.1}, {:.1}) for {}ms",
                self.dispatched,
                from.x,
                from.y,
                to.x,
                to.y,
                stroke.duration_ms
            ),
        }
        Ok(())
    }
}
