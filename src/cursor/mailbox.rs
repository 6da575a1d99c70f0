//! Single-slot pending position
//!
//! The most recently requested cursor target. Producers overwrite it from any
//! thread; the actuation thread reads it when a move is processed and replays
//! it when the actuator becomes ready.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::mapping::ScreenPoint;

/// Last-writer-wins mailbox for the requested cursor position
#[derive(Debug, Clone, Default)]
pub struct PendingPosition {
    slot: Arc<Mutex<Option<ScreenPoint>>>,
}

impl PendingPosition {
    /// Empty mailbox
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the pending position
    pub fn store(&self, position: ScreenPoint) {
        *self.slot.lock() = Some(position);
    }

    /// Most recent position, left in place
    pub fn latest(&self) -> Option<ScreenPoint> {
        *self.slot.lock()
    }
}
