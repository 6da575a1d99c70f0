//! Pointer command sink
//!
//! What the pipeline needs from the dispatcher. Implemented by
//! [`DispatcherHandle`] (queued onto the actuation thread) and by
//! [`CursorDispatcher`] itself (executed inline, for deterministic replays).

use super::actuator::Actuator;
use super::dispatcher::CursorDispatcher;
use super::error::Result;
use super::thread::DispatcherHandle;
use crate::mapping::ScreenPoint;

/// Receiver of pointer commands
pub trait CursorSink {
    /// Request a pointer move
    fn move_cursor(&mut self, target: ScreenPoint) -> Result<()>;

    /// Request a tap
    fn click(&mut self) -> Result<()>;

    /// Request drag start
    fn start_drag(&mut self) -> Result<()>;

    /// Request drag end
    fn end_drag(&mut self) -> Result<()>;
}

impl CursorSink for DispatcherHandle {
    fn move_cursor(&mut self, target: ScreenPoint) -> Result<()> {
        DispatcherHandle::move_cursor(self, target)
    }

    fn click(&mut self) -> Result<()> {
        DispatcherHandle::click(self)
    }

    fn start_drag(&mut self) -> Result<()> {
        DispatcherHandle::start_drag(self)
    }

    fn end_drag(&mut self) -> Result<()> {
        DispatcherHandle::end_drag(self)
    }
}

impl<A: Actuator> CursorSink for CursorDispatcher<A> {
    fn move_cursor(&mut self, target: ScreenPoint) -> Result<()> {
        self.move_to(target, false).map(|_| ())
    }

    fn click(&mut self) -> Result<()> {
        CursorDispatcher::click(self).map(|_| ())
    }

    fn start_drag(&mut self) -> Result<()> {
        CursorDispatcher::start_drag(self);
        Ok(())
    }

    fn end_drag(&mut self) -> Result<()> {
        CursorDispatcher::end_drag(self);
        Ok(())
    }
}
