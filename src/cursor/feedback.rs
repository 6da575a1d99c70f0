//! Visual feedback sink
//!
//! Overlay renderers subscribe here to draw the pointer and gesture cues.
//! Callbacks run on the actuation thread and must not block.

use crossbeam_channel::{Receiver, Sender, TrySendError};
use tracing::trace;

use crate::mapping::ScreenPoint;

/// Receiver of cursor and gesture notifications
pub trait FeedbackSink: Send + Sync {
    /// The pointer moved
    fn on_cursor_update(&self, _position: ScreenPoint) {}

    /// Nothing to point at (no face, or a negative target); hide the pointer
    fn on_cursor_hidden(&self) {}

    /// A tap was injected
    fn on_tap(&self, _position: ScreenPoint) {}

    /// A drag began at `origin`
    fn on_drag_start(&self, _origin: ScreenPoint) {}

    /// The drag ended
    fn on_drag_end(&self) {}
}

/// Sink that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopFeedback;

impl FeedbackSink for NoopFeedback {}

/// Feedback notification as a value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeedbackEvent {
    /// Pointer moved
    CursorUpdate(ScreenPoint),
    /// Pointer hidden
    CursorHidden,
    /// Tap injected
    Tap(ScreenPoint),
    /// Drag began
    DragStart(ScreenPoint),
    /// Drag ended
    DragEnd,
}

/// Forwards notifications over a bounded channel, dropping them when the
/// consumer falls behind
#[derive(Debug, Clone)]
pub struct ChannelFeedback {
    tx: Sender<FeedbackEvent>,
}

impl ChannelFeedback {
    /// Sink plus the receiving end, holding at most `capacity` events
    pub fn bounded(capacity: usize) -> (Self, Receiver<FeedbackEvent>) {
        let (tx, rx) = crossbeam_channel::bounded(capacity);
        (Self { tx }, rx)
    }

    fn send(&self, event: FeedbackEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => trace!("Feedback queue full, dropped {:?}", event),
            Err(TrySendError::Disconnected(_)) => {}
        }
    }
}

impl FeedbackSink for ChannelFeedback {
    fn on_cursor_update(&self, position: ScreenPoint) {
        self.send(FeedbackEvent::CursorUpdate(position));
    }

    fn on_cursor_hidden(&self) {
        self.send(FeedbackEvent::CursorHidden);
    }

    fn on_tap(&self, position: ScreenPoint) {
        self.send(FeedbackEvent::Tap(position));
    }

    fn on_drag_start(&self, origin: ScreenPoint) {
        self.send(FeedbackEvent::DragStart(origin));
    }

    fn on_drag_end(&self) {
        self.send(FeedbackEvent::DragEnd);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_feedback_drops_when_full() {
        let (sink, rx) = ChannelFeedback::bounded(2);
        sink.on_tap(ScreenPoint::new(1.0, 1.0));
        sink.on_drag_start(ScreenPoint::new(2.0, 2.0));
        sink.on_drag_end();

        assert_eq!(rx.try_recv(), Ok(FeedbackEvent::Tap(ScreenPoint::new(1.0, 1.0))));
        assert_eq!(
            rx.try_recv(),
            Ok(FeedbackEvent::DragStart(ScreenPoint::new(2.0, 2.0)))
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_disconnected_sink_is_silent() {
        let (sink, rx) = ChannelFeedback::bounded(1);
        drop(rx);
        sink.on_cursor_update(ScreenPoint::new(0.0, 0.0));
    }
}
