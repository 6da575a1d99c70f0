//! Actuation thread
//!
//! All pointer actuation is serialized on one dedicated thread that owns the
//! [`CursorDispatcher`] and its actuator. Producers on any thread talk to it
//! through a cloneable [`DispatcherHandle`], which never blocks.
//!
//! # Architecture
//!
//! ```text
//! frame thread ──┐                         ┌─────────────────────────┐
//!                ├─> DispatcherHandle ───> │ gaze-actuation thread   │
//! host events ───┘     │  (crossbeam)      │   CursorDispatcher      │
//!                      │                   │     └─> Actuator        │
//!                      └─> PendingPosition │                         │
//!                          (last writer) ──┼─> read on Move/Ready    │
//!                                          └─────────────────────────┘
//! ```
//!
//! Dropping the [`ActuationThread`] drains queued commands and joins.

use crossbeam_channel::{Receiver, Sender};
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info, warn};

use super::actuator::Actuator;
use super::dispatcher::CursorDispatcher;
use super::error::{DispatchError, Result};
use super::mailbox::PendingPosition;
use crate::mapping::ScreenPoint;

/// Commands processed on the actuation thread
#[derive(Debug, Clone, Copy, PartialEq)]
enum Command {
    /// Move toward the latest pending position
    Move,
    /// Nothing to point at
    Hide,
    Click,
    StartDrag,
    EndDrag,
    ActuatorReady,
    Shutdown,
}

/// Cloneable, non-blocking front end of the actuation thread
#[derive(Debug, Clone)]
pub struct DispatcherHandle {
    tx: Sender<Command>,
    pending: PendingPosition,
}

impl DispatcherHandle {
    fn send(&self, command: Command) -> Result<()> {
        self.tx.send(command).map_err(|_| DispatchError::QueueClosed)
    }

    /// Request a pointer move. Negative coordinates hide the pointer and
    /// never reach the pending position.
    pub fn move_cursor(&self, target: ScreenPoint) -> Result<()> {
        if !target.is_visible() {
            return self.send(Command::Hide);
        }
        self.pending.store(target);
        self.send(Command::Move)
    }

    /// Request a tap at the current pointer position
    pub fn click(&self) -> Result<()> {
        self.send(Command::Click)
    }

    /// Request drag start
    pub fn start_drag(&self) -> Result<()> {
        self.send(Command::StartDrag)
    }

    /// Request drag end
    pub fn end_drag(&self) -> Result<()> {
        self.send(Command::EndDrag)
    }

    /// Notify that the actuator (re)connected
    pub fn actuator_ready(&self) -> Result<()> {
        self.send(Command::ActuatorReady)
    }

    /// Last requested position
    pub fn pending(&self) -> Option<ScreenPoint> {
        self.pending.latest()
    }
}

/// Owner of the `gaze-actuation` thread
#[derive(Debug)]
pub struct ActuationThread {
    handle: DispatcherHandle,
    thread_handle: Option<JoinHandle<()>>,
}

impl ActuationThread {
    /// Move `dispatcher` onto a new actuation thread
    pub fn spawn<A>(dispatcher: CursorDispatcher<A>) -> Result<Self>
    where
        A: Actuator + 'static,
    {
        let (tx, rx) = crossbeam_channel::unbounded::<Command>();
        let pending = dispatcher.pending().clone();

        let thread_handle = thread::Builder::new()
            .name("gaze-actuation".to_string())
            .spawn(move || run_actuation_loop(dispatcher, rx))
            .map_err(|e| DispatchError::ThreadSpawn(e.to_string()))?;

        info!("Actuation thread started");

        Ok(Self {
            handle: DispatcherHandle { tx, pending },
            thread_handle: Some(thread_handle),
        })
    }

    /// New handle to the thread
    pub fn handle(&self) -> DispatcherHandle {
        self.handle.clone()
    }

    /// Process everything already queued, then stop the thread
    pub fn shutdown(&mut self) -> Result<()> {
        let Some(thread_handle) = self.thread_handle.take() else {
            return Ok(());
        };

        if self.handle.send(Command::Shutdown).is_err() {
            warn!("Actuation thread already stopped");
        }

        if thread_handle.join().is_err() {
            error!("Actuation thread panicked during shutdown");
            return Err(DispatchError::ThreadPanic);
        }

        info!("Actuation thread shut down");
        Ok(())
    }
}

impl Drop for ActuationThread {
    fn drop(&mut self) {
        debug!("Dropping ActuationThread");
        let _ = self.shutdown();
    }
}

fn run_actuation_loop<A: Actuator>(mut dispatcher: CursorDispatcher<A>, rx: Receiver<Command>) {
    for command in rx.iter() {
        let result = match command {
            Command::Move => match dispatcher.pending().latest() {
                Some(target) => dispatcher.move_to(target, false).map(|_| ()),
                None => Ok(()),
            },
            Command::Hide => dispatcher.move_to(ScreenPoint::HIDDEN, false).map(|_| ()),
            Command::Click => dispatcher.click().map(|_| ()),
            Command::StartDrag => {
                dispatcher.start_drag();
                Ok(())
            }
            Command::EndDrag => {
                dispatcher.end_drag();
                Ok(())
            }
            Command::ActuatorReady => dispatcher.actuator_ready().map(|_| ()),
            Command::Shutdown => break,
        };

        if let Err(e) = result {
            warn!("{:?} failed: {}", command, e);
        }
    }

    debug!("Actuation loop exited");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, SharedConfig};
    use crate::cursor::actuator::{MockActuator, Stroke};
    use crate::cursor::feedback::{ChannelFeedback, FeedbackEvent};
    use crate::gesture::ManualClock;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn spawn_recording() -> (ActuationThread, Arc<Mutex<Vec<Stroke>>>, Arc<ManualClock>) {
        let strokes = Arc::new(Mutex::new(Vec::new()));
        let log = strokes.clone();
        let mut mock = MockActuator::new();
        mock.expect_is_ready().return_const(true);
        mock.expect_dispatch().returning(move |s| {
            log.lock().push(s);
            Ok(())
        });

        let clock = Arc::new(ManualClock::new(0));
        let dispatcher =
            CursorDispatcher::new(mock, SharedConfig::new(Config::default()), clock.clone());
        (ActuationThread::spawn(dispatcher).unwrap(), strokes, clock)
    }

    #[test]
    fn test_commands_run_in_order() {
        let (mut thread, strokes, _) = spawn_recording();
        let handle = thread.handle();

        handle.move_cursor(ScreenPoint::new(100.0, 200.0)).unwrap();
        handle.click().unwrap();
        thread.shutdown().unwrap();

        let strokes = strokes.lock();
        assert_eq!(strokes.len(), 2);
        assert_eq!(strokes[1], Stroke::point(ScreenPoint::new(100.0, 200.0), 50));
    }

    #[test]
    fn test_negative_move_hides_without_pending() {
        let mut mock = MockActuator::new();
        mock.expect_is_ready().return_const(true);
        mock.expect_dispatch().never();
        let (feedback, rx) = ChannelFeedback::bounded(4);
        let dispatcher = CursorDispatcher::new(
            mock,
            SharedConfig::new(Config::default()),
            Arc::new(ManualClock::new(0)),
        )
        .with_feedback(Arc::new(feedback));
        let mut thread = ActuationThread::spawn(dispatcher).unwrap();
        let handle = thread.handle();

        handle.move_cursor(ScreenPoint::HIDDEN).unwrap();
        assert_eq!(handle.pending(), None);
        thread.shutdown().unwrap();
        assert_eq!(rx.try_recv(), Ok(FeedbackEvent::CursorHidden));
    }

    #[test]
    fn test_handle_fails_after_shutdown() {
        let (mut thread, _, _) = spawn_recording();
        let handle = thread.handle();
        thread.shutdown().unwrap();

        // the receiver is gone once the loop exits
        assert_eq!(handle.click(), Err(DispatchError::QueueClosed));
        assert!(thread.shutdown().is_ok());
    }
}
