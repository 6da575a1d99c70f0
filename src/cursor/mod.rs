//! Cursor dispatch
//!
//! Converts target screen coordinates into smoothed pointer strokes and
//! gesture events into tap and drag strokes, issued to a host [`Actuator`].
//!
//! # Architecture
//!
//! ```text
//! GazePipeline
//!   └─> CursorSink
//!       ├─> CursorDispatcher  (inline, same thread)
//!       └─> DispatcherHandle  (any thread, non-blocking)
//!           └─> gaze-actuation thread
//!               └─> CursorDispatcher
//!                   ├─> interval limit, smoothing, dead zone
//!                   ├─> Actuator::dispatch(Stroke)
//!                   └─> FeedbackSink (overlay)
//! ```
//!
//! # Strokes
//!
//! | Action | Path | Duration |
//! |--------|------|----------|
//! | Move | point at target | 1ms |
//! | Move while dragging | line from drag origin to target | 16ms |
//! | Tap | point at last position | 50ms |

mod actuator;
mod dispatcher;
mod error;
mod feedback;
mod mailbox;
mod sink;
mod thread;

pub use actuator::{Actuator, Stroke, StrokePath, TracingActuator};
pub use dispatcher::{CursorDispatcher, CursorState, MoveOutcome};
pub use error::{DispatchError, Result};
pub use feedback::{ChannelFeedback, FeedbackEvent, FeedbackSink, NoopFeedback};
pub use mailbox::PendingPosition;
pub use sink::CursorSink;
pub use thread::{ActuationThread, DispatcherHandle};
