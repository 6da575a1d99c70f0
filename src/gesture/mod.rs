//! Blink gesture recognition
//!
//! Turns the per-frame eyelid signal into discrete gestures:
//!
//! ```text
//! EyelidLandmarks ──> openness ──> history (5 samples / 500ms)
//!                                      │
//!                       velocity, acceleration
//!                                      │
//!                                      ▼
//!                        Tap | DragStart | DragEnd
//! ```

pub mod clock;
pub mod detector;
pub mod history;

pub use clock::{Clock, ManualClock, SystemClock};
pub use detector::{
    BlinkGestureDetector, Calibration, DetectorState, GestureEvent, GestureMode, Observation,
    ACTION_COOLDOWN_MS,
};
pub use history::{GazeSample, SampleHistory, HISTORY_CAPACITY, HISTORY_WINDOW_MS};
