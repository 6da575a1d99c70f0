//! # gaze-pointer
//!
//! Hands-free pointing: converts per-frame facial landmarks into cursor motion
//! and blink gestures (tap, half-blink drag).
//!
//! # Architecture
//!
//! ```text
//! gaze-pointer
//!   ├─> Landmark Geometry Extractor (tracking)  eye regions, eyelids, gaze point
//!   ├─> Position Mapper             (mapping)   range-amplified screen target
//!   ├─> Blink Gesture Detector      (gesture)   Tap / DragStart / DragEnd
//!   └─> Cursor Dispatcher           (cursor)    smoothing, rate limit, strokes
//! ```
//!
//! # Data Flow
//!
//! **Pointer Path:** Frame → Extractor → Mapper → Dispatcher → Actuator
//!
//! **Gesture Path:** Frame → Extractor → Detector → Dispatcher → Actuator
//!
//! [`pipeline::GazePipeline`] runs both paths for each frame.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Configuration loading, clamping and hot reload
pub mod config;

/// Landmark geometry extraction
pub mod tracking;

/// Normalized position to screen coordinate mapping
pub mod mapping;

/// Blink gesture detection
///
/// A temporal state machine over eyelid openness. Velocity and acceleration
/// are derived from a five-sample history; taps and half-blink drags are
/// recognized from acceleration spikes with a shared 250ms cooldown.
pub mod gesture;

/// Cursor dispatch and the actuation thread
pub mod cursor;

/// Per-frame wiring of all stages
pub mod pipeline;

/// Recorded landmark streams
pub mod replay;

/// Utility functions
pub mod utils;
