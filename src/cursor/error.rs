//! Cursor dispatch error types

use thiserror::Error;

/// Result type for dispatch operations
pub type Result<T> = std::result::Result<T, DispatchError>;

/// Cursor dispatch error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    /// The actuation thread is gone
    #[error("Actuation queue is closed")]
    QueueClosed,

    /// No actuator is connected
    #[error("Actuator unavailable")]
    ActuatorUnavailable,

    /// The actuator rejected a stroke
    #[error("Actuation failed: {0}")]
    ActuationFailed(String),

    /// Thread creation failed
    #[error("Failed to spawn actuation thread: {0}")]
    ThreadSpawn(String),

    /// Thread panicked
    #[error("Actuation thread panicked")]
    ThreadPanic,
}
