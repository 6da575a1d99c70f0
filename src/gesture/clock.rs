//! Millisecond clocks
//!
//! Debounce windows are timestamp comparisons, never timers. The clock is
//! injected so that the detector and dispatcher can be driven by recorded
//! timestamps or by tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Monotonic millisecond time source
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Milliseconds since an arbitrary, fixed origin
    fn now_ms(&self) -> u64;
}

/// Wall clock, measured from construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Start a clock at 0
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Externally driven clock, used for replays and tests
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    /// Clock reading `start_ms`
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: AtomicU64::new(start_ms),
        }
    }

    /// Jump to an absolute time
    pub fn set(&self, now_ms: u64) {
        self.now.store(now_ms, Ordering::Release);
    }

    /// Move forward by `delta_ms`
    pub fn advance(&self, delta_ms: u64) {
        self.now.fetch_add(delta_ms, Ordering::AcqRel);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(100);
        assert_eq!(clock.now_ms(), 100);
        clock.advance(16);
        assert_eq!(clock.now_ms(), 116);
        clock.set(5);
        assert_eq!(clock.now_ms(), 5);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }
}
