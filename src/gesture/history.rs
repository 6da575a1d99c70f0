//! Bounded openness history
//!
//! Fixed-capacity ring buffer of [`GazeSample`]s. A push beyond capacity
//! drops the oldest sample; [`SampleHistory::evict_older_than`] drops samples
//! that fell out of the time window.

/// Maximum number of samples retained
pub const HISTORY_CAPACITY: usize = 5;

/// Samples older than this (relative to the newest) are evicted
pub const HISTORY_WINDOW_MS: u64 = 500;

/// One normalized openness observation with its derivatives
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GazeSample {
    /// Observation time
    pub timestamp_ms: u64,
    /// Openness relative to baseline, in `[0, 1]`
    pub openness: f32,
    /// d(openness)/dt, per second
    pub velocity: f32,
    /// d(velocity)/dt, per second
    pub acceleration: f32,
}

/// Ring buffer of the most recent samples, oldest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleHistory {
    buf: [GazeSample; HISTORY_CAPACITY],
    start: usize,
    len: usize,
}

impl SampleHistory {
    /// Empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample, dropping the oldest when full
    pub fn push(&mut self, sample: GazeSample) {
        if self.len == HISTORY_CAPACITY {
            self.start = (self.start + 1) % HISTORY_CAPACITY;
            self.len -= 1;
        }
        self.buf[(self.start + self.len) % HISTORY_CAPACITY] = sample;
        self.len += 1;
    }

    /// Drop samples more than `window_ms` older than `now_ms`
    pub fn evict_older_than(&mut self, now_ms: u64, window_ms: u64) -> usize {
        let mut evicted = 0;
        while self.len > 0 && now_ms.saturating_sub(self.buf[self.start].timestamp_ms) > window_ms
        {
            self.start = (self.start + 1) % HISTORY_CAPACITY;
            self.len -= 1;
            evicted += 1;
        }
        evicted
    }

    /// `n`-th newest sample (0 = newest)
    pub fn newest(&self, n: usize) -> Option<&GazeSample> {
        if n >= self.len {
            return None;
        }
        Some(&self.buf[(self.start + self.len - 1 - n) % HISTORY_CAPACITY])
    }

    /// Samples oldest first
    pub fn iter(&self) -> impl Iterator<Item = &GazeSample> + '_ {
        (0..self.len).map(move |i| &self.buf[(self.start + i) % HISTORY_CAPACITY])
    }

    /// Number of retained samples
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if no samples are retained
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop everything
    pub fn clear(&mut self) {
        self.start = 0;
        self.len = 0;
    }
}
