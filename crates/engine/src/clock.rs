use std::time::Duration;

use tokio::time::Instant;

/// Reference point for forced descents.
///
/// Built on `tokio::time::Instant` so paused test time drives it.
#[derive(Debug, Clone, Copy)]
pub struct DropClock {
    last_drop: Instant,
}

impl DropClock {
    pub fn new() -> Self {
        Self {
            last_drop: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.last_drop.elapsed()
    }

    /// Whether at least `interval_ms` has passed since the last reset.
    pub fn is_due(&self, interval_ms: u32) -> bool {
        self.elapsed() >= Duration::from_millis(interval_ms as u64)
    }

    pub fn reset(&mut self) {
        self.last_drop = Instant::now();
    }
}

impl Default for DropClock {
    fn default() -> Self {
        Self::new()
    }
}
