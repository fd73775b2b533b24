use std::thread;
use std::time::{Duration, Instant};

use asteroids_core::{Clock, FrameScheduler};

/// Wall-clock time since construction.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Sleeps out the remainder of each frame. Falls back to "now" as the next
/// frame boundary when a tick overran by more than one interval.
#[derive(Debug, Default)]
pub struct RealtimeScheduler {
    next_frame: Option<Instant>,
}

impl RealtimeScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameScheduler for RealtimeScheduler {
    fn wait(&mut self, interval: Duration) {
        let now = Instant::now();
        let deadline = match self.next_frame {
            Some(previous) => previous + interval,
            None => now + interval,
        };

        if deadline > now {
            thread::sleep(deadline - now);
            self.next_frame = Some(deadline);
        } else if now - deadline > interval {
            tracing::debug!(behind = ?(now - deadline), "frame overran, resyncing");
            self.next_frame = Some(now);
        } else {
            self.next_frame = Some(deadline);
        }
    }
}
