use core::time::Duration;

use crate::context::ManualClock;

/// Yields between ticks. The loop calls [`FrameScheduler::wait`] once after
/// every tick that leaves the session playing.
pub trait FrameScheduler {
    fn wait(&mut self, interval: Duration);
}

/// Advances a [`ManualClock`] instead of sleeping, so runs are reproducible.
#[derive(Clone, Debug)]
pub struct VirtualScheduler {
    clock: ManualClock,
    waits: u64,
}

impl VirtualScheduler {
    pub fn new(clock: ManualClock) -> Self {
        Self { clock, waits: 0 }
    }

    pub fn waits(&self) -> u64 {
        self.waits
    }
}

impl FrameScheduler for VirtualScheduler {
    fn wait(&mut self, interval: Duration) {
        self.clock.advance(interval);
        self.waits += 1;
    }
}
