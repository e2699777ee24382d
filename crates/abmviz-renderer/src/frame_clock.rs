use std::time::{Duration, Instant};

/// Fixed-cadence tick source for the render loop.
///
/// The clock never fires more than once per `poll`, so a stalled loop
/// resumes with a single late frame rather than a burst of catch-up frames.
#[derive(Debug, Clone)]
pub struct FrameClock {
    interval: Duration,
    next_due: Instant,
    frames: u64,
}

impl FrameClock {
    /// A clock whose first tick is due immediately at `start`.
    pub fn new(frame_rate: u32, start: Instant) -> Self {
        let interval = Duration::from_secs(1) / frame_rate.max(1);
        Self {
            interval,
            next_due: start,
            frames: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Frames fired so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Returns true when a tick is due at `now` and schedules the next one.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        self.next_due += self.interval;
        if self.next_due <= now {
            // Behind by more than a full interval: skip the missed ticks.
            self.next_due = now + self.interval;
        }
        self.frames += 1;
        true
    }

    pub fn until_next(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }
}
