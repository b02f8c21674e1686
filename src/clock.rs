use std::time::Instant;

/// Milliseconds since the clock was created.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn start() -> Self {
        MonotonicClock {
            origin: Instant::now(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// A fixed-period timer polled from the frame loop.  Each elapsed period is
/// reported once, so a long stall yields several fires on the next poll.
#[derive(Clone, Debug)]
pub struct RepeatingTimer {
    period_ms: u64,
    next_due_ms: u64,
}

impl RepeatingTimer {
    pub fn new(period_ms: u64, now_ms: u64) -> Self {
        let period_ms = period_ms.max(1);
        RepeatingTimer {
            period_ms,
            next_due_ms: now_ms + period_ms,
        }
    }

    pub fn poll(&mut self, now_ms: u64) -> u32 {
        let mut fired = 0;
        while now_ms >= self.next_due_ms {
            self.next_due_ms += self.period_ms;
            fired += 1;
        }
        fired
    }
}
