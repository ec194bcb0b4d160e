use std::time::{Duration, Instant};

use log::info;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Beat {
    Tick,
    Poll,
    Telemetry,
}

#[derive(Debug)]
struct Timer {
    beat: Beat,
    period: Duration,
    next_due: Instant,
}

impl Timer {
    fn fire(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }

        self.next_due += self.period;
        // Fell behind; fire once and re-arm instead of bursting
        if self.next_due <= now {
            self.next_due = now + self.period;
        }
        true
    }
}

/// Fixed-rate timers for the game loop.
///
/// The loop asks how long it may sleep with [`Scheduler::until_next`] and
/// collects fired beats with [`Scheduler::due`]. After
/// [`Scheduler::teardown`] nothing fires again.
#[derive(Debug)]
pub struct Scheduler {
    start: Instant,
    timers: Vec<Timer>,
}

impl Scheduler {
    pub fn new(start: Instant) -> Self {
        Scheduler {
            start,
            timers: Vec::new(),
        }
    }

    pub fn every(mut self, beat: Beat, period: Duration) -> Self {
        self.timers.push(Timer {
            beat,
            period,
            next_due: self.start + period,
        });
        self
    }

    pub fn due(&mut self, now: Instant) -> Vec<Beat> {
        self.timers
            .iter_mut()
            .filter_map(|timer| timer.fire(now).then_some(timer.beat))
            .collect()
    }

    pub fn until_next(&self, now: Instant) -> Option<Duration> {
        self.timers
            .iter()
            .map(|timer| timer.next_due.saturating_duration_since(now))
            .min()
    }

    pub fn is_armed(&self) -> bool {
        !self.timers.is_empty()
    }

    pub fn teardown(&mut self) {
        if self.is_armed() {
            info!("Stopping {} timers", self.timers.len());
        }
        self.timers.clear();
    }
}
