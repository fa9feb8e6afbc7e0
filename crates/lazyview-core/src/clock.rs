//! Monotonic time sources.
//!
//! The engine never sleeps or spawns timers itself. Hosts drive it by polling
//! with the current time, which comes from a [`Clock`]. Real hosts use
//! [`SystemClock`]; tests and deterministic replays use [`ManualClock`].

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

pub use web_time::Instant;

/// A source of monotonic instants.
pub trait Clock {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}

/// Wall clock backed by `web_time::Instant` (uses `performance.now()` on wasm).
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
///
/// Clones share the same time, so a test can hold one handle while the
/// engine holds another.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    /// Creates a clock frozen at the current instant.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    /// Moves the clock forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        self.now.set(self.now.get() + delta);
    }

    /// Moves the clock to `instant` if it lies in the future.
    pub fn advance_to(&self, instant: Instant) {
        if instant > self.now.get() {
            self.now.set(instant);
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}
