//! Throttled recompute scheduling.
//!
//! Bursts of scroll, resize, and mutation notifications collapse into one
//! recompute per interval. The throttler does not own a timer; the host polls
//! it with the current time and runs the recompute when [`Throttler::take_due`]
//! says so.
//!
//! With [`ThrottlePolicy::Throttle`] a request that arrives while another is
//! in flight is dropped rather than queued. Dropped requests are remembered
//! and, unless disabled, produce exactly one follow-up once the in-flight pass
//! completes, so the last event of a burst is never lost.

use std::time::Duration;

use lazyview_core::Instant;

/// Default delay between a request and its recompute.
pub const DEFAULT_THROTTLE_INTERVAL: Duration = Duration::from_millis(50);

/// How requests that arrive before the pending recompute runs are handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThrottlePolicy {
    /// The first request arms the timer; later ones are dropped until the
    /// recompute completes.
    #[default]
    Throttle,
    /// Every request re-arms the timer, so a burst fires once, one interval
    /// after its last request.
    Debounce,
}

/// Result of [`Throttler::schedule`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScheduleOutcome {
    /// A new recompute was armed.
    Scheduled,
    /// The pending recompute was pushed back to a new deadline.
    Rearmed,
    /// A recompute is already in flight; the request was dropped.
    Dropped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ThrottleState {
    Idle,
    Pending { due: Instant },
    Running,
}

#[derive(Clone, Debug)]
pub struct Throttler {
    interval: Duration,
    policy: ThrottlePolicy,
    retrigger_dropped: bool,
    state: ThrottleState,
    missed: bool,
    dropped_count: usize,
}

impl Throttler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            policy: ThrottlePolicy::default(),
            retrigger_dropped: true,
            state: ThrottleState::Idle,
            missed: false,
            dropped_count: 0,
        }
    }

    pub fn with_policy(mut self, policy: ThrottlePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Whether a dropped request schedules one follow-up after completion.
    pub fn with_retrigger_dropped(mut self, retrigger: bool) -> Self {
        self.retrigger_dropped = retrigger;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Requests a recompute at `now + interval`.
    pub fn schedule(&mut self, now: Instant) -> ScheduleOutcome {
        match (self.state, self.policy) {
            (ThrottleState::Idle, _) => {
                self.state = ThrottleState::Pending {
                    due: now + self.interval,
                };
                ScheduleOutcome::Scheduled
            }
            (ThrottleState::Pending { .. }, ThrottlePolicy::Debounce) => {
                self.state = ThrottleState::Pending {
                    due: now + self.interval,
                };
                ScheduleOutcome::Rearmed
            }
            (ThrottleState::Pending { .. }, ThrottlePolicy::Throttle) | (ThrottleState::Running, _) => {
                self.missed = true;
                self.dropped_count += 1;
                ScheduleOutcome::Dropped
            }
        }
    }

    /// Returns true and enters the running state if the pending recompute is
    /// due at `now`. The caller must follow with [`Throttler::complete`].
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.state {
            ThrottleState::Pending { due } if now >= due => {
                self.state = ThrottleState::Running;
                true
            }
            _ => false,
        }
    }

    /// Leaves the running state. Returns true if a follow-up was armed for
    /// requests dropped during the pass.
    pub fn complete(&mut self, now: Instant) -> bool {
        if self.state == ThrottleState::Running {
            self.state = ThrottleState::Idle;
        }
        let missed = std::mem::take(&mut self.missed);
        if missed && self.retrigger_dropped && self.state == ThrottleState::Idle {
            self.state = ThrottleState::Pending {
                due: now + self.interval,
            };
            return true;
        }
        false
    }

    /// Discards any pending recompute.
    pub fn cancel(&mut self) {
        self.state = ThrottleState::Idle;
        self.missed = false;
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        match self.state {
            ThrottleState::Pending { due } => Some(due),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, ThrottleState::Pending { .. })
    }

    pub fn is_running(&self) -> bool {
        self.state == ThrottleState::Running
    }

    /// True from the first request until the recompute completes.
    pub fn is_in_flight(&self) -> bool {
        self.state != ThrottleState::Idle
    }

    /// Total number of requests dropped since construction.
    pub fn dropped_count(&self) -> usize {
        self.dropped_count
    }
}

impl Default for Throttler {
    fn default() -> Self {
        Self::new(DEFAULT_THROTTLE_INTERVAL)
    }
}
