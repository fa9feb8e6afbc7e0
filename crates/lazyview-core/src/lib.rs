//! Shared primitives for Lazyview: time sources and hash collections.

pub mod clock;
pub mod collections;

pub use clock::{Clock, Instant, ManualClock, SystemClock};
