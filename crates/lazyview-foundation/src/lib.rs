//! Foundation elements for Lazyview.
//!
//! The [`lazy`] module holds the windowing engine: it keeps rendered nodes only
//! for the items inside the visible window and reconciles them as the backing
//! collection changes or the host scrolls.

pub mod lazy;

pub use lazy::*;
