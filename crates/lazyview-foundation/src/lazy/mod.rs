//! Windowed list engine for Lazyview.
//!
//! This module renders large ordered collections by materializing only the
//! items inside the visible window plus a small buffer, instead of a node
//! for every item up front.
//!
//! # Architecture
//!
//! - [`compute_window`] - Pure mapping from scroll offset to index range
//! - [`RenderCache`] - Sparse index-addressed cache of rendered nodes
//! - [`Throttler`] - Coalesces recompute requests, at most one in flight
//! - [`Viewport`] / [`ViewportPort`] - Uniform-height placement over a host container
//! - [`VirtualList`] - Owns the collection and reconciles cache and viewport on edits
//!
//! # Example
//!
//! ```rust,ignore
//! let mut list = VirtualList::new(tasks, renderer, RetainedViewport::new(), config)?;
//! list.remove_item(3)?;
//! list.handle_event(ListEvent::Scrolled { offset: 480.0 });
//! while list.poll()? {}
//! ```

mod config;
mod error;
mod geometry;
mod render;
mod render_cache;
mod scroll;
mod stats;
mod throttle;
mod viewport;
mod virtual_list;

pub use config::*;
pub use error::*;
pub use geometry::*;
pub use render::*;
pub use render_cache::*;
pub use scroll::*;
pub use stats::*;
pub use throttle::*;
pub use viewport::*;
pub use virtual_list::*;
