//! Configuration for [`VirtualList`](super::VirtualList).

use std::time::Duration;

use super::error::VirtualListError;
use super::geometry::{WindowGeometry, DEFAULT_OFFSET_BUFFER};
use super::throttle::{ThrottlePolicy, DEFAULT_THROTTLE_INTERVAL};

/// Default item height along the main axis.
pub const DEFAULT_ITEM_HEIGHT: f32 = 50.0;

/// Default spacing between consecutive items.
pub const DEFAULT_GAP: f32 = 5.0;

/// Upper bound on `ceil(display_height / (item_height + gap))`.
pub const MAX_VISIBLE_ROWS: usize = 1 << 20;

/// Specification for list layout and scheduling.
///
/// Read once at construction; only `display_height` may change later, through
/// a resize event.
#[derive(Clone, Debug, PartialEq)]
pub struct VirtualListConfig {
    /// Height of every item.
    pub item_height: f32,
    /// Spacing after each item.
    pub gap: f32,
    /// Number of items rendered beyond the visible range.
    pub offset_buffer: usize,
    /// Delay between a recompute request and the recompute itself.
    pub throttle_interval: Duration,
    pub throttle_policy: ThrottlePolicy,
    /// Whether requests dropped during a recompute produce one follow-up.
    pub retrigger_dropped: bool,
    /// Height of the host display, used to derive the visible item count.
    pub display_height: f32,
}

impl Default for VirtualListConfig {
    fn default() -> Self {
        Self {
            item_height: DEFAULT_ITEM_HEIGHT,
            gap: DEFAULT_GAP,
            offset_buffer: DEFAULT_OFFSET_BUFFER,
            throttle_interval: DEFAULT_THROTTLE_INTERVAL,
            throttle_policy: ThrottlePolicy::default(),
            retrigger_dropped: true,
            display_height: 0.0,
        }
    }
}

impl VirtualListConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item_height(mut self, height: f32) -> Self {
        self.item_height = height;
        self
    }

    pub fn gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    pub fn offset_buffer(mut self, count: usize) -> Self {
        self.offset_buffer = count;
        self
    }

    pub fn throttle_interval(mut self, interval: Duration) -> Self {
        self.throttle_interval = interval;
        self
    }

    pub fn throttle_policy(mut self, policy: ThrottlePolicy) -> Self {
        self.throttle_policy = policy;
        self
    }

    pub fn retrigger_dropped(mut self, retrigger: bool) -> Self {
        self.retrigger_dropped = retrigger;
        self
    }

    pub fn display_height(mut self, height: f32) -> Self {
        self.display_height = height;
        self
    }

    pub fn validate(&self) -> Result<(), VirtualListError> {
        let stride = self.item_height + self.gap;
        if !stride.is_finite() || stride <= 0.0 {
            return Err(VirtualListError::InvalidConfig(format!(
                "item_height + gap must be positive, got {stride}"
            )));
        }
        if self.item_height < 0.0 || self.gap < 0.0 {
            return Err(VirtualListError::InvalidConfig(
                "item_height and gap must not be negative".into(),
            ));
        }
        if !self.display_height.is_finite() || self.display_height < 0.0 {
            return Err(VirtualListError::InvalidConfig(format!(
                "display_height must be a finite non-negative number, got {}",
                self.display_height
            )));
        }
        let rows = (self.display_height / stride).ceil();
        if !rows.is_finite() || rows > MAX_VISIBLE_ROWS as f32 {
            return Err(VirtualListError::InvalidConfig(format!(
                "display_height / (item_height + gap) = {rows} rows exceeds {MAX_VISIBLE_ROWS}"
            )));
        }
        Ok(())
    }

    pub fn geometry(&self) -> WindowGeometry {
        WindowGeometry::new(
            self.item_height,
            self.gap,
            self.offset_buffer,
            self.display_height,
        )
    }
}
