//! Pure window math for uniform-height lists.
//!
//! Maps a scroll offset to the half-open range of indices that need a
//! rendered node. Every item occupies `item_height + gap` along the main axis.

/// Default number of extra items rendered ahead of the visible range.
pub const DEFAULT_OFFSET_BUFFER: usize = 3;

/// Half-open range of item indices considered visible plus buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VisibleWindow {
    /// First index in the window (inclusive).
    pub start: usize,
    /// One past the last index in the window.
    pub end: usize,
}

impl VisibleWindow {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Indices of the window that exist in a collection of `count` items.
    pub fn clamped_to(&self, count: usize) -> std::ops::Range<usize> {
        self.start.min(count)..self.end.min(count)
    }
}

/// Geometry derived once from the list configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowGeometry {
    pub item_height: f32,
    pub gap: f32,
    pub offset_buffer: usize,
    pub max_visible_count: usize,
}

impl WindowGeometry {
    pub fn new(item_height: f32, gap: f32, offset_buffer: usize, display_height: f32) -> Self {
        let stride = item_height + gap;
        Self {
            item_height,
            gap,
            offset_buffer,
            max_visible_count: max_visible_count(display_height, stride),
        }
    }

    /// Distance between the tops of two consecutive items.
    #[inline]
    pub fn stride(&self) -> f32 {
        self.item_height + self.gap
    }

    /// Absolute offset of the item at `index`.
    #[inline]
    pub fn item_offset(&self, index: usize) -> f32 {
        index as f32 * self.stride()
    }

    /// Total scrollable extent of a collection with `count` items.
    #[inline]
    pub fn total_extent(&self, count: usize) -> f32 {
        count as f32 * self.stride()
    }

    /// Re-derives `max_visible_count` for a new display height.
    pub fn resize(&mut self, display_height: f32) {
        self.max_visible_count = max_visible_count(display_height, self.stride());
    }

    /// Window size ignoring the clamp at index 0.
    pub fn window_len(&self) -> usize {
        self.max_visible_count.saturating_add(self.offset_buffer)
    }
}

/// Number of item strides needed to cover `display_height`.
pub fn max_visible_count(display_height: f32, stride: f32) -> usize {
    if !(stride > 0.0) || !display_height.is_finite() || display_height <= 0.0 {
        return 0;
    }
    (display_height / stride).ceil() as usize
}

/// Computes the window of indices to materialize at `scroll_offset`.
///
/// `start = max(0, floor(offset / stride) - buffer)` and
/// `end = start + max_visible_count + buffer`. No upper clamp is applied;
/// callers skip indices past the end of the collection.
pub fn compute_window(scroll_offset: f32, geometry: &WindowGeometry) -> VisibleWindow {
    let stride = geometry.stride();
    let first = if stride > 0.0 && scroll_offset.is_finite() && scroll_offset > 0.0 {
        (scroll_offset / stride).floor() as usize
    } else {
        0
    };
    let start = first.saturating_sub(geometry.offset_buffer);
    VisibleWindow::new(start, start.saturating_add(geometry.window_len()))
}
