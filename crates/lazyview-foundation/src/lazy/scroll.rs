//! Scroll position tracking.
//!
//! Offsets reported by the host are stored as given; only negative and
//! non-finite values are reset to 0. The host owns its real viewport, which
//! may be shorter than the display height used for sizing the window, so it
//! can legitimately scroll past `extent - display_height`.
//!
//! Moves the engine makes on its own (`scroll_to`, `scroll_by`) are clamped
//! to `[0, max_offset]`.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollState {
    /// Current offset from the top of the content, in pixels.
    offset: f32,
    /// Maximum scroll value (extent - display height).
    max_offset: f32,
    /// Size of the visible area.
    display_height: f32,
}

impl ScrollState {
    pub fn new(display_height: f32) -> Self {
        Self {
            offset: 0.0,
            max_offset: 0.0,
            display_height: display_height.max(0.0),
        }
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn max_offset(&self) -> f32 {
        self.max_offset
    }

    pub fn display_height(&self) -> f32 {
        self.display_height
    }

    /// Updates the bounds after an extent or display change. The stored
    /// offset is left alone; the host reports its own correction.
    pub fn set_bounds(&mut self, extent: f32, display_height: f32) {
        self.display_height = display_height.max(0.0);
        self.max_offset = (extent - self.display_height).max(0.0);
    }

    /// Records the offset the host scrolled to. Returns the stored offset.
    pub fn set_host_offset(&mut self, offset: f32) -> f32 {
        self.offset = if offset.is_finite() && offset > 0.0 {
            offset
        } else {
            0.0
        };
        self.offset
    }

    /// Scrolls to `target`, clamped to the bounds. Returns the applied offset.
    pub fn scroll_to(&mut self, target: f32) -> f32 {
        self.offset = if target.is_finite() {
            target.clamp(0.0, self.max_offset)
        } else {
            0.0
        };
        self.offset
    }

    /// Scrolls by `delta` and returns the amount actually consumed.
    pub fn scroll_by(&mut self, delta: f32) -> f32 {
        let before = self.offset;
        self.scroll_to(before + delta);
        self.offset - before
    }
}
