//! Scroll window over the match list.
//!
//! Keeps the highlighted row visible with minimal movement and places a
//! single-row scrollbar thumb.

/// Visible window into a list of `total` rows.
///
/// # Example
///
/// ```rust
/// use cortex_multisearch::scroll::ScrollState;
///
/// let mut scroll = ScrollState::new(11, 5); // 11 matches, 5 visible
///
/// scroll.ensure_visible(9);
/// assert_eq!(scroll.visible_range(), 5..10);
///
/// scroll.ensure_visible(7);
/// assert_eq!(scroll.offset(), 5); // already visible, no movement
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollState {
    /// Total number of rows
    total: usize,
    /// Number of visible rows
    visible: usize,
    /// Index of the first visible row
    offset: usize,
}

impl ScrollState {
    pub fn new(total: usize, visible: usize) -> Self {
        Self {
            total,
            visible,
            offset: 0,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn visible(&self) -> usize {
        self.visible
    }

    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.clamp_offset();
    }

    pub fn set_visible(&mut self, visible: usize) {
        self.visible = visible;
        self.clamp_offset();
    }

    pub fn set_offset(&mut self, offset: usize) {
        self.offset = offset;
        self.clamp_offset();
    }

    pub fn scroll_to_top(&mut self) {
        self.offset = 0;
    }

    /// Adjust the offset so `index` is inside the window.
    pub fn ensure_visible(&mut self, index: usize) {
        if self.visible == 0 {
            return;
        }
        if index < self.offset {
            self.offset = index;
        } else if index >= self.offset + self.visible {
            self.offset = index.saturating_sub(self.visible.saturating_sub(1));
        }
        self.clamp_offset();
    }

    pub fn needs_scrollbar(&self) -> bool {
        self.total > self.visible
    }

    pub fn visible_range(&self) -> std::ops::Range<usize> {
        let start = self.offset;
        let end = (self.offset + self.visible).min(self.total);
        start..end
    }

    /// Row of the scrollbar thumb within the window.
    ///
    /// The first and last rows are reserved for the top and bottom scroll
    /// positions, so any intermediate position maps strictly between them.
    /// Windows of two rows or fewer have no intermediate row.
    pub fn thumb_row(&self) -> Option<usize> {
        if !self.needs_scrollbar() || self.visible == 0 {
            return None;
        }
        let max_offset = self.total - self.visible;
        if self.offset == 0 {
            return Some(0);
        }
        if self.offset >= max_offset {
            return Some(self.visible - 1);
        }
        if self.visible <= 2 {
            return None;
        }
        let fraction = self.offset as f64 / max_offset as f64;
        Some((fraction * (self.visible - 3) as f64).round() as usize + 1)
    }

    fn clamp_offset(&mut self) {
        if self.total <= self.visible {
            self.offset = 0;
        } else {
            self.offset = self.offset.min(self.total - self.visible);
        }
    }
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new(0, 5)
    }
}
