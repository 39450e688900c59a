//! Keyboard focus over the match list.
//!
//! Navigation bounces through "none" (focus on the query text) between the
//! last and first candidate in both directions instead of wrapping straight
//! around.

/// Focused candidate index, or `None` when focus is on the query text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Highlight(Option<usize>);

impl Highlight {
    pub fn none() -> Self {
        Self(None)
    }

    pub fn at(index: usize) -> Self {
        Self(Some(index))
    }

    pub fn index(&self) -> Option<usize> {
        self.0
    }

    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }

    /// Return focus to the query text.
    pub fn clear(&mut self) {
        self.0 = None;
    }

    /// none → last, 0 → none, i → i - 1.
    pub fn move_to_previous(&mut self, len: usize) {
        self.0 = match self.0 {
            _ if len == 0 => None,
            None => Some(len - 1),
            Some(0) => None,
            Some(i) => Some(i - 1),
        };
    }

    /// none → 0, last → none, i → i + 1.
    pub fn move_to_next(&mut self, len: usize) {
        self.0 = match self.0 {
            _ if len == 0 => None,
            None => Some(0),
            Some(i) if i + 1 >= len => None,
            Some(i) => Some(i + 1),
        };
    }

    /// Whether the index is valid for a match set of `len` entries.
    pub fn is_within(&self, len: usize) -> bool {
        self.0.is_none_or(|i| i < len)
    }
}
