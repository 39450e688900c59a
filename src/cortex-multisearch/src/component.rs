//! Core Component trait and types.
//!
//! A prompt is driven one key at a time by the host's key loop and
//! rendered into a text frame sized to the terminal.

use ratatui::text::Text;

use crate::key::PromptKey;
use crate::render::Viewport;

/// Result of handling a key event in a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentResult<T = ()> {
    /// Component handled the event, continue displaying
    Handled,
    /// Component did not handle the event
    NotHandled,
    /// Component completed with a value
    Done(T),
    /// Component was cancelled
    Cancelled,
}

impl<T> ComponentResult<T> {
    /// Returns true if the component is done (completed or cancelled).
    pub fn is_done(&self) -> bool {
        matches!(self, ComponentResult::Done(_) | ComponentResult::Cancelled)
    }
}

/// Interface shared by prompt components.
pub trait Component {
    /// The type of value this component produces when completed.
    type Output;

    /// Handle one classified key.
    fn handle_key(&mut self, key: PromptKey) -> ComponentResult<Self::Output>;

    /// Render the current state into a frame that fits `viewport`.
    fn render(&self, viewport: Viewport) -> Text<'static>;

    /// Handle pasted text. Returns true if handled.
    fn handle_paste(&mut self, _text: &str) -> bool {
        false
    }
}
