//! Colors and styles used by the prompt frame.
//!
//! Named ANSI colors by default so the frame follows the user's terminal
//! palette; any field can be overridden.

use ratatui::style::{Color, Modifier, Style};

/// Color set for a prompt frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Focus marker, active label, scrollbar thumb, search glyph
    pub accent: Color,
    /// Normal text
    pub text: Color,
    /// Unfocused rows, placeholder, box borders
    pub muted: Color,
    /// Validation message and error-phase border
    pub warning: Color,
    /// Cancelled frame
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Cyan,
            text: Color::Reset,
            muted: Color::DarkGray,
            warning: Color::Yellow,
            error: Color::Red,
        }
    }
}

impl Theme {
    pub fn accent(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn text(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn warning(&self) -> Style {
        Style::default().fg(self.warning)
    }

    pub fn error(&self) -> Style {
        Style::default().fg(self.error)
    }

    /// Virtual cursor cell.
    pub fn cursor(&self, base: Style) -> Style {
        base.add_modifier(Modifier::REVERSED)
    }

    /// Query text of a cancelled prompt.
    pub fn cancelled(&self) -> Style {
        self.muted().add_modifier(Modifier::CROSSED_OUT)
    }

    /// Monochrome theme for terminals without color (`NO_COLOR`).
    pub fn monochrome() -> Self {
        Self {
            accent: Color::Reset,
            text: Color::Reset,
            muted: Color::Reset,
            warning: Color::Reset,
            error: Color::Reset,
        }
    }
}
