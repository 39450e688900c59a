//! Key classification.
//!
//! The host's key loop turns raw terminal events into one [`PromptKey`] per
//! call; the prompt never looks at raw escape sequences.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// A discrete key as understood by the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKey {
    /// Up arrow, Shift-Tab, Ctrl-P
    Previous,
    /// Down arrow, Tab, Ctrl-N
    Next,
    Space,
    Enter,
    Left,
    Right,
    Home,
    End,
    Backspace,
    Delete,
    /// Ctrl-U
    ClearLine,
    Char(char),
    /// Ctrl-C, Esc
    Cancel,
}

impl PromptKey {
    /// Classify a crossterm key event. Returns `None` for keys the prompt
    /// ignores, including key releases.
    pub fn from_key_event(key: KeyEvent) -> Option<Self> {
        if key.kind == KeyEventKind::Release {
            return None;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        let classified = match key.code {
            KeyCode::Char('c') if ctrl && !alt => Self::Cancel,
            KeyCode::Char('p') if ctrl && !alt => Self::Previous,
            KeyCode::Char('n') if ctrl && !alt => Self::Next,
            KeyCode::Char('u') if ctrl && !alt => Self::ClearLine,
            // Ctrl+Alt is AltGr on Windows and produces printable characters
            KeyCode::Char(_) if ctrl != alt => return None,
            KeyCode::Char(' ') => Self::Space,
            KeyCode::Char(c) => Self::Char(c),
            KeyCode::Up | KeyCode::BackTab => Self::Previous,
            KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => Self::Previous,
            KeyCode::Down | KeyCode::Tab => Self::Next,
            KeyCode::Enter => Self::Enter,
            KeyCode::Left => Self::Left,
            KeyCode::Right => Self::Right,
            KeyCode::Home => Self::Home,
            KeyCode::End => Self::End,
            KeyCode::Backspace => Self::Backspace,
            KeyCode::Delete => Self::Delete,
            KeyCode::Esc => Self::Cancel,
            _ => return None,
        };
        Some(classified)
    }
}

impl From<char> for PromptKey {
    fn from(c: char) -> Self {
        if c == ' ' { Self::Space } else { Self::Char(c) }
    }
}
