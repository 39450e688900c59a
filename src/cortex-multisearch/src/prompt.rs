//! The multi-search prompt state machine.
//!
//! Owns the query, drives the match cache, highlight and selection from
//! classified keys, and moves between phases:
//!
//! ```text
//!              edit key                    fetch applied
//!   Active ─────────────────▶ Searching ─────────────────▶ Active
//!     │  ▲                                                   │
//!     │  └──── any key ──── Error ◀── Enter (rejected) ──────┘
//!     │
//!     ├── Enter (accepted) ──▶ Submit   (terminal)
//!     └── Cancel ────────────▶ Cancel   (terminal)
//! ```

use ratatui::text::Text;

use crate::cache::{CacheStats, FetchTicket, MatchCache};
use crate::candidate::{IdentifierMode, MatchSet, ProviderResponse};
use crate::component::{Component, ComponentResult};
use crate::config::PromptConfig;
use crate::error::{ProviderError, Result};
use crate::highlight::Highlight;
use crate::input::QueryInput;
use crate::key::PromptKey;
use crate::provider::{MatchProvider, Validator};
use crate::render::{self, Viewport};
use crate::scroll::ScrollState;
use crate::selection::{Defaults, Selection};

static NO_MATCHES: MatchSet = MatchSet::empty();

/// Top-level lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptPhase {
    /// Accepting input, showing current matches
    #[default]
    Active,
    /// A provider fetch is outstanding
    Searching,
    /// The last submission was rejected; still interactive
    Error,
    /// Aborted by the user
    Cancel,
    /// Value accepted
    Submit,
}

impl PromptPhase {
    /// Cancel and Submit end the prompt.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancel | Self::Submit)
    }
}

/// Immutable snapshot of everything the renderer needs.
#[derive(Debug, Clone, Copy)]
pub struct PromptView<'a> {
    pub phase: PromptPhase,
    pub label: &'a str,
    pub placeholder: &'a str,
    pub input: &'a QueryInput,
    pub matches: &'a MatchSet,
    pub highlight: Highlight,
    pub selection: &'a Selection,
    pub error: Option<&'a str>,
    /// First visible row of the scroll window
    pub scroll_offset: usize,
    /// Configured scroll window size
    pub scroll_rows: usize,
}

/// Interactive multi-select search prompt.
///
/// # Example
///
/// ```rust
/// use cortex_multisearch::prelude::*;
///
/// let config = PromptConfig::builder("Which user?").build().unwrap();
/// let mut prompt = MultiSearchPrompt::new(config, |query: &str| {
///     vec![format!("{query} one"), format!("{query} two")]
/// })
/// .unwrap();
///
/// prompt.handle_key(PromptKey::Char('a'));
/// prompt.handle_key(PromptKey::Next);
/// prompt.handle_key(PromptKey::Space);
///
/// assert_eq!(
///     prompt.handle_key(PromptKey::Enter),
///     ComponentResult::Done(vec!["a one".to_string()])
/// );
/// ```
pub struct MultiSearchPrompt {
    config: PromptConfig,
    input: QueryInput,
    cache: MatchCache,
    provider: Box<dyn MatchProvider>,
    validator: Option<Box<dyn Validator>>,
    highlight: Highlight,
    selection: Selection,
    scroll: ScrollState,
    phase: PromptPhase,
    error: Option<String>,
    /// Leave provider calls to the host instead of fetching inside `handle_key`
    deferred_fetch: bool,
}

impl MultiSearchPrompt {
    /// Create a prompt. Fails if the configuration is invalid.
    pub fn new<P>(config: PromptConfig, provider: P) -> Result<Self>
    where
        P: MatchProvider + 'static,
    {
        config.validate()?;

        let cache = match config.identifier_mode {
            Some(mode) => MatchCache::with_mode(mode),
            None => MatchCache::new(),
        };
        let scroll = ScrollState::new(0, config.scroll);

        Ok(Self {
            config,
            input: QueryInput::new(),
            cache,
            provider: Box::new(provider),
            validator: None,
            highlight: Highlight::none(),
            selection: Selection::new(),
            scroll,
            phase: PromptPhase::Active,
            error: None,
            deferred_fetch: false,
        })
    }

    /// Initial selection. Without a configured identifier mode, keyed
    /// defaults fix the mode to by-key and plain defaults to by-value.
    pub fn with_defaults(mut self, defaults: Defaults) -> Self {
        if self.config.identifier_mode.is_none() {
            let inferred = match &defaults {
                Defaults::None => None,
                Defaults::Values(_) => Some(IdentifierMode::ByValue),
                Defaults::Keyed(_) => Some(IdentifierMode::ByKey),
            };
            if let Some(mode) = inferred {
                tracing::debug!(?mode, "identifier mode fixed by defaults");
                self.cache = MatchCache::with_mode(mode);
            }
        }
        self.selection = Selection::from_defaults(&defaults);
        self
    }

    pub fn with_validator<V>(mut self, validator: V) -> Self
    where
        V: Validator + 'static,
    {
        self.validator = Some(Box::new(validator));
        self
    }

    /// Do not call the provider from `handle_key`.
    ///
    /// Query edits leave the prompt in [`PromptPhase::Searching`]; the host
    /// then renders the searching frame and either calls [`search`] or runs
    /// the provider itself via [`pending_fetch`] / [`complete_fetch`].
    ///
    /// [`search`]: Self::search
    /// [`pending_fetch`]: Self::pending_fetch
    /// [`complete_fetch`]: Self::complete_fetch
    pub fn deferred_fetch(mut self) -> Self {
        self.deferred_fetch = true;
        self
    }

    pub fn config(&self) -> &PromptConfig {
        &self.config
    }

    pub fn phase(&self) -> PromptPhase {
        self.phase
    }

    pub fn query(&self) -> &str {
        self.input.value()
    }

    pub fn highlight(&self) -> Highlight {
        self.highlight
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn identifier_mode(&self) -> Option<IdentifierMode> {
        self.cache.mode()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Selected identifiers in insertion order.
    pub fn value(&self) -> Vec<String> {
        self.selection.value()
    }

    /// Labels of the selection resolvable against the current matches.
    pub fn labels(&self) -> Vec<Option<&str>> {
        self.selection.labels(self.current_matches())
    }

    /// Matches for the current query, fetching on a cache miss.
    pub fn matches(&mut self) -> &MatchSet {
        self.search();
        self.current_matches()
    }

    /// Matches already known for the current query, without fetching.
    pub fn current_matches(&self) -> &MatchSet {
        self.cache.cached().unwrap_or(&NO_MATCHES)
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> PromptView<'_> {
        PromptView {
            phase: self.phase,
            label: &self.config.label,
            placeholder: &self.config.placeholder,
            input: &self.input,
            matches: self.current_matches(),
            highlight: self.highlight,
            selection: &self.selection,
            error: self.error.as_deref(),
            scroll_offset: self.scroll.offset(),
            scroll_rows: self.config.scroll,
        }
    }

    /// Track the terminal height so navigation scrolls the same window the
    /// renderer will draw.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.scroll.set_visible(viewport.scroll_rows(self.config.scroll));
        if let Some(index) = self.highlight.index() {
            self.scroll.ensure_visible(index);
        }
    }

    /// Handle an external cancellation signal.
    pub fn cancel(&mut self) {
        if self.phase.is_terminal() {
            return;
        }
        tracing::debug!(query = self.input.value(), "prompt cancelled");
        self.phase = PromptPhase::Cancel;
    }

    /// Run the provider synchronously if the current query has no cached
    /// result, and leave the searching phase.
    pub fn search(&mut self) {
        if let Some(ticket) = self.pending_fetch() {
            let result = self.provider.fetch(ticket.query());
            self.complete_fetch(ticket, result);
        }
    }

    /// Start a provider call for the current query, if one is needed.
    ///
    /// At most one ticket is outstanding per query generation. When nothing
    /// needs fetching and no ticket is outstanding, the prompt leaves the
    /// searching phase.
    pub fn pending_fetch(&mut self) -> Option<FetchTicket> {
        if self.phase.is_terminal() {
            return None;
        }
        let ticket = self.cache.begin_fetch(self.input.value());
        if ticket.is_none() && self.phase == PromptPhase::Searching && !self.cache.is_fetching() {
            self.phase = PromptPhase::Active;
        }
        ticket
    }

    /// Apply a provider result. Results for an outdated query are dropped
    /// and `false` is returned.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: std::result::Result<ProviderResponse, ProviderError>,
    ) -> bool {
        if !self.cache.complete_fetch(ticket, result) {
            return false;
        }

        let total = self.current_matches().len();
        self.highlight.clear();
        self.scroll.set_total(total);
        self.scroll.scroll_to_top();

        if self.phase == PromptPhase::Searching {
            self.phase = PromptPhase::Active;
        }
        true
    }

    fn begin_search(&mut self) {
        self.cache.invalidate();
        self.highlight.clear();
        self.scroll.set_total(0);
        self.scroll.scroll_to_top();
        self.phase = PromptPhase::Searching;

        if !self.deferred_fetch {
            self.search();
        }
    }

    /// Any input after a rejected submission returns to the active phase.
    fn leave_error(&mut self) {
        if self.phase == PromptPhase::Error {
            self.phase = PromptPhase::Active;
            self.error = None;
        }
    }

    fn edit(&mut self, apply: impl FnOnce(&mut QueryInput)) {
        let before = self.input.value().to_string();
        apply(&mut self.input);
        if self.input.value() != before {
            tracing::trace!(query = self.input.value(), "query changed");
            self.begin_search();
        }
    }

    fn highlight_previous(&mut self) {
        let len = self.current_matches().len();
        self.highlight.move_to_previous(len);
        self.scroll_to_highlight();
    }

    fn highlight_next(&mut self) {
        let len = self.current_matches().len();
        self.highlight.move_to_next(len);
        self.scroll_to_highlight();
    }

    fn scroll_to_highlight(&mut self) {
        if let Some(index) = self.highlight.index() {
            self.scroll.ensure_visible(index);
        }
    }

    fn toggle_highlighted(&mut self, index: usize) {
        let candidate = self
            .current_matches()
            .get(index)
            .cloned()
            .expect("highlight must point into the current match set");
        self.selection.toggle(&candidate);
    }

    fn submit(&mut self) -> ComponentResult<Vec<String>> {
        let value = self.selection.value();

        let rejection = if self.config.required && value.is_empty() {
            Some(self.config.required_message.clone())
        } else {
            self.validator.as_ref().and_then(|v| v.validate(&value))
        };

        if let Some(message) = rejection {
            tracing::debug!(%message, "submission rejected");
            self.error = Some(message);
            self.phase = PromptPhase::Error;
            return ComponentResult::Handled;
        }

        tracing::debug!(selected = value.len(), "prompt submitted");
        self.phase = PromptPhase::Submit;
        ComponentResult::Done(value)
    }
}

impl Component for MultiSearchPrompt {
    type Output = Vec<String>;

    fn handle_key(&mut self, key: PromptKey) -> ComponentResult<Self::Output> {
        if self.phase.is_terminal() {
            tracing::trace!(?key, phase = ?self.phase, "ignoring key after prompt ended");
            return ComponentResult::NotHandled;
        }

        self.leave_error();

        match key {
            PromptKey::Cancel => {
                self.cancel();
                return ComponentResult::Cancelled;
            }
            PromptKey::Enter => return self.submit(),
            PromptKey::Previous => self.highlight_previous(),
            PromptKey::Next => self.highlight_next(),
            PromptKey::Space => match self.highlight.index() {
                Some(index) => self.toggle_highlighted(index),
                None => self.edit(|input| input.insert(' ')),
            },
            PromptKey::Left => {
                self.highlight.clear();
                self.input.move_left();
            }
            PromptKey::Right => {
                self.highlight.clear();
                self.input.move_right();
            }
            PromptKey::Home => {
                self.highlight.clear();
                self.input.move_home();
            }
            PromptKey::End => {
                self.highlight.clear();
                self.input.move_end();
            }
            PromptKey::Backspace => self.edit(QueryInput::backspace),
            PromptKey::Delete => self.edit(QueryInput::delete),
            PromptKey::ClearLine => self.edit(QueryInput::clear),
            PromptKey::Char(c) => self.edit(|input| input.insert(c)),
        }

        ComponentResult::Handled
    }

    fn render(&self, viewport: Viewport) -> Text<'static> {
        render::render(&self.view(), viewport)
    }

    fn handle_paste(&mut self, text: &str) -> bool {
        if self.phase.is_terminal() {
            return false;
        }
        self.leave_error();
        let text: String = text.chars().filter(|c| !c.is_control()).collect();
        self.edit(|input| input.insert_str(&text));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn letters_provider(query: &str) -> Vec<String> {
        ["alpha", "bravo", "charlie", "delta"]
            .iter()
            .filter(|name| name.contains(query))
            .map(|name| name.to_string())
            .collect()
    }

    fn prompt() -> MultiSearchPrompt {
        MultiSearchPrompt::new(PromptConfig::new("Pick"), letters_provider).unwrap()
    }

    fn type_str(prompt: &mut MultiSearchPrompt, text: &str) {
        for c in text.chars() {
            prompt.handle_key(PromptKey::from(c));
        }
    }

    #[test]
    fn test_typing_fetches_and_returns_to_active() {
        let mut prompt = prompt();
        type_str(&mut prompt, "a");
        assert_eq!(prompt.phase(), PromptPhase::Active);
        assert_eq!(prompt.current_matches().len(), 4);

        type_str(&mut prompt, "l");
        assert_eq!(prompt.query(), "al");
        assert_eq!(prompt.current_matches().len(), 1);
    }

    #[test]
    fn test_navigation_on_empty_query_stays_none() {
        let mut prompt = prompt();
        prompt.handle_key(PromptKey::Next);
        assert!(prompt.highlight().is_none());
        prompt.handle_key(PromptKey::Previous);
        assert!(prompt.highlight().is_none());
        assert_eq!(prompt.cache_stats().fetches, 0);
    }

    #[test]
    fn test_space_inserts_when_nothing_highlighted() {
        let mut prompt = prompt();
        type_str(&mut prompt, "a");
        prompt.handle_key(PromptKey::Space);
        assert_eq!(prompt.query(), "a ");
        assert!(prompt.selection().is_empty());
    }

    #[test]
    fn test_space_toggles_highlighted() {
        let mut prompt = prompt();
        type_str(&mut prompt, "a");
        prompt.handle_key(PromptKey::Next);
        prompt.handle_key(PromptKey::Next);
        prompt.handle_key(PromptKey::Space);
        assert_eq!(prompt.value(), vec!["bravo"]);
        assert_eq!(prompt.query(), "a");

        prompt.handle_key(PromptKey::Space);
        assert!(prompt.value().is_empty());
    }

    #[test]
    fn test_query_change_resets_highlight() {
        let mut prompt = prompt();
        type_str(&mut prompt, "a");
        prompt.handle_key(PromptKey::Next);
        assert_eq!(prompt.highlight().index(), Some(0));

        type_str(&mut prompt, "l");
        assert!(prompt.highlight().is_none());
    }

    #[test]
    fn test_left_right_return_focus_to_query() {
        let mut prompt = prompt();
        type_str(&mut prompt, "a");
        prompt.handle_key(PromptKey::Next);
        prompt.handle_key(PromptKey::Left);
        assert!(prompt.highlight().is_none());
        assert_eq!(prompt.view().input.cursor(), 0);
        // Cursor movement does not refetch
        assert_eq!(prompt.cache_stats().fetches, 1);
    }

    #[test]
    fn test_unchanged_text_does_not_invalidate() {
        let mut prompt = prompt();
        type_str(&mut prompt, "a");
        prompt.handle_key(PromptKey::Next);
        prompt.handle_key(PromptKey::Home);
        prompt.handle_key(PromptKey::Backspace);
        assert_eq!(prompt.query(), "a");
        assert_eq!(prompt.cache_stats().fetches, 1);
    }

    #[test]
    fn test_selection_kept_across_queries() {
        let mut prompt = prompt();
        type_str(&mut prompt, "alp");
        prompt.handle_key(PromptKey::Next);
        prompt.handle_key(PromptKey::Space);

        prompt.handle_key(PromptKey::ClearLine);
        type_str(&mut prompt, "del");
        prompt.handle_key(PromptKey::Next);
        prompt.handle_key(PromptKey::Space);

        assert_eq!(prompt.value(), vec!["alpha", "delta"]);
        assert_eq!(prompt.labels(), vec![None, Some("delta")]);
    }

    #[test]
    fn test_required_blocks_empty_submit() {
        let config = PromptConfig::builder("Pick").required(true).build().unwrap();
        let mut prompt = MultiSearchPrompt::new(config, letters_provider).unwrap();

        assert_eq!(prompt.handle_key(PromptKey::Enter), ComponentResult::Handled);
        assert_eq!(prompt.phase(), PromptPhase::Error);
        assert_eq!(prompt.error(), Some("Required."));
    }

    #[test]
    fn test_error_clears_on_next_key() {
        let mut prompt = prompt().with_validator(|value: &[String]| {
            value.is_empty().then(|| "Pick something.".to_string())
        });
        prompt.handle_key(PromptKey::Enter);
        assert_eq!(prompt.phase(), PromptPhase::Error);

        prompt.handle_key(PromptKey::Right);
        assert_eq!(prompt.phase(), PromptPhase::Active);
        assert_eq!(prompt.error(), None);
    }

    #[test]
    fn test_terminal_phases_ignore_keys() {
        let mut prompt = prompt();
        assert_eq!(prompt.handle_key(PromptKey::Cancel), ComponentResult::Cancelled);
        assert_eq!(prompt.phase(), PromptPhase::Cancel);
        assert_eq!(prompt.handle_key(PromptKey::Char('x')), ComponentResult::NotHandled);
        assert_eq!(prompt.query(), "");

        let mut prompt = self::prompt();
        assert_eq!(prompt.handle_key(PromptKey::Enter), ComponentResult::Done(vec![]));
        assert_eq!(prompt.handle_key(PromptKey::Cancel), ComponentResult::NotHandled);
        assert_eq!(prompt.phase(), PromptPhase::Submit);
    }

    #[test]
    fn test_deferred_fetch_stays_searching() {
        let mut prompt = prompt().deferred_fetch();
        type_str(&mut prompt, "a");
        assert_eq!(prompt.phase(), PromptPhase::Searching);
        assert!(prompt.current_matches().is_empty());

        prompt.search();
        assert_eq!(prompt.phase(), PromptPhase::Active);
        assert_eq!(prompt.current_matches().len(), 4);
    }

    #[test]
    fn test_deferred_fetch_discards_stale_ticket() {
        let mut prompt = prompt().deferred_fetch();
        type_str(&mut prompt, "a");
        let stale = prompt.pending_fetch().unwrap();

        type_str(&mut prompt, "l");
        let fresh = prompt.pending_fetch().unwrap();
        assert_ne!(stale.generation(), fresh.generation());

        assert!(!prompt.complete_fetch(stale, Ok(vec!["stale"].into())));
        assert_eq!(prompt.phase(), PromptPhase::Searching);

        assert!(prompt.complete_fetch(fresh, Ok(vec!["alpha"].into())));
        assert_eq!(prompt.phase(), PromptPhase::Active);
        assert_eq!(prompt.current_matches().len(), 1);
    }

    #[test]
    fn test_defaults_fix_identifier_mode() {
        let prompt = prompt().with_defaults(Defaults::keyed([("u1", "User 1")]));
        assert_eq!(prompt.identifier_mode(), Some(IdentifierMode::ByKey));
        assert_eq!(prompt.value(), vec!["u1"]);

        let config = PromptConfig::builder("Pick")
            .identifier_mode(IdentifierMode::ByValue)
            .build()
            .unwrap();
        let prompt = MultiSearchPrompt::new(config, letters_provider)
            .unwrap()
            .with_defaults(Defaults::keyed([("u1", "User 1")]));
        assert_eq!(prompt.identifier_mode(), Some(IdentifierMode::ByValue));
    }

    #[test]
    fn test_paste_inserts_text() {
        let mut prompt = prompt();
        assert!(prompt.handle_paste("ha\n"));
        assert_eq!(prompt.query(), "ha");
    }

    #[test]
    fn test_paste_leaves_error_phase() {
        let config = PromptConfig::builder("Pick").required(true).build().unwrap();
        let mut prompt = MultiSearchPrompt::new(config, letters_provider).unwrap();
        prompt.handle_key(PromptKey::Enter);
        assert_eq!(prompt.error(), Some("Required."));

        assert!(prompt.handle_paste("abc"));
        assert_eq!(prompt.phase(), PromptPhase::Active);
        assert_eq!(prompt.error(), None);
        assert_eq!(prompt.query(), "abc");
    }

    #[test]
    fn test_control_only_paste_keeps_highlight() {
        let mut prompt = prompt();
        type_str(&mut prompt, "a");
        prompt.handle_key(PromptKey::Next);

        assert!(prompt.handle_paste("\n\t"));
        assert_eq!(prompt.query(), "a");
        assert_eq!(prompt.highlight().index(), Some(0));
        assert_eq!(prompt.cache_stats().fetches, 1);
    }

    #[test]
    fn test_pending_fetch_on_empty_query_returns_to_active() {
        let mut prompt = prompt().deferred_fetch();
        type_str(&mut prompt, "a");
        let ticket = prompt.pending_fetch().unwrap();
        assert!(prompt.complete_fetch(ticket, Ok(vec!["alpha"].into())));

        prompt.handle_key(PromptKey::Backspace);
        assert_eq!(prompt.phase(), PromptPhase::Searching);

        assert!(prompt.pending_fetch().is_none());
        assert_eq!(prompt.phase(), PromptPhase::Active);
        assert!(prompt.current_matches().is_empty());
    }

    #[test]
    fn test_provider_called_once_per_query() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let recorded = Rc::clone(&calls);
        let mut prompt = MultiSearchPrompt::new(PromptConfig::new("Pick"), move |q: &str| {
            recorded.borrow_mut().push(q.to_string());
            letters_provider(q)
        })
        .unwrap();

        type_str(&mut prompt, "ab");
        prompt.handle_key(PromptKey::Next);
        prompt.handle_key(PromptKey::Previous);
        prompt.matches();
        prompt.handle_key(PromptKey::Backspace);
        prompt.handle_key(PromptKey::Backspace);

        assert_eq!(*calls.borrow(), vec!["a", "ab", "a"]);
    }

    #[test]
    fn test_scroll_follows_highlight() {
        let config = PromptConfig::builder("Pick").scroll(2).build().unwrap();
        let mut prompt = MultiSearchPrompt::new(config, letters_provider).unwrap();
        prompt.set_viewport(Viewport::new(80, 24));
        type_str(&mut prompt, "a");

        prompt.handle_key(PromptKey::Next);
        prompt.handle_key(PromptKey::Next);
        prompt.handle_key(PromptKey::Next);
        assert_eq!(prompt.view().scroll_offset, 1);

        prompt.handle_key(PromptKey::Previous);
        prompt.handle_key(PromptKey::Previous);
        assert_eq!(prompt.view().scroll_offset, 0);
    }
}
