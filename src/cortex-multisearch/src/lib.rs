//! # Cortex Multisearch
//!
//! An interactive terminal prompt that lets a user type a query, browse the
//! candidates an external provider returns for it, and toggle any number of
//! them into an ordered selection.
//!
//! The crate is the prompt core: it owns no terminal. A host feeds it
//! classified keys and draws the frames it renders.
//!
//! ## Quick Start
//!
//! ```rust
//! use cortex_multisearch::prelude::*;
//! use cortex_multisearch::demo;
//!
//! let config = PromptConfig::builder(demo::USERS_LABEL)
//!     .placeholder("Search...")
//!     .build()
//!     .unwrap();
//! let mut prompt = MultiSearchPrompt::new(config, demo::users_provider)
//!     .unwrap()
//!     .with_validator(demo::reject_user_zero);
//!
//! for c in "abcde".chars() {
//!     prompt.handle_key(PromptKey::Char(c));
//! }
//! prompt.handle_key(PromptKey::Next);
//! prompt.handle_key(PromptKey::Space);
//!
//! let frame = prompt.render(Viewport::new(80, 24));
//! assert!(to_plain_lines(&frame)[2].contains("› ◼ User 5"));
//!
//! assert_eq!(
//!     prompt.handle_key(PromptKey::Enter),
//!     ComponentResult::Done(vec!["User 5".to_string()])
//! );
//! ```
//!
//! ## Architecture
//!
//! ```text
//!   host key loop ──▶ PromptKey ──▶ MultiSearchPrompt ──▶ render() ──▶ host
//!                                    │      │      │
//!                              MatchCache Highlight Selection
//!                                    │
//!                              MatchProvider
//! ```
//!
//! - [`cache`]: single-slot memo of the provider result for the current query
//! - [`highlight`]: which match row has focus
//! - [`selection`]: ordered set of chosen identifiers
//! - [`prompt`]: phases and key dispatch
//! - [`render`]: frames sized to the terminal

pub mod cache;
pub mod candidate;
pub mod component;
pub mod config;
pub mod demo;
pub mod error;
pub mod highlight;
pub mod input;
pub mod key;
pub mod prompt;
pub mod provider;
pub mod render;
pub mod scroll;
pub mod selection;
pub mod theme;

/// Commonly used types and traits for quick imports.
///
/// ```rust
/// use cortex_multisearch::prelude::*;
/// ```
pub mod prelude {
    pub use crate::cache::{CacheStats, FetchTicket, MatchCache};
    pub use crate::candidate::{Candidate, IdentifierMode, MatchSet, ProviderResponse};
    pub use crate::component::{Component, ComponentResult};
    pub use crate::config::{PromptConfig, PromptConfigBuilder};
    pub use crate::error::{PromptError, ProviderError};
    pub use crate::highlight::Highlight;
    pub use crate::key::PromptKey;
    pub use crate::prompt::{MultiSearchPrompt, PromptPhase, PromptView};
    pub use crate::provider::{MatchProvider, Validator, fallible};
    pub use crate::render::{Renderer, Viewport, to_plain_lines};
    pub use crate::selection::{Defaults, Selection};
    pub use crate::theme::Theme;
}

/// Cortex Multisearch version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
