//! Prompt configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::candidate::IdentifierMode;
use crate::error::{PromptError, Result};

/// Default number of rows in the scroll window.
pub const DEFAULT_SCROLL: usize = 5;

/// Default message when a required prompt is submitted empty.
pub const DEFAULT_REQUIRED_MESSAGE: &str = "Required.";

/// Configuration for a multi-search prompt.
///
/// Can be loaded from TOML:
///
/// ```toml
/// label = "Which user should receive the email?"
/// placeholder = "Search..."
/// scroll = 8
/// required = true
/// identifier_mode = "by-key"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Label shown in the box title.
    pub label: String,

    /// Muted text shown while the query is empty.
    pub placeholder: String,

    /// Maximum rows in the scroll window.
    pub scroll: usize,

    /// Whether at least one selection is needed to submit.
    pub required: bool,

    /// Message shown when a required prompt is submitted empty.
    pub required_message: String,

    /// How identifiers are derived.
    /// `None` means: from the defaults' shape, else from the first
    /// non-empty provider response.
    pub identifier_mode: Option<IdentifierMode>,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            label: String::new(),
            placeholder: String::new(),
            scroll: DEFAULT_SCROLL,
            required: false,
            required_message: DEFAULT_REQUIRED_MESSAGE.to_string(),
            identifier_mode: None,
        }
    }
}

impl PromptConfig {
    /// Creates a configuration with the given label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn builder(label: impl Into<String>) -> PromptConfigBuilder {
        PromptConfigBuilder::new(label)
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<()> {
        if self.scroll == 0 {
            return Err(PromptError::invalid_config("scroll must be at least 1"));
        }
        Ok(())
    }
}

/// Builder for [`PromptConfig`].
#[derive(Debug)]
pub struct PromptConfigBuilder {
    config: PromptConfig,
}

impl PromptConfigBuilder {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            config: PromptConfig::new(label),
        }
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.config.placeholder = placeholder.into();
        self
    }

    pub fn scroll(mut self, rows: usize) -> Self {
        self.config.scroll = rows;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.config.required = required;
        self
    }

    /// Require a selection, with a custom message.
    pub fn required_message(mut self, message: impl Into<String>) -> Self {
        self.config.required = true;
        self.config.required_message = message.into();
        self
    }

    pub fn identifier_mode(mut self, mode: IdentifierMode) -> Self {
        self.config.identifier_mode = Some(mode);
        self
    }

    /// Validates and returns the configuration.
    pub fn build(self) -> Result<PromptConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
