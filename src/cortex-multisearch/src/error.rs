//! Error types for the multi-search prompt.

/// Result type alias for prompt operations.
pub type Result<T> = std::result::Result<T, PromptError>;

/// Errors that can occur while configuring or driving a prompt.
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    /// The match provider failed for a query.
    #[error("Match provider failed for query '{query}': {message}")]
    Provider { query: String, message: String },

    /// The prompt configuration is not usable.
    #[error("Invalid prompt configuration: {0}")]
    InvalidConfig(String),

    /// The configuration file could not be parsed.
    #[error("Failed to parse prompt configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// I/O error while reading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PromptError {
    /// Creates a new `Provider` error.
    pub fn provider(query: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            query: query.into(),
            message: message.into(),
        }
    }

    /// Creates a new `InvalidConfig` error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }
}

/// Failure reported by a [`MatchProvider`](crate::provider::MatchProvider).
///
/// Kept separate from [`PromptError`] so providers do not need to know about
/// configuration or I/O failures of the prompt itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ProviderError(pub String);

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// Attach the query that was being fetched.
    pub fn into_prompt_error(self, query: &str) -> PromptError {
        PromptError::provider(query, self.0)
    }
}
