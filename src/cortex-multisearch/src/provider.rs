//! Collaborator seams: match providers and submit validators.

use crate::candidate::ProviderResponse;
use crate::error::ProviderError;

/// Supplies candidates for a query.
///
/// Only ever invoked for a non-empty query. May be slow; re-invocation with
/// the same text must be acceptable since results are cached per query.
///
/// Any `FnMut(&str) -> impl Into<ProviderResponse>` is a provider:
///
/// ```rust
/// use cortex_multisearch::provider::MatchProvider;
///
/// let mut provider = |query: &str| vec![format!("{query}!")];
/// let response = provider.fetch("hi").unwrap();
/// assert_eq!(response.len(), 1);
/// ```
pub trait MatchProvider {
    fn fetch(&mut self, query: &str) -> Result<ProviderResponse, ProviderError>;
}

impl<F, R> MatchProvider for F
where
    F: FnMut(&str) -> R,
    R: Into<ProviderResponse>,
{
    fn fetch(&mut self, query: &str) -> Result<ProviderResponse, ProviderError> {
        Ok(self(query).into())
    }
}

/// Adapter for providers that can fail.
pub struct Fallible<F>(pub F);

/// Wrap a fallible closure as a [`MatchProvider`].
pub fn fallible<F, R>(f: F) -> Fallible<F>
where
    F: FnMut(&str) -> Result<R, ProviderError>,
    R: Into<ProviderResponse>,
{
    Fallible(f)
}

impl<F, R> MatchProvider for Fallible<F>
where
    F: FnMut(&str) -> Result<R, ProviderError>,
    R: Into<ProviderResponse>,
{
    fn fetch(&mut self, query: &str) -> Result<ProviderResponse, ProviderError> {
        (self.0)(query).map(Into::into)
    }
}

/// Checks the prompt value on submit.
///
/// Returning a message rejects the submission and puts the prompt into its
/// error phase.
pub trait Validator {
    fn validate(&self, value: &[String]) -> Option<String>;
}

impl<F> Validator for F
where
    F: Fn(&[String]) -> Option<String>,
{
    fn validate(&self, value: &[String]) -> Option<String> {
        self(value)
    }
}
