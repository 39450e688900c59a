//! Single-slot match cache with query generations.
//!
//! The slot holds the match set for the current query only. Every query
//! mutation bumps the generation and empties the slot; a fetch result is
//! applied only if it was started under the generation that is still current.

use crate::candidate::{IdentifierMode, MatchSet, ProviderResponse};
use crate::error::ProviderError;
use crate::provider::MatchProvider;

/// Handle for an outstanding provider call.
///
/// Hosts that run the provider off the main thread carry the ticket to the
/// worker and hand it back with the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    query: String,
}

impl FetchTicket {
    /// Query generation this fetch belongs to.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Query text to pass to the provider.
    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Counters for cache activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Provider invocations started
    pub fetches: u64,
    /// Provider calls that failed and were replaced by an empty set
    pub failures: u64,
    /// Results discarded because the query changed while they were in flight
    pub stale_discarded: u64,
}

/// Memoizes the provider result for the current query.
#[derive(Debug, Default)]
pub struct MatchCache {
    generation: u64,
    slot: Option<MatchSet>,
    in_flight: Option<u64>,
    mode: Option<IdentifierMode>,
    stats: CacheStats,
}

impl MatchCache {
    /// Creates an empty cache. The identifier mode is fixed by the first
    /// non-empty provider response.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty cache with an already decided identifier mode.
    pub fn with_mode(mode: IdentifierMode) -> Self {
        Self {
            mode: Some(mode),
            ..Self::default()
        }
    }

    /// Identifier mode, once decided.
    pub fn mode(&self) -> Option<IdentifierMode> {
        self.mode
    }

    /// Current query generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Whether a fetch is outstanding for the current generation.
    pub fn is_fetching(&self) -> bool {
        self.in_flight == Some(self.generation)
    }

    /// The cached match set, if one exists for the current query.
    pub fn cached(&self) -> Option<&MatchSet> {
        self.slot.as_ref()
    }

    /// Drop the cached result. Called on every query mutation.
    pub fn invalidate(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.slot = None;
        self.in_flight = None;
        tracing::trace!(generation = self.generation, "match cache invalidated");
    }

    /// Match set for `query`, calling the provider only on a miss.
    ///
    /// An empty query yields an empty set without touching the provider.
    pub fn matches<P>(&mut self, query: &str, provider: &mut P) -> &MatchSet
    where
        P: MatchProvider + ?Sized,
    {
        if self.slot.is_some() {
            self.stats.hits += 1;
        } else if let Some(ticket) = self.begin_fetch(query) {
            let result = provider.fetch(ticket.query());
            self.complete_fetch(ticket, result);
        }
        self.slot.get_or_insert_with(MatchSet::empty)
    }

    /// Start a fetch for `query` under the current generation.
    ///
    /// Returns `None` when no provider call is needed: the slot is already
    /// filled, the query is empty (the slot is filled with an empty set), or
    /// a fetch for this generation is already outstanding.
    pub fn begin_fetch(&mut self, query: &str) -> Option<FetchTicket> {
        if self.slot.is_some() || self.is_fetching() {
            return None;
        }

        self.stats.misses += 1;

        if query.is_empty() {
            self.slot = Some(MatchSet::empty());
            return None;
        }

        self.stats.fetches += 1;
        self.in_flight = Some(self.generation);
        tracing::debug!(generation = self.generation, query, "fetching matches");

        Some(FetchTicket {
            generation: self.generation,
            query: query.to_string(),
        })
    }

    /// Apply the result of a fetch.
    ///
    /// Returns false if the ticket belongs to an older generation, in which
    /// case the result is discarded and the cache is left untouched.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<ProviderResponse, ProviderError>,
    ) -> bool {
        if ticket.generation != self.generation || self.in_flight != Some(ticket.generation) {
            self.stats.stale_discarded += 1;
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                query = %ticket.query,
                "discarding stale match result"
            );
            return false;
        }

        self.in_flight = None;

        let matches = match result {
            Ok(response) => {
                let mode = self.resolve_mode(&response);
                response.into_match_set(mode)
            }
            Err(err) => {
                self.stats.failures += 1;
                let err = err.into_prompt_error(&ticket.query);
                tracing::warn!(error = %err, "match provider failed, showing no results");
                MatchSet::empty()
            }
        };

        tracing::debug!(
            generation = self.generation,
            count = matches.len(),
            "matches cached"
        );
        self.slot = Some(matches);
        true
    }

    fn resolve_mode(&mut self, response: &ProviderResponse) -> IdentifierMode {
        match self.mode {
            Some(mode) => {
                if !response.is_empty() && response.natural_mode() != mode {
                    tracing::debug!(
                        ?mode,
                        shape = ?response.natural_mode(),
                        "normalizing provider response to fixed identifier mode"
                    );
                }
                mode
            }
            None if response.is_empty() => response.natural_mode(),
            None => {
                let mode = response.natural_mode();
                tracing::debug!(?mode, "identifier mode fixed by first response");
                self.mode = Some(mode);
                mode
            }
        }
    }
}
