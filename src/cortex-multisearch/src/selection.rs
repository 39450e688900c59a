//! Ordered multi-selection, independent of the current match set.

use indexmap::IndexMap;

use crate::candidate::{Candidate, MatchSet};

/// Caller-supplied initial selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Defaults {
    #[default]
    None,
    /// Plain identifiers, which double as labels.
    Values(Vec<String>),
    /// `(key, label)` pairs.
    Keyed(Vec<(String, String)>),
}

impl Defaults {
    pub fn values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Values(values.into_iter().map(Into::into).collect())
    }

    pub fn keyed<I, K, L>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, L)>,
        K: Into<String>,
        L: Into<String>,
    {
        Self::Keyed(
            pairs
                .into_iter()
                .map(|(k, l)| (k.into(), l.into()))
                .collect(),
        )
    }
}

/// Selected identifiers in insertion order.
///
/// Each identifier remembers the label it was selected with so it can still
/// be displayed after the query moves on. Identifiers are never pruned when
/// the match set changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    entries: IndexMap<String, String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_defaults(defaults: &Defaults) -> Self {
        let mut selection = Self::new();
        match defaults {
            Defaults::None => {}
            Defaults::Values(values) => {
                for value in values {
                    selection.insert(value.clone(), value.clone());
                }
            }
            Defaults::Keyed(pairs) => {
                for (key, label) in pairs {
                    selection.insert(key.clone(), label.clone());
                }
            }
        }
        selection
    }

    fn insert(&mut self, id: String, label: String) {
        self.entries.entry(id).or_insert(label);
    }

    /// Remove the candidate if selected, otherwise append it.
    ///
    /// Returns true if the candidate is selected afterwards.
    pub fn toggle(&mut self, candidate: &Candidate) -> bool {
        if self.entries.shift_remove(&candidate.id).is_some() {
            tracing::trace!(id = %candidate.id, "deselected");
            false
        } else {
            self.entries
                .insert(candidate.id.clone(), candidate.label.clone());
            tracing::trace!(id = %candidate.id, "selected");
            true
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Selected identifiers in insertion order.
    pub fn value(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Labels of selected identifiers resolvable against `matches`.
    ///
    /// Selections made under an earlier query that are not part of the
    /// current matches yield `None`.
    pub fn labels<'a>(&'a self, matches: &'a MatchSet) -> Vec<Option<&'a str>> {
        self.entries.keys().map(|id| matches.label_of(id)).collect()
    }

    /// Display label for every selected identifier: the current match label
    /// when resolvable, else the label it was selected with.
    pub fn display_labels<'a>(&'a self, matches: &'a MatchSet) -> Vec<&'a str> {
        self.entries
            .iter()
            .map(|(id, remembered)| matches.label_of(id).unwrap_or(remembered.as_str()))
            .collect()
    }
}
