//! Candidates, match sets and identifier modes.

use serde::{Deserialize, Serialize};

/// How candidate identifiers are derived.
///
/// Decided once per prompt and never re-derived from the shape of later
/// provider responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdentifierMode {
    /// The label text is the identifier.
    ByValue,
    /// The provider supplies an explicit key per label.
    ByKey,
}

/// One searchable option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Identifier that ends up in the prompt value
    pub id: String,
    /// Display label
    pub label: String,
}

impl Candidate {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }

    /// A candidate whose identifier is its own label.
    pub fn plain(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            id: label.clone(),
            label,
        }
    }
}

/// Raw result of a provider call, before an identifier mode is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderResponse {
    /// Plain ordered labels.
    List(Vec<String>),
    /// Ordered `(key, label)` pairs.
    Keyed(Vec<(String, String)>),
}

impl ProviderResponse {
    pub fn empty() -> Self {
        Self::List(Vec::new())
    }

    pub fn len(&self) -> usize {
        match self {
            Self::List(items) => items.len(),
            Self::Keyed(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The mode this response's shape suggests.
    pub fn natural_mode(&self) -> IdentifierMode {
        match self {
            Self::List(_) => IdentifierMode::ByValue,
            Self::Keyed(_) => IdentifierMode::ByKey,
        }
    }

    /// Resolve identifiers under `mode`.
    ///
    /// A keyed response in by-value mode uses its labels as identifiers; a
    /// plain list in by-key mode keys each label by itself.
    pub fn into_match_set(self, mode: IdentifierMode) -> MatchSet {
        let candidates = match (self, mode) {
            (Self::List(labels), _) => labels.into_iter().map(Candidate::plain).collect(),
            (Self::Keyed(pairs), IdentifierMode::ByKey) => pairs
                .into_iter()
                .map(|(key, label)| Candidate::new(key, label))
                .collect(),
            (Self::Keyed(pairs), IdentifierMode::ByValue) => pairs
                .into_iter()
                .map(|(_, label)| Candidate::plain(label))
                .collect(),
        };
        MatchSet { candidates }
    }
}

impl From<Vec<String>> for ProviderResponse {
    fn from(labels: Vec<String>) -> Self {
        Self::List(labels)
    }
}

impl From<Vec<&str>> for ProviderResponse {
    fn from(labels: Vec<&str>) -> Self {
        Self::List(labels.into_iter().map(String::from).collect())
    }
}

impl From<Vec<(String, String)>> for ProviderResponse {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self::Keyed(pairs)
    }
}

impl From<Vec<(&str, &str)>> for ProviderResponse {
    fn from(pairs: Vec<(&str, &str)>) -> Self {
        Self::Keyed(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

/// Ordered candidates for the current query.
///
/// Replaced wholesale on every fetch; never merged with a previous set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet {
    candidates: Vec<Candidate>,
}

impl MatchSet {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }

    pub const fn empty() -> Self {
        Self {
            candidates: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Candidate> {
        self.candidates.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }

    /// Label for an identifier, if it is part of this set.
    pub fn label_of(&self, id: &str) -> Option<&str> {
        self.candidates
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.label.as_str())
    }
}

impl<'a> IntoIterator for &'a MatchSet {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}
