use crate::dictionary::{DictionaryId, ViewResult};
use crate::query::field::{MatchStrategy, WordField};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Parameters of one built-in search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub field: WordField,
    pub strategy: MatchStrategy,
    pub needle: String,
}

impl Query {
    pub fn new(field: WordField, strategy: MatchStrategy, needle: impl Into<String>) -> Self {
        Self {
            field,
            strategy,
            needle: needle.into(),
        }
    }
}

impl Default for Query {
    /// Headword prefix search with an empty needle
    fn default() -> Self {
        Self::new(WordField::Headword, MatchStrategy::Prefix, "")
    }
}

/// A raw predicate failure on one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFailure {
    pub dictionary: DictionaryId,
    pub dictionary_name: Arc<str>,
    pub entry_id: i64,
    pub message: String,
}

/// Ranked results of one scan plus the entries that were skipped on error
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub results: Vec<ViewResult>,
    pub failures: Vec<EntryFailure>,
}

impl SearchOutcome {
    pub fn count(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
