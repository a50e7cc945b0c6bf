use crate::dictionary::{Dictionary, Snapshot, ViewResult};
use crate::error::Result;
use crate::query::matcher;
use crate::query::predicate::Predicate;
use crate::query::ranker;
use crate::query::types::{EntryFailure, Query, SearchOutcome};
use std::sync::Arc;

/// Query executor over one store snapshot.
///
/// Every search is a linear scan of the included dictionaries; there is no
/// index. A scan never suspends and has no timeout, so a pathological regular
/// expression blocks the caller for as long as it takes.
pub struct SearchExecutor<'a> {
    snapshot: &'a Snapshot,
}

impl<'a> SearchExecutor<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self { snapshot }
    }

    /// Build the matrix predicate for `query` and run it
    pub fn execute(&self, query: &Query) -> Result<SearchOutcome> {
        let predicate = Predicate::from(matcher::build(query.field, query.strategy, &query.needle)?);
        let outcome = self.execute_predicate(&predicate);

        tracing::debug!(
            field = %query.field,
            strategy = %query.strategy,
            needle = %query.needle,
            results = outcome.count(),
            "search finished"
        );
        Ok(outcome)
    }

    /// Run an already compiled predicate and rank the hits
    pub fn execute_predicate(&self, predicate: &Predicate) -> SearchOutcome {
        let mut outcome = SearchOutcome::default();

        for dict in self.snapshot.included() {
            Self::scan(dict, predicate, &mut outcome);
        }

        ranker::rank_in_place(&mut outcome.results);

        if !outcome.failures.is_empty() {
            tracing::warn!(
                predicate = predicate.kind(),
                failed = outcome.failures.len(),
                "entries skipped after script errors"
            );
        }
        outcome
    }

    /// Append matches of one dictionary in entry order
    fn scan(dict: &Dictionary, predicate: &Predicate, outcome: &mut SearchOutcome) {
        for entry in dict.entries.iter() {
            match predicate.evaluate(entry) {
                Ok(true) => outcome.results.push(ViewResult {
                    dictionary: dict.id,
                    dictionary_name: Arc::clone(&dict.name),
                    entry: Arc::clone(entry),
                }),
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(
                        dictionary = %dict.name,
                        entry = entry.id(),
                        error = %e,
                        "script failed on entry"
                    );
                    outcome.failures.push(EntryFailure {
                        dictionary: dict.id,
                        dictionary_name: Arc::clone(&dict.name),
                        entry_id: entry.id(),
                        message: e.message,
                    });
                }
            }
        }
    }
}

/// Run a built-in query against a snapshot
pub fn run(query: &Query, snapshot: &Snapshot) -> Result<SearchOutcome> {
    SearchExecutor::new(snapshot).execute(query)
}
