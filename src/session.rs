//! Search session: the single entry point a front end drives.
//!
//! The session owns the current query parameters, the active predicate mode
//! and the last result list. Executing reads the store through a snapshot and
//! never mutates it. A failed execution leaves the previous results in place.

use crate::config::AppConfig;
use crate::dictionary::{DictionaryStore, Snapshot, ViewResult};
use crate::error::{CompileError, Error, Result};
use crate::query::{
    matcher, EntryFailure, MatchStrategy, Predicate, Query, SearchExecutor, SearchOutcome,
    WordField,
};
use crate::script::{compile, RawScript};
use serde::{Deserialize, Serialize};

/// Where the predicate for the next execution comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchMode {
    /// Built-in (field x strategy) matrix over the current [`Query`]
    #[default]
    Matrix,
    /// Restricted expression script
    Expression,
    /// Raw host predicate; requires the raw-script opt-in
    Raw,
}

#[derive(Debug, Default)]
pub struct SearchSession {
    query: Query,
    mode: SearchMode,
    script: String,
    raw: Option<RawScript>,
    allow_raw_scripts: bool,
    results: Vec<ViewResult>,
    failures: Vec<EntryFailure>,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &AppConfig) -> Self {
        Self {
            query: Query::new(config.default_field, config.default_match, ""),
            allow_raw_scripts: config.allow_raw_scripts,
            ..Self::default()
        }
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn set_query(&mut self, query: Query) {
        self.query = query;
    }

    pub fn set_field(&mut self, field: WordField) {
        self.query.field = field;
    }

    pub fn set_strategy(&mut self, strategy: MatchStrategy) {
        self.query.strategy = strategy;
    }

    pub fn set_needle(&mut self, needle: impl Into<String>) {
        self.query.needle = needle.into();
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: SearchMode) {
        self.mode = mode;
    }

    pub fn script(&self) -> &str {
        &self.script
    }

    pub fn set_script(&mut self, source: impl Into<String>) {
        self.script = source.into();
    }

    pub fn set_raw_script(&mut self, raw: RawScript) {
        self.raw = Some(raw);
    }

    /// Opt in to running raw host predicates
    pub fn enable_raw_scripts(&mut self) {
        self.allow_raw_scripts = true;
    }

    pub fn raw_scripts_enabled(&self) -> bool {
        self.allow_raw_scripts
    }

    /// Build a fresh predicate for the active mode
    pub fn predicate(&self) -> Result<Predicate> {
        match self.mode {
            SearchMode::Matrix => {
                let q = &self.query;
                Ok(matcher::build(q.field, q.strategy, &q.needle)?.into())
            }
            SearchMode::Expression => Ok(compile(&self.script)?.into()),
            SearchMode::Raw => {
                if !self.allow_raw_scripts {
                    return Err(Error::RawScriptDisabled);
                }
                self.raw
                    .clone()
                    .map(Predicate::from)
                    .ok_or_else(|| CompileError::new(0, "no raw script set").into())
            }
        }
    }

    /// Run the active predicate over the store and replace the results.
    /// Returns the new result count.
    pub fn execute(&mut self, store: &DictionaryStore) -> Result<usize> {
        self.execute_snapshot(&store.snapshot())
    }

    pub fn execute_snapshot(&mut self, snapshot: &Snapshot) -> Result<usize> {
        let predicate = self.predicate()?;
        let SearchOutcome { results, failures } =
            SearchExecutor::new(snapshot).execute_predicate(&predicate);

        tracing::debug!(
            mode = ?self.mode,
            results = results.len(),
            failed = failures.len(),
            "session executed"
        );

        self.results = results;
        self.failures = failures;
        Ok(self.results.len())
    }

    pub fn results(&self) -> &[ViewResult] {
        &self.results
    }

    pub fn count(&self) -> usize {
        self.results.len()
    }

    /// Entries skipped by the last raw-script execution
    pub fn failures(&self) -> &[EntryFailure] {
        &self.failures
    }

    pub fn clear_results(&mut self) {
        self.results.clear();
        self.failures.clear();
    }
}
