//! Error taxonomy for loading dictionaries and running queries.
//!
//! Every variant is recoverable at the query boundary: a failed load drops one
//! file, a failed query leaves the store and the session untouched.

use thiserror::Error;

/// Errors produced by the dictionary store, the predicate builders and the
/// search session.
#[derive(Error, Debug)]
pub enum Error {
    /// One file's content is not valid dictionary data.
    #[error("failed to parse dictionary '{name}': {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// A regular expression given as a needle or inside a script is invalid.
    #[error("invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: Box<regex::Error>,
    },

    /// A script could not be compiled.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// A raw host predicate was requested without opting in.
    #[error("raw script predicates are disabled; enable them explicitly to run host code")]
    RawScriptDisabled,
}

impl Error {
    pub(crate) fn pattern(pattern: &str, source: regex::Error) -> Self {
        Error::Pattern {
            pattern: pattern.to_string(),
            source: Box::new(source),
        }
    }
}

/// Result alias for library operations
pub type Result<T> = std::result::Result<T, Error>;

/// A script source that does not fit the expression grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("compile error at offset {offset}: {message}")]
pub struct CompileError {
    /// Byte offset into the source where the problem was detected
    pub offset: usize,
    pub message: String,
}

impl CompileError {
    pub fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

/// Failure of a raw host predicate on one specific entry.
///
/// Never escapes a scan: the entry is treated as non-matching and the failure
/// is recorded in the search outcome.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ScriptRuntimeError {
    pub message: String,
}

impl ScriptRuntimeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
