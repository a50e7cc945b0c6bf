//! # otmq - OTM-JSON dictionary search
//!
//! otmq loads one or more dictionaries in the OTM-JSON format and searches
//! them with a linear scan. Hits from every included dictionary are merged
//! into one list ordered by headword.
//!
//! ## Architecture
//!
//! - [`dictionary`] - Entry model, OTM-JSON parsing and the dictionary store
//! - [`query`] - Field extraction, match strategies, the scan and ranking
//! - [`script`] - Boolean expression scripts and opt-in raw host predicates
//! - [`session`] - Query state and last results for a front end
//! - [`output`] - Terminal and JSON result formatting
//! - [`config`] - Persisted user defaults
//!
//! ## Quick Start
//!
//! ```
//! use otmq::{DictionaryStore, MatchStrategy, SearchSession, WordField};
//!
//! let mut store = DictionaryStore::new();
//! store
//!     .ingest("eo.json", r#"{ "words": [
//!         { "entry": { "id": 1, "form": "kato" },
//!           "translations": [{ "title": "noun", "forms": ["cat"] }] },
//!         { "entry": { "id": 2, "form": "hundo" },
//!           "translations": [{ "title": "noun", "forms": ["dog"] }] }
//!     ] }"#)
//!     .unwrap();
//!
//! let mut session = SearchSession::new();
//! session.set_field(WordField::Translation);
//! session.set_strategy(MatchStrategy::Substring);
//! session.set_needle("do");
//! session.execute(&store).unwrap();
//!
//! assert_eq!(session.results()[0].form(), "hundo");
//! ```

pub mod config;
pub mod dictionary;
pub mod error;
pub mod output;
pub mod query;
pub mod script;
pub mod session;

pub use config::AppConfig;
pub use dictionary::{DictionaryId, DictionaryStore, Entry, Snapshot, ViewResult};
pub use error::{CompileError, Error, Result, ScriptRuntimeError};
pub use query::{MatchStrategy, Query, SearchOutcome, WordField};
pub use script::{compile, RawScript};
pub use session::{SearchMode, SearchSession};
