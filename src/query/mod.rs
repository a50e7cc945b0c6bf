pub mod executor;
pub mod field;
pub mod matcher;
pub mod predicate;
pub mod ranker;
pub mod types;

pub use executor::{run, SearchExecutor};
pub use field::{Locator, MatchStrategy, WordField};
pub use matcher::{build, FieldMatcher, StringTest};
pub use predicate::Predicate;
pub use ranker::rank;
pub use types::{EntryFailure, Query, SearchOutcome};
