//! Dictionary data model and the store holding loaded dictionaries.

pub mod store;
pub mod types;

pub use store::{DictionaryStore, DictionarySummary, LoadReport, Snapshot};
pub use types::{
    Dictionary, DictionaryId, Entry, Gloss, Headword, Relation, Translation, Variation, ViewResult,
};
