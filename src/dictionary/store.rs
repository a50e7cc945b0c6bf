//! In-memory set of loaded dictionaries.
//!
//! The store is replaced wholesale on every load and only the inclusion flags
//! change afterwards. Searches run against a [`Snapshot`], never against the
//! store itself.

use crate::dictionary::types::{Dictionary, DictionaryId, Entry, OtmDocument};
use crate::error::{Error, Result};
use std::sync::Arc;

/// Arena of dictionaries indexed by [`DictionaryId`]
#[derive(Debug, Default)]
pub struct DictionaryStore {
    dictionaries: Vec<Dictionary>,
    next_id: u32,
}

/// Outcome of [`DictionaryStore::load`]. Each file succeeds or fails on its own.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: Vec<DictionaryId>,
    pub failures: Vec<Error>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Listing row for one loaded dictionary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionarySummary {
    pub id: DictionaryId,
    pub name: String,
    pub entries: usize,
    pub included: bool,
}

/// Read-only view of the store taken before a scan.
///
/// Cloning the dictionaries only bumps reference counts; entries are shared.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    dictionaries: Vec<Dictionary>,
}

impl Snapshot {
    pub fn dictionaries(&self) -> &[Dictionary] {
        &self.dictionaries
    }

    /// Dictionaries whose inclusion flag is set, in load order
    pub fn included(&self) -> impl Iterator<Item = &Dictionary> {
        self.dictionaries.iter().filter(|d| d.included)
    }

    pub fn len(&self) -> usize {
        self.dictionaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dictionaries.is_empty()
    }
}

impl From<Vec<Dictionary>> for Snapshot {
    fn from(dictionaries: Vec<Dictionary>) -> Self {
        Self { dictionaries }
    }
}

impl DictionaryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection with the given `(name, raw text)` files.
    ///
    /// A file that fails to parse is dropped and reported; the others load.
    pub fn load<I, N, T>(&mut self, files: I) -> LoadReport
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<String>,
        T: AsRef<str>,
    {
        self.clear();

        let mut report = LoadReport::default();
        for (name, raw) in files {
            match self.ingest(name, raw.as_ref()) {
                Ok(id) => report.loaded.push(id),
                Err(e) => report.failures.push(e),
            }
        }

        tracing::debug!(
            loaded = report.loaded.len(),
            failed = report.failures.len(),
            "dictionary load finished"
        );
        report
    }

    /// Append one dictionary as its file completes loading.
    ///
    /// Completion order is arrival order, which need not match the order the
    /// files were selected in.
    pub fn ingest(&mut self, name: impl Into<String>, raw: &str) -> Result<DictionaryId> {
        let name = name.into();

        let document: OtmDocument = match serde_json::from_str(raw) {
            Ok(doc) => doc,
            Err(source) => {
                tracing::warn!(dictionary = %name, error = %source, "skipping unparsable dictionary");
                return Err(Error::Parse { name, source });
            }
        };

        let entries: Vec<Arc<Entry>> = document.words.into_iter().map(Arc::new).collect();
        Ok(self.insert(name, entries))
    }

    /// Add already-parsed entries under a name
    pub fn insert(&mut self, name: impl Into<String>, entries: Vec<Arc<Entry>>) -> DictionaryId {
        let id = DictionaryId(self.next_id);
        self.next_id += 1;

        let name: Arc<str> = Arc::from(name.into());
        tracing::info!(dictionary = %name, %id, entries = entries.len(), "loaded dictionary");

        self.dictionaries.push(Dictionary {
            id,
            name,
            entries: entries.into(),
            included: true,
        });
        id
    }

    pub fn clear(&mut self) {
        self.dictionaries.clear();
    }

    /// Toggle one dictionary's membership in future searches.
    /// Returns false when the id is unknown.
    pub fn set_included(&mut self, id: DictionaryId, included: bool) -> bool {
        match self.dictionaries.iter_mut().find(|d| d.id == id) {
            Some(dict) => {
                dict.included = included;
                true
            }
            None => false,
        }
    }

    /// Toggle every dictionary carrying `name`. Returns how many changed.
    pub fn set_included_by_name(&mut self, name: &str, included: bool) -> usize {
        let mut count = 0;
        for dict in self.dictionaries.iter_mut().filter(|d| &*d.name == name) {
            dict.included = included;
            count += 1;
        }
        count
    }

    pub fn get(&self, id: DictionaryId) -> Option<&Dictionary> {
        self.dictionaries.iter().find(|d| d.id == id)
    }

    /// First dictionary with the given display name
    pub fn find_by_name(&self, name: &str) -> Option<&Dictionary> {
        self.dictionaries.iter().find(|d| &*d.name == name)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            dictionaries: self.dictionaries.clone(),
        }
    }

    pub fn summaries(&self) -> Vec<DictionarySummary> {
        self.dictionaries
            .iter()
            .map(|d| DictionarySummary {
                id: d.id,
                name: d.name.to_string(),
                entries: d.len(),
                included: d.included,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.dictionaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dictionaries.is_empty()
    }
}
