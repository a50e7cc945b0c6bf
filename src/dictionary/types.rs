use serde::{de, Deserialize, Deserializer, Serialize};
use std::sync::Arc;

/// Opaque handle of a dictionary inside the store.
///
/// Names are display keys only; two files sharing a name get distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DictionaryId(pub(crate) u32);

impl DictionaryId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for DictionaryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Headword reference: `{ id, form }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headword {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: i64,
    #[serde(default)]
    pub form: String,
}

/// Ids are JSON numbers; integral floats such as `1.0` are accepted
fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let n = serde_json::Number::deserialize(deserializer)?;
    if let Some(id) = n.as_i64() {
        return Ok(id);
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => Ok(f as i64),
        _ => Err(de::Error::custom(format!("headword id {} is not an integer", n))),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    #[serde(rename = "title", default)]
    pub label: String,
    #[serde(default)]
    pub forms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gloss {
    #[serde(rename = "title", default)]
    pub label: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variation {
    #[serde(rename = "title", default)]
    pub label: String,
    #[serde(default)]
    pub form: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    #[serde(rename = "title", default)]
    pub label: String,
    #[serde(rename = "entry")]
    pub target: Headword,
}

/// One word record of a dictionary. Immutable once parsed.
///
/// Field names on the wire follow the OTM-JSON layout (`entry`, `contents`,
/// `title`); missing arrays deserialize as empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(rename = "entry")]
    pub headword: Headword,
    #[serde(default)]
    pub translations: Vec<Translation>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "contents", default)]
    pub glosses: Vec<Gloss>,
    #[serde(default)]
    pub variations: Vec<Variation>,
    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl Entry {
    /// Entry with only a headword, used by tests and benches
    pub fn with_form(id: i64, form: impl Into<String>) -> Self {
        Self {
            headword: Headword {
                id,
                form: form.into(),
            },
            translations: Vec::new(),
            tags: Vec::new(),
            glosses: Vec::new(),
            variations: Vec::new(),
            relations: Vec::new(),
        }
    }

    pub fn form(&self) -> &str {
        &self.headword.form
    }

    pub fn id(&self) -> i64 {
        self.headword.id
    }
}

/// Root of an OTM-JSON document. Only `words` is needed to search it.
#[derive(Debug, Deserialize)]
pub(crate) struct OtmDocument {
    #[serde(default)]
    pub words: Vec<Entry>,
}

/// A loaded dictionary. Entries are frozen after load and shared by
/// reference with every result that points at them.
#[derive(Debug, Clone)]
pub struct Dictionary {
    pub id: DictionaryId,
    pub name: Arc<str>,
    pub entries: Arc<[Arc<Entry>]>,
    pub included: bool,
}

impl Dictionary {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One ranked search hit.
#[derive(Debug, Clone)]
pub struct ViewResult {
    pub dictionary: DictionaryId,
    pub dictionary_name: Arc<str>,
    pub entry: Arc<Entry>,
}

impl ViewResult {
    pub fn form(&self) -> &str {
        self.entry.form()
    }
}

impl PartialEq for ViewResult {
    /// Same dictionary and the very same entry record
    fn eq(&self, other: &Self) -> bool {
        self.dictionary == other.dictionary && Arc::ptr_eq(&self.entry, &other.entry)
    }
}

impl Eq for ViewResult {}
