//! Field selectors and the string-bearing locations they read from an entry.
//!
//! Every selector resolves to a fixed set of [`Locator`]s through a lookup
//! table, so adding a field is one table row rather than another branch in
//! every strategy.

use crate::dictionary::Entry;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One kind of string-bearing location inside an [`Entry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locator {
    HeadwordForm,
    TranslationForm,
    TranslationLabel,
    Tag,
    GlossText,
    GlossLabel,
    VariationForm,
    VariationLabel,
    RelationForm,
    RelationLabel,
}

impl Locator {
    /// True if any string at this location satisfies `test`
    pub fn any(self, entry: &Entry, mut test: impl FnMut(&str) -> bool) -> bool {
        match self {
            Locator::HeadwordForm => test(&entry.headword.form),
            Locator::TranslationForm => entry
                .translations
                .iter()
                .any(|t| t.forms.iter().any(|f| test(f))),
            Locator::TranslationLabel => entry.translations.iter().any(|t| test(&t.label)),
            Locator::Tag => entry.tags.iter().any(|t| test(t)),
            Locator::GlossText => entry.glosses.iter().any(|g| test(&g.text)),
            Locator::GlossLabel => entry.glosses.iter().any(|g| test(&g.label)),
            Locator::VariationForm => entry.variations.iter().any(|v| test(&v.form)),
            Locator::VariationLabel => entry.variations.iter().any(|v| test(&v.label)),
            Locator::RelationForm => entry.relations.iter().any(|r| test(&r.target.form)),
            Locator::RelationLabel => entry.relations.iter().any(|r| test(&r.label)),
        }
    }

    /// True if the location holds at least one value
    pub fn is_present(self, entry: &Entry) -> bool {
        match self {
            Locator::HeadwordForm => true,
            _ => self.any(entry, |_| true),
        }
    }
}

/// True if any string at any of `locators` satisfies `test`
pub fn any_of(locators: &[Locator], entry: &Entry, mut test: impl FnMut(&str) -> bool) -> bool {
    locators.iter().any(|loc| loc.any(entry, &mut test))
}

/// Which part of an entry a built-in search looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WordField {
    #[default]
    Headword,
    Translation,
    TranslationTag,
    Tag,
    VariationTag,
    Everything,
}

const FIELD_TABLE: [(WordField, &[Locator]); 6] = [
    (WordField::Headword, &[Locator::HeadwordForm]),
    (WordField::Translation, &[Locator::TranslationForm]),
    (WordField::TranslationTag, &[Locator::TranslationLabel]),
    (WordField::Tag, &[Locator::Tag]),
    (WordField::VariationTag, &[Locator::VariationLabel]),
    (
        WordField::Everything,
        &[
            Locator::HeadwordForm,
            Locator::TranslationForm,
            Locator::GlossText,
            Locator::VariationForm,
        ],
    ),
];

impl WordField {
    pub const ALL: [WordField; 6] = [
        WordField::Headword,
        WordField::Translation,
        WordField::TranslationTag,
        WordField::Tag,
        WordField::VariationTag,
        WordField::Everything,
    ];

    pub fn locators(self) -> &'static [Locator] {
        FIELD_TABLE
            .iter()
            .find(|(field, _)| *field == self)
            .map(|(_, locators)| *locators)
            .unwrap_or(&[])
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WordField::Headword => "headword",
            WordField::Translation => "translation",
            WordField::TranslationTag => "translation-tag",
            WordField::Tag => "tag",
            WordField::VariationTag => "variation-tag",
            WordField::Everything => "everything",
        }
    }
}

impl fmt::Display for WordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WordField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Also accepts the identifiers used by the OTM viewer's search-type list
        match s {
            "headword" | "word" => Ok(WordField::Headword),
            "translation" => Ok(WordField::Translation),
            "translation-tag" | "translationTag" => Ok(WordField::TranslationTag),
            "tag" | "word-tag" | "wordTag" => Ok(WordField::Tag),
            "variation-tag" | "variationTag" => Ok(WordField::VariationTag),
            "everything" | "all" => Ok(WordField::Everything),
            _ => Err(format!("unknown search field '{}'", s)),
        }
    }
}

/// String comparison rule applied to every extracted location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchStrategy {
    Prefix,
    Suffix,
    Regexp,
    #[default]
    Substring,
}

impl MatchStrategy {
    pub const ALL: [MatchStrategy; 4] = [
        MatchStrategy::Prefix,
        MatchStrategy::Suffix,
        MatchStrategy::Regexp,
        MatchStrategy::Substring,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MatchStrategy::Prefix => "prefix",
            MatchStrategy::Suffix => "suffix",
            MatchStrategy::Regexp => "regexp",
            MatchStrategy::Substring => "substring",
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prefix" | "forward" => Ok(MatchStrategy::Prefix),
            "suffix" | "backward" => Ok(MatchStrategy::Suffix),
            "regexp" | "regex" => Ok(MatchStrategy::Regexp),
            "substring" | "partial" | "contains" => Ok(MatchStrategy::Substring),
            _ => Err(format!("unknown match strategy '{}'", s)),
        }
    }
}
