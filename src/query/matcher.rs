//! Built-in predicate builder: (field, strategy, needle) to a predicate.
//!
//! The needle is captured by value in a [`StringTest`]; regular expressions
//! are compiled once here, so an invalid pattern fails before any scan.

use crate::dictionary::Entry;
use crate::error::{Error, Result};
use crate::query::field::{any_of, MatchStrategy, WordField};
use regex::Regex;

/// A single string comparison with its needle
#[derive(Debug, Clone)]
pub enum StringTest {
    Prefix(String),
    Suffix(String),
    Substring(String),
    Regexp(Regex),
    Equals(String),
}

impl StringTest {
    /// Build the test for a strategy. Only `Regexp` can fail.
    pub fn new(strategy: MatchStrategy, needle: &str) -> Result<Self> {
        Ok(match strategy {
            MatchStrategy::Prefix => StringTest::Prefix(needle.to_string()),
            MatchStrategy::Suffix => StringTest::Suffix(needle.to_string()),
            MatchStrategy::Substring => StringTest::Substring(needle.to_string()),
            MatchStrategy::Regexp => {
                let re = Regex::new(needle).map_err(|e| Error::pattern(needle, e))?;
                StringTest::Regexp(re)
            }
        })
    }

    /// An empty needle matches everything under every strategy
    #[inline]
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            StringTest::Prefix(needle) => candidate.starts_with(needle.as_str()),
            StringTest::Suffix(needle) => candidate.ends_with(needle.as_str()),
            StringTest::Substring(needle) => candidate.contains(needle.as_str()),
            StringTest::Regexp(re) => re.is_match(candidate),
            StringTest::Equals(needle) => candidate == needle,
        }
    }
}

/// Predicate of the built-in search matrix
#[derive(Debug, Clone)]
pub struct FieldMatcher {
    field: WordField,
    test: StringTest,
}

impl FieldMatcher {
    pub fn new(field: WordField, test: StringTest) -> Self {
        Self { field, test }
    }

    pub fn field(&self) -> WordField {
        self.field
    }

    pub fn test(&self) -> &StringTest {
        &self.test
    }

    pub fn matches(&self, entry: &Entry) -> bool {
        any_of(self.field.locators(), entry, |s| self.test.matches(s))
    }
}

/// Build the predicate for one cell of the (field x strategy) matrix
pub fn build(field: WordField, strategy: MatchStrategy, needle: &str) -> Result<FieldMatcher> {
    let test = StringTest::new(strategy, needle)?;
    Ok(FieldMatcher::new(field, test))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::{Gloss, Translation, Variation};

    fn test(strategy: MatchStrategy, needle: &str) -> StringTest {
        StringTest::new(strategy, needle).unwrap()
    }

    #[test]
    fn test_strategy_semantics() {
        let prefix = test(MatchStrategy::Prefix, "ab");
        assert!(prefix.matches("abc"));
        assert!(!prefix.matches("xab"));

        let suffix = test(MatchStrategy::Suffix, "ab");
        assert!(suffix.matches("xab"));
        assert!(!suffix.matches("abc"));

        let substring = test(MatchStrategy::Substring, "ab");
        assert!(substring.matches("abc"));
        assert!(substring.matches("xab"));
        assert!(!substring.matches("ba"));

        let regexp = test(MatchStrategy::Regexp, "^ab");
        assert!(regexp.matches("abc"));
        assert!(!regexp.matches("xab"));
    }

    #[test]
    fn test_empty_needle_matches_everything() {
        for strategy in MatchStrategy::ALL {
            let t = test(strategy, "");
            assert!(t.matches(""), "{strategy} on empty string");
            assert!(t.matches("anything"), "{strategy} on non-empty string");
        }
    }

    #[test]
    fn test_invalid_regex_is_pattern_error() {
        let err = StringTest::new(MatchStrategy::Regexp, "(unclosed").unwrap_err();
        assert!(matches!(err, Error::Pattern { .. }));
    }

    #[test]
    fn test_regex_metachars_are_literal_for_other_strategies() {
        let t = test(MatchStrategy::Substring, "a.c");
        assert!(t.matches("xa.cx"));
        assert!(!t.matches("abc"));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        assert!(!test(MatchStrategy::Prefix, "Ab").matches("abc"));
    }

    #[test]
    fn test_everything_matches_buried_translation() {
        let mut entry = Entry::with_form(1, "hundo");
        entry.translations.push(Translation {
            label: "noun".into(),
            forms: vec!["canine".into(), "dog".into()],
        });

        let everything = build(WordField::Everything, MatchStrategy::Prefix, "do").unwrap();
        let headword = build(WordField::Headword, MatchStrategy::Prefix, "do").unwrap();
        assert!(everything.matches(&entry));
        assert!(!headword.matches(&entry));
    }

    #[test]
    fn test_everything_covers_glosses_and_variations() {
        let mut entry = Entry::with_form(1, "x");
        entry.glosses.push(Gloss {
            label: "".into(),
            text: "used in poetry".into(),
        });
        entry.variations.push(Variation {
            label: "".into(),
            form: "xoj".into(),
        });

        assert!(build(WordField::Everything, MatchStrategy::Substring, "poetry")
            .unwrap()
            .matches(&entry));
        assert!(build(WordField::Everything, MatchStrategy::Suffix, "oj")
            .unwrap()
            .matches(&entry));
    }

    #[test]
    fn test_field_without_values_never_matches() {
        let entry = Entry::with_form(1, "x");
        let tag = build(WordField::Tag, MatchStrategy::Substring, "").unwrap();
        assert!(!tag.matches(&entry));
    }

    #[test]
    fn test_tag_fields() {
        let mut entry = Entry::with_form(1, "x");
        entry.tags.push("archaic".into());
        entry.translations.push(Translation {
            label: "verb".into(),
            forms: vec![],
        });
        entry.variations.push(Variation {
            label: "past".into(),
            form: "xis".into(),
        });

        assert!(build(WordField::Tag, MatchStrategy::Prefix, "arch").unwrap().matches(&entry));
        assert!(build(WordField::TranslationTag, MatchStrategy::Regexp, "^v.rb$")
            .unwrap()
            .matches(&entry));
        assert!(build(WordField::VariationTag, MatchStrategy::Suffix, "st")
            .unwrap()
            .matches(&entry));
        assert!(!build(WordField::VariationTag, MatchStrategy::Suffix, "is")
            .unwrap()
            .matches(&entry));
    }
}
