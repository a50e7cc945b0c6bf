//! Integration tests for the search engine through the public API.
//!
//! Dictionaries are built from OTM-JSON text so the parse path is exercised
//! together with scanning, ranking and the session.

use otmq::dictionary::DictionaryStore;
use otmq::query::{self, matcher};
use otmq::{
    compile, Error, MatchStrategy, Query, RawScript, ScriptRuntimeError, SearchMode,
    SearchSession, WordField,
};

/// Minimal OTM-JSON document with one translation per word
fn otm(words: &[(i64, &str, &str)]) -> String {
    let words: Vec<String> = words
        .iter()
        .map(|(id, form, translation)| {
            format!(
                r#"{{ "entry": {{ "id": {}, "form": "{}" }},
                      "translations": [{{ "title": "", "forms": ["{}"] }}] }}"#,
                id, form, translation
            )
        })
        .collect();
    format!(r#"{{ "words": [{}] }}"#, words.join(","))
}

fn two_dictionaries() -> DictionaryStore {
    let mut store = DictionaryStore::new();
    let report = store.load(vec![
        ("Dict1", otm(&[(1, "cat", "kato"), (2, "car", "aŭto")])),
        ("Dict2", otm(&[(1, "care", "zorgo")])),
    ]);
    assert!(report.is_clean());
    store
}

fn forms(results: &[otmq::ViewResult]) -> Vec<&str> {
    results.iter().map(|r| r.form()).collect()
}

#[test]
fn test_end_to_end_prefix_across_dictionaries() {
    let store = two_dictionaries();
    let query = Query::new(WordField::Headword, MatchStrategy::Prefix, "ca");
    let outcome = query::run(&query, &store.snapshot()).unwrap();

    assert_eq!(forms(&outcome.results), vec!["car", "care", "cat"]);
}

#[test]
fn test_only_included_dictionaries_contribute() {
    let mut store = two_dictionaries();
    let dict2 = store.find_by_name("Dict2").unwrap().id;
    assert!(store.set_included(dict2, false));

    for field in WordField::ALL {
        for strategy in [MatchStrategy::Prefix, MatchStrategy::Substring, MatchStrategy::Suffix] {
            let outcome = query::run(&Query::new(field, strategy, ""), &store.snapshot()).unwrap();
            assert!(outcome.results.iter().all(|r| r.dictionary != dict2));
        }
    }
}

#[test]
fn test_exclusion_takes_effect_without_reload() {
    let mut store = two_dictionaries();
    let query = Query::new(WordField::Headword, MatchStrategy::Prefix, "ca");

    store.set_included_by_name("Dict1", false);
    let outcome = query::run(&query, &store.snapshot()).unwrap();
    assert_eq!(forms(&outcome.results), vec!["care"]);

    store.set_included_by_name("Dict1", true);
    let outcome = query::run(&query, &store.snapshot()).unwrap();
    assert_eq!(outcome.count(), 3);
}

#[test]
fn test_idempotent_over_unchanged_snapshot() {
    let store = two_dictionaries();
    let snapshot = store.snapshot();
    let query = Query::new(WordField::Everything, MatchStrategy::Substring, "o");

    let first = query::run(&query, &snapshot).unwrap();
    let second = query::run(&query, &snapshot).unwrap();
    assert_eq!(first.results, second.results);
}

#[test]
fn test_ranking_is_stable_on_ties() {
    let mut store = DictionaryStore::new();
    store
        .ingest("fruit", &otm(&[(1, "banana", ""), (2, "apple", ""), (3, "apple", "")]))
        .unwrap();

    let outcome = query::run(&Query::default(), &store.snapshot()).unwrap();
    let ids: Vec<i64> = outcome.results.iter().map(|r| r.entry.id()).collect();
    assert_eq!(forms(&outcome.results), vec!["apple", "apple", "banana"]);
    assert_eq!(ids, vec![2, 3, 1]);
}

#[test]
fn test_strategy_semantics() {
    let mut store = DictionaryStore::new();
    store.ingest("d", &otm(&[(1, "abc", ""), (2, "xab", "")])).unwrap();
    let snapshot = store.snapshot();

    let cases = [
        (MatchStrategy::Prefix, "ab", vec!["abc"]),
        (MatchStrategy::Suffix, "ab", vec!["xab"]),
        (MatchStrategy::Substring, "ab", vec!["abc", "xab"]),
        (MatchStrategy::Regexp, "^ab", vec!["abc"]),
    ];
    for (strategy, needle, expected) in cases {
        let query = Query::new(WordField::Headword, strategy, needle);
        let outcome = query::run(&query, &snapshot).unwrap();
        assert_eq!(forms(&outcome.results), expected, "{} {:?}", strategy, needle);
    }
}

#[test]
fn test_empty_needle_matches_everything() {
    let store = two_dictionaries();
    for strategy in [MatchStrategy::Prefix, MatchStrategy::Suffix, MatchStrategy::Substring] {
        let query = Query::new(WordField::Headword, strategy, "");
        assert_eq!(query::run(&query, &store.snapshot()).unwrap().count(), 3);
    }
}

#[test]
fn test_everything_finds_buried_translation() {
    let mut store = DictionaryStore::new();
    store
        .ingest(
            "eo",
            r#"{ "words": [
                { "entry": { "id": 1, "form": "hundo" },
                  "translations": [
                    { "title": "noun", "forms": ["hound"] },
                    { "title": "noun", "forms": ["canine", "dog"] }
                  ] },
                { "entry": { "id": 2, "form": "kato" } }
            ] }"#,
        )
        .unwrap();

    let headword = Query::new(WordField::Headword, MatchStrategy::Prefix, "dog");
    assert!(query::run(&headword, &store.snapshot()).unwrap().is_empty());

    let everything = Query::new(WordField::Everything, MatchStrategy::Prefix, "dog");
    let outcome = query::run(&everything, &store.snapshot()).unwrap();
    assert_eq!(forms(&outcome.results), vec!["hundo"]);
}

#[test]
fn test_invalid_regex_is_distinct_from_no_results() {
    let store = two_dictionaries();
    let bad = Query::new(WordField::Headword, MatchStrategy::Regexp, "(ca");
    assert!(matches!(query::run(&bad, &store.snapshot()), Err(Error::Pattern { .. })));

    let none = Query::new(WordField::Headword, MatchStrategy::Regexp, "^zz");
    assert!(query::run(&none, &store.snapshot()).unwrap().is_empty());

    assert!(matcher::build(WordField::Headword, MatchStrategy::Regexp, "(ca").is_err());
}

#[test]
fn test_malformed_scripts_fail_before_any_scan() {
    for source in ["", "   ", "word startswith", "word == 'a' and", "(word == 'a'", "frobnicate"] {
        assert!(
            matches!(compile(source), Err(Error::Compile(_))),
            "expected compile error for {:?}",
            source
        );
    }

    let store = two_dictionaries();
    let mut session = SearchSession::new();
    session.set_needle("car");
    session.execute(&store).unwrap();

    session.set_mode(SearchMode::Expression);
    session.set_script("word ==");
    assert!(session.predicate().is_err());
    assert!(matches!(session.execute(&store), Err(Error::Compile(e)) if e.offset == 7));
    assert_eq!(forms(session.results()), vec!["car", "care"]);
}

#[test]
fn test_raw_error_excludes_only_that_entry() {
    let store = two_dictionaries();
    let mut session = SearchSession::new();
    session.enable_raw_scripts();
    session.set_mode(SearchMode::Raw);
    session.set_raw_script(RawScript::from_fn("fussy", |entry| {
        if entry.form() == "cat" {
            Err(ScriptRuntimeError::new("boom"))
        } else {
            Ok(entry.form().starts_with("ca"))
        }
    }));

    assert_eq!(session.execute(&store).unwrap(), 2);
    assert_eq!(forms(session.results()), vec!["car", "care"]);
    assert_eq!(session.failures().len(), 1);
    assert_eq!(session.failures()[0].entry_id, 1);
}

#[test]
fn test_raw_panic_is_contained() {
    let store = two_dictionaries();
    let mut session = SearchSession::new();
    session.enable_raw_scripts();
    session.set_mode(SearchMode::Raw);
    session.set_raw_script(RawScript::from_predicate("panicky", |entry| {
        if entry.form() == "care" {
            panic!("unexpected entry");
        }
        true
    }));

    assert_eq!(session.execute(&store).unwrap(), 2);
    assert!(session.failures()[0].message.contains("unexpected entry"));
}

#[test]
fn test_expression_script_over_tags() {
    let mut store = DictionaryStore::new();
    store
        .ingest(
            "eo",
            r#"{ "words": [
                { "entry": { "id": 1, "form": "iri" }, "tags": ["verb"] },
                { "entry": { "id": 2, "form": "irado" }, "tags": ["noun"] },
                { "entry": { "id": 3, "form": "manĝi" }, "tags": ["verb"] }
            ] }"#,
        )
        .unwrap();

    let mut session = SearchSession::new();
    session.set_mode(SearchMode::Expression);
    session.set_script("tag == 'verb' and not word startswith 'm'");
    session.execute(&store).unwrap();
    assert_eq!(forms(session.results()), vec!["iri"]);

    session.set_script("id >= 2");
    session.execute(&store).unwrap();
    assert_eq!(forms(session.results()), vec!["irado", "manĝi"]);
}

#[test]
fn test_load_reports_per_file_failures() {
    let mut store = DictionaryStore::new();
    let report = store.load(vec![
        ("good.json", otm(&[(1, "kato", "cat")])),
        ("bad.json", "{ not json".to_string()),
        ("empty.json", r#"{ "words": [] }"#.to_string()),
    ]);

    assert_eq!(report.loaded.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert!(matches!(&report.failures[0], Error::Parse { name, .. } if name == "bad.json"));

    let names: Vec<String> = store.summaries().into_iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["good.json", "empty.json"]);
}

#[test]
fn test_reload_replaces_collection() {
    let mut store = two_dictionaries();
    store.load(vec![("Dict3", otm(&[(1, "dog", "hundo")]))]);

    assert_eq!(store.len(), 1);
    let outcome = query::run(&Query::default(), &store.snapshot()).unwrap();
    assert_eq!(forms(&outcome.results), vec!["dog"]);
}

#[test]
fn test_duplicate_names_get_distinct_ids() {
    let mut store = DictionaryStore::new();
    let a = store.ingest("same.json", &otm(&[(1, "a", "")])).unwrap();
    let b = store.ingest("same.json", &otm(&[(1, "b", "")])).unwrap();
    assert_ne!(a, b);

    store.set_included(a, false);
    let outcome = query::run(&Query::default(), &store.snapshot()).unwrap();
    assert_eq!(forms(&outcome.results), vec!["b"]);
}

#[test]
fn test_snapshot_is_isolated_from_later_changes() {
    let mut store = two_dictionaries();
    let snapshot = store.snapshot();
    store.set_included_by_name("Dict1", false);
    store.clear();

    let outcome = query::run(&Query::default(), &snapshot).unwrap();
    assert_eq!(outcome.count(), 3);
}
