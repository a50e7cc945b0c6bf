//! Lowering of parsed scripts into executable predicates.

use crate::dictionary::Entry;
use crate::error::{Error, Result};
use crate::query::field::{any_of, Locator};
use crate::query::matcher::StringTest;
use crate::script::parser::{parse, Expr, Ordering, StringOp};
use regex::Regex;

/// A script compiled into a predicate tree. Stateless and reentrant.
#[derive(Debug, Clone)]
pub struct CompiledScript {
    source: String,
    root: Node,
}

#[derive(Debug, Clone)]
enum Node {
    Const(bool),
    And(Vec<Node>),
    Or(Vec<Node>),
    Not(Box<Node>),
    Test {
        locators: &'static [Locator],
        test: StringTest,
    },
    Exists(&'static [Locator]),
    Id { op: Ordering, value: i64 },
}

/// Compile a script in the restricted expression language.
///
/// Fails with [`Error::Compile`] for empty or malformed source and with
/// [`Error::Pattern`] for an invalid regular expression literal. Nothing is
/// returned unless the whole script compiled.
pub fn compile(source: &str) -> Result<CompiledScript> {
    let expr = parse(source)?;
    let root = lower(expr)?;

    tracing::debug!(script = source, "compiled script");
    Ok(CompiledScript {
        source: source.to_string(),
        root,
    })
}

fn lower(expr: Expr) -> Result<Node> {
    Ok(match expr {
        Expr::Const(value) => Node::Const(value),
        Expr::And(items) => Node::And(items.into_iter().map(lower).collect::<Result<_>>()?),
        Expr::Or(items) => Node::Or(items.into_iter().map(lower).collect::<Result<_>>()?),
        Expr::Not(inner) => Node::Not(Box::new(lower(*inner)?)),
        Expr::Exists(field) => Node::Exists(field.locators()),
        Expr::IdCompare { op, value } => Node::Id { op, value },
        Expr::Test { field, op, value } => {
            let locators = field.locators();
            let test = match op {
                StringOp::StartsWith => StringTest::Prefix(value),
                StringOp::EndsWith => StringTest::Suffix(value),
                StringOp::Contains => StringTest::Substring(value),
                StringOp::Eq | StringOp::Ne => StringTest::Equals(value),
                StringOp::Matches => {
                    let re = Regex::new(&value).map_err(|e| Error::pattern(&value, e))?;
                    StringTest::Regexp(re)
                }
            };

            let node = Node::Test { locators, test };
            if op == StringOp::Ne {
                Node::Not(Box::new(node))
            } else {
                node
            }
        }
    })
}

impl CompiledScript {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, entry: &Entry) -> bool {
        self.root.eval(entry)
    }
}

impl Node {
    fn eval(&self, entry: &Entry) -> bool {
        match self {
            Node::Const(value) => *value,
            Node::And(nodes) => nodes.iter().all(|n| n.eval(entry)),
            Node::Or(nodes) => nodes.iter().any(|n| n.eval(entry)),
            Node::Not(inner) => !inner.eval(entry),
            Node::Test { locators, test } => any_of(locators, entry, |s| test.matches(s)),
            Node::Exists(locators) => locators.iter().any(|loc| loc.is_present(entry)),
            Node::Id { op, value } => op.holds(entry.id(), *value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::{Headword, Relation, Translation, Variation};

    fn entry() -> Entry {
        let mut entry = Entry::with_form(12, "hundo");
        entry.translations.push(Translation {
            label: "noun".into(),
            forms: vec!["dog".into(), "hound".into()],
        });
        entry.tags.push("animal".into());
        entry.variations.push(Variation {
            label: "plural".into(),
            form: "hundoj".into(),
        });
        entry.relations.push(Relation {
            label: "see".into(),
            target: Headword {
                id: 3,
                form: "kato".into(),
            },
        });
        entry
    }

    fn eval(source: &str) -> bool {
        compile(source).unwrap().matches(&entry())
    }

    #[test]
    fn test_string_operators() {
        assert!(eval("headword startswith 'hu'"));
        assert!(eval("word $= 'do'"));
        assert!(eval("translation contains 'oun'"));
        assert!(eval("translation ~= '^d.g$'"));
        assert!(eval("tag == 'animal'"));
        assert!(!eval("tag == 'anim'"));
    }

    #[test]
    fn test_not_equal_means_no_value_equals() {
        assert!(eval("tag != 'plant'"));
        assert!(!eval("translation != 'dog'"));
    }

    #[test]
    fn test_labels_and_relations() {
        assert!(eval("translation.label == 'noun'"));
        assert!(eval("variation.label startswith 'pl'"));
        assert!(eval("variation endswith 'oj'"));
        assert!(eval("relation == 'kato' and relation.label == 'see'"));
        assert!(!eval("gloss.label"));
    }

    #[test]
    fn test_everything_field() {
        assert!(eval("everything == 'hound'"));
        assert!(!eval("all == 'animal'"));
    }

    #[test]
    fn test_boolean_structure() {
        assert!(eval("tag == 'plant' or word == 'hundo'"));
        assert!(!eval("tag == 'plant' and word == 'hundo'"));
        assert!(eval("not (tag == 'plant')"));
        assert!(eval("true"));
        assert!(!eval("false or not true"));
    }

    #[test]
    fn test_exists() {
        assert!(eval("relation"));
        assert!(!eval("gloss"));
        assert!(eval("word"));
    }

    #[test]
    fn test_id_comparisons() {
        assert!(eval("id == 12"));
        assert!(eval("id > 10 and id <= 12"));
        assert!(!eval("id < 12"));
        assert!(eval("id != 3"));
    }

    #[test]
    fn test_empty_needle_matches_any_value() {
        assert!(eval("word startswith ''"));
        assert!(eval("translation matches ''"));
    }

    #[test]
    fn test_compile_errors() {
        assert!(matches!(compile(""), Err(Error::Compile(_))));
        assert!(matches!(compile("word =="), Err(Error::Compile(_))));
        assert!(matches!(compile("(word"), Err(Error::Compile(_))));
    }

    #[test]
    fn test_deep_nesting_is_compile_error() {
        let max = crate::script::parser::MAX_NESTING;

        let deepest = format!("{}word == 'hundo'", "not ".repeat(max));
        assert_eq!(eval(&deepest), max % 2 == 0);

        let nested = format!("{}tag == 'animal'{}", "(".repeat(max), ")".repeat(max));
        assert!(eval(&nested));

        let too_deep = format!("{}true", "not ".repeat(max + 1));
        assert!(matches!(compile(&too_deep), Err(Error::Compile(e)) if e.offset == max * 4));
        assert!(matches!(compile(&"(".repeat(100_000)), Err(Error::Compile(_))));
    }

    #[test]
    fn test_invalid_regex_literal_is_pattern_error() {
        assert!(matches!(
            compile("word matches '(a'"),
            Err(Error::Pattern { pattern, .. }) if pattern == "(a"
        ));
    }

    #[test]
    fn test_source_is_kept() {
        let script = compile("tag == 'x'").unwrap();
        assert_eq!(script.source(), "tag == 'x'");
    }
}
