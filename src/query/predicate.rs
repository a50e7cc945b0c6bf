use crate::dictionary::Entry;
use crate::error::ScriptRuntimeError;
use crate::query::matcher::FieldMatcher;
use crate::script::{CompiledScript, RawScript};

/// A compiled per-entry filter, from any of the three sources.
///
/// Only raw host predicates can fail; the other two are total.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// Built-in (field x strategy) matcher
    Field(FieldMatcher),
    /// Restricted expression script
    Script(CompiledScript),
    /// Host function, run under the raw-script opt-in
    Raw(RawScript),
}

impl Predicate {
    pub fn evaluate(&self, entry: &Entry) -> Result<bool, ScriptRuntimeError> {
        match self {
            Predicate::Field(matcher) => Ok(matcher.matches(entry)),
            Predicate::Script(script) => Ok(script.matches(entry)),
            Predicate::Raw(raw) => raw.evaluate(entry),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Predicate::Field(_) => "field",
            Predicate::Script(_) => "script",
            Predicate::Raw(_) => "raw",
        }
    }
}

impl From<FieldMatcher> for Predicate {
    fn from(matcher: FieldMatcher) -> Self {
        Predicate::Field(matcher)
    }
}

impl From<CompiledScript> for Predicate {
    fn from(script: CompiledScript) -> Self {
        Predicate::Script(script)
    }
}

impl From<RawScript> for Predicate {
    fn from(raw: RawScript) -> Self {
        Predicate::Raw(raw)
    }
}
