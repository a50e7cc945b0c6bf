//! Raw host predicates.
//!
//! A raw script is arbitrary host code run once per entry. It is a trust
//! boundary: the session refuses to run one unless raw scripts were enabled
//! explicitly. A failure (an `Err` or a panic) on one entry excludes that
//! entry only.

use crate::dictionary::Entry;
use crate::error::ScriptRuntimeError;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

type HostFn = dyn Fn(&Entry) -> Result<bool, ScriptRuntimeError> + Send + Sync;

/// Caller-supplied predicate over one entry
#[derive(Clone)]
pub struct RawScript {
    label: String,
    func: Arc<HostFn>,
}

impl RawScript {
    /// Wrap a fallible host function
    pub fn from_fn<F>(label: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Entry) -> Result<bool, ScriptRuntimeError> + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            func: Arc::new(func),
        }
    }

    /// Wrap an infallible host function. Panics are still caught per entry.
    pub fn from_predicate<F>(label: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Entry) -> bool + Send + Sync + 'static,
    {
        Self::from_fn(label, move |entry| Ok(func(entry)))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Run the host function against one entry
    pub fn evaluate(&self, entry: &Entry) -> Result<bool, ScriptRuntimeError> {
        match panic::catch_unwind(AssertUnwindSafe(|| (self.func)(entry))) {
            Ok(result) => result,
            Err(payload) => Err(ScriptRuntimeError::new(panic_message(payload.as_ref()))),
        }
    }
}

impl fmt::Debug for RawScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawScript")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("script panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("script panicked: {}", s)
    } else {
        "script panicked".to_string()
    }
}
