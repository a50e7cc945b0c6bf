//! Result ordering.
//!
//! Results are ordered by headword form, ascending, comparing raw code
//! points. The sort is stable: equal forms keep their scan order, which is
//! dictionary load order first and entry order within a dictionary second.
//! Dictionary name and entry id are never used as tie breakers.

use crate::dictionary::ViewResult;

/// Sort results in place
pub fn rank_in_place(results: &mut [ViewResult]) {
    // `str` ordering is bytewise on UTF-8, which agrees with code point order
    results.sort_by(|a, b| a.form().cmp(b.form()));
}

/// Sort results, consuming the scan output
pub fn rank(mut results: Vec<ViewResult>) -> Vec<ViewResult> {
    rank_in_place(&mut results);
    results
}
