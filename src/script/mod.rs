//! Script predicates.
//!
//! Two sources are supported:
//!
//! - [`compile`] turns an expression in a small boolean language into a
//!   [`CompiledScript`] without running any host code. This is the supported
//!   surface.
//! - [`RawScript`] wraps a host function. It is opt-in at the session level.
//!
//! ```
//! use otmq::script::compile;
//!
//! let script = compile("tag == 'verb' and (word startswith 'a' or translation ~= '^go')").unwrap();
//! assert_eq!(script.source(), "tag == 'verb' and (word startswith 'a' or translation ~= '^go')");
//! ```

pub mod compiler;
pub mod lexer;
pub mod parser;
pub mod raw;

pub use compiler::{compile, CompiledScript};
pub use parser::{parse, Expr, ScriptField};
pub use raw::RawScript;
