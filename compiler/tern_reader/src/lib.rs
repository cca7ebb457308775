//! Tern reader: source text to [`ParseTree`](tern_ir::ParseTree).
//!
//! The reader is a single pass over a character stream. Structure (lists,
//! comments, strings, `|...|` regions, escapes) is recognized while
//! scanning; each completed token is handed to the [atom
//! classifiers](classify) to become a literal.
//!
//! Reading never fails. Unbalanced parentheses, unclosed strings and
//! malformed atoms are recorded as [`Problem`](tern_ir::Problem)s on the
//! node at fault, and everything around them is still read.
//!
//! ```
//! use tern_reader::{parse_str, SourceContext};
//!
//! let tree = parse_str(&SourceContext::new("demo"), "(greet :name \"Ada\")");
//! assert!(!tree.has_problems());
//! assert_eq!(tree.print_forms(), "(greet :name \"Ada\")");
//! ```

pub mod classify;
mod escape;
mod number;
mod reader;
mod source;

pub use classify::{classify, Atom, ClassifyError, Classifier};
pub use reader::{parse, parse_str, parse_str_limited, parse_with_config, FUNCTION_MARKER};
pub use source::{ReaderConfig, SourceContext};
