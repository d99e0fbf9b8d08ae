//! Path expression engine.
//!
//! Addresses a location inside a nested JSON-like value with a dotted,
//! bracketed path such as `.a.b[2:5].c`, reads it, or writes at it.
//!
//! ```text
//! path    := "."? segment ("." segment)*
//! segment := key? bracket*          (a key, one or more brackets, or both)
//! bracket := "[" int "]" | "[" int? ":" int? "]"
//! int     := "-"? digit+
//! ```
//!
//! Slices follow Python semantics (half-open, clamped, negative bounds count
//! from the end). Bounds are plain integer literals; nothing is evaluated.

pub mod types;
pub mod parse;
pub mod resolve;
pub mod literal;
pub mod document;

pub use types::{IndexFault, PathError, PathExpression, PathStep};
pub use resolve::{resolve, resolve_and_write, write};
pub use literal::parse_literal;
pub use document::Document;
