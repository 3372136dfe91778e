//! Assembles query text for an embedded query engine.
//!
//! [`QueryBuilder`] turns a sequence of typed calls into a filter predicate
//! and a sort/distinct/limit descriptor, joined into the single string the
//! engine parses. Argument values are referenced through `$<pos>`
//! placeholders and bound by the caller.

pub mod error;
pub mod expr;
pub mod macros;
pub mod query;

pub use error::PlanError;
pub use expr::{Field, Operator};
pub use query::*;
