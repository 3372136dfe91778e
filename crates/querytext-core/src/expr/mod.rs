//! Expression types for building predicate clauses.
//!
//! This module contains the building blocks the builder emits: field
//! references and the single-argument operators that compare them.

pub mod field;
pub mod ops;

pub use field::Field;
pub use ops::Operator;
