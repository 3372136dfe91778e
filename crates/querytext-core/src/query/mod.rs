//! The query builder.
//!
//! This module turns a sequence of typed calls into the two text clauses the
//! query engine parses: a filter predicate and a descriptor carrying sort,
//! distinct and limit instructions.
//!
//! # Overview
//!
//! - [`QueryBuilder`]: The assembler. Each call appends to one of its two
//!   buffers and updates the connector state for the next call.
//! - [`Connector`], [`Separator`]: The prefixes written before the next
//!   predicate and descriptor clause.
//! - [`Plan`], [`QueryOp`]: A serializable list of builder calls that can be
//!   stored in a file and replayed.
//!
//! # Example
//!
//! ```rust
//! use querytext_core::{QueryBuilder, Sort};
//!
//! let mut query = QueryBuilder::new();
//! query
//!     .equal_to("name", 1)
//!     .or()
//!     .between("age", 2, 3)
//!     .sort([("name", Sort::Ascending)]);
//!
//! assert_eq!(query.build(), "name = $1 OR (age>=$2 AND age<=$3) SORT(name ASC)");
//! ```
//!
//! # Submodules
//!
//! - [`builder`]: Implementation of [`QueryBuilder`].
//! - [`connector`]: Connector, separator and sort order tokens.
//! - [`plan`]: Serializable plans and their replay.

pub mod builder;
pub mod connector;
pub mod plan;

pub use builder::QueryBuilder;
pub use connector::{Connector, Separator, Sort};
pub use plan::{Plan, QueryOp, SortKey};
