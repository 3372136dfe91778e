//! Connector state carried between builder calls.
//!
//! These tokens are written verbatim as prefixes, so their surrounding spaces
//! are part of the grammar.

use serde::{Deserialize, Serialize};

/// The prefix written before the next predicate clause.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Connector {
    /// No prefix: first clause, or first clause inside a group.
    #[default]
    None,
    And,
    Or,
    Not,
}

impl Connector {
    pub const fn as_str(self) -> &'static str {
        match self {
            Connector::None => "",
            Connector::And => " AND ",
            Connector::Or => " OR ",
            Connector::Not => "NOT ",
        }
    }
}

/// The prefix written before the next descriptor clause.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Separator {
    #[default]
    None,
    Space,
}

impl Separator {
    pub const fn as_str(self) -> &'static str {
        match self {
            Separator::None => "",
            Separator::Space => " ",
        }
    }
}

/// Sort direction for a `SORT(...)` descriptor key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Sort {
    #[default]
    #[serde(rename = "asc", alias = "ascending")]
    Ascending,
    #[serde(rename = "desc", alias = "descending")]
    Descending,
}

impl Sort {
    pub const fn as_str(self) -> &'static str {
        match self {
            Sort::Ascending => "ASC",
            Sort::Descending => "DESC",
        }
    }
}
