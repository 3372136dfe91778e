//! Error types for querytext-core.
//!
//! The assembler itself never fails. These errors come from loading and
//! replaying [`crate::query::plan::Plan`]s.

use miette::Diagnostic;
use thiserror::Error;

/// Plan error type for querytext-core operations.
#[derive(Error, Diagnostic, Debug)]
pub enum PlanError {
    #[error("TOML deserialization error: {0}")]
    #[diagnostic(
        code(querytext::plan::toml_deserialize),
        help("Check your plan file syntax and step structure")
    )]
    TomlDeError(#[from] toml::de::Error),

    #[error("JSON deserialization error: {0}")]
    #[diagnostic(
        code(querytext::plan::json),
        help("Check your plan file syntax and step structure")
    )]
    JsonError(#[from] serde_json::Error),

    #[error("Unknown operator '{0}' (run 'querytext operators' to list supported operators)")]
    #[diagnostic(
        code(querytext::plan::unknown_operator),
        help("Use an operator name such as 'begins_with' or a token such as 'BEGINSWITH'")
    )]
    UnknownOperator(String),

    #[error("Step {step} closes a group that was never opened")]
    #[diagnostic(
        code(querytext::plan::unmatched_end_group),
        help("Remove the extra end_group step or add a matching begin_group")
    )]
    UnmatchedEndGroup { step: usize },

    #[error("{open} group(s) left open at the end of the plan")]
    #[diagnostic(
        code(querytext::plan::unclosed_groups),
        help("Add an end_group step for every begin_group")
    )]
    UnclosedGroups { open: i64 },
}

/// Result type alias for querytext-core operations.
pub type Result<T> = std::result::Result<T, PlanError>;
