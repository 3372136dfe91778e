//! Serializable query plans.
//!
//! A [`Plan`] is an ordered list of [`QueryOp`]s, one per builder call. Plans
//! can be written as TOML or JSON and replayed into a fresh [`QueryBuilder`].
//!
//! ```toml
//! [[steps]]
//! op = "compare"
//! field = "age"
//! operator = ">="
//! arg = 1
//!
//! [[steps]]
//! op = "or"
//!
//! [[steps]]
//! op = "is_null"
//! field = "email"
//!
//! [[steps]]
//! op = "limit"
//! count = 10
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{
    error::{PlanError, Result},
    expr::ops::Operator,
    query::{builder::QueryBuilder, connector::Sort},
};

/// One `SORT(...)` key.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SortKey {
    pub field: String,
    #[serde(default)]
    pub order: Sort,
}

/// A single builder call.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum QueryOp {
    Compare {
        field: String,
        operator: Operator,
        arg: u64,
    },
    Between {
        field: String,
        lower: u64,
        upper: u64,
    },
    IsNull { field: String },
    IsNotNull { field: String },
    AlwaysTrue,
    AlwaysFalse,
    BeginGroup,
    EndGroup,
    Or,
    Not,
    Sort { keys: Vec<SortKey> },
    Distinct { fields: Vec<String> },
    Limit { count: u64 },
}

impl QueryOp {
    /// Replays this call on `builder`.
    pub fn apply(&self, builder: &mut QueryBuilder) {
        match self {
            QueryOp::Compare {
                field,
                operator,
                arg,
            } => {
                builder.append(field, *operator, *arg);
            }
            QueryOp::Between {
                field,
                lower,
                upper,
            } => {
                builder.between(field, *lower, *upper);
            }
            QueryOp::IsNull { field } => {
                builder.is_null(field);
            }
            QueryOp::IsNotNull { field } => {
                builder.is_not_null(field);
            }
            QueryOp::AlwaysTrue => {
                builder.always_true();
            }
            QueryOp::AlwaysFalse => {
                builder.always_false();
            }
            QueryOp::BeginGroup => {
                builder.begin_group();
            }
            QueryOp::EndGroup => {
                builder.end_group();
            }
            QueryOp::Or => {
                builder.or();
            }
            QueryOp::Not => {
                builder.not();
            }
            QueryOp::Sort { keys } => {
                builder.sort(keys.iter().map(|key| (key.field.as_str(), key.order)));
            }
            QueryOp::Distinct { fields } => {
                builder.distinct(fields);
            }
            QueryOp::Limit { count } => {
                builder.limit(*count);
            }
        }
    }
}

/// An ordered list of builder calls.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Plan {
    #[serde(default)]
    pub steps: Vec<QueryOp>,
}

impl Plan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn push(&mut self, op: QueryOp) -> &mut Self {
        self.steps.push(op);
        self
    }

    /// Appends a `limit` step unless the plan already has one.
    ///
    /// Returns `true` if a step was added.
    pub fn ensure_limit(&mut self, count: u64) -> bool {
        if self
            .steps
            .iter()
            .any(|step| matches!(step, QueryOp::Limit { .. }))
        {
            return false;
        }
        self.steps.push(QueryOp::Limit { count });
        true
    }

    /// Replays every step into a fresh builder.
    ///
    /// With `strict` unset this is exactly the permissive builder behavior.
    /// With `strict` set, grouping must balance: closing a group that was never
    /// opened fails at that step, and groups still open after the last step
    /// fail the whole plan. Step numbers in errors are 1-based.
    pub fn replay(&self, strict: bool) -> Result<QueryBuilder> {
        debug!("replaying {} plan step(s), strict: {}", self.steps.len(), strict);

        let mut builder = QueryBuilder::new();
        for (idx, step) in self.steps.iter().enumerate() {
            if strict && *step == QueryOp::EndGroup && builder.group_depth() <= 0 {
                return Err(PlanError::UnmatchedEndGroup {
                    step: idx + 1,
                });
            }
            trace!(step = idx + 1, "applying {:?}", step);
            step.apply(&mut builder);
        }

        if strict && builder.group_depth() != 0 {
            return Err(PlanError::UnclosedGroups {
                open: builder.group_depth(),
            });
        }

        Ok(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOML_PLAN: &str = r#"
        [[steps]]
        op = "compare"
        field = "age"
        operator = "greater_than_or_equal"
        arg = 1

        [[steps]]
        op = "or"

        [[steps]]
        op = "begin_group"

        [[steps]]
        op = "compare"
        field = "name"
        operator = "BEGINSWITH[c]"
        arg = 2

        [[steps]]
        op = "is_not_null"
        field = "email"

        [[steps]]
        op = "end_group"

        [[steps]]
        op = "sort"
        keys = [{ field = "age", order = "desc" }, { field = "name" }]

        [[steps]]
        op = "limit"
        count = 5
    "#;

    #[test]
    fn test_toml_plan_replay() {
        let plan = Plan::from_toml_str(TOML_PLAN).unwrap();
        assert_eq!(plan.steps.len(), 8);

        let mut builder = plan.replay(true).unwrap();
        assert_eq!(
            builder.build(),
            "age >= $1 OR (name BEGINSWITH[c] $2 AND email != NULL) SORT(age DESC, name ASC) \
             LIMIT(5)"
        );
    }

    #[test]
    fn test_replay_matches_direct_calls() {
        let plan = Plan::from_toml_str(TOML_PLAN).unwrap();

        let mut direct = QueryBuilder::new();
        direct
            .greater_than_or_equal("age", 1)
            .or()
            .begin_group()
            .begins_with_insensitive("name", 2)
            .is_not_null("email")
            .end_group()
            .sort([("age", Sort::Descending), ("name", Sort::Ascending)])
            .limit(5);

        assert_eq!(plan.replay(false).unwrap().build(), direct.build());
    }

    #[test]
    fn test_json_plan() {
        let plan = Plan::from_json_str(
            r#"{
                "steps": [
                    { "op": "not" },
                    { "op": "between", "field": "x", "lower": 2, "upper": 3 },
                    { "op": "always_false" },
                    { "op": "distinct", "fields": ["x", "y"] }
                ]
            }"#,
        )
        .unwrap();

        let mut builder = plan.replay(false).unwrap();
        assert_eq!(
            builder.build(),
            "NOT (x>=$2 AND x<=$3) AND FALSEPREDICATE DISTINCT(x, y)"
        );
    }

    #[test]
    fn test_empty_plan() {
        let plan = Plan::from_toml_str("").unwrap();
        assert!(plan.steps.is_empty());
        assert_eq!(plan.replay(true).unwrap().build(), "TRUEPREDICATE ");
    }

    #[test]
    fn test_unknown_operator() {
        let err = Plan::from_json_str(
            r#"{ "steps": [{ "op": "compare", "field": "a", "operator": "~=", "arg": 1 }] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, PlanError::JsonError(_)));
        assert!(err.to_string().contains("Unknown operator '~='"));
        assert!(err.to_string().contains("querytext operators"));
    }

    #[test]
    fn test_unknown_operator_in_toml_names_operators_command() {
        let err = Plan::from_toml_str(
            "[[steps]]\nop = \"compare\"\nfield = \"a\"\noperator = \"startswith\"\narg = 1\n",
        )
        .unwrap_err();
        assert!(matches!(err, PlanError::TomlDeError(_)));
        assert!(err.to_string().contains("Unknown operator 'startswith'"));
        assert!(err.to_string().contains("run 'querytext operators'"));
    }

    #[test]
    fn test_unknown_step() {
        let err = Plan::from_toml_str("[[steps]]\nop = \"xor\"\n").unwrap_err();
        assert!(matches!(err, PlanError::TomlDeError(_)));
    }

    #[test]
    fn test_or_connected_plan() {
        let mut plan = Plan::new();
        plan.push(QueryOp::Or).push(QueryOp::AlwaysTrue);

        let builder = plan.replay(true).unwrap();
        assert!(builder.is_or_connected());
        assert_eq!(builder.predicate(), "TRUEPREDICATE");
    }

    #[test]
    fn test_strict_rejects_unmatched_end_group() {
        let mut plan = Plan::new();
        plan.push(QueryOp::AlwaysTrue).push(QueryOp::EndGroup);

        let err = plan.replay(true).unwrap_err();
        assert!(matches!(err, PlanError::UnmatchedEndGroup { step: 2 }));

        let mut builder = plan.replay(false).unwrap();
        assert_eq!(builder.build(), "TRUEPREDICATE) ");
    }

    #[test]
    fn test_strict_rejects_unclosed_groups() {
        let mut plan = Plan::new();
        plan.push(QueryOp::BeginGroup)
            .push(QueryOp::BeginGroup)
            .push(QueryOp::AlwaysTrue)
            .push(QueryOp::EndGroup);

        let err = plan.replay(true).unwrap_err();
        assert!(matches!(err, PlanError::UnclosedGroups { open: 1 }));
        assert!(plan.replay(false).is_ok());
    }

    #[test]
    fn test_ensure_limit() {
        let mut plan = Plan::new();
        plan.push(QueryOp::AlwaysTrue);

        assert!(plan.ensure_limit(20));
        assert!(!plan.ensure_limit(50));
        assert_eq!(plan.replay(false).unwrap().build(), "TRUEPREDICATE LIMIT(20)");
    }
}
