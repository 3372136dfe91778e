//! Single-argument comparison operators.
//!
//! Every operator here renders as `field OP $pos`; the variants differ only in
//! the literal token placed between the field and the placeholder.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// A single-argument operator and its literal token.
///
/// Case-insensitive variants carry a `[c]` suffix directly after the token,
/// with no space before it.
///
/// Plans may name an operator either by its `snake_case` variant name or by
/// its literal token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Operator {
    Equal,
    NotEqual,
    EqualInsensitive,
    NotEqualInsensitive,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    BeginsWith,
    BeginsWithInsensitive,
    EndsWith,
    EndsWithInsensitive,
    Like,
    LikeInsensitive,
    Contains,
    ContainsInsensitive,
}

impl Operator {
    /// All operators, in the order they are listed to users.
    pub const ALL: [Operator; 16] = [
        Operator::Equal,
        Operator::NotEqual,
        Operator::EqualInsensitive,
        Operator::NotEqualInsensitive,
        Operator::GreaterThan,
        Operator::GreaterThanOrEqual,
        Operator::LessThan,
        Operator::LessThanOrEqual,
        Operator::BeginsWith,
        Operator::BeginsWithInsensitive,
        Operator::EndsWith,
        Operator::EndsWithInsensitive,
        Operator::Like,
        Operator::LikeInsensitive,
        Operator::Contains,
        Operator::ContainsInsensitive,
    ];

    /// Returns the literal token emitted for this operator.
    pub const fn token(self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::EqualInsensitive => "=[c]",
            Operator::NotEqualInsensitive => "!=[c]",
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqual => ">=",
            Operator::LessThan => "<",
            Operator::LessThanOrEqual => "<=",
            Operator::BeginsWith => "BEGINSWITH",
            Operator::BeginsWithInsensitive => "BEGINSWITH[c]",
            Operator::EndsWith => "ENDSWITH",
            Operator::EndsWithInsensitive => "ENDSWITH[c]",
            Operator::Like => "LIKE",
            Operator::LikeInsensitive => "LIKE[c]",
            Operator::Contains => "CONTAINS",
            Operator::ContainsInsensitive => "CONTAINS[c]",
        }
    }

    /// Returns the `snake_case` name used for this operator in plans.
    pub const fn name(self) -> &'static str {
        match self {
            Operator::Equal => "equal",
            Operator::NotEqual => "not_equal",
            Operator::EqualInsensitive => "equal_insensitive",
            Operator::NotEqualInsensitive => "not_equal_insensitive",
            Operator::GreaterThan => "greater_than",
            Operator::GreaterThanOrEqual => "greater_than_or_equal",
            Operator::LessThan => "less_than",
            Operator::LessThanOrEqual => "less_than_or_equal",
            Operator::BeginsWith => "begins_with",
            Operator::BeginsWithInsensitive => "begins_with_insensitive",
            Operator::EndsWith => "ends_with",
            Operator::EndsWithInsensitive => "ends_with_insensitive",
            Operator::Like => "like",
            Operator::LikeInsensitive => "like_insensitive",
            Operator::Contains => "contains",
            Operator::ContainsInsensitive => "contains_insensitive",
        }
    }

    pub const fn is_case_insensitive(self) -> bool {
        matches!(
            self,
            Operator::EqualInsensitive
                | Operator::NotEqualInsensitive
                | Operator::BeginsWithInsensitive
                | Operator::EndsWithInsensitive
                | Operator::LikeInsensitive
                | Operator::ContainsInsensitive
        )
    }

    /// Returns the `[c]` counterpart of a case-sensitive operator.
    ///
    /// Relational operators have no insensitive form, and insensitive
    /// operators map to `None` as well.
    pub const fn case_insensitive(self) -> Option<Operator> {
        match self {
            Operator::Equal => Some(Operator::EqualInsensitive),
            Operator::NotEqual => Some(Operator::NotEqualInsensitive),
            Operator::BeginsWith => Some(Operator::BeginsWithInsensitive),
            Operator::EndsWith => Some(Operator::EndsWithInsensitive),
            Operator::Like => Some(Operator::LikeInsensitive),
            Operator::Contains => Some(Operator::ContainsInsensitive),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Operator {
    type Err = PlanError;

    /// Parses an operator name such as `greater_than`, or a literal token such
    /// as `>=` or `CONTAINS[c]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.name() == s || op.token() == s)
            .ok_or_else(|| PlanError::UnknownOperator(s.to_string()))
    }
}

impl TryFrom<String> for Operator {
    type Error = PlanError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_unique() {
        let mut tokens: Vec<_> = Operator::ALL.iter().map(|op| op.token()).collect();
        tokens.sort_unstable();
        tokens.dedup();
        assert_eq!(tokens.len(), Operator::ALL.len());
    }

    #[test]
    fn test_insensitive_suffix() {
        for op in Operator::ALL {
            assert_eq!(op.is_case_insensitive(), op.token().ends_with("[c]"));
        }
    }

    #[test]
    fn test_case_insensitive_counterpart() {
        assert_eq!(
            Operator::Contains.case_insensitive(),
            Some(Operator::ContainsInsensitive)
        );
        assert_eq!(
            Operator::NotEqual.case_insensitive().map(Operator::token),
            Some("!=[c]")
        );
        assert_eq!(Operator::GreaterThan.case_insensitive(), None);
        assert_eq!(Operator::LikeInsensitive.case_insensitive(), None);
    }

    #[test]
    fn test_parse_token() {
        assert_eq!(
            "BEGINSWITH[c]".parse::<Operator>().unwrap(),
            Operator::BeginsWithInsensitive
        );
        assert_eq!("<=".parse::<Operator>().unwrap(), Operator::LessThanOrEqual);
        assert_eq!("ends_with".parse::<Operator>().unwrap(), Operator::EndsWith);

        let err = "beginswith".parse::<Operator>().unwrap_err();
        assert!(matches!(err, PlanError::UnknownOperator(ref s) if s == "beginswith"));
    }

    #[test]
    fn test_serde_names_match() {
        for op in Operator::ALL {
            let json = serde_json::to_string(&op).unwrap();
            assert_eq!(json, format!("\"{}\"", op.name()));

            let back: Operator = serde_json::from_str(&json).unwrap();
            assert_eq!(back, op);
        }

        let token: Operator = serde_json::from_str("\"!=[c]\"").unwrap();
        assert_eq!(token, Operator::NotEqualInsensitive);
        assert!(serde_json::from_str::<Operator>("\"~=\"").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Operator::EndsWith.to_string(), "ENDSWITH");
        assert_eq!(Operator::EqualInsensitive.to_string(), "=[c]");
    }
}
