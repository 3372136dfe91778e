//! The query text builder.

use tracing::{debug, trace};

use crate::{
    expr::ops::Operator,
    query::connector::{Connector, Separator, Sort},
};

const TRUE_PREDICATE: &str = "TRUEPREDICATE";
const FALSE_PREDICATE: &str = "FALSEPREDICATE";
const NULL: &str = "NULL";

/// Assembles predicate and descriptor text from a sequence of calls.
///
/// Each predicate call writes the pending [`Connector`], then its own tokens,
/// then arms `AND` for the next call. `or()` and `not()` replace the pending
/// connector for exactly one clause. Descriptor calls (`sort`, `distinct`,
/// `limit`) go to a separate buffer and are joined by single spaces.
///
/// Arguments are never stored here: clauses reference them through `$<pos>`
/// placeholders whose values are bound elsewhere.
///
/// The builder performs no validation. Unbalanced groups, unknown fields and
/// out-of-range positions all produce text that the engine's parser is left to
/// reject.
///
/// # Example
///
/// ```rust
/// use querytext_core::{QueryBuilder, Sort};
///
/// let mut query = QueryBuilder::new();
/// query
///     .greater_than("age", 1)
///     .or()
///     .begin_group()
///     .begins_with_insensitive("name", 2)
///     .is_not_null("email")
///     .end_group()
///     .sort([("age", Sort::Descending)])
///     .limit(10);
///
/// assert_eq!(
///     query.build(),
///     "age > $1 OR (name BEGINSWITH[c] $2 AND email != NULL) SORT(age DESC) LIMIT(10)"
/// );
/// ```
#[derive(Clone, Debug, Default)]
pub struct QueryBuilder {
    predicate: String,
    descriptor: String,
    next_connector: Connector,
    next_separator: Separator,
    group_depth: i64,
    validated: bool,
    or_connected: bool,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `field OP $pos`.
    ///
    /// Every single-argument operator goes through here; the named methods
    /// below only pick the [`Operator`].
    pub fn append(&mut self, field: impl AsRef<str>, op: Operator, pos: u64) -> &mut Self {
        self.push_connector();
        self.predicate.push_str(field.as_ref());
        self.predicate.push(' ');
        self.predicate.push_str(op.token());
        self.predicate.push(' ');
        self.push_argument(pos);
        self.next_connector = Connector::And;
        self
    }

    pub fn equal_to(&mut self, field: impl AsRef<str>, pos: u64) -> &mut Self {
        self.append(field, Operator::Equal, pos)
    }

    pub fn not_equal_to(&mut self, field: impl AsRef<str>, pos: u64) -> &mut Self {
        self.append(field, Operator::NotEqual, pos)
    }

    pub fn equal_to_insensitive(&mut self, field: impl AsRef<str>, pos: u64) -> &mut Self {
        self.append(field, Operator::EqualInsensitive, pos)
    }

    pub fn not_equal_to_insensitive(&mut self, field: impl AsRef<str>, pos: u64) -> &mut Self {
        self.append(field, Operator::NotEqualInsensitive, pos)
    }

    pub fn greater_than(&mut self, field: impl AsRef<str>, pos: u64) -> &mut Self {
        self.append(field, Operator::GreaterThan, pos)
    }

    pub fn greater_than_or_equal(&mut self, field: impl AsRef<str>, pos: u64) -> &mut Self {
        self.append(field, Operator::GreaterThanOrEqual, pos)
    }

    pub fn less_than(&mut self, field: impl AsRef<str>, pos: u64) -> &mut Self {
        self.append(field, Operator::LessThan, pos)
    }

    pub fn less_than_or_equal(&mut self, field: impl AsRef<str>, pos: u64) -> &mut Self {
        self.append(field, Operator::LessThanOrEqual, pos)
    }

    pub fn begins_with(&mut self, field: impl AsRef<str>, pos: u64) -> &mut Self {
        self.append(field, Operator::BeginsWith, pos)
    }

    pub fn begins_with_insensitive(&mut self, field: impl AsRef<str>, pos: u64) -> &mut Self {
        self.append(field, Operator::BeginsWithInsensitive, pos)
    }

    pub fn ends_with(&mut self, field: impl AsRef<str>, pos: u64) -> &mut Self {
        self.append(field, Operator::EndsWith, pos)
    }

    pub fn ends_with_insensitive(&mut self, field: impl AsRef<str>, pos: u64) -> &mut Self {
        self.append(field, Operator::EndsWithInsensitive, pos)
    }

    pub fn like(&mut self, field: impl AsRef<str>, pos: u64) -> &mut Self {
        self.append(field, Operator::Like, pos)
    }

    pub fn like_insensitive(&mut self, field: impl AsRef<str>, pos: u64) -> &mut Self {
        self.append(field, Operator::LikeInsensitive, pos)
    }

    pub fn contains(&mut self, field: impl AsRef<str>, pos: u64) -> &mut Self {
        self.append(field, Operator::Contains, pos)
    }

    pub fn contains_insensitive(&mut self, field: impl AsRef<str>, pos: u64) -> &mut Self {
        self.append(field, Operator::ContainsInsensitive, pos)
    }

    /// Appends `(field>=$lower AND field<=$upper)`.
    ///
    /// The inner comparisons carry no spaces around their operators. The
    /// whole group takes a single connector slot in the outer context.
    pub fn between(&mut self, field: impl AsRef<str>, lower: u64, upper: u64) -> &mut Self {
        let field = field.as_ref();

        self.push_connector();
        self.predicate.push('(');
        self.predicate.push_str(field);
        self.predicate.push_str(Operator::GreaterThanOrEqual.token());
        self.push_argument(lower);
        self.predicate.push_str(Connector::And.as_str());
        self.predicate.push_str(field);
        self.predicate.push_str(Operator::LessThanOrEqual.token());
        self.push_argument(upper);
        self.predicate.push(')');
        self.next_connector = Connector::And;
        self
    }

    /// Appends `field = NULL`.
    pub fn is_null(&mut self, field: impl AsRef<str>) -> &mut Self {
        self.push_null_check(field.as_ref(), Operator::Equal)
    }

    /// Appends `field != NULL`.
    pub fn is_not_null(&mut self, field: impl AsRef<str>) -> &mut Self {
        self.push_null_check(field.as_ref(), Operator::NotEqual)
    }

    pub fn always_true(&mut self) -> &mut Self {
        self.push_atom(TRUE_PREDICATE)
    }

    pub fn always_false(&mut self) -> &mut Self {
        self.push_atom(FALSE_PREDICATE)
    }

    /// Opens a group. The first clause inside it gets no connector.
    pub fn begin_group(&mut self) -> &mut Self {
        self.push_connector();
        self.predicate.push('(');
        self.next_connector = Connector::None;
        self.group_depth += 1;
        self
    }

    /// Closes a group. A following sibling clause is AND-joined.
    ///
    /// A `)` is written even when no group is open.
    pub fn end_group(&mut self) -> &mut Self {
        self.predicate.push(')');
        self.next_connector = Connector::And;
        self.group_depth -= 1;
        self
    }

    /// Joins the next clause with `OR` instead of `AND`.
    ///
    /// On an empty predicate there is nothing to join to; the request is
    /// recorded in [`is_or_connected`](Self::is_or_connected) for the caller
    /// to resolve, and the connector is left untouched.
    pub fn or(&mut self) -> &mut Self {
        if self.predicate.is_empty() {
            debug!("or() called on an empty predicate, marking query as or-connected");
            self.or_connected = true;
        } else {
            self.next_connector = Connector::Or;
        }
        self
    }

    /// Negates the next clause.
    ///
    /// Calling this twice still negates once: the second call overwrites the
    /// pending connector rather than canceling the first.
    pub fn not(&mut self) -> &mut Self {
        self.next_connector = Connector::Not;
        self
    }

    /// Appends `SORT(field1 ASC, field2 DESC, ...)` to the descriptor.
    pub fn sort<I, F>(&mut self, keys: I) -> &mut Self
    where
        I: IntoIterator<Item = (F, Sort)>,
        F: AsRef<str>,
    {
        self.begin_descriptor("SORT");
        for (idx, (field, order)) in keys.into_iter().enumerate() {
            if idx > 0 {
                self.descriptor.push_str(", ");
            }
            self.descriptor.push_str(field.as_ref());
            self.descriptor.push(' ');
            self.descriptor.push_str(order.as_str());
        }
        self.descriptor.push(')');
        self
    }

    /// Appends `DISTINCT(field1, field2, ...)` to the descriptor.
    pub fn distinct<I, F>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = F>,
        F: AsRef<str>,
    {
        self.begin_descriptor("DISTINCT");
        for (idx, field) in fields.into_iter().enumerate() {
            if idx > 0 {
                self.descriptor.push_str(", ");
            }
            self.descriptor.push_str(field.as_ref());
        }
        self.descriptor.push(')');
        self
    }

    /// Appends `LIMIT(count)` to the descriptor.
    pub fn limit(&mut self, count: u64) -> &mut Self {
        self.begin_descriptor("LIMIT");
        self.descriptor.push_str(&count.to_string());
        self.descriptor.push(')');
        self
    }

    /// Renders `predicate + " " + descriptor` and marks the builder validated.
    ///
    /// An empty predicate renders as `TRUEPREDICATE`. Buffers are left intact,
    /// so calling this again without further appends returns the same text.
    pub fn build(&mut self) -> String {
        self.validated = true;

        let predicate = if self.predicate.is_empty() {
            TRUE_PREDICATE
        } else {
            self.predicate.as_str()
        };
        let query = format!("{} {}", predicate, self.descriptor);

        trace!(query = %query, "built query text");
        query
    }

    /// Whether [`build`](Self::build) has been called on this builder.
    pub fn is_validated(&self) -> bool {
        self.validated
    }

    /// Whether `or()` was called before any predicate clause existed.
    pub fn is_or_connected(&self) -> bool {
        self.or_connected
    }

    /// The predicate text appended so far.
    pub fn predicate(&self) -> &str {
        &self.predicate
    }

    /// The descriptor text appended so far.
    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    /// Open groups minus closed groups. Negative after a stray `end_group`.
    pub fn group_depth(&self) -> i64 {
        self.group_depth
    }

    fn push_connector(&mut self) {
        self.predicate.push_str(self.next_connector.as_str());
    }

    fn push_argument(&mut self, pos: u64) {
        self.predicate.push('$');
        self.predicate.push_str(&pos.to_string());
    }

    fn push_null_check(&mut self, field: &str, op: Operator) -> &mut Self {
        self.push_connector();
        self.predicate.push_str(field);
        self.predicate.push(' ');
        self.predicate.push_str(op.token());
        self.predicate.push(' ');
        self.predicate.push_str(NULL);
        self.next_connector = Connector::And;
        self
    }

    fn push_atom(&mut self, atom: &str) -> &mut Self {
        self.push_connector();
        self.predicate.push_str(atom);
        self.next_connector = Connector::And;
        self
    }

    fn begin_descriptor(&mut self, keyword: &str) {
        self.descriptor.push_str(self.next_separator.as_str());
        self.descriptor.push_str(keyword);
        self.descriptor.push('(');
        self.next_separator = Separator::Space;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::define_model;

    define_model!(
        person {
            model: "Person",
            fields: {
                NAME: String => "name",
                AGE: i64 => "age",
                OWNER_NAME: String => "owner.name"
            }
        }
    );

    #[test]
    fn test_every_operator_on_empty_builder() {
        for op in Operator::ALL {
            let mut query = QueryBuilder::new();
            query.append("f", op, 3);
            assert_eq!(query.predicate(), format!("f {} $3", op.token()));
        }
    }

    #[test]
    fn test_named_operator_methods() {
        let mut query = QueryBuilder::new();
        query
            .equal_to("a", 1)
            .not_equal_to("b", 2)
            .equal_to_insensitive("c", 3)
            .not_equal_to_insensitive("d", 4)
            .greater_than("e", 5)
            .greater_than_or_equal("f", 6)
            .less_than("g", 7)
            .less_than_or_equal("h", 8);
        assert_eq!(
            query.predicate(),
            "a = $1 AND b != $2 AND c =[c] $3 AND d !=[c] $4 AND e > $5 AND f >= $6 \
             AND g < $7 AND h <= $8"
        );

        let mut query = QueryBuilder::new();
        query
            .begins_with("a", 1)
            .begins_with_insensitive("b", 2)
            .ends_with("c", 3)
            .ends_with_insensitive("d", 4)
            .like("e", 5)
            .like_insensitive("f", 6)
            .contains("g", 7)
            .contains_insensitive("h", 8);
        assert_eq!(
            query.predicate(),
            "a BEGINSWITH $1 AND b BEGINSWITH[c] $2 AND c ENDSWITH $3 AND d ENDSWITH[c] $4 \
             AND e LIKE $5 AND f LIKE[c] $6 AND g CONTAINS $7 AND h CONTAINS[c] $8"
        );
    }

    #[test]
    fn test_consecutive_clauses_are_and_joined() {
        let mut query = QueryBuilder::new();
        query.equal_to("a", 1).less_than("b", 2);
        assert_eq!(query.predicate(), "a = $1 AND b < $2");
    }

    #[test]
    fn test_or_applies_to_one_clause() {
        let mut query = QueryBuilder::new();
        query.equal_to("a", 1).or().equal_to("b", 2).equal_to("c", 3);
        assert_eq!(query.predicate(), "a = $1 OR b = $2 AND c = $3");
        assert!(!query.is_or_connected());
    }

    #[test]
    fn test_not() {
        let mut query = QueryBuilder::new();
        query.not().equal_to("f", 1);
        assert_eq!(query.predicate(), "NOT f = $1");
    }

    #[test]
    fn test_double_not_is_not_canceled() {
        let mut query = QueryBuilder::new();
        query.not().not().equal_to("f", 1);
        assert_eq!(query.predicate(), "NOT f = $1");
    }

    #[test]
    fn test_not_overwrites_pending_connector() {
        let mut query = QueryBuilder::new();
        query.equal_to("a", 1).not().equal_to("b", 2);
        assert_eq!(query.predicate(), "a = $1NOT b = $2");
    }

    #[test]
    fn test_group() {
        let mut query = QueryBuilder::new();
        query.begin_group().equal_to("a", 1).end_group();
        assert_eq!(query.predicate(), "(a = $1)");

        query.equal_to("b", 2);
        assert_eq!(query.predicate(), "(a = $1) AND b = $2");
        assert_eq!(query.group_depth(), 0);
    }

    #[test]
    fn test_nested_groups_after_clause() {
        let mut query = QueryBuilder::new();
        query
            .equal_to("a", 1)
            .or()
            .begin_group()
            .begin_group()
            .always_true()
            .end_group()
            .or()
            .always_false()
            .end_group();
        assert_eq!(query.predicate(), "a = $1 OR ((TRUEPREDICATE) OR FALSEPREDICATE)");
    }

    #[test]
    fn test_unmatched_end_group_is_emitted() {
        let mut query = QueryBuilder::new();
        query.equal_to("a", 1).end_group();
        assert_eq!(query.predicate(), "a = $1)");
        assert_eq!(query.group_depth(), -1);
    }

    #[test]
    fn test_between() {
        let mut query = QueryBuilder::new();
        query.between("x", 2, 3);
        assert_eq!(query.predicate(), "(x>=$2 AND x<=$3)");

        query.or().between("y", 4, 5);
        assert_eq!(query.predicate(), "(x>=$2 AND x<=$3) OR (y>=$4 AND y<=$5)");
    }

    #[test]
    fn test_null_checks() {
        let mut query = QueryBuilder::new();
        query.is_null("a").is_not_null("b");
        assert_eq!(query.predicate(), "a = NULL AND b != NULL");
    }

    #[test]
    fn test_always_true_and_false() {
        let mut query = QueryBuilder::new();
        query.always_true().or().always_false();
        assert_eq!(query.predicate(), "TRUEPREDICATE OR FALSEPREDICATE");
    }

    #[test]
    fn test_build_empty() {
        let mut query = QueryBuilder::new();
        assert!(!query.is_validated());
        assert_eq!(query.build(), "TRUEPREDICATE ");
        assert!(query.is_validated());
    }

    #[test]
    fn test_descriptor() {
        let mut query = QueryBuilder::new();
        query
            .sort([("a", Sort::Ascending), ("b", Sort::Descending)])
            .limit(10);
        assert_eq!(query.descriptor(), "SORT(a ASC, b DESC) LIMIT(10)");
        assert_eq!(query.build(), "TRUEPREDICATE SORT(a ASC, b DESC) LIMIT(10)");
    }

    #[test]
    fn test_distinct_between_sort_and_limit() {
        let mut query = QueryBuilder::new();
        query
            .equal_to("a", 1)
            .limit(0)
            .distinct(["a", "b"])
            .sort([("c", Sort::Descending)]);
        assert_eq!(query.build(), "a = $1 LIMIT(0) DISTINCT(a, b) SORT(c DESC)");
    }

    #[test]
    fn test_build_is_idempotent() {
        let mut query = QueryBuilder::new();
        query.equal_to("a", 1).distinct(["a"]);

        let first = query.build();
        let second = query.build();
        assert_eq!(first, second);
        assert_eq!(first, "a = $1 DISTINCT(a)");
        assert!(query.is_validated());
    }

    #[test]
    fn test_or_on_empty_predicate() {
        let mut query = QueryBuilder::new();
        query.or();
        assert!(query.is_or_connected());

        query.equal_to("a", 1);
        assert_eq!(query.predicate(), "a = $1");
    }

    #[test]
    fn test_or_after_descriptor_only_still_or_connected() {
        let mut query = QueryBuilder::new();
        query.limit(5).or();
        assert!(query.is_or_connected());
    }

    #[test]
    fn test_or_after_open_group_is_not_or_connected() {
        let mut query = QueryBuilder::new();
        query.begin_group().or().equal_to("a", 1);
        assert!(!query.is_or_connected());
        assert_eq!(query.predicate(), "( OR a = $1");
    }

    #[test]
    fn test_typed_fields() {
        let mut query = QueryBuilder::new();
        query
            .equal_to(person::NAME, 1)
            .between(person::AGE, 2, 3)
            .contains_insensitive(person::OWNER_NAME, 4)
            .distinct([person::NAME]);
        assert_eq!(person::MODEL, "Person");
        assert_eq!(
            query.build(),
            "name = $1 AND (age>=$2 AND age<=$3) AND owner.name CONTAINS[c] $4 DISTINCT(name)"
        );
    }
}
