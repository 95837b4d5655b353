//! Boolean predicate composition.
//!
//! A [`Predicate`] is an ordered AND/OR tree of condition nodes with
//! `nest()` / `unnest()` for parenthesized sub-groups, plus fluent
//! constructors for the common condition kinds.

mod between;
mod conditional;
mod exists;
mod in_list;
mod is_null;
mod like;
mod operator;

pub use between::Between;
pub use conditional::Conditional;
pub use exists::Exists;
pub use in_list::{In, InValues};
pub use is_null::IsNull;
pub use like::Like;
pub use operator::{ComparisonOp, Operator};

use crate::error::{Result, SqlError};
use crate::expr::{ExprArg, Expression, ExpressionNode, Fragment, Literal};
use crate::value::{SqlValue, ToSqlValue};

/// How a predicate combines with the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Combinator {
    /// Logical AND.
    #[default]
    And,
    /// Logical OR.
    Or,
}

impl Combinator {
    /// The rendered separator, with surrounding spaces.
    #[must_use]
    pub const fn separator(self) -> &'static str {
        match self {
            Self::And => " AND ",
            Self::Or => " OR ",
        }
    }
}

#[derive(Debug)]
enum Member {
    /// A single condition.
    Leaf(Box<dyn ExpressionNode>),
    /// A nested group created by `nest()`, stored in the arena.
    Subtree(usize),
    /// A complete predicate attached as one parenthesized member.
    Nested(Predicate),
}

#[derive(Debug)]
struct TreeNode {
    /// Arena index of the enclosing group; `None` for the root.
    parent: Option<usize>,
    members: Vec<(Combinator, Member)>,
}

/// An AND/OR tree of conditions.
///
/// Members are appended with the default combinator unless [`Predicate::and`]
/// or [`Predicate::or`] chose one for the next member. The first member's
/// combinator never renders. All nodes live in one arena owned by the
/// predicate; nested groups refer to their parent by index only.
#[derive(Debug)]
pub struct Predicate {
    nodes: Vec<TreeNode>,
    cursor: usize,
    default_combinator: Combinator,
    next_combinator: Option<Combinator>,
}

/// WHERE clause body.
pub type Where = Predicate;
/// HAVING clause body.
pub type Having = Predicate;

impl Default for Predicate {
    fn default() -> Self {
        Self::new()
    }
}

impl Predicate {
    /// An empty predicate combining with AND by default.
    #[must_use]
    pub fn new() -> Self {
        Self::with_default(Combinator::And)
    }

    /// An empty predicate with an explicit default combinator.
    #[must_use]
    pub fn with_default(default_combinator: Combinator) -> Self {
        Self {
            nodes: vec![TreeNode {
                parent: None,
                members: Vec::new(),
            }],
            cursor: 0,
            default_combinator,
            next_combinator: None,
        }
    }

    /// Number of members directly attached to the root.
    #[must_use]
    pub fn count(&self) -> usize {
        self.nodes[0].members.len()
    }

    /// True if nothing has been attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// The next member combines with AND.
    pub fn and(&mut self) -> &mut Self {
        self.next_combinator = Some(Combinator::And);
        self
    }

    /// The next member combines with OR.
    pub fn or(&mut self) -> &mut Self {
        self.next_combinator = Some(Combinator::Or);
        self
    }

    fn take_combinator(&mut self) -> Combinator {
        self.next_combinator
            .take()
            .unwrap_or(self.default_combinator)
    }

    fn push_member(&mut self, member: Member) -> &mut Self {
        let combinator = self.take_combinator();
        self.nodes[self.cursor].members.push((combinator, member));
        self
    }

    /// Appends a condition with an explicit combinator.
    pub fn add(
        &mut self,
        predicate: impl ExpressionNode + 'static,
        combinator: Combinator,
    ) -> &mut Self {
        self.nodes[self.cursor]
            .members
            .push((combinator, Member::Leaf(Box::new(predicate))));
        self
    }

    /// Opens a nested, parenthesized group; subsequent members attach to it.
    pub fn nest(&mut self) -> &mut Self {
        let child = self.nodes.len();
        self.nodes.push(TreeNode {
            parent: Some(self.cursor),
            members: Vec::new(),
        });
        self.push_member(Member::Subtree(child));
        self.cursor = child;
        self
    }

    /// Closes the current nested group.
    pub fn unnest(&mut self) -> Result<&mut Self> {
        match self.nodes[self.cursor].parent {
            Some(parent) => {
                self.cursor = parent;
                Ok(self)
            }
            None => Err(SqlError::NotNested),
        }
    }

    /// Attaches a whole predicate as one parenthesized member.
    pub fn predicate(&mut self, predicate: Predicate) -> &mut Self {
        self.push_member(Member::Nested(predicate))
    }

    /// `left = right`.
    pub fn equal_to(
        &mut self,
        left: impl Into<ExprArg>,
        right: impl Into<ExprArg>,
    ) -> &mut Self {
        self.push_member(Member::Leaf(Box::new(Operator::new(
            left,
            ComparisonOp::Eq,
            right,
        ))))
    }

    /// `left != right`.
    pub fn not_equal_to(
        &mut self,
        left: impl Into<ExprArg>,
        right: impl Into<ExprArg>,
    ) -> &mut Self {
        self.push_member(Member::Leaf(Box::new(Operator::new(
            left,
            ComparisonOp::NotEq,
            right,
        ))))
    }

    /// `left < right`.
    pub fn less_than(
        &mut self,
        left: impl Into<ExprArg>,
        right: impl Into<ExprArg>,
    ) -> &mut Self {
        self.push_member(Member::Leaf(Box::new(Operator::new(
            left,
            ComparisonOp::Lt,
            right,
        ))))
    }

    /// `left > right`.
    pub fn greater_than(
        &mut self,
        left: impl Into<ExprArg>,
        right: impl Into<ExprArg>,
    ) -> &mut Self {
        self.push_member(Member::Leaf(Box::new(Operator::new(
            left,
            ComparisonOp::Gt,
            right,
        ))))
    }

    /// `left <= right`.
    pub fn less_than_or_equal_to(
        &mut self,
        left: impl Into<ExprArg>,
        right: impl Into<ExprArg>,
    ) -> &mut Self {
        self.push_member(Member::Leaf(Box::new(Operator::new(
            left,
            ComparisonOp::LtEq,
            right,
        ))))
    }

    /// `left >= right`.
    pub fn greater_than_or_equal_to(
        &mut self,
        left: impl Into<ExprArg>,
        right: impl Into<ExprArg>,
    ) -> &mut Self {
        self.push_member(Member::Leaf(Box::new(Operator::new(
            left,
            ComparisonOp::GtEq,
            right,
        ))))
    }

    /// `identifier LIKE pattern`.
    pub fn like(
        &mut self,
        identifier: impl Into<ExprArg>,
        pattern: impl Into<ExprArg>,
    ) -> &mut Self {
        self.push_member(Member::Leaf(Box::new(Like::new(identifier, pattern))))
    }

    /// `identifier NOT LIKE pattern`.
    pub fn not_like(
        &mut self,
        identifier: impl Into<ExprArg>,
        pattern: impl Into<ExprArg>,
    ) -> &mut Self {
        self.push_member(Member::Leaf(Box::new(Like::new(identifier, pattern).negate())))
    }

    /// `identifier IS NULL`.
    pub fn is_null(&mut self, identifier: impl Into<ExprArg>) -> &mut Self {
        self.push_member(Member::Leaf(Box::new(IsNull::new(identifier))))
    }

    /// `identifier IS NOT NULL`.
    pub fn is_not_null(&mut self, identifier: impl Into<ExprArg>) -> &mut Self {
        self.push_member(Member::Leaf(Box::new(IsNull::new(identifier).negate())))
    }

    /// `identifier IN (values...)`.
    pub fn in_list<I>(&mut self, identifier: impl Into<ExprArg>, values: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<ExprArg>,
    {
        self.push_member(Member::Leaf(Box::new(In::new(identifier, values))))
    }

    /// `identifier NOT IN (values...)`.
    pub fn not_in_list<I>(&mut self, identifier: impl Into<ExprArg>, values: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<ExprArg>,
    {
        self.push_member(Member::Leaf(Box::new(In::new(identifier, values).negate())))
    }

    /// `identifier IN (subquery)`.
    pub fn in_select(
        &mut self,
        identifier: impl Into<ExprArg>,
        statement: impl crate::compiler::SqlStatement + 'static,
    ) -> &mut Self {
        self.push_member(Member::Leaf(Box::new(In::with_subquery(
            identifier, statement,
        ))))
    }

    /// `identifier BETWEEN min AND max`.
    pub fn between(
        &mut self,
        identifier: impl Into<ExprArg>,
        min: impl Into<ExprArg>,
        max: impl Into<ExprArg>,
    ) -> &mut Self {
        self.push_member(Member::Leaf(Box::new(Between::new(identifier, min, max))))
    }

    /// `identifier NOT BETWEEN min AND max`.
    pub fn not_between(
        &mut self,
        identifier: impl Into<ExprArg>,
        min: impl Into<ExprArg>,
        max: impl Into<ExprArg>,
    ) -> &mut Self {
        self.push_member(Member::Leaf(Box::new(
            Between::new(identifier, min, max).negate(),
        )))
    }

    /// `EXISTS (...)`.
    pub fn exists(&mut self, inner: impl Into<ExprArg>) -> &mut Self {
        self.push_member(Member::Leaf(Box::new(Exists::new(inner))))
    }

    /// `NOT EXISTS (...)`.
    pub fn not_exists(&mut self, inner: impl Into<ExprArg>) -> &mut Self {
        self.push_member(Member::Leaf(Box::new(Exists::new(inner).negate())))
    }

    /// A raw template condition with `?` placeholders.
    pub fn expression<I>(&mut self, template: impl Into<String>, parameters: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<ExprArg>,
    {
        self.push_member(Member::Leaf(Box::new(Expression::new(template, parameters))))
    }

    /// A trusted verbatim condition.
    pub fn literal(&mut self, literal: impl Into<String>) -> &mut Self {
        self.push_member(Member::Leaf(Box::new(Literal::new(literal))))
    }

    /// Appends loosely-typed conditions, resolved by fixed precedence.
    ///
    /// Explicit nodes pass through; bare SQL text becomes a template when it
    /// contains `?` and a literal otherwise; a pair maps to a template (key
    /// contains `?`), IS NULL (null value), IN (list value, always), or
    /// equality (anything else).
    pub fn add_predicates<I>(&mut self, sources: I, combinator: Combinator) -> &mut Self
    where
        I: IntoIterator<Item = PredicateSource>,
    {
        for source in sources {
            let node: Box<dyn ExpressionNode> = match source {
                PredicateSource::Node(node) => node,
                PredicateSource::Sql(text) => {
                    if text.contains(crate::expr::PLACEHOLDER) {
                        Box::new(Expression::raw(text))
                    } else {
                        Box::new(Literal::new(text))
                    }
                }
                PredicateSource::Pair(key, value) => pair_to_node(key, value),
            };
            self.nodes[self.cursor].members.push((combinator, Member::Leaf(node)));
        }
        self
    }

    fn node_parts(&self, index: usize) -> Result<Vec<Fragment<'_>>> {
        let node = &self.nodes[index];
        let mut parts = Vec::new();
        for (position, (combinator, member)) in node.members.iter().enumerate() {
            if position > 0 {
                parts.push(Fragment::text(combinator.separator()));
            }
            match member {
                Member::Leaf(leaf) => parts.extend(leaf.expression_data()?),
                Member::Subtree(child) => {
                    parts.push(Fragment::text("("));
                    parts.extend(self.node_parts(*child)?);
                    parts.push(Fragment::text(")"));
                }
                Member::Nested(predicate) => {
                    parts.push(Fragment::text("("));
                    parts.extend(predicate.expression_data()?);
                    parts.push(Fragment::text(")"));
                }
            }
        }
        Ok(parts)
    }
}

impl ExpressionNode for Predicate {
    fn expression_data(&self) -> Result<Vec<Fragment<'_>>> {
        self.node_parts(0)
    }
}

/// Loosely-typed input for [`Predicate::add_predicates`].
#[derive(Debug)]
pub enum PredicateSource {
    /// An explicit condition node.
    Node(Box<dyn ExpressionNode>),
    /// Bare SQL text.
    Sql(String),
    /// A column-to-value pair.
    Pair(String, PairValue),
}

impl PredicateSource {
    /// An explicit node.
    pub fn node(node: impl ExpressionNode + 'static) -> Self {
        Self::Node(Box::new(node))
    }

    /// Bare SQL text.
    pub fn sql(text: impl Into<String>) -> Self {
        Self::Sql(text.into())
    }

    /// A column-to-value pair.
    pub fn pair(key: impl Into<String>, value: impl Into<PairValue>) -> Self {
        Self::Pair(key.into(), value.into())
    }
}

/// The value side of a predicate pair.
#[derive(Debug)]
pub enum PairValue {
    /// A single scalar.
    Value(SqlValue),
    /// A list of scalars; always resolves to IN.
    List(Vec<SqlValue>),
}

impl PairValue {
    /// A scalar value.
    pub fn value(value: impl ToSqlValue) -> Self {
        Self::Value(value.to_sql_value())
    }

    /// A list of values.
    pub fn list<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: ToSqlValue,
    {
        Self::List(values.into_iter().map(ToSqlValue::to_sql_value).collect())
    }
}

impl From<SqlValue> for PairValue {
    fn from(value: SqlValue) -> Self {
        Self::Value(value)
    }
}

impl From<Vec<SqlValue>> for PairValue {
    fn from(values: Vec<SqlValue>) -> Self {
        Self::List(values)
    }
}

fn pair_to_node(key: String, value: PairValue) -> Box<dyn ExpressionNode> {
    if key.contains(crate::expr::PLACEHOLDER) {
        let parameters = match value {
            PairValue::Value(v) => vec![v],
            PairValue::List(vs) => vs,
        };
        return Box::new(Expression::new(key, parameters));
    }
    match value {
        PairValue::Value(SqlValue::Null) => Box::new(IsNull::new(ExprArg::identifier(key))),
        PairValue::Value(v) => Box::new(Operator::new(
            ExprArg::identifier(key),
            ComparisonOp::Eq,
            v,
        )),
        // A list always means IN, never an array-valued equality.
        PairValue::List(vs) => Box::new(In::new(ExprArg::identifier(key), vs)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{compile_expression, CompileContext};
    use crate::dialect::AnsiDialect;

    fn render(predicate: &Predicate) -> String {
        let dialect = AnsiDialect::new();
        let mut ctx = CompileContext::new();
        compile_expression(predicate, &dialect, &mut ctx, None).unwrap()
    }

    #[test]
    fn first_combinator_never_renders() {
        let mut p = Predicate::new();
        p.literal("a = 1").or().literal("b = 2");
        assert_eq!(render(&p), "a = 1 OR b = 2");
    }

    #[test]
    fn nesting_wraps_in_parentheses() {
        let mut p = Predicate::new();
        p.literal("a = 1")
            .or()
            .nest()
            .literal("b = 2")
            .literal("c = 3")
            .unnest()
            .unwrap();
        assert_eq!(render(&p), "a = 1 OR (b = 2 AND c = 3)");
    }

    #[test]
    fn unnest_without_nest_fails() {
        let mut p = Predicate::new();
        assert!(matches!(p.unnest(), Err(SqlError::NotNested)));
    }

    #[test]
    fn attached_predicate_is_parenthesized() {
        let mut inner = Predicate::new();
        inner.literal("x = 1").or().literal("y = 2");
        let mut p = Predicate::new();
        p.literal("a = 1").predicate(inner);
        assert_eq!(render(&p), "a = 1 AND (x = 1 OR y = 2)");
    }

    #[test]
    fn default_combinator_is_used_without_override() {
        let mut p = Predicate::with_default(Combinator::Or);
        p.literal("a").literal("b");
        assert_eq!(render(&p), "a OR b");
    }

    #[test]
    fn loose_pairs_follow_precedence() {
        let mut p = Predicate::new();
        p.add_predicates(
            [
                PredicateSource::pair("age > ?", PairValue::value(18)),
                PredicateSource::pair("deleted_at", PairValue::Value(SqlValue::Null)),
                PredicateSource::pair("status", PairValue::list(["a", "b"])),
                PredicateSource::pair("name", PairValue::value("x")),
            ],
            Combinator::And,
        );
        assert_eq!(
            render(&p),
            "age > 18 AND \"deleted_at\" IS NULL AND \"status\" IN ('a', 'b') AND \"name\" = 'x'"
        );
    }

    #[test]
    fn loose_sql_text_dispatches_on_placeholder() {
        let mut p = Predicate::new();
        p.add_predicates(
            [PredicateSource::sql("1 = 1"), PredicateSource::sql("a > ?")],
            Combinator::And,
        );
        // The template form strips unbound markers.
        assert_eq!(render(&p), "1 = 1 AND a > ");
    }
}
