//! Expression nodes and their rendering contract.
//!
//! Every piece of a statement that ends up as SQL text implements
//! [`ExpressionNode`]: it describes itself as an ordered sequence of
//! [`Fragment`]s which the compiler then turns into a string. Adding a new
//! predicate or expression kind means implementing this one trait.

mod expression;
mod literal;

pub use expression::{Expression, PLACEHOLDER};
pub use literal::Literal;

use std::borrow::Cow;
use std::fmt;

use crate::compiler::SqlStatement;
use crate::error::{Result, SqlError};
use crate::value::{SqlValue, ToSqlValue};

/// How an argument is rendered into SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Quoted as a column or table name.
    Identifier,
    /// Escaped and quoted as a literal value.
    Value,
    /// Emitted verbatim; the caller vouches for the content.
    Literal,
    /// A nested sub-query, compiled recursively and parenthesized.
    Select,
}

impl ValueKind {
    /// Every kind; the default allowed set.
    pub const ALL: [Self; 4] = [Self::Identifier, Self::Value, Self::Literal, Self::Select];
}

/// The payload of a normalized argument.
#[derive(Debug)]
pub enum Operand {
    /// A scalar value.
    Value(SqlValue),
    /// A nested expression, compiled under a derived scope.
    Expression(Box<dyn ExpressionNode>),
    /// A nested sub-query, compiled and parenthesized.
    Subquery(Box<dyn SqlStatement>),
}

/// An argument resolved to `(operand, kind)` at the construction boundary.
///
/// Downstream code matches on the operand and kind exhaustively instead of
/// re-inspecting loose input.
#[derive(Debug)]
pub struct Argument {
    pub(crate) operand: Operand,
    pub(crate) kind: ValueKind,
}

impl Argument {
    /// Builds an argument, rejecting kinds outside `allowed`.
    pub fn new(operand: Operand, kind: ValueKind, allowed: &[ValueKind]) -> Result<Self> {
        if !allowed.contains(&kind) {
            return Err(SqlError::InvalidArgument(format!(
                "kind {kind:?} is not allowed in this position"
            )));
        }
        Ok(Self { operand, kind })
    }

    /// The rendering kind.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        self.kind
    }

    /// The payload.
    #[must_use]
    pub const fn operand(&self) -> &Operand {
        &self.operand
    }
}

/// Loosely-typed input accepted by expression and predicate constructors.
///
/// Normalized exactly once, via [`normalize_argument`].
#[derive(Debug)]
pub enum ExprArg {
    /// A plain scalar; takes the caller's default kind.
    Scalar(SqlValue),
    /// A scalar with an explicit kind.
    Tagged(SqlValue, ValueKind),
    /// A nested expression node.
    Node(Box<dyn ExpressionNode>),
    /// A nested sub-query.
    Subquery(Box<dyn SqlStatement>),
}

impl ExprArg {
    /// A scalar carrying the caller's default kind.
    pub fn value(value: impl ToSqlValue) -> Self {
        Self::Scalar(value.to_sql_value())
    }

    /// A scalar forced to render as an identifier.
    pub fn identifier(name: impl Into<String>) -> Self {
        Self::Tagged(SqlValue::Text(name.into()), ValueKind::Identifier)
    }

    /// A scalar emitted verbatim.
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Tagged(SqlValue::Text(text.into()), ValueKind::Literal)
    }

    /// A nested expression node.
    pub fn node(node: impl ExpressionNode + 'static) -> Self {
        Self::Node(Box::new(node))
    }

    /// A nested sub-query.
    pub fn subquery(statement: impl SqlStatement + 'static) -> Self {
        Self::Subquery(Box::new(statement))
    }
}

impl From<SqlValue> for ExprArg {
    fn from(value: SqlValue) -> Self {
        Self::Scalar(value)
    }
}

macro_rules! scalar_expr_arg {
    ($($ty:ty),+) => {
        $(impl From<$ty> for ExprArg {
            fn from(value: $ty) -> Self {
                Self::Scalar(value.to_sql_value())
            }
        })+
    };
}

scalar_expr_arg!(i64, i32, f64, bool, String, &str);

impl From<Box<dyn ExpressionNode>> for ExprArg {
    fn from(node: Box<dyn ExpressionNode>) -> Self {
        Self::Node(node)
    }
}

impl From<Expression> for ExprArg {
    fn from(node: Expression) -> Self {
        Self::Node(Box::new(node))
    }
}

impl From<Literal> for ExprArg {
    fn from(node: Literal) -> Self {
        Self::Node(Box::new(node))
    }
}

/// Resolves loose input into a normalized [`Argument`].
///
/// Nested nodes normalize to [`ValueKind::Value`] and sub-queries to
/// [`ValueKind::Select`]; scalars take `default_kind`. An explicitly tagged
/// kind outside `allowed` is an [`SqlError::InvalidArgument`].
pub fn normalize_argument(
    arg: impl Into<ExprArg>,
    default_kind: ValueKind,
    allowed: &[ValueKind],
) -> Result<Argument> {
    match arg.into() {
        ExprArg::Scalar(value) => Argument::new(Operand::Value(value), default_kind, allowed),
        ExprArg::Tagged(value, kind) => Argument::new(Operand::Value(value), kind, allowed),
        ExprArg::Node(node) => Ok(Argument {
            operand: Operand::Expression(node),
            kind: ValueKind::Value,
        }),
        ExprArg::Subquery(statement) => Ok(Argument {
            operand: Operand::Subquery(statement),
            kind: ValueKind::Select,
        }),
    }
}

/// Normalization against the full allowed set; cannot fail.
pub(crate) fn normalize_unchecked(arg: ExprArg, default_kind: ValueKind) -> Argument {
    match arg {
        ExprArg::Scalar(value) => Argument {
            operand: Operand::Value(value),
            kind: default_kind,
        },
        ExprArg::Tagged(value, kind) => Argument {
            operand: Operand::Value(value),
            kind,
        },
        ExprArg::Node(node) => Argument {
            operand: Operand::Expression(node),
            kind: ValueKind::Value,
        },
        ExprArg::Subquery(statement) => Argument {
            operand: Operand::Subquery(statement),
            kind: ValueKind::Select,
        },
    }
}

/// One ordered piece of a node's rendering.
#[derive(Debug)]
pub enum Fragment<'a> {
    /// Finished text, appended verbatim.
    Text(Cow<'a, str>),
    /// A template with positionally aligned arguments.
    Template {
        /// Positional template: `%s` sequential, `%N$s` indexed, `%%` escape.
        template: Cow<'a, str>,
        /// Arguments, aligned with the template's positions.
        args: Vec<&'a Argument>,
    },
}

impl<'a> Fragment<'a> {
    /// A borrowed text fragment.
    #[must_use]
    pub fn text(text: &'a str) -> Self {
        Self::Text(Cow::Borrowed(text))
    }

    /// An owned text fragment.
    #[must_use]
    pub fn owned_text(text: String) -> Self {
        Self::Text(Cow::Owned(text))
    }
}

/// Contract every expression and predicate kind implements.
pub trait ExpressionNode: fmt::Debug {
    /// The node's rendering as an ordered fragment sequence.
    ///
    /// Order is significant; consumers must preserve it.
    fn expression_data(&self) -> Result<Vec<Fragment<'_>>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_takes_default_kind() {
        let arg = normalize_argument(18, ValueKind::Value, &ValueKind::ALL).unwrap();
        assert_eq!(arg.kind(), ValueKind::Value);
        assert!(matches!(arg.operand(), Operand::Value(SqlValue::Int(18))));
    }

    #[test]
    fn tagged_kind_wins() {
        let arg = normalize_argument(
            ExprArg::identifier("age"),
            ValueKind::Value,
            &ValueKind::ALL,
        )
        .unwrap();
        assert_eq!(arg.kind(), ValueKind::Identifier);
    }

    #[test]
    fn disallowed_kind_is_rejected() {
        let err = normalize_argument(
            ExprArg::literal("1 + 1"),
            ValueKind::Value,
            &[ValueKind::Identifier, ValueKind::Value],
        )
        .unwrap_err();
        assert!(matches!(err, SqlError::InvalidArgument(_)));
    }

    #[test]
    fn nested_node_normalizes_to_value_kind() {
        let arg = normalize_argument(
            Expression::new("LOWER(?)", vec![SqlValue::Text(String::from("A"))]),
            ValueKind::Identifier,
            &ValueKind::ALL,
        )
        .unwrap();
        assert_eq!(arg.kind(), ValueKind::Value);
        assert!(matches!(arg.operand(), Operand::Expression(_)));
    }
}
