use std::borrow::Cow;

use crate::error::Result;
use crate::expr::{
    normalize_argument, normalize_unchecked, Argument, ExprArg, ExpressionNode, Fragment,
    ValueKind,
};

/// Binary comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    /// `=`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
}

impl ComparisonOp {
    /// SQL spelling of the operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
        }
    }
}

/// A binary comparison between two operands.
///
/// Untagged scalars default to an identifier on the left and a value on the
/// right; explicit tags are honored.
#[derive(Debug)]
pub struct Operator {
    left: Argument,
    op: ComparisonOp,
    right: Argument,
}

const OPERAND_KINDS: &[ValueKind] = &[ValueKind::Identifier, ValueKind::Value];

impl Operator {
    /// Builds a comparison with default operand kinds.
    pub fn new(left: impl Into<ExprArg>, op: ComparisonOp, right: impl Into<ExprArg>) -> Self {
        Self {
            left: normalize_unchecked(left.into(), ValueKind::Identifier),
            op,
            right: normalize_unchecked(right.into(), ValueKind::Value),
        }
    }

    /// Builds a comparison validating that both operand kinds are
    /// identifier or value.
    pub fn with_kinds(
        left: impl Into<ExprArg>,
        op: ComparisonOp,
        right: impl Into<ExprArg>,
    ) -> Result<Self> {
        Ok(Self {
            left: normalize_argument(left.into(), ValueKind::Identifier, OPERAND_KINDS)?,
            op,
            right: normalize_argument(right.into(), ValueKind::Value, OPERAND_KINDS)?,
        })
    }
}

impl ExpressionNode for Operator {
    fn expression_data(&self) -> Result<Vec<Fragment<'_>>> {
        Ok(vec![Fragment::Template {
            template: Cow::Owned(format!("%s {} %s", self.op.as_str())),
            args: vec![&self.left, &self.right],
        }])
    }
}
