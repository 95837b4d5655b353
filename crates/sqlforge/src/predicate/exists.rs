use std::borrow::Cow;

use crate::error::Result;
use crate::expr::{
    normalize_unchecked, Argument, ExprArg, Expression, ExpressionNode, Fragment, Operand,
    ValueKind,
};
use crate::value::SqlValue;

/// `EXISTS (...)` over a subquery or an expression, optionally negated.
#[derive(Debug)]
pub struct Exists {
    inner: Argument,
    negated: bool,
}

impl Exists {
    /// Builds an existence check. Bare SQL text is treated as a raw
    /// expression template.
    pub fn new(inner: impl Into<ExprArg>) -> Self {
        let inner = match inner.into() {
            ExprArg::Scalar(SqlValue::Text(text))
            | ExprArg::Tagged(SqlValue::Text(text), ValueKind::Value) => {
                ExprArg::node(Expression::raw(text))
            }
            other => other,
        };
        Self {
            inner: normalize_unchecked(inner, ValueKind::Value),
            negated: false,
        }
    }

    /// Flips to `NOT EXISTS`.
    #[must_use]
    pub fn negate(mut self) -> Self {
        self.negated = true;
        self
    }
}

impl ExpressionNode for Exists {
    fn expression_data(&self) -> Result<Vec<Fragment<'_>>> {
        // A subquery is parenthesized by the compiler already; anything
        // else needs explicit parentheses here.
        let template = match (self.negated, self.inner.operand()) {
            (false, Operand::Subquery(_)) => "EXISTS %s",
            (true, Operand::Subquery(_)) => "NOT EXISTS %s",
            (false, _) => "EXISTS (%s)",
            (true, _) => "NOT EXISTS (%s)",
        };
        Ok(vec![Fragment::Template {
            template: Cow::Borrowed(template),
            args: vec![&self.inner],
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{compile_expression, CompileContext};
    use crate::dialect::AnsiDialect;

    #[test]
    fn expression_input_is_parenthesized() {
        let exists = Exists::new("SELECT 1");
        let dialect = AnsiDialect::new();
        let mut ctx = CompileContext::new();
        let sql = compile_expression(&exists, &dialect, &mut ctx, None).unwrap();
        assert_eq!(sql, "EXISTS (SELECT 1)");
    }

    #[test]
    fn negation_prefixes_not() {
        let exists = Exists::new("SELECT 1").negate();
        let dialect = AnsiDialect::new();
        let mut ctx = CompileContext::new();
        let sql = compile_expression(&exists, &dialect, &mut ctx, None).unwrap();
        assert_eq!(sql, "NOT EXISTS (SELECT 1)");
    }
}
