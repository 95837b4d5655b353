use std::borrow::Cow;

use crate::error::Result;
use crate::expr::{
    normalize_unchecked, Argument, ExprArg, Expression, ExpressionNode, Fragment, Operand,
    ValueKind,
};
use crate::value::SqlValue;

/// `IF(condition, then, else)`.
///
/// Each operand is parenthesized individually unless it is a subquery,
/// which already compiles inside parentheses.
#[derive(Debug)]
pub struct Conditional {
    condition: Argument,
    if_true: Argument,
    if_false: Argument,
}

impl Conditional {
    /// Builds a three-way conditional. Bare text as the condition is
    /// treated as a raw expression template; bare text in either branch
    /// stays a quoted value.
    pub fn new(
        condition: impl Into<ExprArg>,
        if_true: impl Into<ExprArg>,
        if_false: impl Into<ExprArg>,
    ) -> Self {
        let condition = match condition.into() {
            ExprArg::Scalar(SqlValue::Text(text))
            | ExprArg::Tagged(SqlValue::Text(text), ValueKind::Value) => {
                ExprArg::node(Expression::raw(text))
            }
            other => other,
        };
        Self {
            condition: normalize_unchecked(condition, ValueKind::Value),
            if_true: normalize_unchecked(if_true.into(), ValueKind::Value),
            if_false: normalize_unchecked(if_false.into(), ValueKind::Value),
        }
    }
}

impl ExpressionNode for Conditional {
    fn expression_data(&self) -> Result<Vec<Fragment<'_>>> {
        let mut template = String::from("IF(");
        for (position, argument) in [&self.condition, &self.if_true, &self.if_false]
            .into_iter()
            .enumerate()
        {
            if position > 0 {
                template.push_str(", ");
            }
            let marker = position + 1;
            if matches!(argument.operand(), Operand::Subquery(_)) {
                template.push_str(&format!("%{marker}$s"));
            } else {
                template.push_str(&format!("(%{marker}$s)"));
            }
        }
        template.push(')');
        Ok(vec![Fragment::Template {
            template: Cow::Owned(template),
            args: vec![&self.condition, &self.if_true, &self.if_false],
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{compile_expression, CompileContext};
    use crate::dialect::AnsiDialect;

    #[test]
    fn branches_are_parenthesized() {
        let cond = Conditional::new(
            "status = 'open'",
            ExprArg::value("yes"),
            ExprArg::value("no"),
        );
        let dialect = AnsiDialect::new();
        let mut ctx = CompileContext::new();
        let sql = compile_expression(&cond, &dialect, &mut ctx, None).unwrap();
        assert_eq!(sql, "IF((status = 'open'), ('yes'), ('no'))");
    }
}
