use std::borrow::Cow;

use crate::error::Result;
use crate::expr::{normalize_unchecked, Argument, ExprArg, ExpressionNode, Fragment, ValueKind};

/// `identifier BETWEEN min AND max`, optionally negated.
#[derive(Debug)]
pub struct Between {
    identifier: Argument,
    min: Argument,
    max: Argument,
    negated: bool,
}

impl Between {
    /// Builds a range check. The first operand defaults to an identifier,
    /// the bounds to values.
    pub fn new(
        identifier: impl Into<ExprArg>,
        min: impl Into<ExprArg>,
        max: impl Into<ExprArg>,
    ) -> Self {
        Self {
            identifier: normalize_unchecked(identifier.into(), ValueKind::Identifier),
            min: normalize_unchecked(min.into(), ValueKind::Value),
            max: normalize_unchecked(max.into(), ValueKind::Value),
            negated: false,
        }
    }

    /// Flips to `NOT BETWEEN`.
    #[must_use]
    pub fn negate(mut self) -> Self {
        self.negated = true;
        self
    }
}

impl ExpressionNode for Between {
    fn expression_data(&self) -> Result<Vec<Fragment<'_>>> {
        let template = if self.negated {
            "%1$s NOT BETWEEN %2$s AND %3$s"
        } else {
            "%1$s BETWEEN %2$s AND %3$s"
        };
        Ok(vec![Fragment::Template {
            template: Cow::Borrowed(template),
            args: vec![&self.identifier, &self.min, &self.max],
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{compile_expression, CompileContext};
    use crate::dialect::AnsiDialect;

    #[test]
    fn renders_range_with_quoted_bounds() {
        let between = Between::new("age", 18, 65);
        let dialect = AnsiDialect::new();
        let mut ctx = CompileContext::new();
        let sql = compile_expression(&between, &dialect, &mut ctx, None).unwrap();
        assert_eq!(sql, "\"age\" BETWEEN 18 AND 65");
    }

    #[test]
    fn negation_changes_the_keyword() {
        let between = Between::new("age", 18, 65).negate();
        let dialect = AnsiDialect::new();
        let mut ctx = CompileContext::new();
        let sql = compile_expression(&between, &dialect, &mut ctx, None).unwrap();
        assert_eq!(sql, "\"age\" NOT BETWEEN 18 AND 65");
    }
}
