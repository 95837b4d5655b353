use std::borrow::Cow;

use crate::error::Result;
use crate::expr::{normalize_unchecked, Argument, ExprArg, ExpressionNode, Fragment, ValueKind};

/// `identifier LIKE pattern`, optionally negated.
#[derive(Debug)]
pub struct Like {
    identifier: Argument,
    pattern: Argument,
    negated: bool,
}

impl Like {
    pub fn new(identifier: impl Into<ExprArg>, pattern: impl Into<ExprArg>) -> Self {
        Self {
            identifier: normalize_unchecked(identifier.into(), ValueKind::Identifier),
            pattern: normalize_unchecked(pattern.into(), ValueKind::Value),
            negated: false,
        }
    }

    /// Flips to `NOT LIKE`.
    #[must_use]
    pub fn negate(mut self) -> Self {
        self.negated = true;
        self
    }
}

impl ExpressionNode for Like {
    fn expression_data(&self) -> Result<Vec<Fragment<'_>>> {
        let template = if self.negated {
            "%1$s NOT LIKE %2$s"
        } else {
            "%1$s LIKE %2$s"
        };
        Ok(vec![Fragment::Template {
            template: Cow::Borrowed(template),
            args: vec![&self.identifier, &self.pattern],
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{compile_expression, CompileContext};
    use crate::dialect::AnsiDialect;

    #[test]
    fn pattern_is_quoted_as_a_value() {
        let like = Like::new("name", "Jo%");
        let dialect = AnsiDialect::new();
        let mut ctx = CompileContext::new();
        let sql = compile_expression(&like, &dialect, &mut ctx, None).unwrap();
        assert_eq!(sql, "\"name\" LIKE 'Jo%'");
    }
}
