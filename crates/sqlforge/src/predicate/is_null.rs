use std::borrow::Cow;

use crate::error::Result;
use crate::expr::{normalize_unchecked, Argument, ExprArg, ExpressionNode, Fragment, ValueKind};

/// `identifier IS NULL`, optionally negated.
#[derive(Debug)]
pub struct IsNull {
    identifier: Argument,
    negated: bool,
}

impl IsNull {
    pub fn new(identifier: impl Into<ExprArg>) -> Self {
        Self {
            identifier: normalize_unchecked(identifier.into(), ValueKind::Identifier),
            negated: false,
        }
    }

    /// Flips to `IS NOT NULL`.
    #[must_use]
    pub fn negate(mut self) -> Self {
        self.negated = true;
        self
    }
}

impl ExpressionNode for IsNull {
    fn expression_data(&self) -> Result<Vec<Fragment<'_>>> {
        let template = if self.negated {
            "%1$s IS NOT NULL"
        } else {
            "%1$s IS NULL"
        };
        Ok(vec![Fragment::Template {
            template: Cow::Borrowed(template),
            args: vec![&self.identifier],
        }])
    }
}
