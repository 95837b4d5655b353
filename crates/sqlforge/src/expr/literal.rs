//! Verbatim SQL text.

use crate::error::Result;

use super::{ExpressionNode, Fragment};

/// A trusted piece of SQL emitted exactly as written.
///
/// Nothing is escaped or quoted. For text with parameters, use
/// [`super::Expression`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    literal: String,
}

impl Literal {
    /// Creates a literal from raw SQL text.
    pub fn new(literal: impl Into<String>) -> Self {
        Self {
            literal: literal.into(),
        }
    }

    /// The raw text.
    #[must_use]
    pub fn literal(&self) -> &str {
        &self.literal
    }
}

impl ExpressionNode for Literal {
    fn expression_data(&self) -> Result<Vec<Fragment<'_>>> {
        Ok(vec![Fragment::text(&self.literal)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_verbatim() {
        let lit = Literal::new("count(*) > 0");
        let parts = lit.expression_data().unwrap();
        assert_eq!(parts.len(), 1);
        assert!(matches!(&parts[0], Fragment::Text(t) if t == "count(*) > 0"));
    }
}
