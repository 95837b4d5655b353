//! Raw templates with `?` placeholders.

use std::borrow::Cow;

use crate::error::{Result, SqlError};
use crate::expr::{normalize_unchecked, Argument, ExprArg, ValueKind};

use super::{ExpressionNode, Fragment};

/// The placeholder marker in user-supplied templates.
pub const PLACEHOLDER: char = '?';

/// A free-form SQL template with positional `?` placeholders.
///
/// Each placeholder consumes one parameter in order. Parameters default to
/// [`ValueKind::Value`] but may be tagged identifiers, literals, nested
/// expressions or sub-queries.
#[derive(Debug)]
pub struct Expression {
    expression: String,
    parameters: Vec<Argument>,
}

impl Expression {
    /// Creates a template expression with its parameters.
    pub fn new<I>(expression: impl Into<String>, parameters: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ExprArg>,
    {
        Self {
            expression: expression.into(),
            parameters: parameters
                .into_iter()
                .map(|p| normalize_unchecked(p.into(), ValueKind::Value))
                .collect(),
        }
    }

    /// Creates a parameterless template.
    pub fn raw(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            parameters: Vec::new(),
        }
    }

    /// The template text as supplied.
    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }
}

impl ExpressionNode for Expression {
    fn expression_data(&self) -> Result<Vec<Fragment<'_>>> {
        if self.parameters.is_empty() {
            // No parameters: strip placeholder markers rather than leaving
            // them dangling, and emit the text as-is.
            let stripped: String = self
                .expression
                .chars()
                .filter(|c| *c != PLACEHOLDER)
                .collect();
            return Ok(vec![Fragment::owned_text(stripped)]);
        }

        let marker_count = self.expression.chars().filter(|c| *c == PLACEHOLDER).count();
        if marker_count != self.parameters.len() {
            return Err(SqlError::ArityMismatch {
                expected: marker_count,
                found: self.parameters.len(),
            });
        }

        // Escape literal percents before the markers become %s positions.
        let template = self
            .expression
            .replace('%', "%%")
            .replace(PLACEHOLDER, "%s");

        Ok(vec![Fragment::Template {
            template: Cow::Owned(template),
            args: self.parameters.iter().collect(),
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::SqlValue;

    #[test]
    fn parameterless_template_strips_markers() {
        let expr = Expression::raw("since > ?");
        let parts = expr.expression_data().unwrap();
        assert!(matches!(&parts[0], Fragment::Text(t) if t == "since > "));
    }

    #[test]
    fn markers_become_positions() {
        let expr = Expression::new("? > ?", [SqlValue::Int(2), SqlValue::Int(1)]);
        let parts = expr.expression_data().unwrap();
        match &parts[0] {
            Fragment::Template { template, args } => {
                assert_eq!(template, "%s > %s");
                assert_eq!(args.len(), 2);
            }
            Fragment::Text(_) => panic!("expected a template fragment"),
        }
    }

    #[test]
    fn percent_is_escaped_in_template() {
        let expr = Expression::new("name LIKE '%' || ?", [SqlValue::Text(String::from("a"))]);
        let parts = expr.expression_data().unwrap();
        match &parts[0] {
            Fragment::Template { template, .. } => assert_eq!(template, "name LIKE '%%' || %s"),
            Fragment::Text(_) => panic!("expected a template fragment"),
        }
    }

    #[test]
    fn marker_count_mismatch_errors() {
        let expr = Expression::new("a = ?", [SqlValue::Int(1), SqlValue::Int(2)]);
        assert!(matches!(
            expr.expression_data(),
            Err(SqlError::ArityMismatch {
                expected: 1,
                found: 2
            })
        ));
    }
}
