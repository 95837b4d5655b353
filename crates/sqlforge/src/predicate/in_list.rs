use std::borrow::Cow;

use crate::compiler::SqlStatement;
use crate::error::Result;
use crate::expr::{normalize_unchecked, Argument, ExprArg, ExpressionNode, Fragment, ValueKind};

/// The candidate set of an [`In`] predicate.
#[derive(Debug)]
pub enum InValues {
    /// An explicit value list.
    List(Vec<Argument>),
    /// A subquery producing the candidate rows.
    Subquery(Argument),
}

/// `identifier IN (...)`, over a value list or a subquery, optionally
/// negated. A multi-column tuple renders as `(a, b) IN (...)`.
#[derive(Debug)]
pub struct In {
    identifiers: Vec<Argument>,
    values: InValues,
    negated: bool,
}

impl In {
    /// Membership of a single column in a value list.
    pub fn new<I>(identifier: impl Into<ExprArg>, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ExprArg>,
    {
        Self {
            identifiers: vec![normalize_unchecked(identifier.into(), ValueKind::Identifier)],
            values: InValues::List(
                values
                    .into_iter()
                    .map(|v| normalize_unchecked(v.into(), ValueKind::Value))
                    .collect(),
            ),
            negated: false,
        }
    }

    /// Membership of a column tuple in a value list, one entry per row.
    pub fn tuple<C, I>(identifiers: C, values: I) -> Self
    where
        C: IntoIterator,
        C::Item: Into<ExprArg>,
        I: IntoIterator,
        I::Item: Into<ExprArg>,
    {
        Self {
            identifiers: identifiers
                .into_iter()
                .map(|c| normalize_unchecked(c.into(), ValueKind::Identifier))
                .collect(),
            values: InValues::List(
                values
                    .into_iter()
                    .map(|v| normalize_unchecked(v.into(), ValueKind::Value))
                    .collect(),
            ),
            negated: false,
        }
    }

    /// Membership in the rows of a subquery.
    pub fn with_subquery(
        identifier: impl Into<ExprArg>,
        statement: impl SqlStatement + 'static,
    ) -> Self {
        Self {
            identifiers: vec![normalize_unchecked(identifier.into(), ValueKind::Identifier)],
            values: InValues::Subquery(normalize_unchecked(
                ExprArg::subquery(statement),
                ValueKind::Value,
            )),
            negated: false,
        }
    }

    /// Flips to `NOT IN`.
    #[must_use]
    pub fn negate(mut self) -> Self {
        self.negated = true;
        self
    }

    fn identifier_template(&self) -> String {
        if self.identifiers.len() == 1 {
            "%s".to_owned()
        } else {
            let columns = vec!["%s"; self.identifiers.len()].join(", ");
            format!("({columns})")
        }
    }
}

impl ExpressionNode for In {
    fn expression_data(&self) -> Result<Vec<Fragment<'_>>> {
        let keyword = if self.negated { "NOT IN" } else { "IN" };
        let identifiers = self.identifier_template();
        let mut args: Vec<&Argument> = self.identifiers.iter().collect();
        let template = match &self.values {
            // The subquery marker needs no parentheses of its own; the
            // compiler wraps every subquery.
            InValues::Subquery(subquery) => {
                args.push(subquery);
                format!("{identifiers} {keyword} %s")
            }
            InValues::List(values) => {
                args.extend(values.iter());
                let markers = vec!["%s"; values.len()].join(", ");
                format!("{identifiers} {keyword} ({markers})")
            }
        };
        Ok(vec![Fragment::Template {
            template: Cow::Owned(template),
            args,
        }])
    }
}
