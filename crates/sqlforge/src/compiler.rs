//! Expression compilation.
//!
//! [`compile_expression`] walks a node's fragment sequence, recursively
//! compiling nested nodes and sub-queries and substituting scalar arguments
//! through the dialect's quoting rules.

use std::collections::HashMap;
use std::fmt;

use crate::dialect::Dialect;
use crate::error::{Result, SqlError};
use crate::expr::{ExpressionNode, Fragment, Operand, ValueKind};
use crate::interpolate::interpolate;

/// A statement that can render itself to SQL.
///
/// This is the sub-query embedding seam: anything implementing it can appear
/// as an operand and is compiled recursively, wrapped in parentheses.
pub trait SqlStatement: fmt::Debug {
    /// Renders the statement using an existing compilation context.
    fn build_sql(&self, dialect: &dyn Dialect, ctx: &mut CompileContext) -> Result<String>;

    /// Renders the statement with a fresh context.
    ///
    /// Each call gets its own counters, so one statement value can be
    /// compiled repeatedly (or by different callers) without shared state.
    fn sql_string(&self, dialect: &dyn Dialect) -> Result<String> {
        let mut ctx = CompileContext::new();
        self.build_sql(dialect, &mut ctx)
    }
}

/// Per-compilation state.
///
/// Holds the ambient scope prefix and the per-scope counters used to derive
/// unique synthetic names for nested sub-expressions. The names are purely
/// collision-avoidance bookkeeping; the emitted SQL always contains inlined
/// quoted text, never bind markers.
#[derive(Debug, Default)]
pub struct CompileContext {
    param_prefix: String,
    subselect_count: u32,
    parameter_index: HashMap<String, u32>,
}

impl CompileContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sub-queries compiled so far.
    #[must_use]
    pub const fn subselect_count(&self) -> u32 {
        self.subselect_count
    }

    /// Combines the ambient prefix with a caller-supplied scope name.
    ///
    /// Whitespace is not allowed in scope identifiers and collapses to `__`.
    fn derive_scope(&self, scope_prefix: Option<&str>) -> Option<String> {
        let prefix = scope_prefix?;
        let mut scope = String::with_capacity(self.param_prefix.len() + prefix.len());
        for c in self.param_prefix.chars().chain(prefix.chars()) {
            if c.is_whitespace() {
                scope.push_str("__");
            } else {
                scope.push(c);
            }
        }
        Some(scope)
    }

    /// Bumps and returns the reservation counter for a scope name.
    ///
    /// Repeated reservations of one name count upwards, so every
    /// reservation has a distinct `(name, sequence)` identity.
    fn reserve_scope(&mut self, scope: &str) -> u32 {
        let counter = self.parameter_index.entry(String::from(scope)).or_insert(0);
        *counter += 1;
        *counter
    }
}

/// Compiles an expression node into a SQL string.
///
/// `scope_prefix` names the compilation scope for nested sub-expressions;
/// a nested node at template position `i` compiles under
/// `<scope><i>subpart` so deeply nested scopes stay distinct.
pub fn compile_expression(
    node: &dyn ExpressionNode,
    dialect: &dyn Dialect,
    ctx: &mut CompileContext,
    scope_prefix: Option<&str>,
) -> Result<String> {
    let scope = ctx.derive_scope(scope_prefix);
    if let Some(name) = &scope {
        ctx.reserve_scope(name);
    }

    let mut sql = String::new();
    for fragment in node.expression_data()? {
        match fragment {
            Fragment::Text(text) => sql.push_str(&text),
            Fragment::Template { template, args } => {
                let mut values = Vec::with_capacity(args.len());
                for (position, arg) in args.iter().enumerate() {
                    let child = format!("{}{position}subpart", scope.as_deref().unwrap_or(""));
                    values.push(resolve_argument(arg, dialect, ctx, &child)?);
                }
                let rendered = interpolate(&template, &values).map_err(|err| match err {
                    SqlError::ArityMismatch { expected, found } => SqlError::MalformedExpression(
                        format!("template declares {expected} position(s) but the node supplied {found} argument(s)"),
                    ),
                    other => other,
                })?;
                sql.push_str(&rendered);
            }
        }
    }
    Ok(sql)
}

/// Renders one normalized argument.
///
/// `scope` names the compilation scope a nested expression operand compiles
/// under; scalar operands dispatch through the dialect on their kind.
pub(crate) fn resolve_argument(
    arg: &crate::expr::Argument,
    dialect: &dyn Dialect,
    ctx: &mut CompileContext,
    scope: &str,
) -> Result<String> {
    match arg.operand() {
        Operand::Subquery(subquery) => {
            ctx.subselect_count += 1;
            // Scopes reserved inside the sub-query carry its ambient
            // prefix, so sibling sub-queries never collide.
            let ambient = std::mem::replace(
                &mut ctx.param_prefix,
                format!("subselect{}", ctx.subselect_count),
            );
            let built = subquery.build_sql(dialect, ctx);
            ctx.param_prefix = ambient;
            Ok(format!("({})", built?))
        }
        Operand::Expression(nested) => {
            compile_expression(nested.as_ref(), dialect, ctx, Some(scope))
        }
        Operand::Value(value) => match arg.kind() {
            ValueKind::Identifier => {
                Ok(dialect.quote_identifier_in_fragment(&value.as_plain_text(), &[]))
            }
            ValueKind::Value => Ok(dialect.quote_value(value)),
            ValueKind::Literal => Ok(value.as_plain_text()),
            ValueKind::Select => Err(SqlError::MalformedExpression(String::from(
                "select-kind argument without a sub-query operand",
            ))),
        },
    }
}
