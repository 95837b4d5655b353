//! Statement assembly.
//!
//! Statements are thin facades: each renders its clauses as ordered
//! sections, resolves the sectioned parameters against a
//! [`Specification`](crate::specification::Specification), and joins the
//! non-empty results. They exist chiefly to exercise the assembler and to
//! serve as real sub-queries; fluent argument collection is kept minimal.

mod delete;
mod select;
mod update;

pub use delete::Delete;
pub use select::{OrderDirection, Projection, Select};
pub use update::Update;

use crate::compiler::{CompileContext, SqlStatement};
use crate::dialect::Dialect;
use crate::error::Result;
use crate::expr::{normalize_unchecked, Argument, ExprArg, ValueKind};
use crate::specification::{resolve, ParamValue, PositionSpec, Specification, TemplateVariant};

/// A table name with an optional schema qualifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableIdentifier {
    table: String,
    schema: Option<String>,
}

impl TableIdentifier {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            schema: None,
        }
    }

    /// Adds a schema qualifier.
    #[must_use]
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// The unqualified table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }
}

/// The source a statement reads from or writes to.
#[derive(Debug)]
pub enum TableSource {
    /// A (possibly schema-qualified) table name.
    Table(TableIdentifier),
    /// A derived table, compiled and parenthesized.
    Subquery(Box<dyn SqlStatement>),
}

impl From<TableIdentifier> for TableSource {
    fn from(identifier: TableIdentifier) -> Self {
        Self::Table(identifier)
    }
}

impl From<&str> for TableSource {
    fn from(table: &str) -> Self {
        Self::Table(TableIdentifier::new(table))
    }
}

impl From<String> for TableSource {
    fn from(table: String) -> Self {
        Self::Table(TableIdentifier::new(table))
    }
}

/// Renders a table source, honoring the dialect's table-quoting policy.
pub(crate) fn resolve_table(
    source: &TableSource,
    dialect: &dyn Dialect,
    ctx: &mut CompileContext,
) -> Result<String> {
    match source {
        TableSource::Table(identifier) => {
            let mut chain: Vec<&str> = Vec::with_capacity(2);
            if let Some(schema) = &identifier.schema {
                chain.push(schema);
            }
            chain.push(&identifier.table);
            if dialect.quotes_table_names() {
                Ok(dialect.quote_identifier_chain(&chain))
            } else {
                Ok(chain.join(dialect.identifier_separator()))
            }
        }
        TableSource::Subquery(statement) => {
            Ok(format!("({})", statement.build_sql(dialect, ctx)?))
        }
    }
}

/// An insertion-ordered column-to-value map, used by SET clauses.
///
/// Setting an existing column replaces its value in place; order of first
/// insertion is what renders.
#[derive(Debug, Default)]
pub struct ColumnMap {
    entries: Vec<(String, Argument)>,
}

impl ColumnMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a column. Untagged scalars normalize to quoted values.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<ExprArg>) {
        let column = column.into();
        let argument = normalize_unchecked(value.into(), ValueKind::Value);
        match self.entries.iter_mut().find(|(name, _)| *name == column) {
            Some(entry) => entry.1 = argument,
            None => self.entries.push((column, argument)),
        }
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Argument> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, argument)| argument)
    }

    pub fn remove(&mut self, column: &str) -> Option<Argument> {
        let index = self.entries.iter().position(|(name, _)| name == column)?;
        Some(self.entries.remove(index).1)
    }

    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.entries.iter().any(|(name, _)| name == column)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Argument)> {
        self.entries
            .iter()
            .map(|(name, argument)| (name.as_str(), argument))
    }
}

/// Joins non-empty sections with single spaces and trims trailing
/// separator debris.
pub(crate) fn assemble<I>(sections: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let joined = sections
        .into_iter()
        .filter(|section| !section.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    joined.trim_end_matches(['\n', ' ', ',']).to_owned()
}

/// Kinds of join supported by SELECT and UPDATE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Outer,
    Cross,
}

impl JoinType {
    /// The uppercase SQL keyword, without the trailing `JOIN`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inner => "INNER",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Outer => "OUTER",
            Self::Cross => "CROSS",
        }
    }
}

/// One join clause: type, target, and raw ON condition.
#[derive(Debug)]
pub struct Join {
    pub(crate) join_type: JoinType,
    pub(crate) table: TableSource,
    pub(crate) on: String,
}

/// Words left unquoted inside ON conditions.
const JOIN_SAFE_WORDS: &[&str] = &["=", "AND", "OR", "(", ")", "BETWEEN", "<", ">"];

impl Join {
    pub fn new(join_type: JoinType, table: impl Into<TableSource>, on: impl Into<String>) -> Self {
        Self {
            join_type,
            table: table.into(),
            on: on.into(),
        }
    }

    /// Renders this join as one `[type, table, condition]` group for the
    /// combined join specification.
    pub(crate) fn as_group(
        &self,
        dialect: &dyn Dialect,
        ctx: &mut CompileContext,
    ) -> Result<Vec<String>> {
        Ok(vec![
            self.join_type.as_str().to_owned(),
            resolve_table(&self.table, dialect, ctx)?,
            dialect.quote_identifier_in_fragment(&self.on, JOIN_SAFE_WORDS),
        ])
    }
}

/// The shared `<type> JOIN <table> ON <condition>` specification, with
/// consecutive joins combined by a single space.
fn join_specification() -> Result<Specification> {
    Specification::table(vec![TemplateVariant::new(
        "%1$s",
        vec![Some(
            PositionSpec::combined(" ").with(3, "%1$s JOIN %2$s ON %3$s"),
        )],
    )])
}

pub(crate) fn joins_section(
    joins: &[Join],
    dialect: &dyn Dialect,
    ctx: &mut CompileContext,
) -> Result<String> {
    if joins.is_empty() {
        return Ok(String::new());
    }
    let groups = joins
        .iter()
        .map(|join| join.as_group(dialect, ctx))
        .collect::<Result<Vec<_>>>()?;
    resolve(&join_specification()?, &[ParamValue::Groups(groups)])
}

pub(crate) fn where_section(
    predicate: &crate::predicate::Where,
    dialect: &dyn Dialect,
    ctx: &mut CompileContext,
) -> Result<String> {
    if predicate.is_empty() {
        return Ok(String::new());
    }
    let sql = crate::compiler::compile_expression(predicate, dialect, ctx, Some("where"))?;
    Ok(format!("WHERE {sql}"))
}
