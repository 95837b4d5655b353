use crate::compiler::{resolve_argument, CompileContext, SqlStatement};
use crate::dialect::Dialect;
use crate::error::Result;
use crate::expr::{normalize_unchecked, Argument, ExprArg, ValueKind};
use crate::predicate::Where;
use crate::specification::{resolve, ParamValue, PositionSpec, Specification, TemplateVariant};
use crate::statement::{
    assemble, joins_section, resolve_table, where_section, Join, JoinType, TableSource,
};
use crate::value::SqlValue;

/// One projected column.
#[derive(Debug)]
pub enum Projection {
    /// `*`
    All,
    /// A column, expression, or sub-query, optionally aliased.
    Column {
        argument: Argument,
        alias: Option<String>,
    },
}

impl Projection {
    /// A projection without an alias. Untagged text is an identifier.
    pub fn column(expr: impl Into<ExprArg>) -> Self {
        Self::Column {
            argument: normalize_unchecked(expr.into(), ValueKind::Identifier),
            alias: None,
        }
    }

    /// An aliased projection.
    pub fn aliased(expr: impl Into<ExprArg>, alias: impl Into<String>) -> Self {
        Self::Column {
            argument: normalize_unchecked(expr.into(), ValueKind::Identifier),
            alias: Some(alias.into()),
        }
    }
}

impl From<&str> for Projection {
    fn from(column: &str) -> Self {
        Self::column(column)
    }
}

/// Sort direction of one ORDER BY term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Ascending,
    Descending,
}

impl OrderDirection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// A SELECT statement.
///
/// Column groups resolve through the combined column specification
/// (`expr` / `expr AS alias` joined with `, `); joins go through the
/// shared join specification.
#[derive(Debug, Default)]
pub struct Select {
    columns: Vec<Projection>,
    from: Option<TableSource>,
    joins: Vec<Join>,
    where_clause: Where,
    order: Vec<(String, OrderDirection)>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl Select {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the FROM source.
    #[must_use]
    pub fn from(mut self, table: impl Into<TableSource>) -> Self {
        self.from = Some(table.into());
        self
    }

    /// Replaces the projection list.
    #[must_use]
    pub fn columns<I>(mut self, columns: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Projection>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Adds one projection.
    #[must_use]
    pub fn column(mut self, projection: impl Into<Projection>) -> Self {
        self.columns.push(projection.into());
        self
    }

    /// Adds a join clause.
    #[must_use]
    pub fn join(
        mut self,
        join_type: JoinType,
        table: impl Into<TableSource>,
        on: impl Into<String>,
    ) -> Self {
        self.joins.push(Join::new(join_type, table, on));
        self
    }

    /// Edits the WHERE predicate in place.
    #[must_use]
    pub fn where_clause(mut self, f: impl FnOnce(&mut Where)) -> Self {
        f(&mut self.where_clause);
        self
    }

    /// Adds an ORDER BY term.
    #[must_use]
    pub fn order_by(mut self, column: impl Into<String>, direction: OrderDirection) -> Self {
        self.order.push((column.into(), direction));
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }
}

fn column_position() -> PositionSpec {
    PositionSpec::combined(", ")
        .with(1, "%1$s")
        .with(2, "%1$s AS %2$s")
}

fn select_specification() -> Result<Specification> {
    Specification::table(vec![
        TemplateVariant::new("SELECT %1$s", vec![Some(column_position())]),
        TemplateVariant::new(
            "SELECT %1$s FROM %2$s",
            vec![Some(column_position()), None],
        ),
    ])
}

impl SqlStatement for Select {
    fn build_sql(&self, dialect: &dyn Dialect, ctx: &mut CompileContext) -> Result<String> {
        let mut groups = Vec::with_capacity(self.columns.len().max(1));
        if self.columns.is_empty() {
            groups.push(vec![String::from("*")]);
        }
        for (position, projection) in self.columns.iter().enumerate() {
            match projection {
                Projection::All => groups.push(vec![String::from("*")]),
                Projection::Column { argument, alias } => {
                    let scope = format!("column{}", position + 1);
                    let sql = resolve_argument(argument, dialect, ctx, &scope)?;
                    match alias {
                        Some(alias) => groups.push(vec![sql, dialect.quote_identifier(alias)]),
                        None => groups.push(vec![sql]),
                    }
                }
            }
        }
        let mut parameters = vec![ParamValue::Groups(groups)];
        if let Some(from) = &self.from {
            parameters.push(ParamValue::sql(resolve_table(from, dialect, ctx)?));
        }

        let mut sections = vec![resolve(&select_specification()?, &parameters)?];
        sections.push(joins_section(&self.joins, dialect, ctx)?);
        sections.push(where_section(&self.where_clause, dialect, ctx)?);
        if !self.order.is_empty() {
            let terms = self
                .order
                .iter()
                .map(|(column, direction)| {
                    format!(
                        "{} {}",
                        dialect.quote_identifier_in_fragment(column, &[]),
                        direction.as_str()
                    )
                })
                .collect::<Vec<_>>()
                .join(", ");
            sections.push(format!("ORDER BY {terms}"));
        }
        if let Some(limit) = self.limit {
            sections.push(format!(
                "LIMIT {}",
                dialect.quote_trusted_value(&SqlValue::Int(limit))
            ));
        }
        if let Some(offset) = self.offset {
            sections.push(format!(
                "OFFSET {}",
                dialect.quote_trusted_value(&SqlValue::Int(offset))
            ));
        }
        Ok(assemble(sections))
    }
}

impl From<Select> for ExprArg {
    fn from(select: Select) -> Self {
        Self::Subquery(Box::new(select))
    }
}

impl From<Select> for TableSource {
    fn from(select: Select) -> Self {
        Self::Subquery(Box::new(select))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::AnsiDialect;
    use crate::expr::Expression;

    #[test]
    fn bare_select_defaults_to_star() {
        let select = Select::new().from("users");
        let sql = select.sql_string(&AnsiDialect::new()).unwrap();
        assert_eq!(sql, "SELECT * FROM \"users\"");
    }

    #[test]
    fn aliased_and_expression_columns() {
        let select = Select::new()
            .from("users")
            .column("id")
            .column(Projection::aliased(
                ExprArg::node(Expression::raw("COUNT(*)")),
                "total",
            ));
        let sql = select.sql_string(&AnsiDialect::new()).unwrap();
        assert_eq!(sql, "SELECT \"id\", COUNT(*) AS \"total\" FROM \"users\"");
    }

    #[test]
    fn full_clause_ordering() {
        let select = Select::new()
            .from("users")
            .join(JoinType::Inner, "orders", "orders.user_id = users.id")
            .where_clause(|w| {
                w.greater_than_or_equal_to("age", 18);
            })
            .order_by("name", OrderDirection::Ascending)
            .limit(10)
            .offset(20);
        let sql = select.sql_string(&AnsiDialect::new()).unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM \"users\" INNER JOIN \"orders\" ON \"orders\".\"user_id\" = \"users\".\"id\" WHERE \"age\" >= 18 ORDER BY \"name\" ASC LIMIT 10 OFFSET 20"
        );
    }

    #[test]
    fn select_without_from_renders_alone() {
        let select = Select::new().column(Projection::column(ExprArg::literal("1")));
        let sql = select.sql_string(&AnsiDialect::new()).unwrap();
        assert_eq!(sql, "SELECT 1");
    }

    #[test]
    fn derived_table_is_parenthesized() {
        let inner = Select::new().from("events").where_clause(|w| {
            w.is_null("deleted_at");
        });
        let select = Select::new().from(inner);
        let sql = select.sql_string(&AnsiDialect::new()).unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM (SELECT * FROM \"events\" WHERE \"deleted_at\" IS NULL)"
        );
    }
}
