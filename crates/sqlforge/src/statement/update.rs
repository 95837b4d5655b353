use crate::compiler::{resolve_argument, CompileContext, SqlStatement};
use crate::dialect::Dialect;
use crate::error::Result;
use crate::expr::ExprArg;
use crate::predicate::Where;
use crate::specification::{resolve, ParamValue, Specification};
use crate::statement::{
    assemble, joins_section, resolve_table, where_section, ColumnMap, Join, JoinType, TableSource,
};

/// An UPDATE statement: target table, joins, SET assignments, WHERE.
#[derive(Debug)]
pub struct Update {
    table: TableSource,
    joins: Vec<Join>,
    set: ColumnMap,
    where_clause: Where,
}

impl Update {
    pub fn new(table: impl Into<TableSource>) -> Self {
        Self {
            table: table.into(),
            joins: Vec::new(),
            set: ColumnMap::new(),
            where_clause: Where::new(),
        }
    }

    /// Assigns a column. Repeated assignment replaces the value in place.
    #[must_use]
    pub fn set(mut self, column: impl Into<String>, value: impl Into<ExprArg>) -> Self {
        self.set.set(column, value);
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
}

impl SqlStatement for Update {
    fn build_sql(&self, dialect: &dyn Dialect, ctx: &mut CompileContext) -> Result<String> {
        let spec = Specification::flat("UPDATE %1$s");
        let table = resolve_table(&self.table, dialect, ctx)?;
        let mut sections = vec![resolve(&spec, &[ParamValue::sql(table)])?];
        sections.push(joins_section(&self.joins, dialect, ctx)?);
        if !self.set.is_empty() {
            let mut assignments = Vec::with_capacity(self.set.len());
            for (position, (column, argument)) in self.set.iter().enumerate() {
                let scope = format!("set{}", position + 1);
                assignments.push(format!(
                    "{} = {}",
                    dialect.quote_identifier(column),
                    resolve_argument(argument, dialect, ctx, &scope)?
                ));
            }
            sections.push(format!("SET {}", assignments.join(", ")));
        }
        sections.push(where_section(&self.where_clause, dialect, ctx)?);
        Ok(assemble(sections))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::AnsiDialect;
    use crate::expr::Expression;
    use crate::value::SqlValue;

    #[test]
    fn assignments_preserve_order_and_quote_values() {
        let update = Update::new("users")
            .set("name", "Alice")
            .set("age", 30)
            .set("updated_at", ExprArg::node(Expression::raw("NOW()")));
        let sql = update.sql_string(&AnsiDialect::new()).unwrap();
        assert_eq!(
            sql,
            "UPDATE \"users\" SET \"name\" = 'Alice', \"age\" = 30, \"updated_at\" = NOW()"
        );
    }

    #[test]
    fn joins_render_between_table_and_set() {
        let update = Update::new("users")
            .join(JoinType::Inner, "orders", "orders.user_id = users.id")
            .set("flagged", true)
            .where_clause(|w| {
                w.equal_to("orders.status", ExprArg::value("stale"));
            });
        let sql = update.sql_string(&AnsiDialect::new()).unwrap();
        assert_eq!(
            sql,
            "UPDATE \"users\" INNER JOIN \"orders\" ON \"orders\".\"user_id\" = \"users\".\"id\" SET \"flagged\" = TRUE WHERE \"orders\".\"status\" = 'stale'"
        );
    }

    #[test]
    fn null_assignment_renders_null() {
        let update = Update::new("users").set("deleted_at", SqlValue::Null);
        let sql = update.sql_string(&AnsiDialect::new()).unwrap();
        assert_eq!(sql, "UPDATE \"users\" SET \"deleted_at\" = NULL");
    }
}
