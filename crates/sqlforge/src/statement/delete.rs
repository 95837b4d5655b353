use crate::compiler::{CompileContext, SqlStatement};
use crate::dialect::Dialect;
use crate::error::Result;
use crate::predicate::Where;
use crate::specification::{resolve, ParamValue, Specification};
use crate::statement::{assemble, resolve_table, where_section, TableSource};

/// A DELETE statement: target table and WHERE.
#[derive(Debug)]
pub struct Delete {
    table: TableSource,
    where_clause: Where,
}

impl Delete {
    pub fn new(table: impl Into<TableSource>) -> Self {
        Self {
            table: table.into(),
            where_clause: Where::new(),
        }
    }

    /// Edits the WHERE predicate in place.
    #[must_use]
    pub fn where_clause(mut self, f: impl FnOnce(&mut Where)) -> Self {
        f(&mut self.where_clause);
        self
    }
}

impl SqlStatement for Delete {
    fn build_sql(&self, dialect: &dyn Dialect, ctx: &mut CompileContext) -> Result<String> {
        let spec = Specification::flat("DELETE FROM %1$s");
        let table = resolve_table(&self.table, dialect, ctx)?;
        let sections = vec![
            resolve(&spec, &[ParamValue::sql(table)])?,
            where_section(&self.where_clause, dialect, ctx)?,
        ];
        Ok(assemble(sections))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::AnsiDialect;

    #[test]
    fn empty_where_is_omitted_entirely() {
        let delete = Delete::new("sessions");
        let sql = delete.sql_string(&AnsiDialect::new()).unwrap();
        assert_eq!(sql, "DELETE FROM \"sessions\"");
    }

    #[test]
    fn predicate_renders_after_the_table() {
        let delete = Delete::new("sessions").where_clause(|w| {
            w.less_than("expires_at", 1_700_000_000);
        });
        let sql = delete.sql_string(&AnsiDialect::new()).unwrap();
        assert_eq!(
            sql,
            "DELETE FROM \"sessions\" WHERE \"expires_at\" < 1700000000"
        );
    }
}
