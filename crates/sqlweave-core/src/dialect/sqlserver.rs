//! SQL Server dialect.

use super::{append_set_clause, append_where, update_join_with_from, Dialect};
use crate::builder::expr::Expr;
use crate::builder::query_builder::QueryBuilder;
use crate::builder::update::Assignment;
use crate::error::Result;
use crate::schema::{Join, Table};

/// Microsoft SQL Server dialect. Row caps are written as `TOP(n)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqlServerDialect;

impl SqlServerDialect {
    /// Creates a new SQL Server dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for SqlServerDialect {
    fn name(&self) -> &'static str {
        "sqlserver"
    }

    fn update_table(
        &self,
        qb: &mut QueryBuilder<'_>,
        target: &Table,
        assignments: &[Assignment],
        limit: Option<u64>,
        predicate: Option<&Expr>,
    ) -> Result<()> {
        qb.append("UPDATE ");
        if let Some(limit) = limit {
            qb.append(&format!("TOP({limit}) "));
        }
        qb.append_table(target);
        append_set_clause(qb, assignments, false);
        append_where(qb, predicate);
        Ok(())
    }

    fn update_join(
        &self,
        qb: &mut QueryBuilder<'_>,
        target: &Join,
        assignments: &[Assignment],
        limit: Option<u64>,
        predicate: Option<&Expr>,
    ) -> Result<()> {
        update_join_with_from(self.name(), qb, target, assignments, predicate, true, limit)
    }
}
