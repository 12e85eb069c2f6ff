//! H2 dialect.

use tracing::warn;

use super::{append_set_clause, append_where, table_to_update, Dialect};
use crate::builder::expr::Expr;
use crate::builder::query_builder::QueryBuilder;
use crate::builder::update::Assignment;
use crate::error::{Error, Result};
use crate::schema::{Join, JoinType};

/// H2 dialect.
///
/// A join update is emulated with
/// `MERGE INTO t USING u ON ... WHEN MATCHED THEN UPDATE SET ...`, which is
/// also what H2 runs in PostgreSQL, Oracle and SQL Server modes.
#[derive(Debug, Default, Clone, Copy)]
pub struct H2Dialect;

impl H2Dialect {
    /// Creates a new H2 dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for H2Dialect {
    fn name(&self) -> &'static str {
        "h2"
    }

    fn update_join(
        &self,
        qb: &mut QueryBuilder<'_>,
        target: &Join,
        assignments: &[Assignment],
        limit: Option<u64>,
        predicate: Option<&Expr>,
    ) -> Result<()> {
        if limit.is_some() {
            return Err(Error::unsupported(
                "h2 doesn't support LIMIT in UPDATE with a join clause",
            ));
        }
        let table = table_to_update(target, assignments, self.name())?;
        let [part] = target.parts() else {
            return Err(Error::unsupported(
                "h2 supports a join update with only one table to join",
            ));
        };
        if part.join_type != JoinType::Inner {
            warn!(
                join_type = part.join_type.as_sql(),
                "All tables in UPDATE statement will be joined with inner join"
            );
        }
        let source = if target.table().name() == table.name() {
            &part.table
        } else {
            target.table()
        };

        qb.append("MERGE INTO ");
        qb.append_table(table);
        qb.append(" USING ");
        qb.append_table(source);
        qb.append(" ON ");
        if part.has_conditions() {
            qb.append_join_conditions(part);
        } else {
            qb.append("TRUE");
        }
        qb.append(" WHEN MATCHED THEN UPDATE");
        append_set_clause(qb, assignments, true);
        append_where(qb, predicate);
        Ok(())
    }
}
