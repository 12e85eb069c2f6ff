//! MySQL and MariaDB dialects.

use super::{append_set_clause, append_where, ensure_join_members, Dialect};
use crate::builder::expr::Expr;
use crate::builder::query_builder::QueryBuilder;
use crate::builder::update::Assignment;
use crate::error::{Error, Result};
use crate::schema::Join;

/// MySQL dialect.
#[derive(Debug, Default, Clone, Copy)]
pub struct MySqlDialect;

impl MySqlDialect {
    /// Creates a new MySQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn identifier_quote(&self) -> char {
        '`'
    }

    fn update_join(
        &self,
        qb: &mut QueryBuilder<'_>,
        target: &Join,
        assignments: &[Assignment],
        limit: Option<u64>,
        predicate: Option<&Expr>,
    ) -> Result<()> {
        multi_table_update(self.name(), qb, target, assignments, limit, predicate)
    }
}

/// MariaDB dialect. Shares MySQL's multi-table UPDATE syntax.
#[derive(Debug, Default, Clone, Copy)]
pub struct MariaDbDialect;

impl MariaDbDialect {
    /// Creates a new MariaDB dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for MariaDbDialect {
    fn name(&self) -> &'static str {
        "mariadb"
    }

    fn identifier_quote(&self) -> char {
        '`'
    }

    fn update_join(
        &self,
        qb: &mut QueryBuilder<'_>,
        target: &Join,
        assignments: &[Assignment],
        limit: Option<u64>,
        predicate: Option<&Expr>,
    ) -> Result<()> {
        multi_table_update(self.name(), qb, target, assignments, limit, predicate)
    }
}

/// Writes `UPDATE t1 INNER JOIN t2 ON ... SET t1.a = ? [WHERE p]`.
fn multi_table_update(
    dialect: &str,
    qb: &mut QueryBuilder<'_>,
    target: &Join,
    assignments: &[Assignment],
    limit: Option<u64>,
    predicate: Option<&Expr>,
) -> Result<()> {
    if limit.is_some() {
        return Err(Error::unsupported(format!(
            "{dialect} doesn't support LIMIT in a multi-table UPDATE"
        )));
    }
    ensure_join_members(target, assignments)?;
    qb.append("UPDATE ");
    qb.append_join(target);
    append_set_clause(qb, assignments, true);
    append_where(qb, predicate);
    Ok(())
}
