//! PostgreSQL dialect.

use super::{update_join_with_from, Dialect};
use crate::builder::expr::Expr;
use crate::builder::query_builder::QueryBuilder;
use crate::builder::update::Assignment;
use crate::error::{Error, Result};
use crate::schema::Join;

/// PostgreSQL dialect.
///
/// Join updates use `UPDATE t SET ... FROM other WHERE ...`. LIMIT is not
/// available for UPDATE.
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresDialect;

impl PostgresDialect {
    /// Creates a new PostgreSQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    fn supports_update_limit(&self) -> bool {
        false
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
                "postgresql doesn't support LIMIT in UPDATE clause",
            ));
        }
        update_join_with_from(self.name(), qb, target, assignments, predicate, false, None)
    }
}
