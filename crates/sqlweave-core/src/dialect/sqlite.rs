//! SQLite dialect implementation.

use super::{update_join_with_from, Dialect};
use crate::builder::expr::Expr;
use crate::builder::query_builder::QueryBuilder;
use crate::builder::update::Assignment;
use crate::error::{Error, Result};
use crate::schema::Join;

/// SQLite dialect.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteDialect;

impl SqliteDialect {
    /// Creates a new SQLite dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    // UPDATE ... LIMIT needs SQLITE_ENABLE_UPDATE_DELETE_LIMIT, which the
    // stock builds don't set.
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
            return Err(Error::unsupported("sqlite doesn't support LIMIT in UPDATE clause"));
        }
        // UPDATE ... FROM, SQLite 3.33.0+
        update_join_with_from(self.name(), qb, target, assignments, predicate, false, None)
    }
}
