//! SQL Dialect support.
//!
//! Different databases have slightly different SQL syntax. Each dialect is a
//! function provider: a unit struct implementing [`Dialect`] that knows how
//! to quote identifiers and how to write an UPDATE against a single table
//! or against a join. Which provider applies is decided by a
//! [`DialectContext`], passed explicitly to every compile call.

mod context;
mod generic;
mod h2;
mod mysql;
mod oracle;
mod postgres;
mod sqlite;
mod sqlserver;

pub use context::{DialectContext, DialectKind, H2Mode};
pub use generic::GenericDialect;
pub use h2::H2Dialect;
pub use mysql::{MariaDbDialect, MySqlDialect};
pub use oracle::OracleDialect;
pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;
pub use sqlserver::SqlServerDialect;

use crate::builder::expr::{BinaryOp, Expr};
use crate::builder::query_builder::QueryBuilder;
use crate::builder::update::Assignment;
use crate::error::{Error, Result};
use crate::schema::{Column, Join, Table};

/// Words that are always quoted when used as identifiers.
const RESERVED_WORDS: &[&str] = &[
    "all", "and", "as", "by", "case", "check", "column", "constraint", "create", "default",
    "delete", "desc", "distinct", "drop", "else", "end", "exists", "from", "group", "having",
    "in", "index", "insert", "into", "is", "join", "key", "like", "limit", "not", "null", "on",
    "or", "order", "primary", "select", "set", "table", "then", "to", "union", "unique",
    "update", "user", "using", "value", "values", "when", "where",
];

/// Trait for SQL dialect-specific behavior.
pub trait Dialect: Send + Sync {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the identifier quote character (e.g., `"` for standard SQL, `` ` `` for MySQL).
    fn identifier_quote(&self) -> char {
        '"'
    }

    /// Returns whether UPDATE accepts a LIMIT clause.
    fn supports_update_limit(&self) -> bool {
        true
    }

    /// Quotes an identifier unconditionally.
    fn quote_identifier(&self, name: &str) -> String {
        let quote = self.identifier_quote();
        let escaped = name.replace(quote, &format!("{quote}{quote}"));
        format!("{quote}{escaped}{quote}")
    }

    /// Returns the identifier as it must appear in SQL: plain lowercase
    /// words are left alone, anything else is quoted.
    fn identity(&self, name: &str) -> String {
        if needs_quotes(name) {
            self.quote_identifier(name)
        } else {
            String::from(name)
        }
    }

    /// Returns the `table.column` form of a column.
    fn full_identity(&self, column: &Column) -> String {
        format!(
            "{}.{}",
            self.identity(&column.table),
            self.identity(&column.name)
        )
    }

    /// Writes an UPDATE of a single table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] when a limit is given and the dialect
    /// has no LIMIT for UPDATE.
    fn update_table(
        &self,
        qb: &mut QueryBuilder<'_>,
        target: &Table,
        assignments: &[Assignment],
        limit: Option<u64>,
        predicate: Option<&Expr>,
    ) -> Result<()> {
        if limit.is_some() && !self.supports_update_limit() {
            return Err(Error::unsupported(format!(
                "{} doesn't support LIMIT in UPDATE clause",
                self.name()
            )));
        }
        qb.append("UPDATE ");
        qb.append_table(target);
        append_set_clause(qb, assignments, false);
        append_where(qb, predicate);
        if let Some(limit) = limit {
            qb.append(&format!(" LIMIT {limit}"));
        }
        Ok(())
    }

    /// Writes an UPDATE whose target is a join.
    ///
    /// # Errors
    ///
    /// The default implementation always returns [`Error::Unsupported`].
    fn update_join(
        &self,
        _qb: &mut QueryBuilder<'_>,
        _target: &Join,
        _assignments: &[Assignment],
        _limit: Option<u64>,
        _predicate: Option<&Expr>,
    ) -> Result<()> {
        Err(Error::unsupported(format!(
            "UPDATE with a join clause is unsupported by the {} dialect",
            self.name()
        )))
    }
}

fn needs_quotes(name: &str) -> bool {
    let mut chars = name.chars();
    let plain = chars
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c == '_')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    !plain || RESERVED_WORDS.contains(&name)
}

/// Appends ` SET a = ?, b = ?`.
pub(crate) fn append_set_clause(
    qb: &mut QueryBuilder<'_>,
    assignments: &[Assignment],
    qualified: bool,
) {
    qb.append(" SET ");
    qb.append_list(assignments, ", ", |qb, assignment| {
        if qualified {
            qb.append_full_identity(&assignment.column);
        } else {
            qb.append_column_identity(&assignment.column);
        }
        qb.append(" = ");
        assignment.append_value(qb);
    });
}

/// Appends ` WHERE predicate` when there is one.
pub(crate) fn append_where(qb: &mut QueryBuilder<'_>, predicate: Option<&Expr>) {
    if let Some(predicate) = predicate {
        qb.append(" WHERE ");
        predicate.to_query_builder(qb);
    }
}

/// Appends a predicate that follows an `AND`, wrapping a top-level OR.
pub(crate) fn append_and_operand(qb: &mut QueryBuilder<'_>, predicate: &Expr) {
    if matches!(
        predicate,
        Expr::Binary {
            op: BinaryOp::Or,
            ..
        }
    ) {
        qb.append("(");
        predicate.to_query_builder(qb);
        qb.append(")");
    } else {
        predicate.to_query_builder(qb);
    }
}

/// Checks that every assigned column belongs to a table of the join.
pub(crate) fn ensure_join_members(join: &Join, assignments: &[Assignment]) -> Result<()> {
    for assignment in assignments {
        if join.table_named(&assignment.column.table).is_none() {
            return Err(Error::invalid_argument(format!(
                "column {} is not part of the join",
                assignment.column.qualified_name()
            )));
        }
    }
    Ok(())
}

/// Returns the one table of the join whose columns are assigned.
pub(crate) fn table_to_update<'j>(
    join: &'j Join,
    assignments: &[Assignment],
    dialect: &str,
) -> Result<&'j Table> {
    ensure_join_members(join, assignments)?;
    let mut names: Vec<&str> = Vec::new();
    for assignment in assignments {
        if !names.contains(&assignment.column.table.as_str()) {
            names.push(&assignment.column.table);
        }
    }
    match names.as_slice() {
        [name] => join.table_named(name).ok_or_else(|| {
            Error::invalid_argument(format!("table {name} is not part of the join"))
        }),
        _ => Err(Error::invalid_argument(format!(
            "{dialect} supports a join update with columns of a single table only"
        ))),
    }
}

/// Appends ` FROM <other tables> WHERE <join conditions>` for dialects
/// that write a join update as `UPDATE t SET ... FROM ...`.
///
/// Returns whether a WHERE clause was started.
pub(crate) fn append_join_part_for_update_clause(
    qb: &mut QueryBuilder<'_>,
    table_to_update: &Table,
    join: &Join,
) -> bool {
    let others: Vec<&Table> = join
        .tables()
        .into_iter()
        .filter(|t| t.name() != table_to_update.name())
        .collect();
    if !others.is_empty() {
        qb.append(" FROM ");
        qb.append_list(&others, ", ", |qb, table| {
            qb.append_table(table);
        });
    }

    let parts: Vec<_> = join.parts().iter().filter(|p| p.has_conditions()).collect();
    if parts.is_empty() {
        return false;
    }
    qb.append(" WHERE ");
    qb.append_list(&parts, " AND ", |qb, part| {
        qb.append_join_conditions(part);
    });
    true
}

/// Writes `UPDATE [TOP(n) ]t SET ... FROM ... WHERE <join> [AND p]`.
pub(crate) fn update_join_with_from(
    dialect: &str,
    qb: &mut QueryBuilder<'_>,
    join: &Join,
    assignments: &[Assignment],
    predicate: Option<&Expr>,
    qualify_set: bool,
    top: Option<u64>,
) -> Result<()> {
    let table = table_to_update(join, assignments, dialect)?;
    qb.append("UPDATE ");
    if let Some(top) = top {
        qb.append(&format!("TOP({top}) "));
    }
    qb.append_table(table);
    append_set_clause(qb, assignments, qualify_set);
    let has_where = append_join_part_for_update_clause(qb, table, join);
    if let Some(predicate) = predicate {
        if has_where {
            qb.append(" AND ");
            append_and_operand(qb, predicate);
        } else {
            append_where(qb, Some(predicate));
        }
    }
    Ok(())
}
