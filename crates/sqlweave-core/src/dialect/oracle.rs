//! Oracle dialect.
//!
//! Oracle has neither LIMIT nor a multi-table UPDATE. Row caps become a
//! `ROWNUM` filter, and a join update is written against an updatable
//! inline view:
//!
//! ```text
//! UPDATE (SELECT t.a c0, t.b c1 FROM t INNER JOIN u ON ... WHERE p) x
//! SET x.c0 = ?, x.c1 = ?
//! ```
//!
//! The predicate sits inside the view, so its placeholders come before
//! those of the SET clause.

use super::{append_and_operand, append_set_clause, table_to_update, Dialect};
use crate::builder::expr::Expr;
use crate::builder::query_builder::QueryBuilder;
use crate::builder::update::{Assignment, UpdateValue};
use crate::error::{Error, Result};
use crate::schema::{Join, Table};

/// Oracle dialect.
#[derive(Debug, Default, Clone, Copy)]
pub struct OracleDialect;

impl OracleDialect {
    /// Creates a new Oracle dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for OracleDialect {
    fn name(&self) -> &'static str {
        "oracle"
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
        qb.append_table(target);
        append_set_clause(qb, assignments, false);
        match (predicate, limit) {
            (Some(predicate), Some(limit)) => {
                qb.append(" WHERE ");
                append_and_operand(qb, predicate);
                qb.append(&format!(" AND ROWNUM <= {limit}"));
            }
            (Some(predicate), None) => {
                qb.append(" WHERE ");
                predicate.to_query_builder(qb);
            }
            (None, Some(limit)) => {
                qb.append(&format!(" WHERE ROWNUM <= {limit}"));
            }
            (None, None) => {}
        }
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
        table_to_update(target, assignments, self.name())?;

        // Alias index of each assigned column and of each expression value.
        let mut next_alias = 0_usize;
        let mut aliases: Vec<(usize, Option<usize>)> = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            let column_alias = next_alias;
            next_alias += 1;
            let value_alias = match &assignment.value {
                UpdateValue::Param(_) => None,
                UpdateValue::Expr(expr) if expr.param_count() > 0 => {
                    return Err(Error::unsupported(format!(
                        "oracle can't bind parameters inside the value of {} in a join UPDATE",
                        assignment.column.qualified_name()
                    )));
                }
                UpdateValue::Expr(_) => {
                    next_alias += 1;
                    Some(column_alias + 1)
                }
            };
            aliases.push((column_alias, value_alias));
        }

        qb.append("UPDATE (SELECT ");
        for (i, (assignment, (column_alias, value_alias))) in
            assignments.iter().zip(&aliases).enumerate()
        {
            if i > 0 {
                qb.append(", ");
            }
            qb.append_full_identity(&assignment.column);
            qb.append(&format!(" c{column_alias}"));
            if let (UpdateValue::Expr(expr), Some(value_alias)) = (&assignment.value, value_alias)
            {
                qb.append(", ");
                expr.to_query_builder(qb);
                qb.append(&format!(" c{value_alias}"));
            }
        }
        qb.append(" FROM ");
        qb.append_join(target);
        if let Some(predicate) = predicate {
            qb.append(" WHERE ");
            predicate.to_query_builder(qb);
        }
        qb.append(") x SET ");
        for (i, (assignment, (column_alias, value_alias))) in
            assignments.iter().zip(&aliases).enumerate()
        {
            if i > 0 {
                qb.append(", ");
            }
            qb.append(&format!("x.c{column_alias} = "));
            match value_alias {
                Some(value_alias) => {
                    qb.append(&format!("x.c{value_alias}"));
                }
                None => assignment.append_value(qb),
            }
        }
        if let Some(limit) = limit {
            qb.append(&format!(" WHERE ROWNUM <= {limit}"));
        }
        Ok(())
    }
}
