//! Accumulates SQL text and bound arguments.

use crate::dialect::Dialect;
use crate::schema::{Column, Join, JoinPart, Table};

use super::value::BoundArgument;

/// Accumulates SQL text together with the arguments for its placeholders.
///
/// In prepared mode every value becomes a `?` placeholder and is recorded
/// as a [`BoundArgument`]; otherwise values are inlined with escaping,
/// which is only meant for logging.
pub struct QueryBuilder<'a> {
    dialect: &'a dyn Dialect,
    prepared: bool,
    sql: String,
    args: Vec<BoundArgument>,
}

impl<'a> QueryBuilder<'a> {
    /// Creates an empty builder for a dialect.
    #[must_use]
    pub fn new(dialect: &'a dyn Dialect, prepared: bool) -> Self {
        Self {
            dialect,
            prepared,
            sql: String::new(),
            args: Vec::new(),
        }
    }

    /// Appends raw SQL text.
    pub fn append(&mut self, sql: &str) -> &mut Self {
        self.sql.push_str(sql);
        self
    }

    /// Appends an identifier, quoted if the dialect requires it.
    pub fn append_identity(&mut self, name: &str) -> &mut Self {
        let quoted = self.dialect.identity(name);
        self.append(&quoted)
    }

    /// Appends the unqualified name of a column.
    pub fn append_column_identity(&mut self, column: &Column) -> &mut Self {
        self.append_identity(&column.name)
    }

    /// Appends the `table.column` name of a column.
    pub fn append_full_identity(&mut self, column: &Column) -> &mut Self {
        let quoted = self.dialect.full_identity(column);
        self.append(&quoted)
    }

    /// Appends a table name.
    pub fn append_table(&mut self, table: &Table) -> &mut Self {
        self.append_identity(table.name())
    }

    /// Registers a value: a placeholder in prepared mode, the escaped
    /// literal otherwise.
    pub fn register_value(&mut self, argument: BoundArgument) -> &mut Self {
        if self.prepared {
            self.args.push(argument);
            self.append("?")
        } else {
            let inline = argument.value.to_sql_inline();
            self.append(&inline)
        }
    }

    /// Appends items separated by `separator`.
    pub fn append_list<T>(
        &mut self,
        items: &[T],
        separator: &str,
        mut append_item: impl FnMut(&mut Self, &T),
    ) -> &mut Self {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.append(separator);
            }
            append_item(self, item);
        }
        self
    }

    /// Appends `t1 INNER JOIN t2 ON ... LEFT JOIN t3 ON ...`.
    pub fn append_join(&mut self, join: &Join) -> &mut Self {
        self.append_table(join.table());
        for part in join.parts() {
            self.append(" ");
            self.append(part.join_type.as_sql());
            self.append(" ");
            self.append_table(&part.table);
            if part.has_conditions() {
                self.append(" ON ");
                self.append_join_conditions(part);
            }
        }
        self
    }

    /// Appends the ON conditions of a join part joined with AND.
    ///
    /// Values in the additional constraint are inlined so that join
    /// conditions never contribute placeholders.
    pub fn append_join_conditions(&mut self, part: &JoinPart) -> &mut Self {
        self.append_list(&part.conditions, " AND ", |qb, (left, right)| {
            qb.append_full_identity(left);
            qb.append(" = ");
            qb.append_full_identity(right);
        });
        if let Some(additional) = &part.additional {
            if !part.conditions.is_empty() {
                self.append(" AND ");
            }
            let mut inline = QueryBuilder::new(self.dialect, false);
            inline.append("(");
            additional.to_query_builder(&mut inline);
            inline.append(")");
            let (sql, _) = inline.finish();
            self.append(&sql);
        }
        self
    }

    /// Returns the SQL text built so far.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Consumes the builder and returns the SQL and arguments.
    #[must_use]
    pub fn finish(self) -> (String, Vec<BoundArgument>) {
        (self.sql, self.args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::value::{ColumnType, SqlValue};
    use crate::dialect::{GenericDialect, MySqlDialect};
    use crate::schema::JoinType;

    #[test]
    fn test_prepared_value_becomes_placeholder() {
        let mut qb = QueryBuilder::new(&GenericDialect, true);
        qb.append("x = ")
            .register_value(BoundArgument::new(ColumnType::Text, SqlValue::Text(String::from("it's"))));
        let (sql, args) = qb.finish();
        assert_eq!(sql, "x = ?");
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn test_inline_value_is_escaped() {
        let mut qb = QueryBuilder::new(&GenericDialect, false);
        qb.append("x = ")
            .register_value(BoundArgument::new(ColumnType::Text, SqlValue::Text(String::from("it's"))));
        let (sql, args) = qb.finish();
        assert_eq!(sql, "x = 'it''s'");
        assert!(args.is_empty());
    }

    #[test]
    fn test_join_with_additional_constraint_is_inlined() {
        let mut orders = Table::new("orders");
        let order_user = orders.integer("user_id");
        let mut users = Table::new("users");
        let user_id = users.integer("id");
        let active = users.bool("active");

        let join = orders.join().join(
            &users,
            JoinType::Left,
            vec![(order_user, user_id)],
            Some(active.eq(true)),
        );

        let mut qb = QueryBuilder::new(&MySqlDialect, true);
        qb.append_join(&join);
        let (sql, args) = qb.finish();
        assert_eq!(
            sql,
            "orders LEFT JOIN users ON orders.user_id = users.id AND (users.active = TRUE)"
        );
        assert!(args.is_empty());
    }
}
