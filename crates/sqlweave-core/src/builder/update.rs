//! UPDATE statement model, compilation and execution.
//!
//! The [`Update`] builder collects assignments, a predicate and a row
//! limit, then [`Update::build`] freezes them into an [`UpdateStatement`].
//! Compilation takes an explicit [`DialectContext`] and resolves the
//! dialect provider once, based on the kind of target:
//!
//! | Target   | Provider                                                        |
//! |----------|-----------------------------------------------------------------|
//! | Table    | `ctx.provider()`                                                |
//! | Join     | `ctx.join_update_provider()` (H2 MERGE in PG/Oracle/MSSQL mode) |
//! | other    | error naming the target kind                                    |

use tracing::debug;

use crate::dialect::{Dialect, DialectContext};
use crate::error::{Error, Result};
use crate::executor::Executor;
use crate::schema::{Column, ColumnSet, Join, Table};

use super::expr::Expr;
use super::query_builder::QueryBuilder;
use super::value::{BoundArgument, SqlValue, ToSqlValue};

/// The right-hand side of a SET assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateValue {
    /// A value bound as a parameter with the column's type.
    Param(SqlValue),
    /// An expression rendered inline, e.g. `counter + 1`.
    Expr(Expr),
}

impl UpdateValue {
    /// Creates a parameter value.
    #[must_use]
    pub fn param<T: ToSqlValue>(value: T) -> Self {
        Self::Param(value.to_sql_value())
    }
}

impl From<Expr> for UpdateValue {
    fn from(expr: Expr) -> Self {
        Self::Expr(expr)
    }
}

/// An assignment in the SET clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// The column being written.
    pub column: Column,
    /// Its new value.
    pub value: UpdateValue,
}

impl Assignment {
    /// Renders the value, registering a parameter typed after the column.
    pub fn append_value(&self, qb: &mut QueryBuilder<'_>) {
        match &self.value {
            UpdateValue::Param(value) => {
                qb.register_value(BoundArgument::new(self.column.column_type, value.clone()));
            }
            UpdateValue::Expr(expr) => expr.to_query_builder(qb),
        }
    }
}

/// Builder for an [`UpdateStatement`].
///
/// ```rust
/// use sqlweave_core::builder::Update;
/// use sqlweave_core::dialect::{DialectContext, DialectKind};
/// use sqlweave_core::schema::Table;
///
/// let mut users = Table::new("users");
/// let id = users.integer("id");
/// let name = users.varchar("name");
///
/// let update = Update::table(&users)
///     .set(&name, "Bob")
///     .where_clause(id.eq(1))
///     .build();
///
/// let ctx = DialectContext::new(DialectKind::Postgres);
/// assert_eq!(
///     update.compile(&ctx).unwrap(),
///     "UPDATE users SET name = ? WHERE users.id = ?"
/// );
/// assert_eq!(update.arguments(&ctx)[0].len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Update {
    target: ColumnSet,
    assignments: Vec<Assignment>,
    where_clause: Option<Expr>,
    limit: Option<u64>,
}

impl Update {
    /// Starts an UPDATE of any column set.
    ///
    /// Only tables and joins compile; other targets fail at compile time.
    #[must_use]
    pub fn new(target: impl Into<ColumnSet>) -> Self {
        Self {
            target: target.into(),
            assignments: Vec::new(),
            where_clause: None,
            limit: None,
        }
    }

    /// Starts an UPDATE of a single table.
    #[must_use]
    pub fn table(table: &Table) -> Self {
        Self::new(table)
    }

    /// Starts an UPDATE of a join.
    #[must_use]
    pub fn join(join: Join) -> Self {
        Self::new(join)
    }

    /// Assigns a value to a column.
    ///
    /// Assigning the same column again replaces its value and keeps the
    /// position of the first assignment. Columns are matched by table and
    /// name; the handle of the latest assignment wins, type included.
    pub fn assign(&mut self, column: &Column, value: UpdateValue) -> &mut Self {
        let existing = self
            .assignments
            .iter_mut()
            .find(|a| a.column.table == column.table && a.column.name == column.name);
        match existing {
            Some(existing) => {
                existing.column = column.clone();
                existing.value = value;
            }
            None => self.assignments.push(Assignment {
                column: column.clone(),
                value,
            }),
        }
        self
    }

    /// Adds a SET assignment with a bound value.
    #[must_use]
    pub fn set<T: ToSqlValue>(mut self, column: &Column, value: T) -> Self {
        self.assign(column, UpdateValue::param(value));
        self
    }

    /// Adds a SET assignment with an expression value.
    #[must_use]
    pub fn set_expr(mut self, column: &Column, expr: impl Into<Expr>) -> Self {
        self.assign(column, UpdateValue::Expr(expr.into()));
        self
    }

    /// Sets the WHERE clause, replacing any previous one.
    #[must_use]
    pub fn where_clause(mut self, expr: Expr) -> Self {
        self.where_clause = Some(expr);
        self
    }

    /// ANDs a condition onto the WHERE clause.
    #[must_use]
    pub fn and_where(mut self, expr: Expr) -> Self {
        self.where_clause = Some(match self.where_clause.take() {
            Some(existing) => existing.and(expr),
            None => expr,
        });
        self
    }

    /// Caps the number of updated rows.
    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Freezes the builder into a statement.
    #[must_use]
    pub fn build(self) -> UpdateStatement {
        UpdateStatement {
            target: self.target,
            assignments: self.assignments,
            where_clause: self.where_clause,
            limit: self.limit,
        }
    }
}

/// An immutable UPDATE statement.
#[derive(Debug, Clone)]
pub struct UpdateStatement {
    target: ColumnSet,
    assignments: Vec<Assignment>,
    where_clause: Option<Expr>,
    limit: Option<u64>,
}

impl UpdateStatement {
    /// Returns the target column set.
    #[must_use]
    pub const fn target(&self) -> &ColumnSet {
        &self.target
    }

    /// Returns the assignments in the order they are written.
    #[must_use]
    pub fn first_data_set(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Returns the WHERE clause.
    #[must_use]
    pub const fn where_clause(&self) -> Option<&Expr> {
        self.where_clause.as_ref()
    }

    /// Returns the row limit.
    #[must_use]
    pub const fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// Returns the tables written by this statement.
    ///
    /// # Errors
    ///
    /// Fails for targets that are neither a table nor a join.
    pub fn target_tables(&self) -> Result<Vec<&Table>> {
        self.target.target_tables()
    }

    /// Compiles the statement to SQL with `?` placeholders.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyAssignments`] if nothing is assigned.
    /// - [`Error::Unsupported`] for targets other than a table or join, or
    ///   for constructs the dialect can't express.
    /// - [`Error::InvalidArgument`] for join updates touching columns of
    ///   several tables where the dialect allows only one.
    pub fn compile(&self, ctx: &DialectContext) -> Result<String> {
        self.render(ctx, true).map(|(sql, _)| sql)
    }

    /// Compiles the statement with values inlined. Meant for logging only.
    ///
    /// # Errors
    ///
    /// Same as [`UpdateStatement::compile`].
    pub fn to_sql_inline(&self, ctx: &DialectContext) -> Result<String> {
        self.render(ctx, false).map(|(sql, _)| sql)
    }

    /// Returns the bound arguments in placeholder order, as a list of
    /// batches.
    ///
    /// Assignment values come first and predicate parameters second,
    /// except for a join on native Oracle, whose inline view puts the
    /// predicate before the SET clause. When there is nothing to bind the
    /// result is empty rather than one empty batch.
    #[must_use]
    pub fn arguments(&self, ctx: &DialectContext) -> Vec<Vec<BoundArgument>> {
        let mut qb = QueryBuilder::new(ctx.provider(), true);
        let predicate_first = matches!(self.target, ColumnSet::Join(_)) && ctx.is_oracle();
        if predicate_first {
            self.register_predicate(&mut qb);
            self.register_values(&mut qb);
        } else {
            self.register_values(&mut qb);
            self.register_predicate(&mut qb);
        }
        let (_, args) = qb.finish();
        if args.is_empty() {
            Vec::new()
        } else {
            vec![args]
        }
    }

    /// Compiles the statement and its arguments once for execution.
    ///
    /// # Errors
    ///
    /// Same as [`UpdateStatement::compile`].
    pub fn prepare(&self, ctx: &DialectContext) -> Result<PreparedUpdate> {
        let (sql, rendered) = self.render(ctx, true)?;
        let arguments = self.arguments(ctx);
        debug_assert_eq!(
            rendered.as_slice(),
            arguments.first().map_or(&[][..], Vec::as_slice),
            "arguments out of placeholder order for {sql}"
        );
        Ok(PreparedUpdate {
            sql,
            arguments,
            dialect: *ctx,
        })
    }

    /// Compiles and executes the statement, returning the affected-row
    /// count.
    ///
    /// A statement without assignments returns 0 without contacting the
    /// executor.
    ///
    /// # Errors
    ///
    /// Compile errors converted into `E::Error`, or the executor's own
    /// error unchanged.
    pub async fn execute<E: Executor>(
        &self,
        executor: &E,
        ctx: &DialectContext,
    ) -> std::result::Result<u64, E::Error> {
        if self.assignments.is_empty() {
            debug!("UPDATE without assignments, nothing to execute");
            return Ok(0);
        }
        let prepared = self.prepare(ctx)?;
        prepared.execute(executor).await
    }

    fn render(&self, ctx: &DialectContext, prepared: bool) -> Result<(String, Vec<BoundArgument>)> {
        if self.assignments.is_empty() {
            return Err(Error::EmptyAssignments);
        }
        let predicate = self.where_clause.as_ref();
        let (provider, sql, args) = match &self.target {
            ColumnSet::Table(table) => {
                let provider: &dyn Dialect = ctx.provider();
                let mut qb = QueryBuilder::new(provider, prepared);
                provider.update_table(&mut qb, table, &self.assignments, self.limit, predicate)?;
                let (sql, args) = qb.finish();
                (provider, sql, args)
            }
            ColumnSet::Join(join) => {
                let provider: &dyn Dialect = ctx.join_update_provider();
                let mut qb = QueryBuilder::new(provider, prepared);
                provider.update_join(&mut qb, join, &self.assignments, self.limit, predicate)?;
                let (sql, args) = qb.finish();
                (provider, sql, args)
            }
            other => {
                return Err(Error::unsupported(format!(
                    "UPDATE with {} unsupported",
                    other.kind_name()
                )))
            }
        };
        debug!(dialect = provider.name(), sql = %sql, "compiled UPDATE statement");
        Ok((sql, args))
    }

    fn register_values(&self, qb: &mut QueryBuilder<'_>) {
        for assignment in &self.assignments {
            assignment.append_value(qb);
        }
    }

    fn register_predicate(&self, qb: &mut QueryBuilder<'_>) {
        if let Some(predicate) = &self.where_clause {
            predicate.to_query_builder(qb);
        }
    }
}

/// A compiled UPDATE: SQL text plus arguments, computed once.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedUpdate {
    sql: String,
    arguments: Vec<Vec<BoundArgument>>,
    dialect: DialectContext,
}

impl PreparedUpdate {
    /// Returns the SQL text.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Returns the argument batches.
    #[must_use]
    pub fn arguments(&self) -> &[Vec<BoundArgument>] {
        &self.arguments
    }

    /// Returns the dialect the statement was compiled for.
    #[must_use]
    pub const fn dialect(&self) -> &DialectContext {
        &self.dialect
    }

    /// Executes the statement.
    ///
    /// # Errors
    ///
    /// The executor's error, unchanged.
    pub async fn execute<E: Executor>(&self, executor: &E) -> std::result::Result<u64, E::Error> {
        let arguments = self.arguments.first().map_or(&[][..], Vec::as_slice);
        debug!(
            dialect = %self.dialect,
            sql = %self.sql,
            arguments = arguments.len(),
            "executing UPDATE"
        );
        executor.execute_update(&self.sql, arguments).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::value::ColumnType;
    use crate::dialect::DialectKind;

    fn users() -> (Table, Column, Column, Column) {
        let mut users = Table::new("users");
        let id = users.integer("id");
        let name = users.varchar("name");
        let email = users.varchar("email");
        (users, id, name, email)
    }

    #[test]
    fn test_simple_update() {
        let (users, _, name, _) = users();
        let update = Update::table(&users).set(&name, "Bob").build();
        let ctx = DialectContext::default();
        assert_eq!(update.compile(&ctx).unwrap(), "UPDATE users SET name = ?");
        assert_eq!(
            update.arguments(&ctx),
            vec![vec![BoundArgument::new(
                ColumnType::Varchar,
                SqlValue::Text(String::from("Bob"))
            )]]
        );
    }

    #[test]
    fn test_duplicate_assignment_overwrites_in_place() {
        let (users, _, name, email) = users();
        let update = Update::table(&users)
            .set(&name, "first")
            .set(&email, "a@example.com")
            .set(&name, "second")
            .build();

        let columns: Vec<&str> = update
            .first_data_set()
            .iter()
            .map(|a| a.column.name.as_str())
            .collect();
        assert_eq!(columns, vec!["name", "email"]);
        assert_eq!(
            update.first_data_set()[0].value,
            UpdateValue::param("second")
        );
    }

    #[test]
    fn test_retyped_column_overwrites_previous_assignment() {
        let mut users = Table::new("users");
        let old = users.integer("score");
        let new = users.long("score");
        let update = Update::table(&users).set(&old, 1).set(&new, 2).build();

        assert_eq!(update.first_data_set().len(), 1);
        let ctx = DialectContext::default();
        assert_eq!(update.compile(&ctx).unwrap(), "UPDATE users SET score = ?");
        assert_eq!(
            update.arguments(&ctx),
            vec![vec![BoundArgument::new(ColumnType::BigInt, SqlValue::Int(2))]]
        );
    }

    #[test]
    fn test_empty_assignments_fail_to_compile() {
        let (users, id, _, _) = users();
        let update = Update::table(&users).where_clause(id.eq(1)).build();
        let ctx = DialectContext::default();
        assert_eq!(update.compile(&ctx), Err(Error::EmptyAssignments));
        assert_eq!(
            update.compile(&ctx).unwrap_err().to_string(),
            "can't prepare UPDATE statement without fields to update"
        );
    }

    #[test]
    fn test_alias_target_is_unsupported() {
        let (users, _, name, _) = users();
        let update = Update::new(users.alias("u")).set(&name, "x").build();
        let err = update
            .compile(&DialectContext::new(DialectKind::Postgres))
            .unwrap_err();
        assert_eq!(err, Error::unsupported("UPDATE with Alias unsupported"));
    }

    #[test]
    fn test_and_where_combines_conditions() {
        let (users, id, name, email) = users();
        let update = Update::table(&users)
            .set(&name, "x")
            .and_where(id.gt(1))
            .and_where(email.is_not_null())
            .build();
        assert_eq!(
            update.compile(&DialectContext::default()).unwrap(),
            "UPDATE users SET name = ? WHERE users.id > ? AND users.email IS NOT NULL"
        );
    }

    #[test]
    fn test_expression_value() {
        let mut counters = Table::new("counters");
        let id = counters.integer("id");
        let hits = counters.long("hits");
        let update = Update::table(&counters)
            .set_expr(&hits, hits.plus(1))
            .where_clause(id.eq(7))
            .build();
        let ctx = DialectContext::default();
        assert_eq!(
            update.compile(&ctx).unwrap(),
            "UPDATE counters SET hits = counters.hits + ? WHERE counters.id = ?"
        );
        let args = update.arguments(&ctx);
        assert_eq!(args[0][0], BoundArgument::new(ColumnType::BigInt, SqlValue::Int(1)));
        assert_eq!(args[0][1], BoundArgument::new(ColumnType::Integer, SqlValue::Int(7)));
    }

    #[test]
    fn test_to_sql_inline() {
        let (users, id, name, _) = users();
        let update = Update::table(&users)
            .set(&name, "O'Brien")
            .where_clause(id.eq(3))
            .limit(1)
            .build();
        assert_eq!(
            update.to_sql_inline(&DialectContext::default()).unwrap(),
            "UPDATE users SET name = 'O''Brien' WHERE users.id = 3 LIMIT 1"
        );
    }

    #[test]
    fn test_prepare_caches_sql_and_arguments() {
        let (users, id, name, _) = users();
        let update = Update::table(&users)
            .set(&name, "x")
            .where_clause(id.eq(1))
            .build();
        let ctx = DialectContext::new(DialectKind::MySql);
        let prepared = update.prepare(&ctx).unwrap();
        assert_eq!(prepared.sql(), update.compile(&ctx).unwrap());
        assert_eq!(prepared.arguments(), update.arguments(&ctx).as_slice());
        assert_eq!(prepared.dialect(), &ctx);
    }
}
