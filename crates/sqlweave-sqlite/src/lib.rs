//! # sqlweave-sqlite
//!
//! Runs `sqlweave-core` statements against SQLite through sqlx.
//!
//! # How SQLite differs from other dialects
//!
//! - **[UPDATE FROM]**: a join update is written as
//!   `UPDATE t SET ... FROM u WHERE ...` (since SQLite 3.33.0). Only the
//!   columns of one table can be assigned.
//! - **No UPDATE LIMIT**: `LIMIT` on UPDATE needs a compile-time option
//!   that stock builds don't enable, so statements with a limit are
//!   rejected before they reach the database.
//! - **[Type affinity]**: any column can store any value. NULL arguments
//!   are still bound with the storage class of their column.
//!
//! [UPDATE FROM]: https://www.sqlite.org/lang_update.html#update_from
//! [Type affinity]: https://www.sqlite.org/datatype3.html
//!
//! ## Example
//!
//! ```rust,no_run
//! use sqlweave_core::{Table, Update};
//! use sqlweave_sqlite::SqliteExecutor;
//!
//! # async fn example() -> sqlweave_sqlite::Result<()> {
//! let executor = SqliteExecutor::connect("sqlite://app.db").await?;
//!
//! let mut users = Table::new("users");
//! let id = users.integer("id");
//! let name = users.varchar("name");
//!
//! let affected = Update::table(&users)
//!     .set(&name, "Bob")
//!     .where_clause(id.eq(1))
//!     .build()
//!     .execute(&executor, &SqliteExecutor::context())
//!     .await?;
//! # let _ = affected;
//! # Ok(())
//! # }
//! ```

mod error;

use std::future::Future;

use sqlx::sqlite::{SqliteArguments, SqlitePool, SqlitePoolOptions};
use sqlx::Sqlite;
use sqlweave_core::{BoundArgument, ColumnType, DialectContext, DialectKind, Executor, SqlValue};
use tracing::debug;

pub use error::{Result, SqliteError};

type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

/// An [`Executor`] backed by a sqlx SQLite pool.
#[derive(Debug, Clone)]
pub struct SqliteExecutor {
    pool: SqlitePool,
}

impl SqliteExecutor {
    /// Wraps an existing pool.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens a pool for `url`, e.g. `sqlite://app.db` or `sqlite::memory:`.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::Database`] if the database can't be opened.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new().connect(url).await?;
        Ok(Self::new(pool))
    }

    /// Returns the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// The dialect context statements run by this executor compile with.
    #[must_use]
    pub const fn context() -> DialectContext {
        DialectContext::new(DialectKind::Sqlite)
    }
}

impl Executor for SqliteExecutor {
    type Error = SqliteError;

    fn execute_update(
        &self,
        sql: &str,
        arguments: &[BoundArgument],
    ) -> impl Future<Output = Result<u64>> + Send {
        let query = arguments
            .iter()
            .fold(sqlx::query(sql), |query, argument| bind_argument(query, argument));
        async move {
            let done = query.execute(&self.pool).await?;
            debug!(rows = done.rows_affected(), "UPDATE executed");
            Ok(done.rows_affected())
        }
    }
}

/// Binds one argument, giving NULL the storage class of its column.
fn bind_argument<'q>(query: SqliteQuery<'q>, argument: &BoundArgument) -> SqliteQuery<'q> {
    match &argument.value {
        SqlValue::Null => match argument.column_type {
            ColumnType::Boolean => query.bind(Option::<bool>::None),
            ColumnType::SmallInt | ColumnType::Integer | ColumnType::BigInt => {
                query.bind(Option::<i64>::None)
            }
            ColumnType::Real | ColumnType::Double | ColumnType::Decimal => {
                query.bind(Option::<f64>::None)
            }
            ColumnType::Blob => query.bind(Option::<Vec<u8>>::None),
            ColumnType::Varchar | ColumnType::Text | ColumnType::Date | ColumnType::Timestamp => {
                query.bind(Option::<String>::None)
            }
        },
        SqlValue::Bool(b) => query.bind(*b),
        SqlValue::Int(i) => query.bind(*i),
        SqlValue::Float(f) => query.bind(*f),
        SqlValue::Text(s) => query.bind(s.clone()),
        SqlValue::Blob(b) => query.bind(b.clone()),
    }
}
