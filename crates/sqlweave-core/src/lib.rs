//! # sqlweave-core
//!
//! A type-safe SQL builder with dialect-aware statement compilation.
//!
//! This crate provides:
//! - A schema model of tables, typed columns and joins
//! - An expression tree for predicates and SET values
//! - An UPDATE statement that compiles to dialect-correct SQL plus the
//!   bound arguments for its placeholders, in placeholder order
//! - Function providers for generic SQL, H2 (including its compatibility
//!   modes), MySQL, MariaDB, PostgreSQL, Oracle, SQL Server and SQLite
//! - An [`Executor`] trait implemented by driver crates
//!
//! ## Dialect-aware compilation
//!
//! The same statement renders differently per vendor. The dialect is never
//! ambient: it is passed to every compile call.
//!
//! ```rust
//! use sqlweave_core::builder::Update;
//! use sqlweave_core::dialect::{DialectContext, DialectKind, H2Mode};
//! use sqlweave_core::schema::Table;
//!
//! let mut users = Table::new("users");
//! let user_city = users.integer("city_id");
//! let name = users.varchar("name");
//! let mut cities = Table::new("cities");
//! let city_id = cities.integer("id");
//! let city_name = cities.varchar("name");
//!
//! let update = Update::join(users.inner_join(&cities, &user_city, &city_id))
//!     .set(&name, "Alice")
//!     .where_clause(city_name.eq("Paris"))
//!     .build();
//!
//! let pg = DialectContext::new(DialectKind::Postgres);
//! assert_eq!(
//!     update.compile(&pg).unwrap(),
//!     "UPDATE users SET name = ? FROM cities \
//!      WHERE users.city_id = cities.id AND cities.name = ?"
//! );
//!
//! let h2_pg = DialectContext::h2(H2Mode::PostgreSql);
//! assert_eq!(
//!     update.compile(&h2_pg).unwrap(),
//!     "MERGE INTO users USING cities ON users.city_id = cities.id \
//!      WHEN MATCHED THEN UPDATE SET users.name = ? WHERE cities.name = ?"
//! );
//! ```
//!
//! ## SQL Injection Prevention
//!
//! Values are never interpolated into compiled SQL:
//!
//! ```rust
//! use sqlweave_core::builder::{SqlValue, Update};
//! use sqlweave_core::dialect::DialectContext;
//! use sqlweave_core::schema::Table;
//!
//! let mut users = Table::new("users");
//! let name = users.varchar("name");
//! let user_input = "'; DROP TABLE users; --";
//!
//! let update = Update::table(&users).set(&name, user_input).build();
//! let ctx = DialectContext::default();
//!
//! assert_eq!(update.compile(&ctx).unwrap(), "UPDATE users SET name = ?");
//! assert_eq!(
//!     update.arguments(&ctx)[0][0].value,
//!     SqlValue::Text(user_input.to_string())
//! );
//! ```

pub mod builder;
pub mod dialect;
mod error;
pub mod executor;
pub mod schema;

pub use builder::{BoundArgument, ColumnType, Expr, SqlValue, ToSqlValue, Update, UpdateStatement};
pub use dialect::{Dialect, DialectContext, DialectKind, H2Mode};
pub use error::{Error, Result};
pub use executor::Executor;
pub use schema::{Column, ColumnSet, Join, JoinType, Table};
