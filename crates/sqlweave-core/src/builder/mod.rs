//! Statement builder.
//!
//! Statements are built from typed [`Column`](crate::schema::Column)
//! handles, so every bound argument carries the type of the column it is
//! written to.
//!
//! # Example
//!
//! ```rust
//! use sqlweave_core::builder::Update;
//! use sqlweave_core::dialect::{DialectContext, DialectKind};
//! use sqlweave_core::schema::Table;
//!
//! let mut users = Table::new("users");
//! let id = users.integer("id");
//! let active = users.bool("active");
//!
//! let update = Update::table(&users)
//!     .set(&active, false)
//!     .where_clause(id.eq(1))
//!     .limit(1)
//!     .build();
//!
//! let ctx = DialectContext::new(DialectKind::SqlServer);
//! assert_eq!(
//!     update.compile(&ctx).unwrap(),
//!     "UPDATE TOP(1) users SET active = ? WHERE users.id = ?"
//! );
//! ```

pub mod expr;
pub mod query_builder;
pub mod update;
pub mod value;

pub use expr::{BinaryOp, Expr};
pub use query_builder::QueryBuilder;
pub use update::{Assignment, PreparedUpdate, Update, UpdateStatement, UpdateValue};
pub use value::{BoundArgument, ColumnType, SqlValue, ToSqlValue};
