//! Dialect selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{
    Dialect, GenericDialect, H2Dialect, MariaDbDialect, MySqlDialect, OracleDialect,
    PostgresDialect, SqlServerDialect, SqliteDialect,
};
use crate::error::Error;

static GENERIC: GenericDialect = GenericDialect;
static H2: H2Dialect = H2Dialect;
static MYSQL: MySqlDialect = MySqlDialect;
static MARIADB: MariaDbDialect = MariaDbDialect;
static POSTGRES: PostgresDialect = PostgresDialect;
static ORACLE: OracleDialect = OracleDialect;
static SQLSERVER: SqlServerDialect = SqlServerDialect;
static SQLITE: SqliteDialect = SqliteDialect;

/// The database vendor a connection talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    /// ANSI SQL without vendor extensions.
    #[default]
    Generic,
    /// H2, possibly emulating another vendor.
    H2,
    /// MySQL.
    MySql,
    /// MariaDB.
    MariaDb,
    /// PostgreSQL.
    #[serde(alias = "postgresql", alias = "pgsql")]
    Postgres,
    /// Oracle.
    Oracle,
    /// Microsoft SQL Server.
    #[serde(alias = "mssql")]
    SqlServer,
    /// SQLite.
    Sqlite,
}

impl DialectKind {
    /// Returns the provider implementing this vendor's SQL.
    #[must_use]
    pub fn provider(self) -> &'static dyn Dialect {
        match self {
            Self::Generic => &GENERIC,
            Self::H2 => &H2,
            Self::MySql => &MYSQL,
            Self::MariaDb => &MARIADB,
            Self::Postgres => &POSTGRES,
            Self::Oracle => &ORACLE,
            Self::SqlServer => &SQLSERVER,
            Self::Sqlite => &SQLITE,
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.provider().name())
    }
}

impl FromStr for DialectKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "generic" => Ok(Self::Generic),
            "h2" => Ok(Self::H2),
            "mysql" => Ok(Self::MySql),
            "mariadb" => Ok(Self::MariaDb),
            "postgres" | "postgresql" | "pgsql" => Ok(Self::Postgres),
            "oracle" => Ok(Self::Oracle),
            "sqlserver" | "mssql" => Ok(Self::SqlServer),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(Error::invalid_argument(format!("unknown dialect: {other}"))),
        }
    }
}

/// The vendor an H2 database is configured to emulate (`MODE=...`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum H2Mode {
    /// Native H2 behaviour.
    #[default]
    #[serde(alias = "h2")]
    Regular,
    /// `MODE=MySQL`.
    MySql,
    /// `MODE=MariaDB`.
    MariaDb,
    /// `MODE=PostgreSQL`.
    #[serde(alias = "postgres")]
    PostgreSql,
    /// `MODE=Oracle`.
    Oracle,
    /// `MODE=MSSQLServer`.
    #[serde(alias = "mssqlserver", alias = "mssql")]
    SqlServer,
}

impl H2Mode {
    /// Returns the vendor whose SQL this mode delegates to, if any.
    #[must_use]
    pub const fn delegate(self) -> Option<DialectKind> {
        match self {
            Self::Regular => None,
            Self::MySql => Some(DialectKind::MySql),
            Self::MariaDb => Some(DialectKind::MariaDb),
            Self::PostgreSql => Some(DialectKind::Postgres),
            Self::Oracle => Some(DialectKind::Oracle),
            Self::SqlServer => Some(DialectKind::SqlServer),
        }
    }

    /// Returns whether H2 must emulate join updates itself in this mode.
    #[must_use]
    pub const fn emulates_join_update(self) -> bool {
        matches!(self, Self::PostgreSql | Self::Oracle | Self::SqlServer)
    }
}

impl FromStr for H2Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "regular" | "h2" => Ok(Self::Regular),
            "mysql" => Ok(Self::MySql),
            "mariadb" => Ok(Self::MariaDb),
            "postgresql" | "postgres" => Ok(Self::PostgreSql),
            "oracle" => Ok(Self::Oracle),
            "mssqlserver" | "sqlserver" | "mssql" => Ok(Self::SqlServer),
            other => Err(Error::invalid_argument(format!("unknown H2 mode: {other}"))),
        }
    }
}

/// The dialect rules that apply to one compile call.
///
/// ```rust
/// use sqlweave_core::dialect::{DialectContext, DialectKind, H2Mode};
///
/// let ctx = DialectContext::from_url("jdbc:h2:mem:test;MODE=Oracle").unwrap();
/// assert_eq!(ctx.dialect, DialectKind::H2);
/// assert_eq!(ctx.h2_mode(), Some(H2Mode::Oracle));
/// assert_eq!(ctx.provider().name(), "oracle");
/// assert_eq!(ctx.join_update_provider().name(), "h2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DialectContext {
    /// The vendor.
    pub dialect: DialectKind,
    /// The compatibility mode; only meaningful for H2.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h2_mode: Option<H2Mode>,
}

impl DialectContext {
    /// Creates a context for a vendor without a compatibility mode.
    #[must_use]
    pub const fn new(dialect: DialectKind) -> Self {
        Self {
            dialect,
            h2_mode: None,
        }
    }

    /// Creates a context for H2 running in the given mode.
    #[must_use]
    pub const fn h2(mode: H2Mode) -> Self {
        Self {
            dialect: DialectKind::H2,
            h2_mode: Some(mode),
        }
    }

    /// Returns the H2 compatibility mode, `None` for other vendors.
    #[must_use]
    pub fn h2_mode(&self) -> Option<H2Mode> {
        match self.dialect {
            DialectKind::H2 => Some(self.h2_mode.unwrap_or_default()),
            _ => None,
        }
    }

    /// Returns whether the connection is a native Oracle database.
    ///
    /// H2 in Oracle mode is not.
    #[must_use]
    pub fn is_oracle(&self) -> bool {
        self.dialect == DialectKind::Oracle
    }

    /// Returns the provider for single-table statements.
    ///
    /// H2 in a vendor mode delegates to that vendor's provider.
    #[must_use]
    pub fn provider(&self) -> &'static dyn Dialect {
        match self.h2_mode().and_then(H2Mode::delegate) {
            Some(delegate) => delegate.provider(),
            None => self.dialect.provider(),
        }
    }

    /// Returns the provider for UPDATE statements whose target is a join.
    ///
    /// H2 in PostgreSQL, Oracle or SQL Server mode cannot run those
    /// vendors' join update syntax and falls back to its own MERGE form.
    #[must_use]
    pub fn join_update_provider(&self) -> &'static dyn Dialect {
        match self.h2_mode() {
            Some(mode) if mode.emulates_join_update() => DialectKind::H2.provider(),
            _ => self.provider(),
        }
    }

    /// Resolves the dialect from a connection URL.
    ///
    /// An optional `jdbc:` prefix is ignored. For H2 the `MODE=` setting,
    /// if present, selects the compatibility mode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for unknown schemes and modes.
    pub fn from_url(url: &str) -> Result<Self, Error> {
        let trimmed = url.trim();
        let rest = trimmed.strip_prefix("jdbc:").unwrap_or(trimmed);
        let scheme = rest
            .split_once(':')
            .map(|(scheme, _)| scheme.to_ascii_lowercase())
            .ok_or_else(|| Error::invalid_argument(format!("not a database URL: {url}")))?;

        if scheme == "h2" {
            let mode = rest
                .split(';')
                .skip(1)
                .filter_map(|setting| setting.split_once('='))
                .find(|(key, _)| key.trim().eq_ignore_ascii_case("mode"))
                .map(|(_, value)| value.trim().parse::<H2Mode>())
                .transpose()?
                .unwrap_or_default();
            return Ok(Self::h2(mode));
        }

        let dialect = match scheme.as_str() {
            "postgres" | "postgresql" | "pgsql" => DialectKind::Postgres,
            "mysql" => DialectKind::MySql,
            "mariadb" => DialectKind::MariaDb,
            "oracle" => DialectKind::Oracle,
            "sqlserver" | "mssql" => DialectKind::SqlServer,
            "sqlite" => DialectKind::Sqlite,
            other => {
                return Err(Error::invalid_argument(format!(
                    "unsupported database scheme: {other}"
                )))
            }
        };
        Ok(Self::new(dialect))
    }
}

impl From<DialectKind> for DialectContext {
    fn from(dialect: DialectKind) -> Self {
        Self::new(dialect)
    }
}

impl fmt::Display for DialectContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.h2_mode() {
            Some(mode) if mode != H2Mode::Regular => write!(f, "h2 ({mode:?} mode)"),
            _ => write!(f, "{}", self.dialect),
        }
    }
}
