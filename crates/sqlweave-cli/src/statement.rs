//! JSON statement files.
//!
//! A statement file declares the tables it touches and one UPDATE:
//!
//! ```json
//! {
//!   "tables": [
//!     { "name": "users", "columns": [
//!         { "name": "id", "type": "varchar" },
//!         { "name": "name", "type": "varchar" } ] },
//!     { "name": "user_data", "columns": [
//!         { "name": "user_id", "type": "varchar" },
//!         { "name": "comment", "type": "varchar" } ] }
//!   ],
//!   "target": { "join": { "from": "users", "parts": [
//!     { "table": "user_data", "on": [["users.id", "user_data.user_id"]] } ] } },
//!   "set": [ { "column": "user_data.comment", "value": "seen" } ],
//!   "where": [ { "column": "users.name", "op": "eq", "value": "Alice" } ],
//!   "limit": null
//! }
//! ```
//!
//! Columns are always written `table.column`.

use serde::{Deserialize, Deserializer};
use sqlweave_core::schema::JoinType;
use sqlweave_core::{Column, ColumnType, Error, Expr, Join, Result, SqlValue, Table, Update, UpdateStatement};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatementFile {
    pub tables: Vec<TableSpec>,
    pub target: TargetSpec,
    pub set: Vec<AssignmentSpec>,
    #[serde(default, rename = "where")]
    pub conditions: Vec<ConditionSpec>,
    #[serde(default)]
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableSpec {
    pub name: String,
    pub columns: Vec<ColumnSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetSpec {
    Table(String),
    Join(JoinSpec),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JoinSpec {
    pub from: String,
    pub parts: Vec<JoinPartSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JoinPartSpec {
    pub table: String,
    #[serde(default)]
    pub kind: JoinKind,
    #[serde(default)]
    pub on: Vec<(String, String)>,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinKind {
    #[default]
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl From<JoinKind> for JoinType {
    fn from(kind: JoinKind) -> Self {
        match kind {
            JoinKind::Inner => Self::Inner,
            JoinKind::Left => Self::Left,
            JoinKind::Right => Self::Right,
            JoinKind::Full => Self::Full,
            JoinKind::Cross => Self::Cross,
        }
    }
}

/// `value` binds a parameter, `from_column` copies another column.
/// `"value": null` sets the column to NULL.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssignmentSpec {
    pub column: String,
    #[serde(default, deserialize_with = "present")]
    pub value: Option<serde_json::Value>,
    #[serde(default)]
    pub from_column: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Like,
    NotLike,
    IsNull,
    IsNotNull,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConditionSpec {
    pub column: String,
    pub op: CompareOp,
    #[serde(default, deserialize_with = "present")]
    pub value: Option<serde_json::Value>,
}

/// Keeps an explicit `null` apart from a missing field, which `default`
/// turns into `None`.
fn present<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<serde_json::Value>, D::Error> {
    serde_json::Value::deserialize(deserializer).map(Some)
}

impl StatementFile {
    /// Parses a statement file.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Resolves every name against the declared tables and builds the
    /// statement.
    pub fn to_statement(&self) -> Result<UpdateStatement> {
        let tables = self
            .tables
            .iter()
            .map(|spec| {
                let mut table = Table::new(&spec.name);
                for column in &spec.columns {
                    table.add_column(&column.name, column.column_type);
                }
                table
            })
            .collect::<Vec<_>>();
        let resolver = Resolver { tables: &tables };

        let mut update = match &self.target {
            TargetSpec::Table(name) => Update::table(resolver.table(name)?),
            TargetSpec::Join(spec) => Update::join(resolver.join(spec)?),
        };

        for assignment in &self.set {
            let column = resolver.column(&assignment.column)?;
            update = match (&assignment.value, &assignment.from_column) {
                (Some(value), None) => update.set(&column, json_to_sql(value)?),
                (None, Some(source)) => update.set_expr(&column, resolver.column(source)?),
                _ => {
                    return Err(Error::invalid_argument(format!(
                        "assignment of {} needs exactly one of `value` or `from_column`",
                        assignment.column
                    )))
                }
            };
        }

        for condition in &self.conditions {
            update = update.and_where(resolver.condition(condition)?);
        }
        if let Some(limit) = self.limit {
            update = update.limit(limit);
        }
        Ok(update.build())
    }
}

struct Resolver<'a> {
    tables: &'a [Table],
}

impl Resolver<'_> {
    fn table(&self, name: &str) -> Result<&Table> {
        self.tables
            .iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| Error::invalid_argument(format!("unknown table: {name}")))
    }

    fn column(&self, qualified: &str) -> Result<Column> {
        let (table, column) = qualified.split_once('.').ok_or_else(|| {
            Error::invalid_argument(format!("column {qualified} must be written table.column"))
        })?;
        self.table(table)?
            .column_named(column)
            .cloned()
            .ok_or_else(|| Error::invalid_argument(format!("unknown column: {qualified}")))
    }

    fn join(&self, spec: &JoinSpec) -> Result<Join> {
        let mut join = self.table(&spec.from)?.join();
        for part in &spec.parts {
            let conditions = part
                .on
                .iter()
                .map(|(left, right)| Ok((self.column(left)?, self.column(right)?)))
                .collect::<Result<Vec<_>>>()?;
            join = join.join(self.table(&part.table)?, part.kind.into(), conditions, None);
        }
        Ok(join)
    }

    fn condition(&self, spec: &ConditionSpec) -> Result<Expr> {
        let column = self.column(&spec.column)?;
        let value = || {
            spec.value
                .as_ref()
                .ok_or_else(|| {
                    Error::invalid_argument(format!("condition on {} needs a value", spec.column))
                })
                .and_then(json_to_sql)
        };
        Ok(match spec.op {
            CompareOp::Eq => column.eq(value()?),
            CompareOp::NotEq => column.not_eq(value()?),
            CompareOp::Lt => column.lt(value()?),
            CompareOp::LtEq => column.lt_eq(value()?),
            CompareOp::Gt => column.gt(value()?),
            CompareOp::GtEq => column.gt_eq(value()?),
            CompareOp::Like => column.like(value()?),
            CompareOp::NotLike => column.not_like(value()?),
            CompareOp::IsNull => column.is_null(),
            CompareOp::IsNotNull => column.is_not_null(),
        })
    }
}

fn json_to_sql(value: &serde_json::Value) -> Result<SqlValue> {
    use serde_json::Value;

    match value {
        Value::Null => Ok(SqlValue::Null),
        Value::Bool(b) => Ok(SqlValue::Bool(*b)),
        Value::Number(n) => n
            .as_i64()
            .map(SqlValue::Int)
            .or_else(|| n.as_f64().map(SqlValue::Float))
            .ok_or_else(|| Error::invalid_argument(format!("unsupported number: {n}"))),
        Value::String(s) => Ok(SqlValue::Text(s.clone())),
        Value::Array(_) | Value::Object(_) => Err(Error::invalid_argument(format!(
            "only scalar values can be bound, got {value}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlweave_core::{DialectContext, DialectKind};

    const JOIN_FILE: &str = r#"{
        "tables": [
            { "name": "users", "columns": [
                { "name": "id", "type": "varchar" },
                { "name": "name", "type": "varchar" } ] },
            { "name": "user_data", "columns": [
                { "name": "user_id", "type": "varchar" },
                { "name": "comment", "type": "varchar" },
                { "name": "score", "type": "integer" } ] }
        ],
        "target": { "join": { "from": "users", "parts": [
            { "table": "user_data", "on": [["users.id", "user_data.user_id"]] } ] } },
        "set": [
            { "column": "user_data.comment", "value": "seen" },
            { "column": "user_data.score", "value": 3 }
        ],
        "where": [ { "column": "users.name", "op": "eq", "value": "Alice" } ]
    }"#;

    #[test]
    fn test_join_file() {
        let statement = StatementFile::from_json(JOIN_FILE)
            .unwrap()
            .to_statement()
            .unwrap();
        let ctx = DialectContext::new(DialectKind::Postgres);
        assert_eq!(
            statement.compile(&ctx).unwrap(),
            "UPDATE user_data SET comment = ?, score = ? FROM users \
             WHERE users.id = user_data.user_id AND users.name = ?"
        );
        let args = statement.arguments(&ctx);
        assert_eq!(args[0][1].column_type, ColumnType::Integer);
        assert_eq!(args[0][1].value, SqlValue::Int(3));
    }

    #[test]
    fn test_table_file_with_limit_and_column_copy() {
        let json = r#"{
            "tables": [ { "name": "accounts", "columns": [
                { "name": "balance", "type": "double" },
                { "name": "previous", "type": "double" },
                { "name": "owner", "type": "text" } ] } ],
            "target": { "table": "accounts" },
            "set": [
                { "column": "accounts.previous", "from_column": "accounts.balance" },
                { "column": "accounts.balance", "value": 0.5 }
            ],
            "where": [
                { "column": "accounts.owner", "op": "is_not_null" },
                { "column": "accounts.balance", "op": "gt_eq", "value": 10 }
            ],
            "limit": 2
        }"#;
        let statement = StatementFile::from_json(json)
            .unwrap()
            .to_statement()
            .unwrap();
        assert_eq!(
            statement
                .compile(&DialectContext::new(DialectKind::MySql))
                .unwrap(),
            "UPDATE accounts SET previous = accounts.balance, balance = ? \
             WHERE accounts.owner IS NOT NULL AND accounts.balance >= ? LIMIT 2"
        );
    }

    #[test]
    fn test_unknown_names_are_rejected() {
        let json = r#"{
            "tables": [ { "name": "users", "columns": [ { "name": "id", "type": "integer" } ] } ],
            "target": { "table": "users" },
            "set": [ { "column": "users.email", "value": "x" } ]
        }"#;
        let err = StatementFile::from_json(json)
            .unwrap()
            .to_statement()
            .unwrap_err();
        assert_eq!(err, Error::invalid_argument("unknown column: users.email"));

        let json = r#"{
            "tables": [],
            "target": { "table": "users" },
            "set": []
        }"#;
        let err = StatementFile::from_json(json)
            .unwrap()
            .to_statement()
            .unwrap_err();
        assert_eq!(err, Error::invalid_argument("unknown table: users"));
    }

    #[test]
    fn test_assignment_needs_one_source() {
        let json = r#"{
            "tables": [ { "name": "users", "columns": [ { "name": "id", "type": "integer" } ] } ],
            "target": { "table": "users" },
            "set": [ { "column": "users.id" } ]
        }"#;
        assert!(matches!(
            StatementFile::from_json(json).unwrap().to_statement(),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_null_assignment_and_not_like() {
        let json = r#"{
            "tables": [ { "name": "users", "columns": [
                { "name": "email", "type": "varchar" },
                { "name": "name", "type": "varchar" } ] } ],
            "target": { "table": "users" },
            "set": [ { "column": "users.email", "value": null } ],
            "where": [ { "column": "users.name", "op": "not_like", "value": "admin%" } ]
        }"#;
        let file = StatementFile::from_json(json).unwrap();
        assert_eq!(file.set[0].value, Some(serde_json::Value::Null));

        let statement = file.to_statement().unwrap();
        let ctx = DialectContext::new(DialectKind::Sqlite);
        assert_eq!(
            statement.compile(&ctx).unwrap(),
            "UPDATE users SET email = ? WHERE users.name NOT LIKE ?"
        );
        let args = statement.arguments(&ctx);
        assert_eq!(args[0][0].column_type, ColumnType::Varchar);
        assert_eq!(args[0][0].value, SqlValue::Null);
    }

    #[test]
    fn test_json_to_sql() {
        assert_eq!(json_to_sql(&serde_json::json!(null)).unwrap(), SqlValue::Null);
        assert_eq!(json_to_sql(&serde_json::json!(7)).unwrap(), SqlValue::Int(7));
        assert_eq!(json_to_sql(&serde_json::json!(1.5)).unwrap(), SqlValue::Float(1.5));
        assert!(json_to_sql(&serde_json::json!([1, 2])).is_err());
    }
}
