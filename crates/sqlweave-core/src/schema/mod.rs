//! Schema model: tables, columns, joins and the column sets they form.
//!
//! A [`ColumnSet`] is anything rows can be read from or written to. Only
//! [`ColumnSet::Table`] and [`ColumnSet::Join`] can be the target of an
//! UPDATE; the other variants exist for reads and are rejected by the
//! statement compiler with their kind named in the error.

use crate::builder::expr::Expr;
use crate::builder::value::ColumnType;
use crate::error::{Error, Result};

/// A typed reference to a single attribute of a table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Column {
    /// Name of the owning table.
    pub table: String,
    /// Column name.
    pub name: String,
    /// Value type tag used when binding arguments for this column.
    pub column_type: ColumnType,
}

impl Column {
    /// Creates a column reference.
    #[must_use]
    pub fn new(table: &str, name: &str, column_type: ColumnType) -> Self {
        Self {
            table: String::from(table),
            name: String::from(name),
            column_type,
        }
    }

    /// Returns the `table.column` form without quoting.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.table, self.name)
    }
}

/// A single relation.
///
/// Columns are registered through the typed helpers, which return the
/// [`Column`] handle used in assignments and predicates:
///
/// ```rust
/// use sqlweave_core::schema::Table;
///
/// let mut users = Table::new("users");
/// let id = users.integer("id");
/// let name = users.varchar("name");
///
/// assert_eq!(id.qualified_name(), "users.id");
/// assert_eq!(users.columns().len(), 2);
/// # let _ = name;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
}

impl Table {
    /// Creates a table without columns.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: String::from(name),
            columns: Vec::new(),
        }
    }

    /// Returns the table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the registered columns in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Looks up a column by name.
    #[must_use]
    pub fn column_named(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Registers a column and returns its handle.
    ///
    /// Registering a name twice replaces the type of the existing column.
    pub fn add_column(&mut self, name: &str, column_type: ColumnType) -> Column {
        let column = Column::new(&self.name, name, column_type);
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.column_type = column_type,
            None => self.columns.push(column.clone()),
        }
        column
    }

    /// Registers a BOOLEAN column.
    pub fn bool(&mut self, name: &str) -> Column {
        self.add_column(name, ColumnType::Boolean)
    }

    /// Registers an INTEGER column.
    pub fn integer(&mut self, name: &str) -> Column {
        self.add_column(name, ColumnType::Integer)
    }

    /// Registers a BIGINT column.
    pub fn long(&mut self, name: &str) -> Column {
        self.add_column(name, ColumnType::BigInt)
    }

    /// Registers a DOUBLE PRECISION column.
    pub fn double(&mut self, name: &str) -> Column {
        self.add_column(name, ColumnType::Double)
    }

    /// Registers a VARCHAR column.
    pub fn varchar(&mut self, name: &str) -> Column {
        self.add_column(name, ColumnType::Varchar)
    }

    /// Registers a TEXT column.
    pub fn text(&mut self, name: &str) -> Column {
        self.add_column(name, ColumnType::Text)
    }

    /// Registers a BLOB column.
    pub fn blob(&mut self, name: &str) -> Column {
        self.add_column(name, ColumnType::Blob)
    }

    /// References this table under an alias.
    #[must_use]
    pub fn alias(&self, alias: &str) -> ColumnSet {
        ColumnSet::Alias(TableAlias {
            table: self.clone(),
            alias: String::from(alias),
        })
    }

    /// Starts a join with this table as the leading relation.
    #[must_use]
    pub fn join(&self) -> Join {
        Join::new(self.clone())
    }

    /// Shorthand for an INNER join on `left = right`.
    #[must_use]
    pub fn inner_join(&self, other: &Self, left: &Column, right: &Column) -> Join {
        self.join().inner_join(other, left, right)
    }
}

/// How a join part is combined with the relations before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinType {
    /// INNER JOIN.
    Inner,
    /// LEFT JOIN.
    Left,
    /// RIGHT JOIN.
    Right,
    /// FULL JOIN.
    Full,
    /// CROSS JOIN.
    Cross,
}

impl JoinType {
    /// Returns the SQL keyword sequence.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Full => "FULL JOIN",
            Self::Cross => "CROSS JOIN",
        }
    }
}

/// One joined relation with its ON conditions.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinPart {
    /// The join type.
    pub join_type: JoinType,
    /// The joined table.
    pub table: Table,
    /// Column pairs compared for equality.
    pub conditions: Vec<(Column, Column)>,
    /// Extra ON constraint, rendered with inlined values.
    pub additional: Option<Expr>,
}

impl JoinPart {
    /// Returns whether the part has any ON condition.
    #[must_use]
    pub fn has_conditions(&self) -> bool {
        !self.conditions.is_empty() || self.additional.is_some()
    }
}

/// Two or more relations combined with join predicates.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    table: Table,
    parts: Vec<JoinPart>,
}

impl Join {
    /// Creates a join with a leading table and no parts yet.
    #[must_use]
    pub const fn new(table: Table) -> Self {
        Self {
            table,
            parts: Vec::new(),
        }
    }

    /// Returns the leading table.
    #[must_use]
    pub const fn table(&self) -> &Table {
        &self.table
    }

    /// Returns the joined parts in declaration order.
    #[must_use]
    pub fn parts(&self) -> &[JoinPart] {
        &self.parts
    }

    /// Adds a join part.
    #[must_use]
    pub fn join(
        mut self,
        other: &Table,
        join_type: JoinType,
        conditions: Vec<(Column, Column)>,
        additional: Option<Expr>,
    ) -> Self {
        self.parts.push(JoinPart {
            join_type,
            table: other.clone(),
            conditions,
            additional,
        });
        self
    }

    /// Adds an INNER join on `left = right`.
    #[must_use]
    pub fn inner_join(self, other: &Table, left: &Column, right: &Column) -> Self {
        self.join(
            other,
            JoinType::Inner,
            vec![(left.clone(), right.clone())],
            None,
        )
    }

    /// Adds a LEFT join on `left = right`.
    #[must_use]
    pub fn left_join(self, other: &Table, left: &Column, right: &Column) -> Self {
        self.join(
            other,
            JoinType::Left,
            vec![(left.clone(), right.clone())],
            None,
        )
    }

    /// Adds a CROSS join.
    #[must_use]
    pub fn cross_join(self, other: &Table) -> Self {
        self.join(other, JoinType::Cross, Vec::new(), None)
    }

    /// Returns every table of the join, leading table first, without
    /// duplicates.
    #[must_use]
    pub fn tables(&self) -> Vec<&Table> {
        let mut tables: Vec<&Table> = vec![&self.table];
        for part in &self.parts {
            if !tables.iter().any(|t| t.name == part.table.name) {
                tables.push(&part.table);
            }
        }
        tables
    }

    /// Finds a member table by name.
    #[must_use]
    pub fn table_named(&self, name: &str) -> Option<&Table> {
        self.tables().into_iter().find(|t| t.name == name)
    }
}

/// A table referenced under an alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableAlias {
    /// The aliased table.
    pub table: Table,
    /// The alias.
    pub alias: String,
}

/// An aliased SELECT used as a relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subquery {
    /// The SELECT text.
    pub sql: String,
    /// The alias.
    pub alias: String,
}

/// A queryable or writable relation.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnSet {
    /// A single table.
    Table(Table),
    /// A join of several tables.
    Join(Join),
    /// An aliased table.
    Alias(TableAlias),
    /// An aliased subquery.
    Subquery(Subquery),
}

impl ColumnSet {
    /// Returns the name of the variant, used in error messages.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Table(_) => "Table",
            Self::Join(_) => "Join",
            Self::Alias(_) => "Alias",
            Self::Subquery(_) => "Subquery",
        }
    }

    /// Returns the tables actually written to when this set is an UPDATE
    /// target.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] for aliases and subqueries.
    pub fn target_tables(&self) -> Result<Vec<&Table>> {
        match self {
            Self::Table(table) => Ok(vec![table]),
            Self::Join(join) => Ok(join.tables()),
            other => Err(Error::unsupported(format!(
                "{} has no target tables",
                other.kind_name()
            ))),
        }
    }
}

impl From<Table> for ColumnSet {
    fn from(table: Table) -> Self {
        Self::Table(table)
    }
}

impl From<&Table> for ColumnSet {
    fn from(table: &Table) -> Self {
        Self::Table(table.clone())
    }
}

impl From<Join> for ColumnSet {
    fn from(join: Join) -> Self {
        Self::Join(join)
    }
}

impl From<Subquery> for ColumnSet {
    fn from(subquery: Subquery) -> Self {
        Self::Subquery(subquery)
    }
}
