//! Type-safe expression tree.
//!
//! Predicates and SET expressions are kept as a tree so that each dialect
//! can render them with its own identifier quoting. Parameters are
//! registered while rendering, in left-to-right traversal order.

use crate::schema::Column;

use super::query_builder::QueryBuilder;
use super::value::{BoundArgument, ToSqlValue};

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `=`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `LIKE`
    Like,
    /// `NOT LIKE`
    NotLike,
    /// `AND`
    And,
    /// `OR`
    Or,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
}

impl BinaryOp {
    /// Returns the SQL operator.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }

    const fn is_logical(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }

    const fn is_arithmetic(self) -> bool {
        matches!(self, Self::Add | Self::Sub | Self::Mul | Self::Div)
    }
}

/// An expression over columns, parameters and raw SQL fragments.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A column reference, rendered fully qualified.
    Column(Column),
    /// A bound parameter.
    Param(BoundArgument),
    /// A raw SQL fragment.
    ///
    /// **Warning**: only use this for fragments that don't contain user input.
    Raw(String),
    /// A binary operation.
    Binary {
        /// Left operand.
        left: Box<Expr>,
        /// Operator.
        op: BinaryOp,
        /// Right operand.
        right: Box<Expr>,
    },
    /// `NOT expr`.
    Not(Box<Expr>),
    /// `expr IS [NOT] NULL`.
    IsNull {
        /// Operand.
        expr: Box<Expr>,
        /// Whether this is `IS NOT NULL`.
        negated: bool,
    },
    /// `expr [NOT] IN (...)`.
    InList {
        /// Operand.
        expr: Box<Expr>,
        /// List items.
        list: Vec<Expr>,
        /// Whether this is `NOT IN`.
        negated: bool,
    },
    /// `expr [NOT] BETWEEN low AND high`.
    Between {
        /// Operand.
        expr: Box<Expr>,
        /// Lower bound.
        low: Box<Expr>,
        /// Upper bound.
        high: Box<Expr>,
        /// Whether this is `NOT BETWEEN`.
        negated: bool,
    },
    /// A parenthesized expression.
    Paren(Box<Expr>),
}

impl Expr {
    /// Creates a raw SQL fragment.
    #[must_use]
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::Raw(sql.into())
    }

    /// Creates a parameter whose type is inferred from the value.
    #[must_use]
    pub fn value<T: ToSqlValue>(value: T) -> Self {
        Self::Param(BoundArgument::inferred(value.to_sql_value()))
    }

    fn binary(left: Self, op: BinaryOp, right: Self) -> Self {
        Self::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Creates an AND expression.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        Self::binary(self, BinaryOp::And, other)
    }

    /// Creates an OR expression.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self::binary(self, BinaryOp::Or, other)
    }

    /// Wraps the expression in parentheses.
    #[must_use]
    pub fn paren(self) -> Self {
        Self::Paren(Box::new(self))
    }

    /// Negates the expression with NOT.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Creates an equality comparison against another expression.
    #[must_use]
    pub fn eq_expr(self, other: Self) -> Self {
        Self::binary(self, BinaryOp::Eq, other)
    }

    /// Creates an equality comparison against a value.
    #[must_use]
    pub fn eq<T: ToSqlValue>(self, value: T) -> Self {
        Self::binary(self, BinaryOp::Eq, Self::value(value))
    }

    /// Creates a greater-than comparison against a value.
    #[must_use]
    pub fn gt<T: ToSqlValue>(self, value: T) -> Self {
        Self::binary(self, BinaryOp::Gt, Self::value(value))
    }

    /// Creates a less-than comparison against a value.
    #[must_use]
    pub fn lt<T: ToSqlValue>(self, value: T) -> Self {
        Self::binary(self, BinaryOp::Lt, Self::value(value))
    }

    /// Returns the number of bound parameters in the tree.
    #[must_use]
    pub fn param_count(&self) -> usize {
        match self {
            Self::Column(_) | Self::Raw(_) => 0,
            Self::Param(_) => 1,
            Self::Binary { left, right, .. } => left.param_count() + right.param_count(),
            Self::Not(inner) | Self::Paren(inner) | Self::IsNull { expr: inner, .. } => {
                inner.param_count()
            }
            Self::InList { expr, list, .. } => {
                expr.param_count() + list.iter().map(Self::param_count).sum::<usize>()
            }
            Self::Between {
                expr, low, high, ..
            } => expr.param_count() + low.param_count() + high.param_count(),
        }
    }

    /// Renders the expression into a query builder, registering its
    /// parameters in traversal order.
    pub fn to_query_builder(&self, qb: &mut QueryBuilder<'_>) {
        match self {
            Self::Column(column) => {
                qb.append_full_identity(column);
            }
            Self::Param(argument) => {
                qb.register_value(argument.clone());
            }
            Self::Raw(sql) => {
                qb.append(sql);
            }
            Self::Binary { left, op, right } => {
                append_operand(qb, left, *op);
                qb.append(" ");
                qb.append(op.as_sql());
                qb.append(" ");
                append_operand(qb, right, *op);
            }
            Self::Not(inner) => {
                qb.append("NOT ");
                if matches!(**inner, Self::Binary { .. }) {
                    qb.append("(");
                    inner.to_query_builder(qb);
                    qb.append(")");
                } else {
                    inner.to_query_builder(qb);
                }
            }
            Self::IsNull { expr, negated } => {
                expr.to_query_builder(qb);
                qb.append(if *negated { " IS NOT NULL" } else { " IS NULL" });
            }
            Self::InList {
                expr,
                list,
                negated,
            } => {
                expr.to_query_builder(qb);
                qb.append(if *negated { " NOT IN (" } else { " IN (" });
                for (i, item) in list.iter().enumerate() {
                    if i > 0 {
                        qb.append(", ");
                    }
                    item.to_query_builder(qb);
                }
                qb.append(")");
            }
            Self::Between {
                expr,
                low,
                high,
                negated,
            } => {
                expr.to_query_builder(qb);
                qb.append(if *negated {
                    " NOT BETWEEN "
                } else {
                    " BETWEEN "
                });
                low.to_query_builder(qb);
                qb.append(" AND ");
                high.to_query_builder(qb);
            }
            Self::Paren(inner) => {
                qb.append("(");
                inner.to_query_builder(qb);
                qb.append(")");
            }
        }
    }
}

/// Renders an operand of `parent`, adding parentheses where precedence
/// would otherwise change the meaning.
fn append_operand(qb: &mut QueryBuilder<'_>, operand: &Expr, parent: BinaryOp) {
    let needs_paren = match operand {
        Expr::Binary { op, .. } => {
            (op.is_logical() && *op != parent)
                || (op.is_arithmetic() && parent.is_arithmetic())
        }
        _ => false,
    };
    if needs_paren {
        qb.append("(");
        operand.to_query_builder(qb);
        qb.append(")");
    } else {
        operand.to_query_builder(qb);
    }
}

impl Column {
    fn param<T: ToSqlValue>(&self, value: T) -> Expr {
        Expr::Param(BoundArgument::new(self.column_type, value.to_sql_value()))
    }

    fn compare<T: ToSqlValue>(&self, op: BinaryOp, value: T) -> Expr {
        Expr::binary(self.into(), op, self.param(value))
    }

    /// Creates an equality expression.
    #[must_use]
    pub fn eq<T: ToSqlValue>(&self, value: T) -> Expr {
        self.compare(BinaryOp::Eq, value)
    }

    /// Creates an inequality expression.
    #[must_use]
    pub fn not_eq<T: ToSqlValue>(&self, value: T) -> Expr {
        self.compare(BinaryOp::NotEq, value)
    }

    /// Creates a less-than expression.
    #[must_use]
    pub fn lt<T: ToSqlValue>(&self, value: T) -> Expr {
        self.compare(BinaryOp::Lt, value)
    }

    /// Creates a less-than-or-equal expression.
    #[must_use]
    pub fn lt_eq<T: ToSqlValue>(&self, value: T) -> Expr {
        self.compare(BinaryOp::LtEq, value)
    }

    /// Creates a greater-than expression.
    #[must_use]
    pub fn gt<T: ToSqlValue>(&self, value: T) -> Expr {
        self.compare(BinaryOp::Gt, value)
    }

    /// Creates a greater-than-or-equal expression.
    #[must_use]
    pub fn gt_eq<T: ToSqlValue>(&self, value: T) -> Expr {
        self.compare(BinaryOp::GtEq, value)
    }

    /// Creates a LIKE expression.
    #[must_use]
    pub fn like<T: ToSqlValue>(&self, pattern: T) -> Expr {
        self.compare(BinaryOp::Like, pattern)
    }

    /// Creates a NOT LIKE expression.
    #[must_use]
    pub fn not_like<T: ToSqlValue>(&self, pattern: T) -> Expr {
        self.compare(BinaryOp::NotLike, pattern)
    }

    /// Compares this column with another column.
    #[must_use]
    pub fn eq_col(&self, other: &Self) -> Expr {
        Expr::binary(self.into(), BinaryOp::Eq, other.into())
    }

    /// Creates an IS NULL expression.
    #[must_use]
    pub fn is_null(&self) -> Expr {
        Expr::IsNull {
            expr: Box::new(self.into()),
            negated: false,
        }
    }

    /// Creates an IS NOT NULL expression.
    #[must_use]
    pub fn is_not_null(&self) -> Expr {
        Expr::IsNull {
            expr: Box::new(self.into()),
            negated: true,
        }
    }

    /// Creates an IN expression.
    #[must_use]
    pub fn in_list<T: ToSqlValue>(&self, values: Vec<T>) -> Expr {
        self.in_list_impl(values, false)
    }

    /// Creates a NOT IN expression.
    #[must_use]
    pub fn not_in_list<T: ToSqlValue>(&self, values: Vec<T>) -> Expr {
        self.in_list_impl(values, true)
    }

    fn in_list_impl<T: ToSqlValue>(&self, values: Vec<T>, negated: bool) -> Expr {
        Expr::InList {
            expr: Box::new(self.into()),
            list: values.into_iter().map(|v| self.param(v)).collect(),
            negated,
        }
    }

    /// Creates a BETWEEN expression.
    #[must_use]
    pub fn between<T: ToSqlValue, U: ToSqlValue>(&self, low: T, high: U) -> Expr {
        Expr::Between {
            expr: Box::new(self.into()),
            low: Box::new(self.param(low)),
            high: Box::new(self.param(high)),
            negated: false,
        }
    }

    /// Creates a NOT BETWEEN expression.
    #[must_use]
    pub fn not_between<T: ToSqlValue, U: ToSqlValue>(&self, low: T, high: U) -> Expr {
        Expr::Between {
            expr: Box::new(self.into()),
            low: Box::new(self.param(low)),
            high: Box::new(self.param(high)),
            negated: true,
        }
    }

    /// Creates `column + value`.
    #[must_use]
    pub fn plus<T: ToSqlValue>(&self, value: T) -> Expr {
        self.compare(BinaryOp::Add, value)
    }

    /// Creates `column - value`.
    #[must_use]
    pub fn minus<T: ToSqlValue>(&self, value: T) -> Expr {
        self.compare(BinaryOp::Sub, value)
    }

    /// Creates `column * value`.
    #[must_use]
    pub fn times<T: ToSqlValue>(&self, value: T) -> Expr {
        self.compare(BinaryOp::Mul, value)
    }
}

impl From<Column> for Expr {
    fn from(column: Column) -> Self {
        Self::Column(column)
    }
}

impl From<&Column> for Expr {
    fn from(column: &Column) -> Self {
        Self::Column(column.clone())
    }
}
