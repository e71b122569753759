//! Abstract syntax tree for the supported SQL subset.
//!
//! The tree is plain owned data: every node owns its children, there is no
//! sharing and no interior mutability. Nodes that need a location for
//! diagnostics are wrapped in [`Node`], which records the position of the
//! node's first token.

use crate::cursor::Position;
use serde::Serialize;
use std::ops::Deref;

/// A syntax node together with the position of its first token.
///
/// Equality is structural: positions are ignored by `==`, so the same
/// statement written with different spacing parses to equal trees.
#[derive(Debug, Clone, Serialize)]
pub struct Node<T> {
    pub kind: T,
    pub position: Position,
}

impl<T> Node<T> {
    pub fn new(kind: T, position: Position) -> Self {
        Self { kind, position }
    }

    /// Wrap `kind` with a placeholder position. Handy for building
    /// expected trees in tests.
    pub fn detached(kind: T) -> Self {
        Self::new(kind, Position::START)
    }
}

impl<T: PartialEq> PartialEq for Node<T> {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl<T> Deref for Node<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.kind
    }
}

pub type Statement = Node<StatementKind>;
pub type Expr = Node<ExprKind>;
pub type TableRef = Node<TableFactor>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StatementKind {
    Select(Box<Select>),
    Insert(Insert),
    Update(Update),
    Delete(Delete),
    CreateTable(CreateTable),
}

/// A dotted name such as `schema.table`. Parts are stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ObjectName(pub Vec<String>);

impl ObjectName {
    pub fn new(parts: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self(parts.into_iter().map(Into::into).collect())
    }
}

// ===== SELECT =====

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Select {
    pub distinct: bool,
    /// Never empty.
    pub projection: Vec<SelectItem>,
    /// Comma-separated sources of the FROM clause; empty without FROM.
    pub from: Vec<TableRef>,
    pub joins: Vec<Join>,
    /// WHERE
    pub selection: Option<Expr>,
    pub group_by: Vec<Expr>,
    pub having: Option<Expr>,
    pub order_by: Vec<OrderByExpr>,
    /// `None` when absent or `LIMIT ALL`.
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Select {
    /// A bare `SELECT <projection>` with every optional clause absent.
    pub fn new(projection: Vec<SelectItem>) -> Self {
        Self {
            distinct: false,
            projection,
            from: Vec::new(),
            joins: Vec::new(),
            selection: None,
            group_by: Vec::new(),
            having: None,
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectItem {
    pub expr: Expr,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableFactor {
    pub relation: Relation,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Relation {
    Table(ObjectName),
    Subquery(Box<Select>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinKind {
    pub fn as_str(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Full => "FULL JOIN",
            JoinKind::Cross => "CROSS JOIN",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Join {
    pub kind: JoinKind,
    pub table: TableRef,
    /// The ON condition. Always present except for CROSS JOIN.
    pub constraint: Option<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderByExpr {
    pub expr: Expr,
    pub direction: SortDirection,
}

// ===== Data modification and definition =====

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insert {
    pub table: ObjectName,
    /// Explicit column list; empty when omitted.
    pub columns: Vec<String>,
    pub source: InsertSource,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum InsertSource {
    /// One inner vector per parenthesized row.
    Values(Vec<Vec<Expr>>),
    Select(Box<Select>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Update {
    pub table: ObjectName,
    pub assignments: Vec<Assignment>,
    pub selection: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    pub column: String,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Delete {
    pub table: ObjectName,
    pub selection: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateTable {
    pub name: ObjectName,
    pub if_not_exists: bool,
    pub columns: Vec<ColumnDef>,
    /// Table-level `PRIMARY KEY (a, b)`; empty when not given.
    pub primary_key: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
    pub constraints: Vec<ColumnConstraint>,
}

/// A type name as written, e.g. `VARCHAR(255)` or `DOUBLE PRECISION`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DataType {
    /// One entry per identifier token. A quoted word may itself contain spaces.
    pub words: Vec<String>,
    pub params: Vec<u64>,
}

impl DataType {
    /// A single-word type without parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_words([name])
    }

    pub fn from_words(words: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            words: words.into_iter().map(Into::into).collect(),
            params: Vec::new(),
        }
    }

    /// The words joined with single spaces, e.g. `DOUBLE PRECISION`.
    pub fn name(&self) -> String {
        self.words.join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ColumnConstraint {
    NotNull,
    Null,
    PrimaryKey,
    Unique,
    Default(Expr),
}

// ===== Expressions =====

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExprKind {
    Literal(Literal),
    Column(ColumnRef),
    /// `*` or `table.*`
    Wildcard {
        qualifier: Option<ObjectName>,
    },
    Binary {
        op: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOperator,
        operand: Box<Expr>,
    },
    Function(FunctionCall),
    /// A parenthesized SELECT used as a value.
    Subquery(Box<Select>),
    Exists(Box<Select>),
    InList {
        expr: Box<Expr>,
        list: Vec<Expr>,
        negated: bool,
    },
    InSubquery {
        expr: Box<Expr>,
        subquery: Box<Select>,
        negated: bool,
    },
    Between {
        expr: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
        negated: bool,
    },
    IsNull {
        expr: Box<Expr>,
        negated: bool,
    },
    /// `expr::type`
    Cast {
        expr: Box<Expr>,
        data_type: DataType,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Literal {
    Integer(i64),
    /// Decimal or exponent form, kept exactly as written.
    Numeric(String),
    String(String),
    Boolean(bool),
    Null,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ColumnRef {
    pub qualifier: Option<ObjectName>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionCall {
    pub name: ObjectName,
    /// `COUNT(DISTINCT x)`
    pub distinct: bool,
    /// `COUNT(*)` has a single wildcard argument.
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BinaryOperator {
    Or,
    And,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Like,
    NotLike,
    Plus,
    Minus,
    Concat,
    Multiply,
    Divide,
    Modulo,
}

impl BinaryOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOperator::Or => "OR",
            BinaryOperator::And => "AND",
            BinaryOperator::Eq => "=",
            BinaryOperator::NotEq => "<>",
            BinaryOperator::Lt => "<",
            BinaryOperator::LtEq => "<=",
            BinaryOperator::Gt => ">",
            BinaryOperator::GtEq => ">=",
            BinaryOperator::Like => "LIKE",
            BinaryOperator::NotLike => "NOT LIKE",
            BinaryOperator::Plus => "+",
            BinaryOperator::Minus => "-",
            BinaryOperator::Concat => "||",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum UnaryOperator {
    Not,
    Plus,
    Minus,
}

impl UnaryOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOperator::Not => "NOT",
            UnaryOperator::Plus => "+",
            UnaryOperator::Minus => "-",
        }
    }
}

// ===== Construction helpers =====
//
// Detached constructors for building expected trees; positions are
// placeholders and do not affect equality.

impl Expr {
    pub fn integer(value: i64) -> Self {
        Self::detached(ExprKind::Literal(Literal::Integer(value)))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::detached(ExprKind::Literal(Literal::String(value.into())))
    }

    pub fn column(name: impl Into<String>) -> Self {
        Self::detached(ExprKind::Column(ColumnRef {
            qualifier: None,
            name: name.into(),
        }))
    }

    pub fn qualified_column(qualifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self::detached(ExprKind::Column(ColumnRef {
            qualifier: Some(ObjectName::new([qualifier])),
            name: name.into(),
        }))
    }

    pub fn wildcard() -> Self {
        Self::detached(ExprKind::Wildcard { qualifier: None })
    }

    pub fn binary(op: BinaryOperator, left: Expr, right: Expr) -> Self {
        Self::detached(ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn unary(op: UnaryOperator, operand: Expr) -> Self {
        Self::detached(ExprKind::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    pub fn function(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::detached(ExprKind::Function(FunctionCall {
            name: ObjectName::new([name]),
            distinct: false,
            args,
        }))
    }
}

impl Statement {
    /// The SELECT body, if this is a SELECT statement.
    pub fn as_select(&self) -> Option<&Select> {
        match &self.kind {
            StatementKind::Select(select) => Some(select),
            _ => None,
        }
    }
}
