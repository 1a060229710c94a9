//! FILENAME: parser/src/ast.rs
//! PURPOSE: Expression tree produced by the formula parser.
//! CONTEXT: A formula such as `sum($d[0:$r, $c]) / 2` is parsed once into an
//! `Expression` and then evaluated against the target table on every pass,
//! with `$r` / `$c` bound to the cell being computed.

/// A parsed formula expression.
#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    Literal(Value),

    /// `$r`: row position of the cell being evaluated.
    CurrentRow,

    /// `$c`: column position of the cell being evaluated.
    CurrentColumn,

    /// `$d[row, col]`. A single cell when both axes are indexes, an array of
    /// cells otherwise.
    Reference { row: Axis, col: Axis },

    BinaryOp {
        left: Box<Expression>,
        op: BinaryOperator,
        right: Box<Expression>,
    },

    UnaryOp {
        op: UnaryOperator,
        operand: Box<Expression>,
    },

    /// `NAME(args...)`. The name is stored upper-cased.
    FunctionCall { name: String, args: Vec<Expression> },
}

impl Expression {
    pub fn binary(left: Expression, op: BinaryOperator, right: Expression) -> Self {
        Expression::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn negate(operand: Expression) -> Self {
        Expression::UnaryOp {
            op: UnaryOperator::Negate,
            operand: Box::new(operand),
        }
    }

    /// `$d[row, col]` with two single-position axes.
    pub fn cell(row: Expression, col: Expression) -> Self {
        Expression::Reference {
            row: Axis::Index(Box::new(row)),
            col: Axis::Index(Box::new(col)),
        }
    }

    pub fn is_cell_reference(&self) -> bool {
        matches!(
            self,
            Expression::Reference {
                row: Axis::Index(_),
                col: Axis::Index(_),
            }
        )
    }
}

/// One side of a `$d[...]` reference.
#[derive(Debug, PartialEq, Clone)]
pub enum Axis {
    /// One position, or on the column axis a column name.
    Index(Box<Expression>),
    /// Half-open `start:stop`. Missing bounds run to the table edge.
    Slice {
        start: Option<Box<Expression>>,
        stop: Option<Box<Expression>>,
    },
}

#[derive(Debug, PartialEq, Clone)]
pub enum Value {
    Integer(i64),
    Number(f64),
    String(String),
    Boolean(bool),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BinaryOperator {
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    LessEqual,
    GreaterEqual,
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

/// Binding strength of prefix negation: tighter than `*`, looser than `^`,
/// so `-2^2` is `-(2^2)` and `-2*3` is `(-2)*3`.
pub const UNARY_PRECEDENCE: u8 = 4;

impl BinaryOperator {
    /// Higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Equal
            | BinaryOperator::NotEqual
            | BinaryOperator::LessThan
            | BinaryOperator::GreaterThan
            | BinaryOperator::LessEqual
            | BinaryOperator::GreaterEqual => 1,
            BinaryOperator::Add | BinaryOperator::Subtract => 2,
            BinaryOperator::Multiply | BinaryOperator::Divide => 3,
            BinaryOperator::Power => 5,
        }
    }

    pub fn is_right_associative(self) -> bool {
        self == BinaryOperator::Power
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Equal => "=",
            BinaryOperator::NotEqual => "<>",
            BinaryOperator::LessThan => "<",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::GreaterEqual => ">=",
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Power => "^",
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum UnaryOperator {
    Negate,
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

impl std::fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOperator::Negate => f.write_str("-"),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Value::Boolean(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
        }
    }
}
