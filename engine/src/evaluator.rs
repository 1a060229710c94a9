//! FILENAME: engine/src/evaluator.rs
//! PURPOSE: Evaluates formula ASTs against a table.
//! CONTEXT: After a formula is parsed into an AST, this module traverses
//! the tree and computes the value for one target cell. `$r` and `$c` are
//! the position of that cell; `$d[row, col]` reads the table as it is at
//! the moment of evaluation, so later passes see earlier writes.
//!
//! SUPPORTED FEATURES:
//! - Literals: Integers, Numbers, Strings, Booleans
//! - Cell references with positions (negative from the end) or column names
//! - Slices on either axis, expanding to an array in row-major order
//! - Binary operations: +, -, *, /, ^, =, <>, <, >, <=, >=
//! - Unary operations: - (negation)
//! - Functions: SUM, MIN, MAX, AVERAGE/AVG/MEAN, COUNT, ABS, ROUND, IF, LEN
//!
//! Integers stay integers through +, -, * and ^ unless they overflow;
//! division always yields a float.

use crate::cell::CellValue;
use crate::selector::{normalize_index, slice_bounds};
use crate::table::Table;
use parser::{Axis, BinaryOperator, Expression, UnaryOperator, Value};
use std::fmt;

/// Why an expression could not produce a value.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    DivByZero,
    /// An operand of the wrong type.
    Value(String),
    /// A reference outside the table or to an unknown column.
    Ref(String),
    /// An unknown function or a wrong argument count.
    Name(String),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::DivByZero => write!(f, "division by zero"),
            EvalError::Value(msg) => write!(f, "type error: {}", msg),
            EvalError::Ref(msg) => write!(f, "bad reference: {}", msg),
            EvalError::Name(msg) => write!(f, "{}", msg),
        }
    }
}

/// The result of evaluating an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalResult {
    Empty,
    Integer(i64),
    Number(f64),
    Text(String),
    Boolean(bool),
    Error(EvalError),
    /// The cells covered by a slice reference, or a list stored in a cell.
    Array(Vec<EvalResult>),
}

impl EvalResult {
    fn type_error(msg: impl Into<String>) -> Self {
        EvalResult::Error(EvalError::Value(msg.into()))
    }

    /// Converts the evaluation result to a CellValue for storage.
    /// Errors are not storable and become `Empty`; callers check first.
    pub fn to_cell_value(&self) -> CellValue {
        match self {
            EvalResult::Empty | EvalResult::Error(_) => CellValue::Empty,
            EvalResult::Integer(n) => CellValue::Integer(*n),
            EvalResult::Number(n) => CellValue::Number(*n),
            EvalResult::Text(s) => CellValue::Text(s.clone()),
            EvalResult::Boolean(b) => CellValue::Boolean(*b),
            EvalResult::Array(items) => {
                CellValue::List(items.iter().map(EvalResult::to_cell_value).collect())
            }
        }
    }

    pub fn from_cell_value(value: &CellValue) -> Self {
        match value {
            CellValue::Empty => EvalResult::Empty,
            CellValue::Integer(n) => EvalResult::Integer(*n),
            CellValue::Number(n) => EvalResult::Number(*n),
            CellValue::Text(s) => EvalResult::Text(s.clone()),
            CellValue::Boolean(b) => EvalResult::Boolean(*b),
            CellValue::List(items) => {
                EvalResult::Array(items.iter().map(EvalResult::from_cell_value).collect())
            }
        }
    }

    /// Numeric view used by arithmetic. Empty cells count as zero.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            EvalResult::Empty => Some(0.0),
            EvalResult::Integer(n) => Some(*n as f64),
            EvalResult::Number(n) => Some(*n),
            EvalResult::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            EvalResult::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Integer view, when the value is integral without conversion loss.
    fn as_integer(&self) -> Option<i64> {
        match self {
            EvalResult::Empty => Some(0),
            EvalResult::Integer(n) => Some(*n),
            EvalResult::Boolean(b) => Some(*b as i64),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            EvalResult::Boolean(b) => Some(*b),
            EvalResult::Integer(n) => Some(*n != 0),
            EvalResult::Number(n) => Some(*n != 0.0),
            EvalResult::Empty => Some(false),
            EvalResult::Text(s) => match s.to_uppercase().as_str() {
                "TRUE" => Some(true),
                "FALSE" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            EvalResult::Error(e) => e.to_string(),
            other => other.to_cell_value().to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, EvalResult::Error(_))
    }

    /// Flattens an array result into individual values.
    /// Non-array values return a single-element vector.
    pub fn flatten(&self) -> Vec<EvalResult> {
        match self {
            EvalResult::Array(items) => items.iter().flat_map(EvalResult::flatten).collect(),
            other => vec![other.clone()],
        }
    }
}

/// An index or slice bound resolved on one axis.
enum AxisSpan {
    One(usize),
    Many(Vec<usize>),
}

/// Evaluates expressions for the cell at (`row`, `col`) of `table`.
pub struct Evaluator<'a> {
    table: &'a Table,
    row: usize,
    col: usize,
}

impl<'a> Evaluator<'a> {
    pub fn new(table: &'a Table, row: usize, col: usize) -> Self {
        Evaluator { table, row, col }
    }

    /// Evaluates an AST expression and returns the result.
    pub fn evaluate(&self, expr: &Expression) -> EvalResult {
        match expr {
            Expression::Literal(value) => self.eval_literal(value),
            Expression::CurrentRow => EvalResult::Integer(self.row as i64),
            Expression::CurrentColumn => EvalResult::Integer(self.col as i64),
            Expression::Reference { row, col } => self.eval_reference(row, col),
            Expression::BinaryOp { left, op, right } => self.eval_binary_op(left, op, right),
            Expression::UnaryOp { op, operand } => self.eval_unary_op(op, operand),
            Expression::FunctionCall { name, args } => self.eval_function(name, args),
        }
    }

    fn eval_literal(&self, value: &Value) -> EvalResult {
        match value {
            Value::Integer(n) => EvalResult::Integer(*n),
            Value::Number(n) => EvalResult::Number(*n),
            Value::String(s) => EvalResult::Text(s.clone()),
            Value::Boolean(b) => EvalResult::Boolean(*b),
        }
    }

    // ==================== References ====================

    fn eval_reference(&self, row: &Axis, col: &Axis) -> EvalResult {
        let rows = match self.resolve_axis(row, false) {
            Ok(span) => span,
            Err(e) => return EvalResult::Error(e),
        };
        let cols = match self.resolve_axis(col, true) {
            Ok(span) => span,
            Err(e) => return EvalResult::Error(e),
        };

        match (rows, cols) {
            (AxisSpan::One(r), AxisSpan::One(c)) => self.cell(r, c),
            (rows, cols) => {
                let rows = into_positions(rows);
                let cols = into_positions(cols);
                let mut values = Vec::with_capacity(rows.len() * cols.len());
                for &r in &rows {
                    for &c in &cols {
                        values.push(self.cell(r, c));
                    }
                }
                EvalResult::Array(values)
            }
        }
    }

    fn cell(&self, row: usize, col: usize) -> EvalResult {
        match self.table.cell(row, col) {
            Some(value) => EvalResult::from_cell_value(value),
            None => EvalResult::Error(EvalError::Ref(format!("[{}, {}]", row, col))),
        }
    }

    fn axis_len(&self, is_col: bool) -> usize {
        if is_col {
            self.table.num_cols()
        } else {
            self.table.len()
        }
    }

    fn resolve_axis(&self, axis: &Axis, is_col: bool) -> Result<AxisSpan, EvalError> {
        let len = self.axis_len(is_col);
        match axis {
            Axis::Index(expr) => {
                let index = self.position(expr, is_col)?;
                normalize_index(index, len)
                    .map(AxisSpan::One)
                    .ok_or_else(|| EvalError::Ref(format!("index {} outside 0..{}", index, len)))
            }
            Axis::Slice { start, stop } => {
                let start = match start {
                    Some(e) => Some(self.position(e, is_col)?),
                    None => None,
                };
                let stop = match stop {
                    Some(e) => Some(self.position(e, is_col)?),
                    None => None,
                };
                let (s, e) = slice_bounds(start, stop, len);
                Ok(AxisSpan::Many((s..e).collect()))
            }
        }
    }

    /// Evaluates an axis bound to a position. On the column axis a string
    /// names a column.
    fn position(&self, expr: &Expression, is_col: bool) -> Result<i64, EvalError> {
        match self.evaluate(expr) {
            EvalResult::Error(e) => Err(e),
            EvalResult::Text(name) if is_col => self
                .table
                .column_map()
                .position_of(&name)
                .map(|p| p as i64)
                .ok_or(EvalError::Ref(format!("unknown column {:?}", name))),
            EvalResult::Integer(n) => Ok(n),
            EvalResult::Number(n) if n.fract() == 0.0 => Ok(n as i64),
            other => Err(EvalError::Ref(format!("{:?} is not a position", other))),
        }
    }

    // ==================== Operators ====================

    fn eval_binary_op(
        &self,
        left: &Expression,
        op: &BinaryOperator,
        right: &Expression,
    ) -> EvalResult {
        let left_val = self.evaluate(left);
        let right_val = self.evaluate(right);

        // Propagate errors
        if left_val.is_error() {
            return left_val;
        }
        if right_val.is_error() {
            return right_val;
        }

        match op {
            BinaryOperator::Add => self.eval_arith(&left_val, &right_val, i64::checked_add, |l, r| l + r),
            BinaryOperator::Subtract => {
                self.eval_arith(&left_val, &right_val, i64::checked_sub, |l, r| l - r)
            }
            BinaryOperator::Multiply => {
                self.eval_arith(&left_val, &right_val, i64::checked_mul, |l, r| l * r)
            }
            BinaryOperator::Divide => self.eval_divide(&left_val, &right_val),
            BinaryOperator::Power => self.eval_power(&left_val, &right_val),

            BinaryOperator::Equal => EvalResult::Boolean(values_equal(&left_val, &right_val)),
            BinaryOperator::NotEqual => EvalResult::Boolean(!values_equal(&left_val, &right_val)),
            BinaryOperator::LessThan => self.eval_compare(&left_val, &right_val, |o| o.is_lt()),
            BinaryOperator::GreaterThan => self.eval_compare(&left_val, &right_val, |o| o.is_gt()),
            BinaryOperator::LessEqual => self.eval_compare(&left_val, &right_val, |o| o.is_le()),
            BinaryOperator::GreaterEqual => self.eval_compare(&left_val, &right_val, |o| o.is_ge()),
        }
    }

    fn eval_arith(
        &self,
        left: &EvalResult,
        right: &EvalResult,
        int_op: fn(i64, i64) -> Option<i64>,
        float_op: fn(f64, f64) -> f64,
    ) -> EvalResult {
        if let (Some(l), Some(r)) = (left.as_integer(), right.as_integer()) {
            if let Some(n) = int_op(l, r) {
                return EvalResult::Integer(n);
            }
        }
        match (left.as_number(), right.as_number()) {
            (Some(l), Some(r)) => EvalResult::Number(float_op(l, r)),
            _ => EvalResult::type_error(format!(
                "cannot combine {} and {}",
                left.as_text(),
                right.as_text()
            )),
        }
    }

    fn eval_divide(&self, left: &EvalResult, right: &EvalResult) -> EvalResult {
        match (left.as_number(), right.as_number()) {
            (Some(_), Some(r)) if r == 0.0 => EvalResult::Error(EvalError::DivByZero),
            (Some(l), Some(r)) => EvalResult::Number(l / r),
            _ => EvalResult::type_error("division needs numbers"),
        }
    }

    fn eval_power(&self, left: &EvalResult, right: &EvalResult) -> EvalResult {
        if let (Some(l), Some(r)) = (left.as_integer(), right.as_integer()) {
            if let Some(n) = u32::try_from(r).ok().and_then(|r| l.checked_pow(r)) {
                return EvalResult::Integer(n);
            }
        }
        match (left.as_number(), right.as_number()) {
            (Some(l), Some(r)) => {
                let result = l.powf(r);
                if result.is_nan() || result.is_infinite() {
                    EvalResult::type_error("power out of range")
                } else {
                    EvalResult::Number(result)
                }
            }
            _ => EvalResult::type_error("power needs numbers"),
        }
    }

    fn eval_compare(
        &self,
        left: &EvalResult,
        right: &EvalResult,
        test: fn(std::cmp::Ordering) -> bool,
    ) -> EvalResult {
        let ordering = match (left, right) {
            (EvalResult::Text(l), EvalResult::Text(r)) => Some(l.to_uppercase().cmp(&r.to_uppercase())),
            _ => match (left.as_number(), right.as_number()) {
                (Some(l), Some(r)) => l.partial_cmp(&r),
                _ => None,
            },
        };
        match ordering {
            Some(o) => EvalResult::Boolean(test(o)),
            None => EvalResult::type_error("values are not comparable"),
        }
    }

    fn eval_unary_op(&self, op: &UnaryOperator, operand: &Expression) -> EvalResult {
        let val = self.evaluate(operand);
        if val.is_error() {
            return val;
        }

        match op {
            UnaryOperator::Negate => match val {
                EvalResult::Integer(n) => match n.checked_neg() {
                    Some(neg) => EvalResult::Integer(neg),
                    None => EvalResult::Number(-(n as f64)),
                },
                other => match other.as_number() {
                    Some(n) => EvalResult::Number(-n),
                    None => EvalResult::type_error("negation needs a number"),
                },
            },
        }
    }

    // ==================== Functions ====================

    fn eval_function(&self, name: &str, args: &[Expression]) -> EvalResult {
        match name.to_uppercase().as_str() {
            // Aggregate functions
            "SUM" => self.fn_sum(args),
            "AVERAGE" | "AVG" | "MEAN" => self.fn_average(args),
            "MIN" => self.fn_extreme(args, |a, b| a < b),
            "MAX" => self.fn_extreme(args, |a, b| a > b),
            "COUNT" => self.fn_count(args),

            // Scalar functions
            "ABS" => self.fn_abs(args),
            "ROUND" => self.fn_round(args),
            "IF" => self.fn_if(args),
            "LEN" => self.fn_len(args),

            other => EvalResult::Error(EvalError::Name(format!("unknown function {}", other))),
        }
    }

    /// Collects the numeric values among the arguments, flattening arrays.
    /// Text and empty cells are skipped.
    fn collect_numbers(&self, args: &[Expression]) -> Result<Vec<EvalResult>, EvalError> {
        let mut numbers = Vec::new();
        for arg in args {
            for item in self.evaluate(arg).flatten() {
                match item {
                    EvalResult::Error(e) => return Err(e),
                    EvalResult::Integer(_) | EvalResult::Number(_) => numbers.push(item),
                    _ => {}
                }
            }
        }
        Ok(numbers)
    }

    fn fn_sum(&self, args: &[Expression]) -> EvalResult {
        let numbers = match self.collect_numbers(args) {
            Ok(numbers) => numbers,
            Err(e) => return EvalResult::Error(e),
        };
        numbers
            .iter()
            .fold(EvalResult::Integer(0), |acc, n| {
                self.eval_arith(&acc, n, i64::checked_add, |l, r| l + r)
            })
    }

    fn fn_average(&self, args: &[Expression]) -> EvalResult {
        match self.collect_numbers(args) {
            Ok(numbers) if numbers.is_empty() => EvalResult::Error(EvalError::DivByZero),
            Ok(numbers) => {
                let sum: f64 = numbers.iter().filter_map(EvalResult::as_number).sum();
                EvalResult::Number(sum / numbers.len() as f64)
            }
            Err(e) => EvalResult::Error(e),
        }
    }

    /// MIN / MAX: keeps the winning value's own type. No numbers gives 0.
    fn fn_extreme(&self, args: &[Expression], better: fn(f64, f64) -> bool) -> EvalResult {
        let numbers = match self.collect_numbers(args) {
            Ok(numbers) => numbers,
            Err(e) => return EvalResult::Error(e),
        };
        let mut best: Option<(f64, EvalResult)> = None;
        for item in numbers {
            let Some(n) = item.as_number() else { continue };
            match &best {
                Some((b, _)) if !better(n, *b) => {}
                _ => best = Some((n, item)),
            }
        }
        best.map_or(EvalResult::Integer(0), |(_, item)| item)
    }

    fn fn_count(&self, args: &[Expression]) -> EvalResult {
        match self.collect_numbers(args) {
            Ok(numbers) => EvalResult::Integer(numbers.len() as i64),
            Err(e) => EvalResult::Error(e),
        }
    }

    fn fn_abs(&self, args: &[Expression]) -> EvalResult {
        let [arg] = args else {
            return arity_error("ABS", 1);
        };
        match self.evaluate(arg) {
            EvalResult::Integer(n) => match n.checked_abs() {
                Some(a) => EvalResult::Integer(a),
                None => EvalResult::Number((n as f64).abs()),
            },
            EvalResult::Error(e) => EvalResult::Error(e),
            other => match other.as_number() {
                Some(n) => EvalResult::Number(n.abs()),
                None => EvalResult::type_error("ABS needs a number"),
            },
        }
    }

    fn fn_round(&self, args: &[Expression]) -> EvalResult {
        if args.is_empty() || args.len() > 2 {
            return arity_error("ROUND", 2);
        }
        let value = self.evaluate(&args[0]);
        if value.is_error() {
            return value;
        }
        let digits = match args.get(1).map(|d| self.evaluate(d)) {
            None => 0,
            Some(EvalResult::Error(e)) => return EvalResult::Error(e),
            Some(d) => match d.as_integer() {
                Some(d) => d,
                None => return EvalResult::type_error("ROUND digits must be an integer"),
            },
        };

        if let EvalResult::Integer(n) = value {
            if digits >= 0 {
                return EvalResult::Integer(n);
            }
        }
        match value.as_number() {
            Some(n) => {
                let factor = 10f64.powi(digits as i32);
                let rounded = (n * factor).round() / factor;
                if digits <= 0 {
                    EvalResult::Integer(rounded as i64)
                } else {
                    EvalResult::Number(rounded)
                }
            }
            None => EvalResult::type_error("ROUND needs a number"),
        }
    }

    fn fn_if(&self, args: &[Expression]) -> EvalResult {
        if args.len() < 2 || args.len() > 3 {
            return arity_error("IF", 3);
        }

        let condition = self.evaluate(&args[0]);
        if condition.is_error() {
            return condition;
        }

        if condition.as_boolean().unwrap_or(false) {
            self.evaluate(&args[1])
        } else if args.len() == 3 {
            self.evaluate(&args[2])
        } else {
            EvalResult::Boolean(false)
        }
    }

    fn fn_len(&self, args: &[Expression]) -> EvalResult {
        let [arg] = args else {
            return arity_error("LEN", 1);
        };
        match self.evaluate(arg) {
            EvalResult::Error(e) => EvalResult::Error(e),
            EvalResult::Array(items) => EvalResult::Integer(items.len() as i64),
            other => EvalResult::Integer(other.as_text().chars().count() as i64),
        }
    }
}

fn into_positions(span: AxisSpan) -> Vec<usize> {
    match span {
        AxisSpan::One(p) => vec![p],
        AxisSpan::Many(ps) => ps,
    }
}

fn arity_error(name: &str, max: usize) -> EvalResult {
    EvalResult::Error(EvalError::Name(format!(
        "{} takes at most {} argument(s)",
        name, max
    )))
}

fn values_equal(left: &EvalResult, right: &EvalResult) -> bool {
    match (left, right) {
        (EvalResult::Text(l), EvalResult::Text(r)) => l.to_uppercase() == r.to_uppercase(),
        (EvalResult::Boolean(l), EvalResult::Boolean(r)) => l == r,
        (EvalResult::Integer(l), EvalResult::Integer(r)) => l == r,
        (EvalResult::Text(_), _) | (_, EvalResult::Text(_)) => false,
        _ => match (left.as_number(), right.as_number()) {
            (Some(l), Some(r)) => (l - r).abs() < f64::EPSILON,
            _ => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::DTypes;

    fn grid() -> Table {
        Table::from_rows(
            &["a", "b", "c"],
            vec![
                vec![1.into(), 2.into(), CellValue::Empty],
                vec![4.into(), 5.5.into(), "x".into()],
                vec![7.into(), 8.into(), true.into()],
            ],
            "",
            DTypes::new(),
        )
        .unwrap()
    }

    fn eval_at(table: &Table, row: usize, col: usize, formula: &str) -> EvalResult {
        let expr = parser::parse(formula).unwrap();
        Evaluator::new(table, row, col).evaluate(&expr)
    }

    fn eval(formula: &str) -> EvalResult {
        eval_at(&grid(), 0, 0, formula)
    }

    #[test]
    fn integer_arithmetic_stays_integer() {
        assert_eq!(eval("$d[0,0] + $d[0,1] * 3"), EvalResult::Integer(7));
        assert_eq!(eval("2 ^ 10"), EvalResult::Integer(1024));
        assert_eq!(eval("$d[0,0] / 2"), EvalResult::Number(0.5));
        assert_eq!(eval("$d[0,0] + $d[1,1]"), EvalResult::Number(6.5));
    }

    #[test]
    fn overflow_widens_to_float() {
        assert_eq!(
            eval("9223372036854775807 + 1"),
            EvalResult::Number(9223372036854775807.0 + 1.0)
        );
    }

    #[test]
    fn empty_cells_count_as_zero() {
        assert_eq!(eval("$d[0,2] + 1"), EvalResult::Integer(1));
        assert_eq!(eval("$d[0,2]"), EvalResult::Empty);
    }

    #[test]
    fn current_position_symbols() {
        let table = grid();
        assert_eq!(eval_at(&table, 2, 1, "$d[$r, $c - 1]"), EvalResult::Integer(7));
        assert_eq!(eval_at(&table, 2, 1, "$r * 10 + $c"), EvalResult::Integer(21));
    }

    #[test]
    fn column_names_and_negative_indexes() {
        assert_eq!(eval("$d[-1, 'b']"), EvalResult::Integer(8));
        assert_eq!(eval("$d[1, \"c\"]"), EvalResult::Text("x".to_string()));
        assert!(matches!(eval("$d[0, 'zz']"), EvalResult::Error(EvalError::Ref(_))));
        assert!(matches!(eval("$d[3, 0]"), EvalResult::Error(EvalError::Ref(_))));
    }

    #[test]
    fn slices_expand_row_major() {
        assert_eq!(
            eval("$d[0:2, 0]"),
            EvalResult::Array(vec![EvalResult::Integer(1), EvalResult::Integer(4)])
        );
        assert_eq!(eval("SUM($d[:, 'a'])"), EvalResult::Integer(12));
        assert_eq!(eval("SUM($d[:-1, 0])"), EvalResult::Integer(5));
        assert_eq!(eval("SUM($d[1, 'a':'c'])"), EvalResult::Number(9.5));
        assert_eq!(eval("LEN($d[0, :])"), EvalResult::Integer(3));
    }

    #[test]
    fn aggregates_skip_text_and_empty() {
        assert_eq!(eval("COUNT($d[:, :])"), EvalResult::Integer(6));
        assert_eq!(eval("MAX($d[:, 0:2])"), EvalResult::Integer(8));
        assert_eq!(eval("MIN($d[1, :])"), EvalResult::Integer(4));
        assert_eq!(eval("AVG($d[0, :])"), EvalResult::Number(1.5));
        assert_eq!(eval("MIN($d[0, 2])"), EvalResult::Integer(0));
        assert_eq!(eval("AVERAGE($d[0, 2])"), EvalResult::Error(EvalError::DivByZero));
    }

    #[test]
    fn scalar_functions() {
        assert_eq!(eval("ABS(-3)"), EvalResult::Integer(3));
        assert_eq!(eval("ROUND(2.567, 2)"), EvalResult::Number(2.57));
        assert_eq!(eval("ROUND(2.5)"), EvalResult::Integer(3));
        assert_eq!(eval("IF($d[0,0] > 0, 'pos', 'neg')"), EvalResult::Text("pos".to_string()));
        assert_eq!(eval("LEN('hello')"), EvalResult::Integer(5));
    }

    #[test]
    fn comparisons() {
        assert_eq!(eval("1 = 1.0"), EvalResult::Boolean(true));
        assert_eq!(eval("'abc' = 'ABC'"), EvalResult::Boolean(true));
        assert_eq!(eval("'a' < 'b'"), EvalResult::Boolean(true));
        assert_eq!(eval("$d[1,1] >= 5"), EvalResult::Boolean(true));
        assert!(eval("'a' < 1").is_error());
    }

    #[test]
    fn errors() {
        assert_eq!(eval("1 / 0"), EvalResult::Error(EvalError::DivByZero));
        assert!(matches!(eval("NOPE(1)"), EvalResult::Error(EvalError::Name(_))));
        assert!(matches!(eval("$d[1,2] * 2"), EvalResult::Error(EvalError::Value(_))));
        assert!(eval("SUM(1, 1/0)").is_error());
    }

    #[test]
    fn results_convert_to_cells() {
        let array = eval("$d[0, 0:2]");
        assert_eq!(array.to_cell_value(), CellValue::List(vec![1.into(), 2.into()]));
        assert_eq!(EvalResult::Empty.to_cell_value(), CellValue::Empty);
    }
}
