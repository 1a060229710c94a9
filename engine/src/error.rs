//! FILENAME: engine/src/error.rs

use crate::cell::CellValue;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("Key not found: {0}")]
    KeyNotFound(CellValue),

    #[error("Column not found: {0:?}")]
    ColumnNotFound(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Index {index} out of range for length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("Selection matched {found} rows, expected at most {limit}")]
    TooManyMatches { found: usize, limit: usize },

    #[error("Formula evaluation did not reach a fixed point after {passes} passes")]
    FormulaDivergence { passes: usize },

    #[error("Formula parse error at ({row}, {col}): {message}")]
    FormulaParse {
        row: usize,
        col: usize,
        message: String,
    },

    #[error("Formula evaluation error at ({row}, {col}): {message}")]
    FormulaEval {
        row: usize,
        col: usize,
        message: String,
    },

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("No key column is designated")]
    NoKeyField,
}

pub type TableResult<T> = Result<T, TableError>;
