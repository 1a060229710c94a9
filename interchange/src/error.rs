//! FILENAME: interchange/src/error.rs

use engine::TableError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InterchangeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Table error: {0}")]
    Table(#[from] TableError),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

pub type InterchangeResult<T> = Result<T, InterchangeError>;
