//! FILENAME: engine/src/lib.rs
//! PURPOSE: Main library entry point for the table engine.
//! CONTEXT: Re-exports public types and modules for use by other crates.

pub mod addressing;
pub mod cell;
pub mod columns;
pub mod convert;
pub mod dtype;
pub mod error;
pub mod evaluator;
pub mod formulas;
pub mod names;
pub mod options;
pub mod selector;
pub mod table;
mod table_columns;

// Re-export commonly used types at the crate root
pub use addressing::{Assignment, Selection};
pub use cell::{record, CellValue, Record};
pub use columns::ColumnMap;
pub use convert::{records_to_column_lists, ColumnLists, KeyedRecords};
pub use dtype::{DType, DTypes};
pub use error::{TableError, TableResult};
pub use evaluator::{EvalError, EvalResult, Evaluator};
pub use names::{
    col_to_index, index_to_col, sanitize_column_names, spreadsheet_column_names,
    DEFAULT_UNNAMED_PREFIX,
};
pub use options::{ReturnMode, TableOptions};
pub use selector::{AxisKind, Selector};
pub use table::{is_subset_record, RowInput, Table};
