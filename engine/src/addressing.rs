//! FILENAME: engine/src/addressing.rs
//! PURPOSE: Reads and broadcast writes addressed by a row and a column selector.
//! CONTEXT: `Table::get` copies the addressed cells into a new table, or in
//! value return mode unwraps single rows, columns and cells. `Table::set`
//! computes every cell write up front and only then applies them, so a
//! rejected shape leaves the table untouched.

use crate::cell::{CellValue, Record};
use crate::error::{TableError, TableResult};
use crate::options::ReturnMode;
use crate::selector::{AxisKind, Resolved, Selector};
use crate::table::Table;

/// The result of an addressed read.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Table(Table),
    /// One row's cells (value mode).
    Row(Vec<CellValue>),
    /// One column's cells (value mode).
    Column(Vec<CellValue>),
    /// One cell (value mode).
    Value(CellValue),
}

impl Selection {
    /// The table, when the read stayed wrapped.
    pub fn into_table(self) -> Option<Table> {
        match self {
            Selection::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn to_list(&self) -> TableResult<Vec<CellValue>> {
        match self {
            Selection::Table(table) => table.to_list(),
            Selection::Row(values) | Selection::Column(values) => Ok(values.clone()),
            Selection::Value(value) => Ok(vec![value.clone()]),
        }
    }

    pub fn to_value(&self) -> TableResult<CellValue> {
        match self {
            Selection::Table(table) => table.to_value(),
            Selection::Row(values) | Selection::Column(values) if values.len() == 1 => {
                Ok(values[0].clone())
            }
            Selection::Row(values) | Selection::Column(values) => Err(TableError::ShapeMismatch(
                format!("{} values cannot become a single value", values.len()),
            )),
            Selection::Value(value) => Ok(value.clone()),
        }
    }

    /// Only wrapped single-row results carry the names a record needs.
    pub fn to_record(&self) -> TableResult<Record> {
        match self {
            Selection::Table(table) => table.to_record(),
            _ => Err(TableError::ShapeMismatch(
                "unwrapped selections carry no column names".to_string(),
            )),
        }
    }
}

/// The right-hand side of an addressed write.
#[derive(Debug, Clone, PartialEq)]
pub enum Assignment {
    /// A scalar, or a `List` to distribute over a span.
    Value(CellValue),
    /// Named fields for a single row.
    Record(Record),
}

impl From<CellValue> for Assignment {
    fn from(value: CellValue) -> Self {
        Assignment::Value(value)
    }
}

impl From<Record> for Assignment {
    fn from(record: Record) -> Self {
        Assignment::Record(record)
    }
}

impl From<Vec<CellValue>> for Assignment {
    fn from(values: Vec<CellValue>) -> Self {
        Assignment::Value(CellValue::List(values))
    }
}

impl From<i64> for Assignment {
    fn from(n: i64) -> Self {
        Assignment::Value(n.into())
    }
}

impl From<i32> for Assignment {
    fn from(n: i32) -> Self {
        Assignment::Value(n.into())
    }
}

impl From<f64> for Assignment {
    fn from(n: f64) -> Self {
        Assignment::Value(n.into())
    }
}

impl From<bool> for Assignment {
    fn from(b: bool) -> Self {
        Assignment::Value(b.into())
    }
}

impl From<&str> for Assignment {
    fn from(s: &str) -> Self {
        Assignment::Value(s.into())
    }
}

impl Table {
    // ========================================================================
    // READ
    // ========================================================================

    /// Reads the cells at `rows` x `cols`.
    ///
    /// In table return mode the result is always a table. In value mode a
    /// single cell, a single row or a single column is unwrapped; an empty
    /// result stays an (empty) table.
    pub fn get(&self, rows: impl Into<Selector>, cols: impl Into<Selector>) -> TableResult<Selection> {
        self.read(&rows.into(), &cols.into(), false)
    }

    /// Like `get`, but unknown column names select nothing instead of failing.
    pub fn get_silent(
        &self,
        rows: impl Into<Selector>,
        cols: impl Into<Selector>,
    ) -> TableResult<Selection> {
        self.read(&rows.into(), &cols.into(), true)
    }

    /// Reads whole rows.
    pub fn get_rows(&self, rows: impl Into<Selector>) -> TableResult<Selection> {
        self.read(&rows.into(), &Selector::All, false)
    }

    fn read(&self, rows: &Selector, cols: &Selector, silent: bool) -> TableResult<Selection> {
        let row_sel = rows.resolve_rows(self)?;
        let col_sel = cols.resolve_cols(self, silent)?;
        let table = if cols.is_full() {
            self.take_rows(&row_sel.positions)
        } else {
            self.sub_table(&row_sel.positions, &col_sel.positions)
        };

        if self.options.return_mode == ReturnMode::Table {
            return Ok(Selection::Table(table));
        }

        let (n_rows, n_cols) = (row_sel.positions.len(), col_sel.positions.len());
        let selection = match (n_rows, n_cols) {
            (0, _) | (_, 0) => Selection::Table(table),
            (1, 1) => Selection::Value(table.rows[0][0].clone()),
            (1, _) => Selection::Row(table.rows[0].clone()),
            (_, 1) => Selection::Column(table.rows.iter().map(|r| r[0].clone()).collect()),
            _ => Selection::Table(table),
        };
        Ok(selection)
    }

    /// An independent copy of the cells at `rows` x `cols`, keeping names,
    /// dtypes and the key column when it survives.
    fn sub_table(&self, rows: &[usize], cols: &[usize]) -> Table {
        let projected = self.take_rows(rows);
        if cols.len() == self.num_cols() && cols.iter().enumerate().all(|(i, &c)| i == c) {
            projected
        } else {
            projected.project_columns(cols)
        }
    }

    // ========================================================================
    // CONVERSIONS
    // ========================================================================

    /// The cells of a single-row or single-column table as one sequence.
    pub fn to_list(&self) -> TableResult<Vec<CellValue>> {
        match self.shape() {
            (0, _) => Ok(Vec::new()),
            (1, _) => Ok(self.rows[0].clone()),
            (_, 1) => Ok(self.rows.iter().map(|r| r[0].clone()).collect()),
            (n_rows, n_cols) => Err(TableError::ShapeMismatch(format!(
                "a {}x{} table is not a single row or column",
                n_rows, n_cols
            ))),
        }
    }

    /// The sole cell of a 1x1 table.
    pub fn to_value(&self) -> TableResult<CellValue> {
        match self.shape() {
            (1, 1) => Ok(self.rows[0][0].clone()),
            (n_rows, n_cols) => Err(TableError::ShapeMismatch(format!(
                "a {}x{} table is not a single value",
                n_rows, n_cols
            ))),
        }
    }

    /// The only row of a single-row table as a record.
    pub fn to_record(&self) -> TableResult<Record> {
        match self.len() {
            1 => Ok(self.row(0)),
            n => Err(TableError::ShapeMismatch(format!(
                "{} rows cannot become one record",
                n
            ))),
        }
    }

    // ========================================================================
    // WRITE
    // ========================================================================

    /// Writes `value` into the cells at `rows` x `cols`.
    ///
    /// - one row, record: named fields overwrite that row's cells
    /// - one row and one column: the value is stored as-is, lists included
    /// - one row over a column span, or one column over a row span: a list
    ///   is distributed in order (lengths must match), a scalar broadcast
    ///
    /// Other shapes fail with `ShapeMismatch`. Values are stored as given;
    /// declared dtypes are not applied.
    pub fn set(
        &mut self,
        rows: impl Into<Selector>,
        cols: impl Into<Selector>,
        value: impl Into<Assignment>,
    ) -> TableResult<()> {
        let rows = rows.into();
        let cols = cols.into();
        let row_sel = rows.resolve_rows_for_write(self)?;
        let col_sel = cols.resolve_cols(self, false)?;

        let writes = match value.into() {
            Assignment::Record(record) => self.record_writes(&row_sel, &record)?,
            Assignment::Value(value) => broadcast_writes(&row_sel, &col_sel, value)?,
        };
        self.apply_writes(writes);
        Ok(())
    }

    /// Writes one cell by row position and column name.
    pub fn set_cell(&mut self, row: i64, col: &str, value: impl Into<CellValue>) -> TableResult<()> {
        self.set(Selector::Index(row), Selector::name(col), Assignment::Value(value.into()))
    }

    fn record_writes(
        &self,
        row_sel: &Resolved,
        record: &Record,
    ) -> TableResult<Vec<(usize, usize, CellValue)>> {
        let row = match (row_sel.kind, row_sel.positions.as_slice()) {
            (AxisKind::Single, [row]) => *row,
            _ => {
                return Err(TableError::ShapeMismatch(
                    "a record can only be written to a single row".to_string(),
                ))
            }
        };
        record
            .iter()
            .map(|(name, value)| Ok((row, self.column_position(name)?, value.clone())))
            .collect()
    }

    fn apply_writes(&mut self, writes: Vec<(usize, usize, CellValue)>) {
        let key_pos = self.key_position();
        let mut key_touched = false;
        for (row, col, value) in writes {
            key_touched |= Some(col) == key_pos;
            self.rows[row][col] = value;
        }
        if key_touched {
            self.rebuild_key_index();
        }
    }
}

fn broadcast_writes(
    row_sel: &Resolved,
    col_sel: &Resolved,
    value: CellValue,
) -> TableResult<Vec<(usize, usize, CellValue)>> {
    match (row_sel.kind, col_sel.kind) {
        (AxisKind::Single, AxisKind::Single) => {
            let (row, col) = (row_sel.positions[0], col_sel.positions[0]);
            Ok(vec![(row, col, value)])
        }
        (AxisKind::Single, AxisKind::Span) => {
            let row = row_sel.positions[0];
            let targets: Vec<(usize, usize)> =
                col_sel.positions.iter().map(|&c| (row, c)).collect();
            distribute(&targets, value)
        }
        (AxisKind::Span, AxisKind::Single) => {
            let col = col_sel.positions[0];
            let targets: Vec<(usize, usize)> =
                row_sel.positions.iter().map(|&r| (r, col)).collect();
            distribute(&targets, value)
        }
        (row_kind, col_kind) => Err(TableError::ShapeMismatch(format!(
            "cannot broadcast into a {:?} x {:?} selection",
            row_kind, col_kind
        ))),
    }
}

fn distribute(
    targets: &[(usize, usize)],
    value: CellValue,
) -> TableResult<Vec<(usize, usize, CellValue)>> {
    match value {
        CellValue::List(values) => {
            if values.len() != targets.len() {
                return Err(TableError::ShapeMismatch(format!(
                    "{} values for {} cells",
                    values.len(),
                    targets.len()
                )));
            }
            Ok(targets
                .iter()
                .zip(values)
                .map(|(&(r, c), v)| (r, c, v))
                .collect())
        }
        scalar => Ok(targets
            .iter()
            .map(|&(r, c)| (r, c, scalar.clone()))
            .collect()),
    }
}
