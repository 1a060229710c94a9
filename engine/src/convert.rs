//! FILENAME: engine/src/convert.rs
//! PURPOSE: Bulk constructors and exporters for `Table`.
//! CONTEXT: Edge conversions between a table and plain Rust collections:
//! lists of records, per-column value lists, records keyed by their key
//! value, and rectangular grids with an optional header row. Everything
//! crossing this boundary is an owned copy.

use crate::cell::{CellValue, Record};
use crate::dtype::DTypes;
use crate::error::{TableError, TableResult};
use crate::names::spreadsheet_column_names;
use crate::table::{RowInput, Table};
use indexmap::IndexMap;

/// Column name -> that column's values, in row order.
pub type ColumnLists = IndexMap<String, Vec<CellValue>>;

/// Key value -> the record stored under it.
pub type KeyedRecords = IndexMap<CellValue, Record>;

impl Table {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Builds a table by appending `records` in order. Columns are the union
    /// of the record fields in first-seen order, after any dtype columns;
    /// missing fields are `Empty`. Duplicate keys upsert.
    pub fn from_records(records: &[Record], keyfield: &str, dtypes: DTypes) -> TableResult<Table> {
        let mut table = Table::from_rows::<&str>(&[], Vec::new(), keyfield, dtypes)?;
        table.extend(records.iter().cloned().map(RowInput::Record))?;
        Ok(table)
    }

    /// Builds a table from per-column value lists. Shorter lists are padded
    /// with `Empty` up to the longest one.
    pub fn from_column_lists(
        columns: &ColumnLists,
        keyfield: &str,
        dtypes: DTypes,
    ) -> TableResult<Table> {
        let height = columns.values().map(Vec::len).max().unwrap_or(0);
        let rows: Vec<Vec<CellValue>> = (0..height)
            .map(|i| {
                columns
                    .values()
                    .map(|values| values.get(i).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();
        let names: Vec<&str> = columns.keys().map(String::as_str).collect();
        Table::from_rows(&names, rows, keyfield, dtypes)
    }

    /// Builds a table from records keyed by their key value. With
    /// `reinject_key`, the outer key is written into each record's
    /// `keyfield` column (placed first when the record lacks it).
    pub fn from_keyed_records(
        records: &KeyedRecords,
        keyfield: &str,
        reinject_key: bool,
        dtypes: DTypes,
    ) -> TableResult<Table> {
        if reinject_key && keyfield.is_empty() {
            return Err(TableError::NoKeyField);
        }
        let flat: Vec<Record> = records
            .iter()
            .map(|(key, record)| {
                if !reinject_key {
                    return record.clone();
                }
                let mut with_key = Record::with_capacity(record.len() + 1);
                with_key.insert(keyfield.to_string(), key.clone());
                for (name, value) in record {
                    if name != keyfield {
                        with_key.insert(name.clone(), value.clone());
                    }
                }
                with_key
            })
            .collect();
        Table::from_records(&flat, keyfield, dtypes)
    }

    /// Builds a table from a rectangular grid. With `header`, the first row
    /// holds the column names; otherwise columns are named "A", "B", ...
    /// Short rows are padded with `Empty`.
    pub fn from_grid(
        grid: &[Vec<CellValue>],
        header: bool,
        keyfield: &str,
        dtypes: DTypes,
    ) -> TableResult<Table> {
        let (names, body) = match (header, grid.split_first()) {
            (true, Some((first, rest))) => {
                let names: Vec<String> = first.iter().map(CellValue::as_text).collect();
                (names, rest)
            }
            (true, None) => (Vec::new(), grid),
            (false, _) => {
                let width = grid.iter().map(Vec::len).max().unwrap_or(0);
                (spreadsheet_column_names(width), grid)
            }
        };

        let width = names.len().max(body.iter().map(Vec::len).max().unwrap_or(0));
        let mut names = names;
        while names.len() < width {
            // Sanitized into "<prefix><position>" below
            names.push(String::new());
        }
        let rows: Vec<Vec<CellValue>> = body
            .iter()
            .map(|r| {
                let mut row = r.clone();
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();
        Table::from_rows(&names, rows, keyfield, dtypes)
    }

    // ========================================================================
    // EXPORTERS
    // ========================================================================

    /// Records keyed by their key value, in row order. With
    /// `remove_keyfield`, the key column is left out of each record.
    pub fn to_keyed_records(&self, remove_keyfield: bool) -> TableResult<KeyedRecords> {
        let kpos = self.key_position().ok_or(TableError::NoKeyField)?;
        Ok(self
            .rows
            .iter()
            .map(|row| {
                let mut record = self.to_record_values(row);
                if remove_keyfield {
                    record.shift_remove(&self.keyfield);
                }
                (row[kpos].clone(), record)
            })
            .collect())
    }

    pub fn to_column_lists(&self) -> ColumnLists {
        self.columns
            .iter()
            .enumerate()
            .map(|(pos, name)| {
                let values = self.rows.iter().map(|r| r[pos].clone()).collect();
                (name.to_string(), values)
            })
            .collect()
    }

    /// The rows as a grid, optionally preceded by the column names.
    pub fn to_grid(&self, include_header: bool) -> Vec<Vec<CellValue>> {
        let mut grid = Vec::with_capacity(self.rows.len() + include_header as usize);
        if include_header {
            grid.push(self.columns.iter().map(CellValue::from).collect());
        }
        grid.extend(self.rows.iter().cloned());
        grid
    }
}

/// Pivots records into per-column lists. Fields missing from a record
/// are `Empty` in that column.
pub fn records_to_column_lists(records: &[Record]) -> ColumnLists {
    let mut lists = ColumnLists::new();
    for (i, record) in records.iter().enumerate() {
        for name in record.keys() {
            lists
                .entry(name.clone())
                .or_insert_with(|| vec![CellValue::Empty; i]);
        }
        for (name, values) in lists.iter_mut() {
            values.push(record.get(name).cloned().unwrap_or_default());
        }
    }
    lists
}
