//! FILENAME: engine/src/table.rs
//! PURPOSE: The keyed, labeled 2-D table.
//! CONTEXT: `Table` owns the column map, the row collection, the key index
//! and the dtype registry. Every structural mutation goes through the
//! methods in this file (or the column operations in `table_columns.rs`)
//! so that the key index is rebuilt or patched before control returns.
//!
//! KEY INDEX INVARIANT:
//! for every entry (k -> i), rows[i][position_of(keyfield)] == k.

use crate::cell::{CellValue, Record};
use crate::columns::ColumnMap;
use crate::dtype::{coerce_row, DTypes};
use crate::error::{TableError, TableResult};
use crate::names::sanitize_column_names;
use crate::options::TableOptions;
use rustc_hash::{FxHashMap, FxHashSet};

/// A row handed to `append`/`extend`: either named fields or bare values
/// matched positionally to the current columns.
#[derive(Debug, Clone, PartialEq)]
pub enum RowInput {
    Record(Record),
    Values(Vec<CellValue>),
}

impl From<Record> for RowInput {
    fn from(record: Record) -> Self {
        RowInput::Record(record)
    }
}

impl From<Vec<CellValue>> for RowInput {
    fn from(values: Vec<CellValue>) -> Self {
        RowInput::Values(values)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Table {
    pub(crate) name: String,
    pub(crate) columns: ColumnMap,
    pub(crate) rows: Vec<Vec<CellValue>>,
    pub(crate) key_index: FxHashMap<CellValue, usize>,
    /// Designated key column; empty means no key.
    pub(crate) keyfield: String,
    pub(crate) dtypes: DTypes,
    pub(crate) options: TableOptions,
}

impl Table {
    // ========================================================================
    // CONSTRUCTION
    // ========================================================================

    pub fn new() -> Self {
        Table::default()
    }

    /// An empty table with the given (sanitized) column names.
    pub fn with_columns<S: AsRef<str>>(cols: &[S]) -> Self {
        let mut table = Table::new();
        let names = sanitize_column_names(cols, &table.options.unnamed_prefix);
        table.columns = ColumnMap::from_names(&names);
        table
    }

    /// Builds a table from column names and row values.
    ///
    /// When `cols` is empty but `dtypes` is not, the column names are the
    /// dtype keys. Values are coerced through `dtypes`. Unless `cols` is given,
    /// a `keyfield` naming a column that does not exist yet is kept and starts
    /// indexing once a record introduces that column.
    pub fn from_rows<S: AsRef<str>>(
        cols: &[S],
        rows: Vec<Vec<CellValue>>,
        keyfield: &str,
        dtypes: DTypes,
    ) -> TableResult<Self> {
        Self::from_rows_with_options(cols, rows, keyfield, dtypes, TableOptions::default())
    }

    pub fn from_rows_with_options<S: AsRef<str>>(
        cols: &[S],
        rows: Vec<Vec<CellValue>>,
        keyfield: &str,
        dtypes: DTypes,
        options: TableOptions,
    ) -> TableResult<Self> {
        let names: Vec<String> = if cols.is_empty() {
            dtypes.keys().cloned().collect()
        } else {
            cols.iter().map(|c| c.as_ref().to_string()).collect()
        };
        let names = sanitize_column_names(&names, &options.unnamed_prefix);

        if !names.is_empty() {
            if let Some(bad) = rows.iter().find(|r| r.len() != names.len()) {
                return Err(TableError::ShapeMismatch(format!(
                    "row has {} values but there are {} columns",
                    bad.len(),
                    names.len()
                )));
            }
            if !cols.is_empty() && !keyfield.is_empty() && !names.iter().any(|n| n == keyfield) {
                return Err(TableError::ColumnNotFound(keyfield.to_string()));
            }
        }

        let mut table = Table {
            columns: ColumnMap::from_names(&names),
            keyfield: keyfield.to_string(),
            dtypes,
            options,
            ..Default::default()
        };
        table.rows = rows;
        if !table.dtypes.is_empty() {
            for row in table.rows.iter_mut() {
                coerce_row(row, &names, &table.dtypes);
            }
        }
        table.rebuild_key_index();
        Ok(table)
    }

    pub fn with_options(mut self, options: TableOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Same columns, key column, dtypes and options; no rows.
    pub fn clone_empty(&self) -> Table {
        Table {
            name: self.name.clone(),
            columns: self.columns.clone(),
            rows: Vec::new(),
            key_index: FxHashMap::default(),
            keyfield: self.keyfield.clone(),
            dtypes: self.dtypes.clone(),
            options: self.options.clone(),
        }
    }

    /// A table shaped like `self` holding the given rows.
    pub(crate) fn derive_with_rows(&self, rows: Vec<Vec<CellValue>>) -> Table {
        let mut table = self.clone_empty();
        table.rows = rows;
        table.rebuild_key_index();
        table
    }

    // ========================================================================
    // INTROSPECTION
    // ========================================================================

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn columns(&self) -> Vec<String> {
        self.columns.to_vec()
    }

    pub fn column_map(&self) -> &ColumnMap {
        &self.columns
    }

    pub fn keyfield(&self) -> &str {
        &self.keyfield
    }

    pub fn dtypes(&self) -> &DTypes {
        &self.dtypes
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut TableOptions {
        &mut self.options
    }

    pub fn key_index(&self) -> &FxHashMap<CellValue, usize> {
        &self.key_index
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column count; for a table without names, the width of the first row.
    pub fn num_cols(&self) -> usize {
        if self.columns.is_empty() {
            self.rows.first().map_or(0, Vec::len)
        } else {
            self.columns.len()
        }
    }

    /// (rows, columns). A table without rows reports (0, 0).
    pub fn shape(&self) -> (usize, usize) {
        if self.rows.is_empty() {
            (0, 0)
        } else {
            (self.rows.len(), self.num_cols())
        }
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<CellValue>> {
        self.rows
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// The row at `position` as a record; empty when out of range.
    pub fn row(&self, position: usize) -> Record {
        match self.rows.get(position) {
            Some(values) => self.to_record_values(values),
            None => Record::new(),
        }
    }

    pub fn to_records(&self) -> Vec<Record> {
        self.rows.iter().map(|r| self.to_record_values(r)).collect()
    }

    pub(crate) fn to_record_values(&self, values: &[CellValue]) -> Record {
        self.columns
            .iter()
            .zip(values)
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    // ========================================================================
    // KEYS
    // ========================================================================

    /// Position of the key column, if one is designated and present.
    pub(crate) fn key_position(&self) -> Option<usize> {
        if self.keyfield.is_empty() {
            None
        } else {
            self.columns.position_of(&self.keyfield)
        }
    }

    /// Recomputes the key index from the rows. On duplicate keys the last
    /// row wins.
    pub(crate) fn rebuild_key_index(&mut self) {
        self.key_index.clear();
        if let Some(kpos) = self.key_position() {
            for (i, row) in self.rows.iter().enumerate() {
                if let Some(key) = row.get(kpos) {
                    self.key_index.insert(key.clone(), i);
                }
            }
        }
    }

    /// Designates `name` as the key column; an empty name clears it.
    pub fn set_keyfield(&mut self, name: &str) -> TableResult<()> {
        if !name.is_empty() && !self.columns.contains(name) {
            return Err(TableError::ColumnNotFound(name.to_string()));
        }
        self.keyfield = name.to_string();
        self.rebuild_key_index();
        Ok(())
    }

    /// Key column values in row order; empty without a key column.
    pub fn keys(&self) -> Vec<CellValue> {
        match self.key_position() {
            Some(kpos) => self.rows.iter().map(|r| r[kpos].clone()).collect(),
            None => Vec::new(),
        }
    }

    pub fn row_position_of(&self, key: &CellValue) -> Option<usize> {
        self.key_index.get(key).copied()
    }

    /// The subsequence of `candidates` present in the key index, in input order.
    pub fn existing_keys(&self, candidates: &[CellValue]) -> Vec<CellValue> {
        candidates
            .iter()
            .filter(|k| self.key_index.contains_key(*k))
            .cloned()
            .collect()
    }

    /// The record stored under `key`, or an empty record if absent.
    pub fn record_by_key(&self, key: &CellValue) -> TableResult<Record> {
        if self.keyfield.is_empty() {
            return Err(TableError::NoKeyField);
        }
        Ok(match self.row_position_of(key) {
            Some(pos) => self.row(pos),
            None => Record::new(),
        })
    }

    /// Rows for `keys` in request order, skipping missing keys. With
    /// `inverse`, every row whose key is not listed, in storage order.
    pub fn records_by_keys(&self, keys: &[CellValue], inverse: bool) -> Table {
        let rows = if inverse {
            let excluded: FxHashSet<&CellValue> = keys.iter().collect();
            match self.key_position() {
                Some(kpos) => self
                    .rows
                    .iter()
                    .filter(|r| !excluded.contains(&r[kpos]))
                    .cloned()
                    .collect(),
                None => self.rows.clone(),
            }
        } else {
            keys.iter()
                .filter_map(|k| self.row_position_of(k))
                .map(|pos| self.rows[pos].clone())
                .collect()
        };
        self.derive_with_rows(rows)
    }

    /// Copies of the rows at `positions`, in the order given, in a table
    /// shaped like `self`. Positions past the end are skipped.
    pub fn take_rows(&self, positions: &[usize]) -> Table {
        let rows = positions
            .iter()
            .filter_map(|&p| self.rows.get(p).cloned())
            .collect();
        self.derive_with_rows(rows)
    }

    // ========================================================================
    // ROW MUTATION
    // ========================================================================

    /// Appends one row, or replaces the row holding the same key.
    pub fn append(&mut self, row: impl Into<RowInput>) -> TableResult<()> {
        let row = row.into();
        self.validate_input(&row, self.columns.len())?;
        self.apply_input(row);
        Ok(())
    }

    /// Appends every row in order, with the same key semantics as `append`.
    /// Nothing is appended if any row is invalid.
    pub fn extend<I, R>(&mut self, rows: I) -> TableResult<()>
    where
        I: IntoIterator<Item = R>,
        R: Into<RowInput>,
    {
        let inputs: Vec<RowInput> = rows.into_iter().map(Into::into).collect();

        // Column count as it will be when each input is reached
        let mut width = self.columns.len();
        let mut pending: FxHashSet<&str> = FxHashSet::default();
        for input in &inputs {
            self.validate_input(input, width)?;
            if let RowInput::Record(record) = input {
                for name in record.keys() {
                    if !self.columns.contains(name) && pending.insert(name.as_str()) {
                        width += 1;
                    }
                }
            }
        }

        for input in inputs {
            self.apply_input(input);
        }
        Ok(())
    }

    /// Appends all rows of `other`, matched by column name. An empty
    /// destination without columns adopts `other`'s columns first.
    pub fn concat(&mut self, other: &Table) -> TableResult<()> {
        if self.columns.is_empty() && self.rows.is_empty() {
            self.columns = other.columns.clone();
            self.rebuild_key_index();
        }
        if other.columns.is_empty() {
            return self.extend(other.rows.iter().cloned());
        }
        self.extend(other.to_records())
    }

    fn validate_input(&self, input: &RowInput, width: usize) -> TableResult<()> {
        match input {
            RowInput::Values(values) if width > 0 && !values.is_empty() && values.len() != width => {
                Err(TableError::InvalidRecord(format!(
                    "row has {} values but there are {} columns",
                    values.len(),
                    width
                )))
            }
            _ => Ok(()),
        }
    }

    /// Applies a validated input. Empty inputs are no-ops.
    fn apply_input(&mut self, input: RowInput) {
        match input {
            RowInput::Record(record) => {
                if record.is_empty() {
                    return;
                }
                let row = self.row_from_record(&record);
                self.upsert_row(row);
            }
            RowInput::Values(mut values) => {
                if values.is_empty() {
                    return;
                }
                if !self.columns.is_empty() {
                    let names = self.columns.to_vec();
                    coerce_row(&mut values, &names, &self.dtypes);
                }
                self.upsert_row(values);
            }
        }
    }

    /// Adds columns for unseen field names, padding existing rows with `Empty`.
    /// Positional rows held by a table without names get spreadsheet names
    /// first, so every row keeps the full width.
    pub(crate) fn ensure_columns<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        if self.columns.is_empty() && !self.rows.is_empty() {
            self.name_positional_columns();
        }
        let mut added_key = false;
        for name in names {
            if self.columns.contains(name) {
                continue;
            }
            self.columns.push(name);
            for row in self.rows.iter_mut() {
                row.push(CellValue::Empty);
            }
            added_key |= name == self.keyfield;
        }
        if added_key {
            self.rebuild_key_index();
        }
    }

    fn name_positional_columns(&mut self) {
        let width = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in self.rows.iter_mut() {
            row.resize(width, CellValue::Empty);
        }
        let names = crate::names::spreadsheet_column_names(width);
        self.columns = ColumnMap::from_names(&names);
        log::debug!("named {} positional columns", width);
        if !self.keyfield.is_empty() {
            self.rebuild_key_index();
        }
    }

    /// Builds a full-width, coerced row from a record, extending columns first.
    pub(crate) fn row_from_record(&mut self, record: &Record) -> Vec<CellValue> {
        self.ensure_columns(record.keys().map(String::as_str));
        let mut row = vec![CellValue::Empty; self.columns.len()];
        for (name, value) in record {
            if let Some(pos) = self.columns.position_of(name) {
                row[pos] = value.clone();
            }
        }
        let names = self.columns.to_vec();
        coerce_row(&mut row, &names, &self.dtypes);
        row
    }

    /// Pushes `row`, or overwrites the row that already holds its key.
    fn upsert_row(&mut self, row: Vec<CellValue>) {
        let Some(kpos) = self.key_position() else {
            self.rows.push(row);
            return;
        };

        let key = row.get(kpos).cloned().unwrap_or_default();
        match self.key_index.get(&key) {
            Some(&pos) => {
                log::debug!("key {} exists at row {}, replacing", key, pos);
                self.rows[pos] = row;
            }
            None => {
                self.key_index.insert(key, self.rows.len());
                self.rows.push(row);
            }
        }
    }

    /// Deletes the row bound to `key`.
    ///
    /// Without a key column this is a no-op. A missing key fails with
    /// `KeyNotFound` unless `silent_error` is set.
    pub fn remove_key(&mut self, key: &CellValue, silent_error: bool) -> TableResult<()> {
        self.remove_keylist(std::slice::from_ref(key), silent_error)
    }

    /// Deletes the rows bound to `keys`. Without `silent_error`, every key
    /// must exist or nothing is removed.
    pub fn remove_keylist(&mut self, keys: &[CellValue], silent_error: bool) -> TableResult<()> {
        if self.key_position().is_none() {
            return Ok(());
        }

        let mut positions = Vec::with_capacity(keys.len());
        for key in keys {
            match self.key_index.get(key) {
                Some(&pos) => positions.push(pos),
                None if silent_error => {}
                None => return Err(TableError::KeyNotFound(key.clone())),
            }
        }

        self.remove_positions(&mut positions);
        Ok(())
    }

    /// Removes rows at `positions` (any order, duplicates allowed).
    pub(crate) fn remove_positions(&mut self, positions: &mut Vec<usize>) {
        if positions.is_empty() {
            return;
        }
        positions.sort_unstable();
        positions.dedup();
        for &pos in positions.iter().rev() {
            if pos < self.rows.len() {
                self.rows.remove(pos);
            }
        }
        self.rebuild_key_index();
    }

    /// Upserts a record by the value of its key field.
    ///
    /// Fails with `InvalidRecord` if the record lacks the key field, or if
    /// its field set differs from the current columns.
    pub fn assign_record(&mut self, record: Record) -> TableResult<()> {
        if self.keyfield.is_empty() {
            return Err(TableError::NoKeyField);
        }
        if !record.contains_key(&self.keyfield) {
            return Err(TableError::InvalidRecord(format!(
                "missing key field {:?}",
                self.keyfield
            )));
        }
        if !self.columns.is_empty() {
            let same_fields = record.len() == self.columns.len()
                && record.keys().all(|k| self.columns.contains(k));
            if !same_fields {
                return Err(TableError::InvalidRecord(
                    "record fields do not match the table columns".to_string(),
                ));
            }
        }
        self.apply_input(RowInput::Record(record));
        Ok(())
    }

    /// Replaces the row at `position` with `record`, or appends it when
    /// `position` is past the end. `None` is a no-op.
    pub fn assign_record_at_position(&mut self, position: usize, record: Option<Record>) {
        let Some(record) = record else {
            return;
        };
        if position >= self.rows.len() {
            self.apply_input(RowInput::Record(record));
            return;
        }
        let row = self.row_from_record(&record);
        self.rows[position] = row;
        self.rebuild_key_index();
    }

    /// Overwrites the named fields of the row at `position`. Unknown fields
    /// are ignored; an out-of-range position or `None` is a no-op.
    pub fn update_record_at_position(&mut self, position: usize, record: Option<&Record>) {
        let Some(record) = record else {
            return;
        };
        if position >= self.rows.len() {
            return;
        }
        let mut touched_key = false;
        for (name, value) in record {
            if let Some(col) = self.columns.position_of(name) {
                let value = match self.dtypes.get(name) {
                    Some(dtype) => dtype.coerce(value.clone()),
                    None => value.clone(),
                };
                self.rows[position][col] = value;
                touched_key |= *name == self.keyfield;
            }
        }
        if touched_key {
            self.rebuild_key_index();
        }
    }

    /// Replaces all rows and rebuilds the key index.
    pub fn set_rows(&mut self, rows: Vec<Vec<CellValue>>) -> TableResult<()> {
        let width = self.columns.len();
        if width > 0 {
            if let Some(bad) = rows.iter().find(|r| r.len() != width) {
                return Err(TableError::ShapeMismatch(format!(
                    "row has {} values but there are {} columns",
                    bad.len(),
                    width
                )));
            }
        }
        self.rows = rows;
        self.rebuild_key_index();
        Ok(())
    }

    /// Maps every row through `f`, collecting the results into a new table.
    pub fn apply<F>(&self, mut f: F) -> TableResult<Table>
    where
        F: FnMut(&Record) -> Record,
    {
        let mut result = Table::new().with_options(self.options.clone());
        result.keyfield = self.keyfield.clone();
        for values in &self.rows {
            let mapped = f(&self.to_record_values(values));
            result.append(mapped)?;
        }
        Ok(result)
    }

    /// Splits into consecutive tables of at most `max_rows` rows each.
    pub fn split_into_chunks(&self, max_rows: usize) -> Vec<Table> {
        if max_rows == 0 {
            return vec![self.clone()];
        }
        self.rows
            .chunks(max_rows)
            .map(|chunk| self.derive_with_rows(chunk.to_vec()))
            .collect()
    }

    /// Rows become columns. The new column names are `new_cols`, or
    /// spreadsheet letters when `new_cols` is empty.
    pub fn transpose<S: AsRef<str>>(&self, new_cols: &[S]) -> TableResult<Table> {
        // unnamed tables may hold ragged rows; short ones read as `Empty`
        let width = if self.columns.is_empty() {
            self.rows.iter().map(Vec::len).max().unwrap_or(0)
        } else {
            self.columns.len()
        };
        let transposed: Vec<Vec<CellValue>> = (0..width)
            .map(|c| {
                self.rows
                    .iter()
                    .map(|r| r.get(c).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();
        let names: Vec<String> = if new_cols.is_empty() {
            crate::names::spreadsheet_column_names(self.rows.len())
        } else {
            new_cols.iter().map(|c| c.as_ref().to_string()).collect()
        };
        if self.rows.is_empty() {
            return Ok(Table::with_columns(&names).with_options(self.options.clone()));
        }
        Table::from_rows_with_options(&names, transposed, "", DTypes::new(), self.options.clone())
    }
}

/// Tables are equal when column maps, key columns, rows, dtypes and names match.
impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns
            && self.keyfield == other.keyfield
            && self.rows == other.rows
            && self.dtypes == other.dtypes
            && self.name == other.name
    }
}

/// True when every field of `subset` is present in `superset` with an equal value.
pub fn is_subset_record(subset: &Record, superset: &Record) -> bool {
    subset
        .iter()
        .all(|(k, v)| superset.get(k).is_some_and(|sv| sv == v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::record;
    use crate::dtype::DType;
    use pretty_assertions::assert_eq;

    fn cells<const N: usize>(values: [CellValue; N]) -> Vec<CellValue> {
        values.to_vec()
    }

    fn id_name_table() -> Table {
        Table::from_rows(
            &["ID", "Name"],
            vec![
                cells([1.into(), "A".into()]),
                cells([2.into(), "B".into()]),
                cells([3.into(), "C".into()]),
            ],
            "ID",
            DTypes::new(),
        )
        .unwrap()
    }

    fn assert_key_invariant(table: &Table) {
        let kpos = table.key_position().unwrap();
        for (key, &pos) in table.key_index() {
            assert_eq!(&table.rows()[pos][kpos], key);
        }
        let distinct: FxHashSet<&CellValue> = table.rows().iter().map(|r| &r[kpos]).collect();
        assert_eq!(distinct.len(), table.key_index().len());
    }

    // ===== CONSTRUCTION =====

    #[test]
    fn construction_coerces_by_dtype() {
        let dtypes: DTypes = [
            ("col1".to_string(), DType::Int),
            ("col2".to_string(), DType::Str),
            ("col3".to_string(), DType::Float),
        ]
        .into_iter()
        .collect();
        let table = Table::from_rows(
            &["col1", "col2", "col3"],
            vec![cells(["2".into(), 2.into(), 4.into()])],
            "",
            dtypes,
        )
        .unwrap();
        assert_eq!(
            table.rows()[0],
            cells([2.into(), "2".into(), CellValue::Number(4.0)])
        );
    }

    #[test]
    fn columns_come_from_dtypes_when_missing() {
        let dtypes: DTypes = [("a".to_string(), DType::Int), ("b".to_string(), DType::Str)]
            .into_iter()
            .collect();
        let table = Table::from_rows::<&str>(&[], vec![], "", dtypes).unwrap();
        assert_eq!(table.columns(), ["a", "b"]);
    }

    #[test]
    fn construction_rejects_ragged_rows() {
        let err = Table::from_rows(&["a", "b"], vec![cells([1.into()])], "", DTypes::new());
        assert!(matches!(err, Err(TableError::ShapeMismatch(_))));
    }

    #[test]
    fn shape_reports_rows_and_width() {
        assert_eq!(Table::new().shape(), (0, 0));
        assert_eq!(Table::with_columns(&["a", "b"]).shape(), (0, 0));
        let table = Table::from_rows::<&str>(
            &[],
            vec![cells([1.into(), 2.into()]), cells([3.into(), 4.into()])],
            "",
            DTypes::new(),
        )
        .unwrap();
        assert_eq!(table.shape(), (2, 2));
        assert_eq!(id_name_table().shape(), (3, 2));
    }

    #[test]
    fn equality_checks_keyfield_and_order() {
        let a = id_name_table();
        let mut b = id_name_table();
        assert_eq!(a, b);
        b.set_keyfield("").unwrap();
        assert_ne!(a, b);
    }

    // ===== KEYS =====

    #[test]
    fn set_keyfield_validates_column() {
        let mut table = id_name_table();
        assert_eq!(
            table.set_keyfield("Nope"),
            Err(TableError::ColumnNotFound("Nope".to_string()))
        );
        table.set_keyfield("Name").unwrap();
        assert_eq!(table.row_position_of(&"B".into()), Some(1));
        table.set_keyfield("").unwrap();
        assert!(table.key_index().is_empty());
        assert!(table.keys().is_empty());
    }

    #[test]
    fn row_position_of_missing_key() {
        let table = id_name_table();
        assert_eq!(table.row_position_of(&9.into()), None);
        assert_eq!(table.keys(), cells([1.into(), 2.into(), 3.into()]));
    }

    #[test]
    fn existing_keys_preserve_input_order() {
        let table = id_name_table();
        let found = table.existing_keys(&cells([3.into(), 7.into(), 1.into()]));
        assert_eq!(found, cells([3.into(), 1.into()]));
    }

    #[test]
    fn record_by_key_requires_keyfield() {
        let table = id_name_table();
        assert_eq!(
            table.record_by_key(&2.into()).unwrap(),
            record([("ID", CellValue::from(2)), ("Name", "B".into())])
        );
        assert!(table.record_by_key(&5.into()).unwrap().is_empty());

        let mut unkeyed = id_name_table();
        unkeyed.set_keyfield("").unwrap();
        assert_eq!(unkeyed.record_by_key(&2.into()), Err(TableError::NoKeyField));
    }

    #[test]
    fn records_by_keys_follow_request_order() {
        let table = id_name_table();
        let picked = table.records_by_keys(&cells([3.into(), 8.into(), 1.into()]), false);
        assert_eq!(picked.rows(), &[cells([3.into(), "C".into()]), cells([1.into(), "A".into()])]);
        assert_eq!(picked.row_position_of(&1.into()), Some(1));

        let rest = table.records_by_keys(&cells([2.into()]), true);
        assert_eq!(rest.keys(), cells([1.into(), 3.into()]));
    }

    // ===== APPEND / EXTEND / CONCAT =====

    #[test]
    fn append_empty_record_is_noop() {
        let mut table = id_name_table();
        table.append(Record::new()).unwrap();
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn append_values_without_columns() {
        let mut table = Table::new();
        table.append(cells([1.into(), "b".into()])).unwrap();
        assert!(table.columns().is_empty());
        assert_eq!(table.rows(), &[cells([1.into(), "b".into()])]);
    }

    #[test]
    fn append_values_must_match_width() {
        let mut table = id_name_table();
        let err = table.append(cells([4.into()]));
        assert!(matches!(err, Err(TableError::InvalidRecord(_))));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn append_upserts_duplicate_key() {
        let mut table = id_name_table();
        table
            .append(record([("ID", CellValue::from(2)), ("Name", "Bee".into())]))
            .unwrap();
        table
            .append(record([("ID", CellValue::from(2)), ("Name", "Bea".into())]))
            .unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows()[1], cells([2.into(), "Bea".into()]));
        assert_key_invariant(&table);
    }

    #[test]
    fn append_record_extends_columns() {
        let mut table = id_name_table();
        table
            .append(record([("ID", CellValue::from(4)), ("Age", 30.into())]))
            .unwrap();
        assert_eq!(table.columns(), ["ID", "Name", "Age"]);
        assert_eq!(table.rows()[0], cells([1.into(), "A".into(), CellValue::Empty]));
        assert_eq!(table.rows()[3], cells([4.into(), CellValue::Empty, 30.into()]));
        assert_key_invariant(&table);
    }

    #[test]
    fn deferred_keyfield_starts_indexing() {
        let mut table = Table::from_rows::<&str>(&[], vec![], "col1", DTypes::new()).unwrap();
        table
            .assign_record(record([("col1", CellValue::from(1)), ("col2", "a".into())]))
            .unwrap();
        assert_eq!(table.rows(), &[cells([1.into(), "a".into()])]);
        assert_eq!(table.row_position_of(&1.into()), Some(0));
    }

    #[test]
    fn extend_is_all_or_nothing() {
        let mut table = id_name_table();
        let err = table.extend(vec![
            RowInput::Values(cells([4.into(), "D".into()])),
            RowInput::Values(cells([5.into()])),
        ]);
        assert!(err.is_err());
        assert_eq!(table.len(), 3);

        table
            .extend(vec![
                record([("ID", CellValue::from(4)), ("Name", "D".into())]),
                record([("ID", CellValue::from(1)), ("Name", "A2".into())]),
            ])
            .unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.rows()[0][1], CellValue::from("A2"));
        assert_key_invariant(&table);
    }

    #[test]
    fn concat_into_empty_adopts_columns() {
        let mut empty = Table::new();
        let other = id_name_table();
        empty.concat(&other).unwrap();
        assert_eq!(empty.columns(), ["ID", "Name"]);
        assert_eq!(empty.len(), 3);
        assert!(empty.keyfield().is_empty());
    }

    #[test]
    fn concat_with_shared_key_upserts() {
        let mut table = id_name_table();
        let other = Table::from_rows(
            &["ID", "Name"],
            vec![cells([3.into(), "Z".into()]), cells([4.into(), "D".into()])],
            "ID",
            DTypes::new(),
        )
        .unwrap();
        table.concat(&other).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.rows()[2], cells([3.into(), "Z".into()]));
        assert_key_invariant(&table);
    }

    // ===== REMOVAL =====

    #[test]
    fn remove_key_shifts_index() {
        let mut table = id_name_table();
        table.remove_key(&2.into(), false).unwrap();
        assert_eq!(
            table.rows(),
            &[cells([1.into(), "A".into()]), cells([3.into(), "C".into()])]
        );
        let expected: FxHashMap<CellValue, usize> =
            [(1.into(), 0), (3.into(), 1)].into_iter().collect();
        assert_eq!(table.key_index(), &expected);
    }

    #[test]
    fn remove_missing_key() {
        let mut table = id_name_table();
        assert_eq!(
            table.remove_key(&9.into(), false),
            Err(TableError::KeyNotFound(9.into()))
        );
        table.remove_key(&9.into(), true).unwrap();
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn remove_key_without_keyfield_is_noop() {
        let mut table = id_name_table();
        table.set_keyfield("").unwrap();
        table.remove_key(&1.into(), false).unwrap();
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn remove_keylist_validates_before_removing() {
        let mut table = id_name_table();
        let err = table.remove_keylist(&cells([1.into(), 9.into()]), false);
        assert!(err.is_err());
        assert_eq!(table.len(), 3);

        table.remove_keylist(&cells([1.into(), 9.into(), 3.into()]), true).unwrap();
        assert_eq!(table.keys(), cells([2.into()]));
        assert_key_invariant(&table);
    }

    // ===== RECORD ASSIGNMENT =====

    #[test]
    fn assign_record_checks_fields() {
        let mut table = id_name_table();
        assert!(matches!(
            table.assign_record(record([("Name", CellValue::from("X"))])),
            Err(TableError::InvalidRecord(_))
        ));
        assert!(matches!(
            table.assign_record(record([
                ("ID", CellValue::from(1)),
                ("Name", "X".into()),
                ("Extra", 0.into())
            ])),
            Err(TableError::InvalidRecord(_))
        ));
        table
            .assign_record(record([("ID", CellValue::from(1)), ("Name", "X".into())]))
            .unwrap();
        assert_eq!(table.rows()[0], cells([1.into(), "X".into()]));
        table
            .assign_record(record([("Name", CellValue::from("D")), ("ID", 4.into())]))
            .unwrap();
        assert_eq!(table.rows()[3], cells([4.into(), "D".into()]));
    }

    #[test]
    fn assign_record_at_position_appends_past_end() {
        let mut table = id_name_table();
        table.assign_record_at_position(5, Some(record([("ID", CellValue::from(4)), ("Name", "D".into())])));
        assert_eq!(table.len(), 4);
        table.assign_record_at_position(0, Some(record([("ID", CellValue::from(7)), ("Name", "G".into())])));
        assert_eq!(table.rows()[0], cells([7.into(), "G".into()]));
        assert_eq!(table.row_position_of(&1.into()), None);
        assert_eq!(table.row_position_of(&7.into()), Some(0));
        table.assign_record_at_position(0, None);
        assert_eq!(table.len(), 4);
        assert_key_invariant(&table);
    }

    #[test]
    fn update_record_at_position_is_partial() {
        let mut table = id_name_table();
        table.update_record_at_position(
            1,
            Some(&record([("Name", CellValue::from("Q")), ("Ghost", 1.into())])),
        );
        assert_eq!(table.rows()[1], cells([2.into(), "Q".into()]));
        table.update_record_at_position(10, Some(&record([("Name", CellValue::from("Z"))])));
        assert_eq!(table.len(), 3);
        table.update_record_at_position(0, Some(&record([("ID", CellValue::from(10))])));
        assert_eq!(table.row_position_of(&10.into()), Some(0));
        assert_key_invariant(&table);
    }

    // ===== WHOLESALE =====

    #[test]
    fn row_out_of_range_is_empty() {
        let table = id_name_table();
        assert!(table.row(3).is_empty());
        assert_eq!(table.row(0)["Name"], CellValue::from("A"));
    }

    #[test]
    fn set_rows_rebuilds_index() {
        let mut table = id_name_table();
        table
            .set_rows(vec![cells([9.into(), "I".into()]), cells([8.into(), "H".into()])])
            .unwrap();
        assert_eq!(table.row_position_of(&8.into()), Some(1));
        assert_eq!(table.row_position_of(&1.into()), None);
        table.set_rows(vec![]).unwrap();
        assert!(table.key_index().is_empty());
    }

    #[test]
    fn split_into_chunks_keeps_structure() {
        let table = id_name_table();
        let chunks = table.split_into_chunks(2);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].len(), 2);
        assert_eq!(chunks[1].keys(), cells([3.into()]));
        assert_eq!(chunks[1].columns(), ["ID", "Name"]);
    }

    #[test]
    fn transpose_swaps_axes() {
        let table = Table::from_rows(
            &["a", "b", "c"],
            vec![cells([1.into(), 2.into(), 3.into()]), cells([4.into(), 5.into(), 6.into()])],
            "",
            DTypes::new(),
        )
        .unwrap();
        let t = table.transpose::<&str>(&[]).unwrap();
        assert_eq!(t.columns(), ["A", "B"]);
        assert_eq!(
            t.rows(),
            &[
                cells([1.into(), 4.into()]),
                cells([2.into(), 5.into()]),
                cells([3.into(), 6.into()])
            ]
        );
    }

    #[test]
    fn transpose_pads_ragged_unnamed_rows() {
        let table = Table::from_rows::<&str>(
            &[],
            vec![cells([1.into(), 2.into()]), cells([3.into()])],
            "",
            DTypes::new(),
        )
        .unwrap();
        let t = table.transpose::<&str>(&[]).unwrap();
        assert_eq!(t.columns(), ["A", "B"]);
        assert_eq!(
            t.rows(),
            &[cells([1.into(), 3.into()]), cells([2.into(), CellValue::Empty])]
        );
    }

    #[test]
    fn record_after_positional_rows_names_them() {
        let mut table = Table::new();
        table.append(cells([1.into(), 2.into()])).unwrap();
        table.append(record([("a", CellValue::from(5))])).unwrap();
        assert_eq!(table.columns(), ["A", "B", "a"]);
        assert_eq!(
            table.rows(),
            &[
                cells([1.into(), 2.into(), CellValue::Empty]),
                cells([CellValue::Empty, CellValue::Empty, 5.into()])
            ]
        );
        assert!(table.rows().iter().all(|r| r.len() == table.num_cols()));
    }

    #[test]
    fn apply_maps_rows() {
        let table = id_name_table();
        let doubled = table
            .apply(|r| {
                let mut out = r.clone();
                let id = r["ID"].as_i64().unwrap_or(0);
                out.insert("ID".to_string(), (id * 10).into());
                out
            })
            .unwrap();
        assert_eq!(doubled.keys(), cells([10.into(), 20.into(), 30.into()]));
    }

    #[test]
    fn subset_records() {
        let big = record([("a", CellValue::from(1)), ("b", 2.into())]);
        assert!(is_subset_record(&record([("a", CellValue::from(1))]), &big));
        assert!(!is_subset_record(&record([("a", CellValue::from(2))]), &big));
        assert!(!is_subset_record(&record([("c", CellValue::from(1))]), &big));
    }
}
