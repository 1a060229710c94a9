//! FILENAME: engine/src/table_columns.rs
//! PURPOSE: Column-level operations on `Table`.
//! CONTEXT: Renaming, replacing, reading, inserting, assigning and dropping
//! whole columns. Column map and dtype registry change together here, and
//! any operation that moves or rewrites the key column rebuilds the key index.

use crate::cell::CellValue;
use crate::columns::ColumnMap;
use crate::dtype::{DType, DTypes};
use crate::error::{TableError, TableResult};
use crate::names::{sanitize_column_names, spreadsheet_column_names};
use crate::table::Table;
use indexmap::{IndexMap, IndexSet};

impl Table {
    // ========================================================================
    // NAMING
    // ========================================================================

    /// Replaces all column names, sanitizing them with the table's
    /// unnamed prefix. Dtypes and key column follow by position.
    pub fn set_columns<S: AsRef<str>>(&mut self, names: &[S]) -> TableResult<()> {
        let prefix = self.options.unnamed_prefix.clone();
        self.set_columns_with_prefix(names, &prefix)
    }

    pub fn set_columns_with_prefix<S: AsRef<str>>(
        &mut self,
        names: &[S],
        unnamed_prefix: &str,
    ) -> TableResult<()> {
        let width = self.num_cols();
        if width > 0 && names.len() != width {
            return Err(TableError::ShapeMismatch(format!(
                "{} column names given for {} columns",
                names.len(),
                width
            )));
        }
        let new_names = sanitize_column_names(names, unnamed_prefix);
        self.replace_column_names(new_names);
        Ok(())
    }

    /// Names the columns "A", "B", "C", ...
    pub fn set_spreadsheet_columns(&mut self) {
        let names = spreadsheet_column_names(self.num_cols());
        self.replace_column_names(names);
    }

    fn replace_column_names(&mut self, new_names: Vec<String>) {
        let old_names = self.columns.to_vec();
        let mut dtypes = DTypes::new();
        for (old, new) in old_names.iter().zip(&new_names) {
            if let Some(dtype) = self.dtypes.get(old) {
                dtypes.insert(new.clone(), *dtype);
            }
            if *old == self.keyfield {
                self.keyfield = new.clone();
            }
        }
        if !old_names.is_empty() {
            self.dtypes = dtypes;
        }
        self.columns = ColumnMap::from_names(&new_names);
        self.rebuild_key_index();
    }

    /// Renames columns in place. Unknown old names are ignored; renaming onto
    /// another existing column fails before anything changes.
    pub fn rename_columns<K, V, I>(&mut self, renames: I) -> TableResult<()>
    where
        K: AsRef<str>,
        V: AsRef<str>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut names = self.columns.to_vec();
        let mut changed: Vec<(String, String)> = Vec::new();
        for (old, new) in renames {
            let (old, new) = (old.as_ref(), new.as_ref());
            if let Some(pos) = names.iter().position(|n| n == old) {
                names[pos] = new.to_string();
                changed.push((old.to_string(), new.to_string()));
            }
        }

        let unique: IndexSet<&String> = names.iter().collect();
        if unique.len() != names.len() {
            return Err(TableError::InvalidRecord(
                "rename would produce duplicate column names".to_string(),
            ));
        }

        for (old, new) in changed {
            if let Some(dtype) = self.dtypes.shift_remove(&old) {
                self.dtypes.insert(new.clone(), dtype);
            }
            if self.keyfield == old {
                self.keyfield = new;
            }
        }
        self.columns = ColumnMap::from_names(&names);
        Ok(())
    }

    /// Column names filtered by name and by declared type.
    ///
    /// A column's type is its dtype entry, or else the type of its value in
    /// the first row.
    pub fn calc_columns(
        &self,
        include: Option<&[&str]>,
        exclude: Option<&[&str]>,
        include_types: Option<&[DType]>,
        exclude_types: Option<&[DType]>,
    ) -> Vec<String> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, name)| include.map_or(true, |inc| inc.contains(name)))
            .filter(|(_, name)| exclude.map_or(true, |exc| !exc.contains(name)))
            .filter(|(pos, name)| {
                let dtype = self.column_dtype(name, *pos);
                include_types.map_or(true, |types| types.contains(&dtype))
                    && exclude_types.map_or(true, |types| !types.contains(&dtype))
            })
            .map(|(_, name)| name.to_string())
            .collect()
    }

    fn column_dtype(&self, name: &str, position: usize) -> DType {
        match self.dtypes.get(name) {
            Some(dtype) => *dtype,
            None => self
                .rows
                .first()
                .and_then(|r| r.get(position))
                .map_or(DType::Any, DType::of),
        }
    }

    // ========================================================================
    // READING
    // ========================================================================

    /// The values of column `name`, in row order.
    ///
    /// An unknown or empty name fails with `ColumnNotFound`, or yields an
    /// empty list when `silent` is set.
    pub fn column(&self, name: &str, silent: bool) -> TableResult<Vec<CellValue>> {
        match self.columns.position_of(name) {
            Some(pos) => Ok(self.rows.iter().map(|r| r[pos].clone()).collect()),
            None if silent => Ok(Vec::new()),
            None => Err(TableError::ColumnNotFound(name.to_string())),
        }
    }

    /// The values at column position `index`; empty when out of range.
    /// `unique` keeps first occurrences only; `omit_blank` drops empty cells
    /// and empty strings.
    pub fn column_at(&self, index: usize, unique: bool, omit_blank: bool) -> Vec<CellValue> {
        let values = self
            .rows
            .iter()
            .filter_map(|r| r.get(index))
            .filter(|v| !(omit_blank && v.is_blank()));

        if unique {
            values.cloned().collect::<IndexSet<_>>().into_iter().collect()
        } else {
            values.cloned().collect()
        }
    }

    /// Maps each value of `key_col` to the unique values of `value_col`
    /// seen alongside it, in first-seen order.
    pub fn columns_to_groups(
        &self,
        key_col: &str,
        value_col: &str,
    ) -> TableResult<IndexMap<CellValue, Vec<CellValue>>> {
        let kpos = self.column_position(key_col)?;
        let vpos = self.column_position(value_col)?;

        let mut groups: IndexMap<CellValue, IndexSet<CellValue>> = IndexMap::new();
        for row in &self.rows {
            groups
                .entry(row[kpos].clone())
                .or_default()
                .insert(row[vpos].clone());
        }
        Ok(groups
            .into_iter()
            .map(|(k, vs)| (k, vs.into_iter().collect()))
            .collect())
    }

    /// A copy holding only the listed columns (in listed order), or with
    /// `exclude`, every other column. An empty list keeps all columns.
    pub fn select_columns<S: AsRef<str>>(&self, names: &[S], exclude: bool) -> Table {
        let positions: Vec<usize> = if names.is_empty() {
            (0..self.columns.len()).collect()
        } else if exclude {
            let excluded: Vec<&str> = names.iter().map(AsRef::as_ref).collect();
            self.columns
                .iter()
                .enumerate()
                .filter(|(_, n)| !excluded.contains(n))
                .map(|(i, _)| i)
                .collect()
        } else {
            names
                .iter()
                .filter_map(|n| self.columns.position_of(n.as_ref()))
                .collect()
        };
        self.project_columns(&positions)
    }

    /// A copy holding the columns at `positions`, in that order. The key
    /// column and dtype entries survive only for kept columns.
    pub(crate) fn project_columns(&self, positions: &[usize]) -> Table {
        let names: Vec<String> = positions
            .iter()
            .filter_map(|&p| self.columns.name_at(p).map(str::to_string))
            .collect();
        let rows: Vec<Vec<CellValue>> = self
            .rows
            .iter()
            .map(|r| positions.iter().map(|&p| r[p].clone()).collect())
            .collect();

        let mut table = Table {
            name: self.name.clone(),
            columns: ColumnMap::from_names(&names),
            rows,
            options: self.options.clone(),
            ..Default::default()
        };
        table.dtypes = self
            .dtypes
            .iter()
            .filter(|(n, _)| names.contains(n))
            .map(|(n, d)| (n.clone(), *d))
            .collect();
        if names.contains(&self.keyfield) {
            table.keyfield = self.keyfield.clone();
        }
        table.rebuild_key_index();
        table
    }

    // ========================================================================
    // WRITING
    // ========================================================================

    /// Overwrites column `name` with `values`. Unknown names are ignored;
    /// `values` must have one entry per row.
    pub fn assign_column(&mut self, name: &str, values: &[CellValue]) -> TableResult<()> {
        let Some(pos) = self.columns.position_of(name) else {
            return Ok(());
        };
        self.write_column(pos, Some(values), &CellValue::Empty)
    }

    /// Sets every cell of column `name` to `value`. Unknown names are ignored.
    pub fn fill_column(&mut self, name: &str, value: CellValue) {
        if let Some(pos) = self.columns.position_of(name) {
            for row in self.rows.iter_mut() {
                row[pos] = value.clone();
            }
            if Some(pos) == self.key_position() {
                self.rebuild_key_index();
            }
        }
    }

    /// Overwrites the column at `index` with `values`, or with `default`
    /// when no values are given.
    pub fn assign_column_at(
        &mut self,
        index: usize,
        values: Option<&[CellValue]>,
        default: CellValue,
    ) -> TableResult<()> {
        if self.rows.is_empty() {
            return Ok(());
        }
        if index >= self.num_cols() {
            return Err(TableError::IndexOutOfRange {
                index: index as i64,
                len: self.num_cols(),
            });
        }
        self.write_column(index, values, &default)
    }

    fn write_column(
        &mut self,
        pos: usize,
        values: Option<&[CellValue]>,
        default: &CellValue,
    ) -> TableResult<()> {
        if let Some(values) = values {
            if values.len() != self.rows.len() {
                return Err(TableError::ShapeMismatch(format!(
                    "{} values for {} rows",
                    values.len(),
                    self.rows.len()
                )));
            }
        }
        for (i, row) in self.rows.iter_mut().enumerate() {
            row[pos] = match values {
                Some(values) => values[i].clone(),
                None => default.clone(),
            };
        }
        if Some(pos) == self.key_position() {
            self.rebuild_key_index();
        }
        Ok(())
    }

    /// Adds column `name` at `position` (appended when `None` or past the
    /// end), filled from `values` or with `default`.
    ///
    /// An existing name is overwritten in place instead. An empty name is a
    /// no-op.
    pub fn insert_column(
        &mut self,
        name: &str,
        values: Option<&[CellValue]>,
        position: Option<usize>,
        default: CellValue,
    ) -> TableResult<()> {
        if name.is_empty() {
            return Ok(());
        }
        if let Some(pos) = self.columns.position_of(name) {
            return self.write_column(pos, values, &default);
        }
        if let Some(values) = values {
            if values.len() != self.rows.len() {
                return Err(TableError::ShapeMismatch(format!(
                    "{} values for {} rows",
                    values.len(),
                    self.rows.len()
                )));
            }
        }

        let width = self.columns.len();
        let at = position.unwrap_or(width).min(width);
        self.columns.insert_at(at, name);
        for (i, row) in self.rows.iter_mut().enumerate() {
            let value = match values {
                Some(values) => values[i].clone(),
                None => default.clone(),
            };
            row.insert(at.min(row.len()), value);
        }
        // Positions after `at` shifted
        self.rebuild_key_index();
        Ok(())
    }

    /// Inserts a running integer column starting at `start_at`.
    pub fn insert_index_column(
        &mut self,
        name: &str,
        position: Option<usize>,
        start_at: i64,
    ) -> TableResult<()> {
        let values: Vec<CellValue> = (0..self.rows.len() as i64)
            .map(|i| CellValue::Integer(start_at + i))
            .collect();
        self.insert_column(name, Some(&values), position, CellValue::Empty)
    }

    /// Removes the named columns; unknown names are ignored. Dropping the
    /// key column clears the key designation.
    pub fn drop_columns<S: AsRef<str>>(&mut self, names: &[S]) {
        let positions: Vec<usize> = names
            .iter()
            .filter_map(|n| self.columns.position_of(n.as_ref()))
            .collect();
        if positions.is_empty() {
            return;
        }

        for name in names {
            self.dtypes.shift_remove(name.as_ref());
            if name.as_ref() == self.keyfield {
                self.keyfield.clear();
            }
        }
        self.columns.remove_positions(&positions);
        for row in self.rows.iter_mut() {
            let mut i = 0;
            row.retain(|_| {
                let keep = !positions.contains(&i);
                i += 1;
                keep
            });
        }
        self.rebuild_key_index();
    }

    /// Position of column `name`, or `ColumnNotFound`.
    pub fn column_position(&self, name: &str) -> TableResult<usize> {
        self.columns
            .position_of(name)
            .ok_or_else(|| TableError::ColumnNotFound(name.to_string()))
    }
}
