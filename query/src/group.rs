//! FILENAME: query/src/group.rs
//! Group-by partitioning and group-by-reduce aggregation.
//!
//! Partitions keep first-seen group order and the original relative order
//! of rows within each group. `group_by_reduce` emits one row per group:
//! the group key columns followed by the reduced columns.
//!
//! Standard aggregates over all-numeric reduce columns take a single-pass
//! path that never materializes the per-group tables. Both paths share the
//! same accumulator so their results agree.

use engine::{CellValue, DTypes, Record, Table, TableResult};
use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Composite group key: one value per grouping column, in listed order.
pub type GroupKey = SmallVec<[CellValue; 4]>;

/// Standard reductions over one column of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregate {
    /// Sum of numeric cells. Integer while every addend is an integer and
    /// nothing overflows.
    Sum,
    /// Arithmetic mean of numeric cells. `Empty` when there are none.
    Mean,
    /// Smallest numeric cell, as stored.
    Min,
    /// Largest numeric cell, as stored.
    Max,
    /// Number of non-empty cells.
    Count,
}

impl Aggregate {
    /// Reduces a column of values.
    pub fn apply(self, values: &[CellValue]) -> CellValue {
        let mut acc = Accumulator::new();
        for value in values {
            acc.add(value);
        }
        acc.finish(self)
    }
}

/// How `group_by_reduce` hands each group to the reducing function.
pub enum Reducer<'f> {
    /// Called once per group with the group's rows restricted to the reduce
    /// columns. The returned record maps reduce-column names to values;
    /// fields it leaves out are `Empty`.
    ByTable(Box<dyn FnMut(&Table) -> Record + 'f>),
    /// Called once per reduce column per group with that column's values.
    ByColumn(Box<dyn FnMut(&[CellValue]) -> CellValue + 'f>),
    /// Called once per group with the group's rows as records restricted to
    /// the reduce columns.
    ByRow(Box<dyn FnMut(&[Record]) -> Record + 'f>),
    /// A standard aggregate applied to every reduce column.
    Aggregate(Aggregate),
}

impl<'f> Reducer<'f> {
    pub fn by_table(f: impl FnMut(&Table) -> Record + 'f) -> Self {
        Reducer::ByTable(Box::new(f))
    }

    pub fn by_column(f: impl FnMut(&[CellValue]) -> CellValue + 'f) -> Self {
        Reducer::ByColumn(Box::new(f))
    }

    pub fn by_row(f: impl FnMut(&[Record]) -> Record + 'f) -> Self {
        Reducer::ByRow(Box::new(f))
    }
}

impl From<Aggregate> for Reducer<'_> {
    fn from(aggregate: Aggregate) -> Self {
        Reducer::Aggregate(aggregate)
    }
}

impl std::fmt::Debug for Reducer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reducer::ByTable(_) => f.write_str("Reducer::ByTable"),
            Reducer::ByColumn(_) => f.write_str("Reducer::ByColumn"),
            Reducer::ByRow(_) => f.write_str("Reducer::ByRow"),
            Reducer::Aggregate(a) => write!(f, "Reducer::Aggregate({:?})", a),
        }
    }
}

// ============================================================================
// ACCUMULATOR
// ============================================================================

/// Running totals for one column of one group.
#[derive(Debug, Clone)]
struct Accumulator {
    sum: CellValue,
    float_sum: f64,
    count: usize,
    count_numbers: usize,
    min: Option<(f64, CellValue)>,
    max: Option<(f64, CellValue)>,
}

impl Accumulator {
    fn new() -> Self {
        Accumulator {
            sum: CellValue::Integer(0),
            float_sum: 0.0,
            count: 0,
            count_numbers: 0,
            min: None,
            max: None,
        }
    }

    fn add(&mut self, value: &CellValue) {
        if value.is_empty() {
            return;
        }
        self.count += 1;

        let Some(n) = value.as_f64() else {
            return;
        };
        self.count_numbers += 1;
        self.float_sum += n;
        if let Some(sum) = self.sum.checked_add(value) {
            self.sum = sum;
        }
        if self.min.as_ref().map_or(true, |(m, _)| n < *m) {
            self.min = Some((n, value.clone()));
        }
        if self.max.as_ref().map_or(true, |(m, _)| n > *m) {
            self.max = Some((n, value.clone()));
        }
    }

    fn finish(&self, aggregate: Aggregate) -> CellValue {
        match aggregate {
            Aggregate::Sum => self.sum.clone(),
            Aggregate::Mean if self.count_numbers == 0 => CellValue::Empty,
            Aggregate::Mean => CellValue::Number(self.float_sum / self.count_numbers as f64),
            Aggregate::Min => self.min.as_ref().map(|(_, v)| v.clone()).unwrap_or_default(),
            Aggregate::Max => self.max.as_ref().map(|(_, v)| v.clone()).unwrap_or_default(),
            Aggregate::Count => CellValue::Integer(self.count as i64),
        }
    }
}

// ============================================================================
// GROUP BY
// ============================================================================

/// Partitions the rows by the exact value of `column`. Each partition keeps
/// the source's columns, dtypes and key column.
pub fn group_by(table: &Table, column: &str) -> TableResult<IndexMap<CellValue, Table>> {
    let pos = table.column_position(column)?;

    let mut positions: IndexMap<CellValue, Vec<usize>, FxBuildHasher> = IndexMap::default();
    for (i, row) in table.rows().iter().enumerate() {
        positions.entry(row[pos].clone()).or_default().push(i);
    }
    Ok(positions
        .into_iter()
        .map(|(value, rows)| (value, table.take_rows(&rows)))
        .collect())
}

fn positions_of<S: AsRef<str>>(table: &Table, names: &[S]) -> TableResult<Vec<usize>> {
    names
        .iter()
        .map(|name| table.column_position(name.as_ref()))
        .collect()
}

fn group_key(row: &[CellValue], group_pos: &[usize]) -> GroupKey {
    group_pos.iter().map(|&p| row[p].clone()).collect()
}

/// Partitions by the composite key over `group_columns` and reduces each
/// group's `reduce_columns` with `reducer`.
///
/// The result has the group columns followed by the reduce columns, one row
/// per group in first-seen order, no key column, and the source dtypes of
/// the group columns.
pub fn group_by_reduce<'f, S: AsRef<str>>(
    table: &Table,
    group_columns: &[S],
    reduce_columns: &[S],
    reducer: impl Into<Reducer<'f>>,
) -> TableResult<Table> {
    let group_pos = positions_of(table, group_columns)?;
    let reduce_pos = positions_of(table, reduce_columns)?;
    let reduce_names: Vec<&str> = reduce_columns.iter().map(AsRef::as_ref).collect();

    let rows = match reducer.into() {
        Reducer::Aggregate(aggregate) if all_numeric(table, &reduce_pos) => {
            log::debug!("group_by_reduce: numeric fast path for {:?}", aggregate);
            reduce_numeric(table, &group_pos, &reduce_pos, aggregate)
        }
        reducer => reduce_generic(table, &group_pos, &reduce_pos, &reduce_names, reducer)?,
    };

    let mut names: Vec<&str> = group_columns.iter().map(AsRef::as_ref).collect();
    names.extend(&reduce_names);
    let dtypes: DTypes = group_columns
        .iter()
        .filter_map(|name| {
            let name = name.as_ref();
            table.dtypes().get(name).map(|dt| (name.to_string(), *dt))
        })
        .collect();
    Table::from_rows(&names, rows, "", dtypes)
}

fn all_numeric(table: &Table, reduce_pos: &[usize]) -> bool {
    table.rows().iter().all(|row| {
        reduce_pos
            .iter()
            .all(|&p| row[p].is_numeric() || row[p].is_empty())
    })
}

/// One pass over the rows, accumulating every reduce column per group.
fn reduce_numeric(
    table: &Table,
    group_pos: &[usize],
    reduce_pos: &[usize],
    aggregate: Aggregate,
) -> Vec<Vec<CellValue>> {
    let mut slots: FxHashMap<GroupKey, usize> = FxHashMap::default();
    let mut groups: Vec<(GroupKey, Vec<Accumulator>)> = Vec::new();

    for row in table.rows() {
        let key = group_key(row, group_pos);
        let slot = *slots.entry(key.clone()).or_insert_with(|| {
            groups.push((key, vec![Accumulator::new(); reduce_pos.len()]));
            groups.len() - 1
        });
        let accs = &mut groups[slot].1;
        for (acc, &p) in accs.iter_mut().zip(reduce_pos) {
            acc.add(&row[p]);
        }
    }

    groups
        .into_iter()
        .map(|(key, accs)| {
            let mut out: Vec<CellValue> = key.into_vec();
            out.extend(accs.iter().map(|acc| acc.finish(aggregate)));
            out
        })
        .collect()
}

fn reduce_generic(
    table: &Table,
    group_pos: &[usize],
    reduce_pos: &[usize],
    reduce_names: &[&str],
    mut reducer: Reducer<'_>,
) -> TableResult<Vec<Vec<CellValue>>> {
    let mut groups: IndexMap<GroupKey, Vec<usize>, FxBuildHasher> = IndexMap::default();
    for (i, row) in table.rows().iter().enumerate() {
        groups.entry(group_key(row, group_pos)).or_default().push(i);
    }

    let reduce_dtypes: DTypes = reduce_names
        .iter()
        .filter_map(|name| table.dtypes().get(*name).map(|dt| (name.to_string(), *dt)))
        .collect();

    let mut out = Vec::with_capacity(groups.len());
    for (key, positions) in groups {
        let columns: Vec<Vec<CellValue>> = reduce_pos
            .iter()
            .map(|&p| positions.iter().map(|&i| table.rows()[i][p].clone()).collect())
            .collect();

        let reduced: Vec<CellValue> = match &mut reducer {
            Reducer::Aggregate(aggregate) => columns.iter().map(|c| aggregate.apply(c)).collect(),
            Reducer::ByColumn(f) => columns.iter().map(|c| f(c)).collect(),
            Reducer::ByTable(f) => {
                let rows: Vec<Vec<CellValue>> = positions
                    .iter()
                    .map(|&i| reduce_pos.iter().map(|&p| table.rows()[i][p].clone()).collect())
                    .collect();
                let group = Table::from_rows(reduce_names, rows, "", reduce_dtypes.clone())?;
                fields_of(&f(&group), reduce_names)
            }
            Reducer::ByRow(f) => {
                let records: Vec<Record> = positions
                    .iter()
                    .map(|&i| {
                        reduce_names
                            .iter()
                            .zip(reduce_pos)
                            .map(|(name, &p)| (name.to_string(), table.rows()[i][p].clone()))
                            .collect()
                    })
                    .collect();
                fields_of(&f(&records), reduce_names)
            }
        };

        let mut row: Vec<CellValue> = key.into_vec();
        row.extend(reduced);
        out.push(row);
    }
    Ok(out)
}

fn fields_of(record: &Record, names: &[&str]) -> Vec<CellValue> {
    names
        .iter()
        .map(|name| record.get(*name).cloned().unwrap_or_default())
        .collect()
}

// ============================================================================
// COLUMN SUMS
// ============================================================================

/// Sums each of `columns` (every column when empty) over all rows.
///
/// Non-numeric cells are skipped. A column holding no numeric value sums to
/// `Empty`, or is left out of the result entirely with `numeric_only`.
pub fn sum_columns<S: AsRef<str>>(
    table: &Table,
    columns: &[S],
    numeric_only: bool,
) -> TableResult<Record> {
    let names: Vec<String> = if columns.is_empty() {
        table.columns()
    } else {
        columns.iter().map(|c| c.as_ref().to_string()).collect()
    };

    let mut sums = Record::with_capacity(names.len());
    for name in names {
        let pos = table.column_position(&name)?;
        let mut acc = Accumulator::new();
        for row in table.rows() {
            acc.add(&row[pos]);
        }
        if acc.count_numbers > 0 {
            sums.insert(name, acc.finish(Aggregate::Sum));
        } else if !numeric_only {
            sums.insert(name, CellValue::Empty);
        }
    }
    Ok(sums)
}
