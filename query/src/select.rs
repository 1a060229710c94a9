//! FILENAME: query/src/select.rs
//! Row selection by predicate and by field equality.
//!
//! Predicates see each row as a `Record` in row order. Selected rows are
//! copied into a new table with the source's columns, dtypes and key column.

use engine::{CellValue, Record, Table, TableError, TableResult};

/// Rows for which `predicate` holds, in row order.
pub fn select_where<F>(table: &Table, mut predicate: F) -> Table
where
    F: FnMut(&Record) -> bool,
{
    let positions = select_positions_where(table, &mut predicate);
    table.take_rows(&positions)
}

/// Positions of the rows for which `predicate` holds.
pub fn select_positions_where<F>(table: &Table, mut predicate: F) -> Vec<usize>
where
    F: FnMut(&Record) -> bool,
{
    (0..table.len())
        .filter(|&i| predicate(&table.row(i)))
        .collect()
}

/// Like `select_where` for a fallible predicate. The first error is
/// returned as-is and no table is built.
pub fn try_select_where<F, E>(table: &Table, mut predicate: F) -> Result<Table, E>
where
    F: FnMut(&Record) -> Result<bool, E>,
{
    let mut positions = Vec::new();
    for i in 0..table.len() {
        if predicate(&table.row(i))? {
            positions.push(i);
        }
    }
    Ok(table.take_rows(&positions))
}

/// Resolves the criteria fields to column positions.
fn criteria_positions<'c>(
    table: &Table,
    criteria: &'c Record,
) -> TableResult<Vec<(usize, &'c CellValue)>> {
    criteria
        .iter()
        .map(|(name, value)| Ok((table.column_position(name)?, value)))
        .collect()
}

fn row_matches(row: &[CellValue], criteria: &[(usize, &CellValue)]) -> bool {
    criteria.iter().all(|(pos, value)| row[*pos] == **value)
}

/// Rows whose fields equal every entry of `criteria`.
///
/// With `inverse`, only the first row that does not match is kept. When
/// `expect_at_most` is set and more rows match, fails with `TooManyMatches`.
/// Criteria naming unknown columns fail with `ColumnNotFound`.
pub fn select_by_equality(
    table: &Table,
    criteria: &Record,
    expect_at_most: Option<usize>,
    inverse: bool,
) -> TableResult<Table> {
    let criteria = criteria_positions(table, criteria)?;

    let positions: Vec<usize> = if inverse {
        table
            .rows()
            .iter()
            .position(|row| !row_matches(row, &criteria))
            .into_iter()
            .collect()
    } else {
        table
            .rows()
            .iter()
            .enumerate()
            .filter(|(_, row)| row_matches(row, &criteria))
            .map(|(i, _)| i)
            .collect()
    };

    if let Some(limit) = expect_at_most {
        if positions.len() > limit {
            return Err(TableError::TooManyMatches {
                found: positions.len(),
                limit,
            });
        }
    }
    Ok(table.take_rows(&positions))
}

/// The first row matching `criteria` (or, with `inverse`, the first row
/// that does not), as a record.
pub fn select_first_by_equality(
    table: &Table,
    criteria: &Record,
    inverse: bool,
) -> TableResult<Option<Record>> {
    let criteria = criteria_positions(table, criteria)?;
    Ok(table
        .rows()
        .iter()
        .position(|row| row_matches(row, &criteria) != inverse)
        .map(|i| table.row(i)))
}
