//! FILENAME: query/src/counts.rs
//! Value-occurrence counts for table columns.
//!
//! Counts are keyed by the exact cell value. Counting a column the table does
//! not have yields an empty mapping rather than an error.

use engine::{CellValue, Table};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Value -> number of occurrences.
pub type ValueCounts = IndexMap<CellValue, usize>;

/// Ordering of a `ValueCounts` result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountOrder {
    /// First-seen order.
    #[default]
    Insertion,
    /// Most frequent first; ties keep first-seen order.
    Descending,
    /// Least frequent first; ties keep first-seen order.
    Ascending,
}

impl CountOrder {
    /// Maps the `sort` / `reverse` flag pair onto an ordering.
    pub fn from_flags(sort: bool, reverse: bool) -> Self {
        match (sort, reverse) {
            (false, _) => CountOrder::Insertion,
            (true, false) => CountOrder::Descending,
            (true, true) => CountOrder::Ascending,
        }
    }

    fn apply(self, counts: &mut ValueCounts) {
        match self {
            CountOrder::Insertion => {}
            CountOrder::Descending => counts.sort_by(|_, a, _, b| b.cmp(a)),
            CountOrder::Ascending => counts.sort_by(|_, a, _, b| a.cmp(b)),
        }
    }
}

fn count_rows<'a, I>(values: I, order: CountOrder) -> ValueCounts
where
    I: Iterator<Item = &'a CellValue>,
{
    let mut counts = ValueCounts::new();
    for value in values {
        *counts.entry(value.clone()).or_insert(0) += 1;
    }
    order.apply(&mut counts);
    counts
}

/// Occurrences of each value in `column`.
pub fn value_counts(table: &Table, column: &str, order: CountOrder) -> ValueCounts {
    match table.column_map().position_of(column) {
        Some(pos) => count_rows(table.rows().iter().map(|r| &r[pos]), order),
        None => {
            log::debug!("value_counts: no column {:?}", column);
            ValueCounts::new()
        }
    }
}

/// `value_counts` for several columns at once; an empty list means every
/// column.
pub fn value_counts_many<S: AsRef<str>>(
    table: &Table,
    columns: &[S],
    order: CountOrder,
) -> IndexMap<String, ValueCounts> {
    let names: Vec<String> = if columns.is_empty() {
        table.columns()
    } else {
        columns.iter().map(|c| c.as_ref().to_string()).collect()
    };
    names
        .into_iter()
        .map(|name| {
            let counts = value_counts(table, &name, order);
            (name, counts)
        })
        .collect()
}

/// Occurrences of each value in `column`, counting only rows whose
/// `by_column` equals `by_value`.
pub fn value_counts_where(
    table: &Table,
    column: &str,
    by_column: &str,
    by_value: &CellValue,
    order: CountOrder,
) -> ValueCounts {
    let columns = table.column_map();
    match (columns.position_of(column), columns.position_of(by_column)) {
        (Some(pos), Some(by_pos)) => count_rows(
            table
                .rows()
                .iter()
                .filter(|r| r[by_pos] == *by_value)
                .map(|r| &r[pos]),
            order,
        ),
        _ => ValueCounts::new(),
    }
}

/// For each distinct value of `by_column`, the value counts of `column`
/// among its rows. Groups are in first-seen order.
pub fn value_counts_grouped(
    table: &Table,
    column: &str,
    by_column: &str,
    order: CountOrder,
) -> IndexMap<CellValue, ValueCounts> {
    let columns = table.column_map();
    let (Some(pos), Some(by_pos)) = (columns.position_of(column), columns.position_of(by_column))
    else {
        return IndexMap::new();
    };

    let mut grouped: IndexMap<CellValue, ValueCounts> = IndexMap::new();
    for row in table.rows() {
        *grouped
            .entry(row[by_pos].clone())
            .or_default()
            .entry(row[pos].clone())
            .or_insert(0) += 1;
    }
    for counts in grouped.values_mut() {
        order.apply(counts);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{CellValue as V, DTypes};
    use pretty_assertions::assert_eq;

    fn sample() -> Table {
        Table::from_rows(
            &["col1", "col2", "col3"],
            vec![
                vec!["a".into(), "x".into(), "y".into()],
                vec!["b".into(), "x".into(), "z".into()],
                vec!["a".into(), "y".into(), "y".into()],
                vec!["c".into(), "z".into(), "z".into()],
                vec!["d".into(), "z".into(), "z".into()],
                vec!["e".into(), "z".into(), "y".into()],
            ],
            "",
            DTypes::new(),
        )
        .unwrap()
    }

    fn counts(pairs: &[(&str, usize)]) -> Vec<(V, usize)> {
        pairs.iter().map(|(v, n)| (V::from(*v), *n)).collect()
    }

    fn as_vec(counts: &ValueCounts) -> Vec<(V, usize)> {
        counts.iter().map(|(v, n)| (v.clone(), *n)).collect()
    }

    #[test]
    fn insertion_order_by_default() {
        let got = value_counts(&sample(), "col2", CountOrder::default());
        assert_eq!(as_vec(&got), counts(&[("x", 2), ("y", 1), ("z", 3)]));
    }

    #[test]
    fn sorted_orders() {
        let table = sample();
        let desc = value_counts(&table, "col2", CountOrder::from_flags(true, false));
        assert_eq!(as_vec(&desc), counts(&[("z", 3), ("x", 2), ("y", 1)]));
        let asc = value_counts(&table, "col2", CountOrder::from_flags(true, true));
        assert_eq!(as_vec(&asc), counts(&[("y", 1), ("x", 2), ("z", 3)]));
    }

    #[test]
    fn unknown_column_is_empty() {
        assert!(value_counts(&sample(), "nope", CountOrder::Insertion).is_empty());
        assert!(value_counts(&Table::new(), "col1", CountOrder::Insertion).is_empty());
    }

    #[test]
    fn many_columns() {
        let table = sample();
        let all = value_counts_many::<&str>(&table, &[], CountOrder::Insertion);
        assert_eq!(all.keys().collect::<Vec<_>>(), ["col1", "col2", "col3"]);
        let some = value_counts_many(&table, &["col3"], CountOrder::Insertion);
        assert_eq!(as_vec(&some["col3"]), counts(&[("y", 3), ("z", 3)]));
    }

    #[test]
    fn filtered_counts() {
        let table = sample();
        let got = value_counts_where(&table, "col3", "col2", &"z".into(), CountOrder::Insertion);
        assert_eq!(as_vec(&got), counts(&[("z", 2), ("y", 1)]));
    }

    #[test]
    fn grouped_counts() {
        let table = sample();
        let got = value_counts_grouped(&table, "col3", "col2", CountOrder::Descending);
        assert_eq!(got.len(), 3);
        assert_eq!(as_vec(&got[&V::from("x")]), counts(&[("y", 1), ("z", 1)]));
        assert_eq!(as_vec(&got[&V::from("z")]), counts(&[("z", 2), ("y", 1)]));
    }
}
