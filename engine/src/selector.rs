//! FILENAME: engine/src/selector.rs
//! PURPOSE: Row and column selectors, and their resolution to positions.
//! CONTEXT: A selector says which rows or columns an addressing operation
//! targets. Resolution is a pure function of the selector and the table:
//! it yields ordered positions plus the axis "shape" (single, span or list)
//! that the write path uses to decide how a value is broadcast.

use crate::cell::CellValue;
use crate::error::{TableError, TableResult};
use crate::table::Table;
use indexmap::IndexSet;

/// Which rows or columns to address.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Selector {
    /// Every row, or every column.
    #[default]
    All,
    /// One position; negative values count from the end.
    Index(i64),
    /// Half-open `start..stop` with slice semantics: negative bounds count
    /// from the end and out-of-range bounds are clamped.
    Range {
        start: Option<i64>,
        stop: Option<i64>,
    },
    /// Explicit positions, in the order given.
    Positions(Vec<i64>),
    /// Column names, in the order given. Column axis only.
    Names(Vec<String>),
    /// A single column name. Column axis only.
    Name(String),
    /// Key values, in the order given. Row axis only; needs a key column.
    Keys(Vec<CellValue>),
    /// A bare list. On the row axis it holds keys when a key column is
    /// designated and positions otherwise; on the column axis integers are
    /// positions and text values are names.
    List(Vec<CellValue>),
}

impl Selector {
    pub fn range(start: i64, stop: i64) -> Self {
        Selector::Range {
            start: Some(start),
            stop: Some(stop),
        }
    }

    pub fn starting_at(start: i64) -> Self {
        Selector::Range {
            start: Some(start),
            stop: None,
        }
    }

    pub fn up_to(stop: i64) -> Self {
        Selector::Range {
            start: None,
            stop: Some(stop),
        }
    }

    pub fn name(name: impl Into<String>) -> Self {
        Selector::Name(name.into())
    }

    pub fn names<S: AsRef<str>>(names: &[S]) -> Self {
        Selector::Names(names.iter().map(|n| n.as_ref().to_string()).collect())
    }

    pub fn keys<K: Into<CellValue>, I: IntoIterator<Item = K>>(keys: I) -> Self {
        Selector::Keys(keys.into_iter().map(Into::into).collect())
    }

    /// The shape of the axis this selector addresses.
    pub fn kind(&self) -> AxisKind {
        match self {
            Selector::Index(_) | Selector::Name(_) => AxisKind::Single,
            Selector::All | Selector::Range { .. } => AxisKind::Span,
            Selector::Positions(_)
            | Selector::Names(_)
            | Selector::Keys(_)
            | Selector::List(_) => AxisKind::List,
        }
    }

    /// True when the selector covers the whole axis regardless of its length.
    pub fn is_full(&self) -> bool {
        matches!(
            self,
            Selector::All | Selector::Range { start: None | Some(0), stop: None }
        )
    }
}

impl From<i64> for Selector {
    fn from(index: i64) -> Self {
        Selector::Index(index)
    }
}

impl From<i32> for Selector {
    fn from(index: i32) -> Self {
        Selector::Index(index as i64)
    }
}

impl From<&str> for Selector {
    fn from(name: &str) -> Self {
        Selector::Name(name.to_string())
    }
}

impl From<std::ops::Range<i64>> for Selector {
    fn from(range: std::ops::Range<i64>) -> Self {
        Selector::range(range.start, range.end)
    }
}

impl From<std::ops::RangeFull> for Selector {
    fn from(_: std::ops::RangeFull) -> Self {
        Selector::All
    }
}

/// Shape of one resolved axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisKind {
    /// Exactly one row or column was named.
    Single,
    /// A contiguous span (all, or a range).
    Span,
    /// An explicit list.
    List,
}

/// A selector resolved against a table.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub positions: Vec<usize>,
    pub kind: AxisKind,
}

// ============================================================================
// POSITION ARITHMETIC
// ============================================================================

/// Maps a possibly negative index onto `0..len`.
pub fn normalize_index(index: i64, len: usize) -> Option<usize> {
    let len_i = len as i64;
    let pos = if index < 0 { len_i + index } else { index };
    (0..len_i).contains(&pos).then_some(pos as usize)
}

/// Resolves slice bounds against `len`: negatives count from the end and
/// both bounds are clamped to `0..=len`.
pub fn slice_bounds(start: Option<i64>, stop: Option<i64>, len: usize) -> (usize, usize) {
    let len_i = len as i64;
    let clamp = |bound: i64| -> usize {
        let b = if bound < 0 { len_i + bound } else { bound };
        b.clamp(0, len_i) as usize
    };
    let s = start.map_or(0, clamp);
    let e = stop.map_or(len, clamp);
    (s, e.max(s))
}

fn require_index(index: i64, len: usize) -> TableResult<usize> {
    normalize_index(index, len).ok_or(TableError::IndexOutOfRange { index, len })
}

/// A slice bound may sit at `len` (the half-open end) but not past it.
fn require_bound(bound: i64, len: usize) -> TableResult<usize> {
    let len_i = len as i64;
    let pos = if bound < 0 { len_i + bound } else { bound };
    if (0..=len_i).contains(&pos) {
        Ok(pos as usize)
    } else {
        Err(TableError::IndexOutOfRange { index: bound, len })
    }
}

fn integer_position(value: &CellValue) -> TableResult<i64> {
    value.as_i64().ok_or_else(|| {
        TableError::InvalidSelector(format!("{:?} is not a row position", value))
    })
}

// ============================================================================
// RESOLUTION
// ============================================================================

impl Selector {
    /// Resolves against the row axis for a read. Positions outside the table
    /// are dropped, so an out-of-range index yields no rows. Unknown keys are
    /// skipped; the remaining keys keep request order.
    pub fn resolve_rows(&self, table: &Table) -> TableResult<Resolved> {
        let len = table.len();
        let positions = match self {
            Selector::All => (0..len).collect(),
            Selector::Index(i) => normalize_index(*i, len).into_iter().collect(),
            Selector::Range { start, stop } => {
                let (s, e) = slice_bounds(*start, *stop, len);
                (s..e).collect()
            }
            Selector::Positions(list) => list
                .iter()
                .filter_map(|i| normalize_index(*i, len))
                .collect(),
            Selector::Keys(keys) => {
                if table.keyfield().is_empty() {
                    return Err(TableError::NoKeyField);
                }
                key_positions(table, keys)
            }
            Selector::List(values) => {
                if table.keyfield().is_empty() {
                    let mut positions = Vec::with_capacity(values.len());
                    for value in values {
                        if let Some(p) = normalize_index(integer_position(value)?, len) {
                            positions.push(p);
                        }
                    }
                    positions
                } else {
                    key_positions(table, values)
                }
            }
            Selector::Name(_) | Selector::Names(_) => {
                return Err(TableError::InvalidSelector(
                    "column names cannot select rows".to_string(),
                ));
            }
        };
        Ok(Resolved {
            positions,
            kind: self.kind(),
        })
    }

    /// Resolves against the row axis for a write. Unlike reads, positions
    /// and range bounds outside the table fail with `IndexOutOfRange`
    /// instead of being dropped or clamped.
    pub fn resolve_rows_for_write(&self, table: &Table) -> TableResult<Resolved> {
        let len = table.len();
        match self {
            Selector::Index(i) => Ok(Resolved {
                positions: vec![require_index(*i, len)?],
                kind: AxisKind::Single,
            }),
            Selector::Range { start, stop } => {
                for bound in [start, stop].into_iter().flatten() {
                    require_bound(*bound, len)?;
                }
                self.resolve_rows(table)
            }
            Selector::Positions(list) => Ok(Resolved {
                positions: list
                    .iter()
                    .map(|i| require_index(*i, len))
                    .collect::<TableResult<_>>()?,
                kind: self.kind(),
            }),
            Selector::List(values) if table.keyfield().is_empty() => Ok(Resolved {
                positions: values
                    .iter()
                    .map(|v| require_index(integer_position(v)?, len))
                    .collect::<TableResult<_>>()?,
                kind: self.kind(),
            }),
            _ => self.resolve_rows(table),
        }
    }

    /// Resolves against the column axis. Unknown names fail with
    /// `ColumnNotFound`; with `silent`, they resolve to no columns instead.
    /// Repeated columns are kept once, at their first position.
    pub fn resolve_cols(&self, table: &Table, silent: bool) -> TableResult<Resolved> {
        let columns = table.column_map();
        let width = columns.len();
        let name_position = |name: &str| -> TableResult<Option<usize>> {
            match columns.position_of(name) {
                Some(p) => Ok(Some(p)),
                None if silent => Ok(None),
                None => Err(TableError::ColumnNotFound(name.to_string())),
            }
        };

        let positions: Vec<usize> = match self {
            Selector::All => (0..width).collect(),
            Selector::Index(i) => vec![require_index(*i, width)?],
            Selector::Range { start, stop } => {
                let (s, e) = slice_bounds(*start, *stop, width);
                (s..e).collect()
            }
            Selector::Positions(list) => list
                .iter()
                .map(|i| require_index(*i, width))
                .collect::<TableResult<_>>()?,
            Selector::Name(name) => name_position(name)?.into_iter().collect(),
            Selector::Names(names) => {
                let mut positions = Vec::with_capacity(names.len());
                for name in names {
                    positions.extend(name_position(name)?);
                }
                positions
            }
            Selector::List(values) => {
                let mut positions = Vec::with_capacity(values.len());
                for value in values {
                    match value {
                        CellValue::Text(name) => positions.extend(name_position(name)?),
                        other => positions.push(require_index(integer_position(other)?, width)?),
                    }
                }
                positions
            }
            Selector::Keys(_) => {
                return Err(TableError::InvalidSelector(
                    "key values cannot select columns".to_string(),
                ));
            }
        };

        let unique: IndexSet<usize> = positions.into_iter().collect();
        Ok(Resolved {
            positions: unique.into_iter().collect(),
            kind: self.kind(),
        })
    }
}

fn key_positions(table: &Table, keys: &[CellValue]) -> Vec<usize> {
    let mut missing = 0usize;
    let positions: Vec<usize> = keys
        .iter()
        .filter_map(|k| {
            let found = table.row_position_of(k);
            if found.is_none() {
                missing += 1;
            }
            found
        })
        .collect();
    if missing > 0 {
        log::debug!("{} of {} requested keys not found", missing, keys.len());
    }
    positions
}
