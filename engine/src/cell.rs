//! FILENAME: engine/src/cell.rs
//! PURPOSE: Defines the value held by a single table cell.
//! CONTEXT: This file contains the `CellValue` enum and the `Record` alias
//! used wherever a row is exposed as a name -> value mapping.
//! Cell values are hashable so they can key the key index, group-by
//! partitions and value counts directly.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A row exposed as an ordered column-name -> value mapping.
pub type Record = IndexMap<String, CellValue>;

/// Represents the raw data within a cell.
///
/// Serialized untagged, so JSON `null`, `true`, `3`, `2.5`, `"x"` and
/// `[...]` map onto the matching variant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Boolean(bool),
    Integer(i64),
    Number(f64),
    Text(String),
    /// A whole sequence stored in one cell.
    List(Vec<CellValue>),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Empty cells and empty strings.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, CellValue::Integer(_) | CellValue::Number(_))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Integer(n) => Some(*n as f64),
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Integer(n) => Some(*n),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 9.2e18 => Some(*n as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the display form of the value.
    pub fn as_text(&self) -> String {
        self.to_string()
    }

    /// Adds two numeric values, keeping integers as integers.
    /// Returns None when either side is not numeric.
    pub fn checked_add(&self, other: &CellValue) -> Option<CellValue> {
        match (self, other) {
            (CellValue::Integer(a), CellValue::Integer(b)) => Some(match a.checked_add(*b) {
                Some(sum) => CellValue::Integer(sum),
                None => CellValue::Number(*a as f64 + *b as f64),
            }),
            _ => Some(CellValue::Number(self.as_f64()? + other.as_f64()?)),
        }
    }
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Empty, CellValue::Empty) => true,
            (CellValue::Boolean(a), CellValue::Boolean(b)) => a == b,
            (CellValue::Integer(a), CellValue::Integer(b)) => a == b,
            // NaN equals NaN so a NaN key can be found again
            (CellValue::Number(a), CellValue::Number(b)) => {
                a == b || (a.is_nan() && b.is_nan())
            }
            (CellValue::Text(a), CellValue::Text(b)) => a == b,
            (CellValue::List(a), CellValue::List(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for CellValue {}

impl Hash for CellValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Empty => {}
            CellValue::Boolean(b) => b.hash(state),
            CellValue::Integer(n) => n.hash(state),
            CellValue::Number(n) => canonical_bits(*n).hash(state),
            CellValue::Text(s) => s.hash(state),
            CellValue::List(items) => items.hash(state),
        }
    }
}

/// Bit pattern that agrees with `PartialEq`: all NaNs share one pattern
/// and 0.0 / -0.0 hash identically.
fn canonical_bits(n: f64) -> u64 {
    if n.is_nan() {
        f64::NAN.to_bits()
    } else if n == 0.0 {
        0.0f64.to_bits()
    } else {
        n.to_bits()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            CellValue::Integer(n) => write!(f, "{}", n),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Integer(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Integer(n as i64)
    }
}

impl From<usize> for CellValue {
    fn from(n: usize) -> Self {
        CellValue::Integer(n as i64)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<Vec<CellValue>> for CellValue {
    fn from(items: Vec<CellValue>) -> Self {
        CellValue::List(items)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Empty, Into::into)
    }
}

/// Builds a `Record` from name/value pairs.
pub fn record<K, V, I>(pairs: I) -> Record
where
    K: Into<String>,
    V: Into<CellValue>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
