//! FILENAME: engine/src/dtype.rs
//! PURPOSE: Declared column types and the coercion applied to ingested values.
//! CONTEXT: A table keeps an optional name -> DType registry. Constructors,
//! appends and record assignments pass incoming values through `DType::coerce`
//! so that, e.g., the text "2" lands as the integer 2 in an `Int` column.

use crate::cell::CellValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Column name -> declared type.
pub type DTypes = IndexMap<String, DType>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    Int,
    Float,
    Str,
    Bool,
    List,
    /// No coercion.
    Any,
}

impl DType {
    /// Parses the lowercase tag used in configuration files.
    pub fn from_name(name: &str) -> Option<DType> {
        match name.trim().to_ascii_lowercase().as_str() {
            "int" | "integer" => Some(DType::Int),
            "float" | "number" => Some(DType::Float),
            "str" | "text" | "string" => Some(DType::Str),
            "bool" | "boolean" => Some(DType::Bool),
            "list" => Some(DType::List),
            "any" => Some(DType::Any),
            _ => None,
        }
    }

    /// The tag a bare value would carry.
    pub fn of(value: &CellValue) -> DType {
        match value {
            CellValue::Integer(_) => DType::Int,
            CellValue::Number(_) => DType::Float,
            CellValue::Text(_) => DType::Str,
            CellValue::Boolean(_) => DType::Bool,
            CellValue::List(_) => DType::List,
            CellValue::Empty => DType::Any,
        }
    }

    /// Converts `value` to this type. Values that cannot be converted are
    /// returned unchanged; `Empty` is never converted.
    pub fn coerce(self, value: CellValue) -> CellValue {
        if value.is_empty() {
            return value;
        }
        let converted = match (self, &value) {
            (DType::Any, _) | (DType::List, _) => None,

            (DType::Int, CellValue::Integer(_)) => None,
            (DType::Int, CellValue::Number(n)) if n.fract() == 0.0 => {
                Some(CellValue::Integer(*n as i64))
            }
            (DType::Int, CellValue::Boolean(b)) => Some(CellValue::Integer(*b as i64)),
            (DType::Int, CellValue::Text(s)) => parse_int(s).map(CellValue::Integer),

            (DType::Float, CellValue::Number(_)) => None,
            (DType::Float, CellValue::Integer(n)) => Some(CellValue::Number(*n as f64)),
            (DType::Float, CellValue::Boolean(b)) => {
                Some(CellValue::Number(if *b { 1.0 } else { 0.0 }))
            }
            (DType::Float, CellValue::Text(s)) => {
                s.trim().parse::<f64>().ok().map(CellValue::Number)
            }

            (DType::Str, CellValue::Text(_)) => None,
            (DType::Str, other) => Some(CellValue::Text(other.to_string())),

            (DType::Bool, CellValue::Boolean(_)) => None,
            (DType::Bool, CellValue::Integer(n)) => Some(CellValue::Boolean(*n != 0)),
            (DType::Bool, CellValue::Number(n)) => Some(CellValue::Boolean(*n != 0.0)),
            (DType::Bool, CellValue::Text(s)) => parse_bool(s).map(CellValue::Boolean),

            _ => None,
        };

        match converted {
            Some(v) => v,
            None => {
                if self != DType::of(&value) && !matches!(self, DType::Any | DType::List) {
                    log::debug!("value {:?} kept as-is for {:?} column", value, self);
                }
                value
            }
        }
    }
}

fn parse_int(s: &str) -> Option<i64> {
    let trimmed = s.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Some(n);
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && f.is_finite() => Some(f as i64),
        _ => None,
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Some(true),
        "false" | "0" | "no" | "n" => Some(false),
        _ => None,
    }
}

/// Coerces every value of `row` whose column carries a declared type.
pub(crate) fn coerce_row(row: &mut [CellValue], names: &[String], dtypes: &DTypes) {
    if dtypes.is_empty() {
        return;
    }
    for (cell, name) in row.iter_mut().zip(names) {
        if let Some(dtype) = dtypes.get(name) {
            *cell = dtype.coerce(std::mem::take(cell));
        }
    }
}
