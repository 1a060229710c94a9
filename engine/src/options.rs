//! FILENAME: engine/src/options.rs
//! PURPOSE: Per-table configuration.
//! CONTEXT: Options travel with a table (and with tables derived from it by
//! addressing or selection). They are deserializable so a host application
//! can keep them in a JSON/TOML settings file; every field has a default.

use crate::names::DEFAULT_UNNAMED_PREFIX;
use serde::{Deserialize, Serialize};

/// How addressing reads wrap their result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnMode {
    /// Every read yields a table, even a 1x1 one.
    #[default]
    Table,
    /// Single rows, single columns and single cells unwrap to bare values.
    Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableOptions {
    pub return_mode: ReturnMode,
    /// Prefix for blank column names during sanitation.
    pub unnamed_prefix: String,
    /// Upper bound on formula evaluation passes.
    pub max_formula_passes: usize,
}

impl Default for TableOptions {
    fn default() -> Self {
        TableOptions {
            return_mode: ReturnMode::Table,
            unnamed_prefix: DEFAULT_UNNAMED_PREFIX.to_string(),
            max_formula_passes: 10,
        }
    }
}

impl TableOptions {
    pub fn value_mode() -> Self {
        TableOptions {
            return_mode: ReturnMode::Value,
            ..Default::default()
        }
    }
}
