//! FILENAME: interchange/src/json.rs
//! JSON import and export of tables as arrays of records.
//!
//! Cells map onto JSON scalars directly (`null`, booleans, numbers, strings,
//! arrays). Record field order follows the column order on output.

use crate::error::{InterchangeError, InterchangeResult};
use engine::{DTypes, KeyedRecords, Record, Table};
use indexmap::IndexMap;
use std::io::Write;

/// The table as a JSON array of records.
pub fn to_json_string(table: &Table, pretty: bool) -> InterchangeResult<String> {
    let records = table.to_records();
    let json = if pretty {
        serde_json::to_string_pretty(&records)?
    } else {
        serde_json::to_string(&records)?
    };
    Ok(json)
}

pub fn write_json<W: Write>(table: &Table, writer: W) -> InterchangeResult<()> {
    serde_json::to_writer(writer, &table.to_records())?;
    Ok(())
}

/// The table as a `serde_json::Value` array. Field order inside each object
/// is whatever `serde_json::Map` keeps.
pub fn to_json_records(table: &Table) -> InterchangeResult<serde_json::Value> {
    Ok(serde_json::to_value(table.to_records())?)
}

/// Builds a table from a JSON array of flat records. Columns are the union of
/// the record fields in first-seen order; duplicate keys upsert.
pub fn from_json_records(json: &str, keyfield: &str) -> InterchangeResult<Table> {
    let records: Vec<Record> = serde_json::from_str(json)?;
    log::debug!("from_json_records: {} records", records.len());
    Ok(Table::from_records(&records, keyfield, DTypes::new())?)
}

/// The table as a JSON object from key value (in display form) to record.
pub fn to_json_keyed(table: &Table, remove_keyfield: bool) -> InterchangeResult<String> {
    let by_text: IndexMap<String, Record> = table
        .to_keyed_records(remove_keyfield)?
        .into_iter()
        .map(|(key, record)| (key.to_string(), record))
        .collect();
    Ok(serde_json::to_string(&by_text)?)
}

/// Builds a table from a JSON object of records keyed by their key value.
/// Object keys are text, and are written back into `keyfield` as text.
pub fn from_json_keyed(json: &str, keyfield: &str) -> InterchangeResult<Table> {
    if keyfield.is_empty() {
        return Err(InterchangeError::InvalidFormat(
            "keyed JSON needs a key column name".to_string(),
        ));
    }
    let by_text: IndexMap<String, Record> = serde_json::from_str(json)?;
    let keyed: KeyedRecords = by_text
        .into_iter()
        .map(|(key, record)| (key.into(), record))
        .collect();
    Ok(Table::from_keyed_records(&keyed, keyfield, true, DTypes::new())?)
}
