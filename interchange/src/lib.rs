//! FILENAME: interchange/src/lib.rs
//! Keytable Interchange Module
//!
//! Converts tables to and from delimited text and JSON. Everything here is
//! layered on the engine's public constructors and exporters.

mod delimited;
mod error;
mod json;

pub use delimited::{
    read_csv, read_csv_path, read_csv_str, to_csv_string, write_csv, write_csv_path, CsvOptions,
};
pub use error::{InterchangeError, InterchangeResult};
pub use json::{
    from_json_keyed, from_json_records, to_json_keyed, to_json_records, to_json_string,
    write_json,
};
