//! FILENAME: interchange/src/delimited.rs
//! Delimited-text import and export.
//!
//! Fields are read as text and typed afterwards by the table's dtypes, so a
//! column declared `int` holds integers while undeclared columns keep the
//! text as written. Empty fields become `Empty` cells.

use crate::error::{InterchangeError, InterchangeResult};
use engine::{spreadsheet_column_names, CellValue, DTypes, Table, TableOptions};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    pub delimiter: u8,
    /// First record holds the column names. Without it columns are named
    /// "A", "B", ...
    pub has_header: bool,
    pub dtypes: DTypes,
    pub keyfield: String,
    /// Prefix for blank header names.
    pub unnamed_prefix: String,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            delimiter: b',',
            has_header: true,
            dtypes: DTypes::new(),
            keyfield: String::new(),
            unnamed_prefix: TableOptions::default().unnamed_prefix,
        }
    }
}

impl CsvOptions {
    pub fn with_keyfield(mut self, keyfield: &str) -> Self {
        self.keyfield = keyfield.to_string();
        self
    }

    pub fn with_dtypes(mut self, dtypes: DTypes) -> Self {
        self.dtypes = dtypes;
        self
    }
}

// ============================================================================
// READING
// ============================================================================

fn field_value(field: &str) -> CellValue {
    if field.is_empty() {
        CellValue::Empty
    } else {
        CellValue::Text(field.to_string())
    }
}

/// Reads a table from delimited text.
///
/// With a header, rows longer than the header are truncated and shorter
/// ones padded with `Empty`. Without one, every row is padded to the widest.
pub fn read_csv<R: Read>(reader: R, options: &CsvOptions) -> InterchangeResult<Table> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        // Header handled here so it can be sanitized like any other names
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut header: Option<Vec<String>> = None;
    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    for (line, result) in csv_reader.records().enumerate() {
        let record = result?;
        if options.has_header && line == 0 {
            header = Some(record.iter().map(str::to_string).collect());
            continue;
        }
        rows.push(record.iter().map(field_value).collect());
    }

    let names = match header {
        Some(names) => names,
        None => {
            let width = rows.iter().map(Vec::len).max().unwrap_or(0);
            spreadsheet_column_names(width)
        }
    };

    let width = names.len();
    let mut truncated = 0usize;
    for row in rows.iter_mut() {
        if row.len() > width {
            truncated += 1;
        }
        row.resize(width, CellValue::Empty);
    }
    if truncated > 0 {
        log::warn!(
            "read_csv: {} row(s) wider than the {} header column(s) were truncated",
            truncated,
            width
        );
    }

    let table_options = TableOptions {
        unnamed_prefix: options.unnamed_prefix.clone(),
        ..TableOptions::default()
    };
    log::debug!("read_csv: {} rows x {} columns", rows.len(), width);
    Ok(Table::from_rows_with_options(
        &names,
        rows,
        &options.keyfield,
        options.dtypes.clone(),
        table_options,
    )?)
}

pub fn read_csv_str(text: &str, options: &CsvOptions) -> InterchangeResult<Table> {
    read_csv(text.as_bytes(), options)
}

pub fn read_csv_path(path: &Path, options: &CsvOptions) -> InterchangeResult<Table> {
    let file = File::open(path)?;
    read_csv(file, options)
}

// ============================================================================
// WRITING
// ============================================================================

/// Writes the table as delimited text, preceded by the column names when
/// `options.has_header` is set. Cells are written in their display form.
pub fn write_csv<W: Write>(table: &Table, writer: W, options: &CsvOptions) -> InterchangeResult<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .flexible(true)
        .from_writer(writer);

    if options.has_header {
        csv_writer.write_record(table.columns())?;
    }
    for row in table.rows() {
        csv_writer.write_record(row.iter().map(CellValue::to_string))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn to_csv_string(table: &Table, options: &CsvOptions) -> InterchangeResult<String> {
    let mut buf = Vec::new();
    write_csv(table, &mut buf, options)?;
    String::from_utf8(buf).map_err(|e| InterchangeError::InvalidFormat(e.to_string()))
}

pub fn write_csv_path(table: &Table, path: &Path, options: &CsvOptions) -> InterchangeResult<()> {
    let file = File::create(path)?;
    write_csv(table, file, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{CellValue as V, DType};
    use pretty_assertions::assert_eq;

    const PEOPLE: &str = "ID,Name,Age\n1,John,30\n2,Alice,25\n3,Bob,35\n";

    #[test]
    fn reads_text_cells() {
        let table = read_csv_str(PEOPLE, &CsvOptions::default()).unwrap();
        assert_eq!(table.columns(), ["ID", "Name", "Age"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows()[0], vec![V::from("1"), "John".into(), "30".into()]);
    }

    #[test]
    fn dtypes_and_keyfield_apply() {
        let dtypes: DTypes = [
            ("ID".to_string(), DType::Int),
            ("Age".to_string(), DType::Int),
        ]
        .into_iter()
        .collect();
        let options = CsvOptions::default().with_keyfield("ID").with_dtypes(dtypes);
        let table = read_csv_str(PEOPLE, &options).unwrap();
        assert_eq!(table.rows()[1], vec![V::from(2), "Alice".into(), 25.into()]);
        assert_eq!(table.row_position_of(&3.into()), Some(2));
    }

    #[test]
    fn ragged_rows() {
        let text = "a,b\n1\n2,3,4\n";
        let table = read_csv_str(text, &CsvOptions::default()).unwrap();
        assert_eq!(
            table.rows(),
            [vec![V::from("1"), V::Empty], vec![V::from("2"), "3".into()]]
        );

        let options = CsvOptions {
            has_header: false,
            ..CsvOptions::default()
        };
        let table = read_csv_str(text, &options).unwrap();
        assert_eq!(table.columns(), ["A", "B", "C"]);
        assert_eq!(table.rows()[1], vec![V::from("1"), V::Empty, V::Empty]);
    }

    #[test]
    fn blank_and_duplicate_header_names() {
        let table = read_csv_str("x,,x\n1,2,3\n", &CsvOptions::default()).unwrap();
        assert_eq!(table.columns(), ["x", "col1", "x_1"]);
    }

    #[test]
    fn writes_display_forms() {
        let table = Table::from_rows(
            &["k", "v", "ok"],
            vec![
                vec![1.into(), 2.5.into(), true.into()],
                vec![2.into(), V::Empty, "a,b".into()],
            ],
            "k",
            DTypes::new(),
        )
        .unwrap();
        let text = to_csv_string(&table, &CsvOptions::default()).unwrap();
        assert_eq!(text, "k,v,ok\n1,2.5,TRUE\n2,,\"a,b\"\n");
    }

    #[test]
    fn tab_delimited_without_header() {
        let tabs = CsvOptions {
            delimiter: b'\t',
            has_header: false,
            ..CsvOptions::default()
        };
        let table = read_csv_str("1\t2\n", &tabs).unwrap();
        let options = CsvOptions {
            delimiter: b';',
            has_header: false,
            ..CsvOptions::default()
        };
        assert_eq!(to_csv_string(&table, &options).unwrap(), "1;2\n");
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.csv");
        let table = read_csv_str(PEOPLE, &CsvOptions::default().with_keyfield("ID")).unwrap();
        write_csv_path(&table, &path, &CsvOptions::default()).unwrap();

        let back = read_csv_path(&path, &CsvOptions::default().with_keyfield("ID")).unwrap();
        assert_eq!(back, table);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), PEOPLE);
    }

    #[test]
    fn options_from_json() {
        let options: CsvOptions =
            serde_json::from_str(r#"{"delimiter": 59, "dtypes": {"n": "int"}}"#).unwrap();
        assert_eq!(options.delimiter, b';');
        assert!(options.has_header);
        assert_eq!(options.dtypes["n"], DType::Int);
    }
}
