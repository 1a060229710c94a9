//! FILENAME: engine/src/names.rs
//! PURPOSE: Column-name utilities.
//! CONTEXT: Spreadsheet-style letters ("A", "B", ..., "Z", "AA", ...) used as
//! default column names, and the sanitation pass that makes a proposed list
//! of names unique and non-blank before it becomes a column map.

use rustc_hash::FxHashSet;

/// Default prefix for blank column names.
pub const DEFAULT_UNNAMED_PREFIX: &str = "col";

/// Converts a column string (e.g., "A", "AA", "abc") to a 0-based index.
/// "A" -> 0, "Z" -> 25, "AA" -> 26. Returns None for empty or non-alphabetic input.
pub fn col_to_index(col_str: &str) -> Option<usize> {
    if col_str.is_empty() {
        return None;
    }
    let mut result: usize = 0;
    for c in col_str.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = (c.to_ascii_uppercase() as usize) - ('A' as usize) + 1;
        result = result.checked_mul(26)?.checked_add(digit)?;
    }
    Some(result - 1)
}

/// Converts a 0-based column index to a column string.
/// 0 -> "A", 25 -> "Z", 26 -> "AA", 701 -> "ZZ", 702 -> "AAA".
pub fn index_to_col(mut col_index: usize) -> String {
    let mut result = String::new();
    loop {
        let remainder = col_index % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if col_index < 26 {
            break;
        }
        col_index = col_index / 26 - 1;
    }
    result
}

/// The first `count` spreadsheet column names.
pub fn spreadsheet_column_names(count: usize) -> Vec<String> {
    (0..count).map(index_to_col).collect()
}

/// Makes `names` usable as a column map.
///
/// Blank names become `unnamed_prefix` followed by their position; a name
/// already taken gets the first free `_1`, `_2`, ... suffix.
pub fn sanitize_column_names<S: AsRef<str>>(names: &[S], unnamed_prefix: &str) -> Vec<String> {
    let mut taken: FxHashSet<String> = FxHashSet::default();
    let mut result = Vec::with_capacity(names.len());

    for (position, name) in names.iter().enumerate() {
        let name = name.as_ref();
        let base = if name.trim().is_empty() {
            format!("{}{}", unnamed_prefix, position)
        } else {
            name.to_string()
        };

        let mut candidate = base.clone();
        let mut suffix = 1;
        while taken.contains(&candidate) {
            candidate = format!("{}_{}", base, suffix);
            suffix += 1;
        }

        taken.insert(candidate.clone());
        result.push(candidate);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_col_to_index() {
        assert_eq!(col_to_index("A"), Some(0));
        assert_eq!(col_to_index("z"), Some(25));
        assert_eq!(col_to_index("AA"), Some(26));
        assert_eq!(col_to_index("ZZ"), Some(701));
        assert_eq!(col_to_index("AAA"), Some(702));
        assert_eq!(col_to_index(""), None);
        assert_eq!(col_to_index("A1"), None);
    }

    #[test]
    fn test_index_to_col() {
        assert_eq!(index_to_col(0), "A");
        assert_eq!(index_to_col(25), "Z");
        assert_eq!(index_to_col(26), "AA");
        assert_eq!(index_to_col(52), "BA");
        assert_eq!(index_to_col(702), "AAA");
    }

    #[test]
    fn test_roundtrip() {
        for i in 0..1000 {
            assert_eq!(col_to_index(&index_to_col(i)), Some(i), "Roundtrip failed for index {}", i);
        }
    }

    #[test]
    fn test_spreadsheet_column_names() {
        assert!(spreadsheet_column_names(0).is_empty());
        assert_eq!(spreadsheet_column_names(3), ["A", "B", "C"]);
        let names = spreadsheet_column_names(28);
        assert_eq!(names[26], "AA");
        assert_eq!(names[27], "AB");
    }

    #[test]
    fn test_sanitize_duplicates_and_blanks() {
        assert_eq!(
            sanitize_column_names(&["A", "A", ""], DEFAULT_UNNAMED_PREFIX),
            ["A", "A_1", "col2"]
        );
        assert_eq!(
            sanitize_column_names(&["A", "A", " "], "Unnamed"),
            ["A", "A_1", "Unnamed2"]
        );
    }

    #[test]
    fn test_sanitize_skips_taken_suffixes() {
        assert_eq!(
            sanitize_column_names(&["x", "x_1", "x", "x"], "col"),
            ["x", "x_1", "x_2", "x_3"]
        );
    }
}
