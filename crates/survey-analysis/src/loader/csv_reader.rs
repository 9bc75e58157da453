//! Per-file CSV parsing: structural validation followed by typed loading.

use crate::error::{AnalysisError, Result};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Check that a file has a header row, unique column names, valid UTF-8
/// and the same number of fields in every row.
///
/// Polars pads short rows with nulls, which would turn a malformed row into
/// "missing values" and let the cleaner silently drop it. The strict `csv`
/// reader rejects such files up front.
pub(crate) fn validate_structure(path: &Path, file: &str) -> Result<usize> {
    let parse_error = |reason: String| AnalysisError::FileParse {
        file: file.to_string(),
        reason,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_path(path)
        .map_err(|e| parse_error(e.to_string()))?;

    let headers = reader
        .headers()
        .map_err(|e| parse_error(describe_csv_error(&e)))?
        .clone();

    if headers.is_empty() {
        return Err(parse_error("file is empty (no header row)".to_string()));
    }

    let mut seen = HashSet::new();
    for name in headers.iter() {
        if name.trim().is_empty() {
            return Err(parse_error("header contains an empty column name".to_string()));
        }
        if !seen.insert(name) {
            return Err(parse_error(format!("duplicate column name '{}'", name)));
        }
    }

    let mut rows = 0usize;
    for record in reader.records() {
        record.map_err(|e| parse_error(describe_csv_error(&e)))?;
        rows += 1;
    }

    debug!("'{}' passed structural validation ({} data rows)", file, rows);
    Ok(rows)
}

/// Load a validated file into a DataFrame, inferring column types from all rows.
///
/// Inference can pick `i64` for a column holding a value outside its range,
/// which fails the typed read. Such files are re-read as text and each
/// column is narrowed to `Int64`, then `Float64`, else kept as text.
pub(crate) fn read_frame(path: &Path, file: &str) -> Result<DataFrame> {
    let parse_error = |e: PolarsError| AnalysisError::FileParse {
        file: file.to_string(),
        reason: e.to_string(),
    };

    match read_csv(path, None) {
        Ok(df) => Ok(df),
        Err(e) => {
            debug!("Typed read of '{}' failed ({}), re-reading as text", file, e);
            let text = read_csv(path, Some(0)).map_err(parse_error)?;
            narrow_text_columns(&text).map_err(parse_error)
        }
    }
}

/// `infer_schema_length` of `Some(0)` reads every column as `String`.
fn read_csv(path: &Path, infer_schema_length: Option<usize>) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(infer_schema_length)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
}

fn narrow_text_columns(df: &DataFrame) -> PolarsResult<DataFrame> {
    let columns = df
        .get_columns()
        .iter()
        .map(|col| {
            [DataType::Int64, DataType::Float64]
                .iter()
                .find_map(|dtype| col.strict_cast(dtype).ok())
                .unwrap_or_else(|| col.clone())
        })
        .collect();
    DataFrame::new(columns)
}

fn describe_csv_error(error: &csv::Error) -> String {
    match error.kind() {
        csv::ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } => {
            let line = pos.as_ref().map(|p| p.line()).unwrap_or_default();
            format!(
                "inconsistent column count on line {}: expected {} fields, found {}",
                line, expected_len, len
            )
        }
        csv::ErrorKind::Utf8 { pos, .. } => {
            let line = pos.as_ref().map(|p| p.line()).unwrap_or_default();
            format!("invalid UTF-8 on line {}", line)
        }
        _ => error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &tempfile::TempDir, name: &str, content: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    // ========================================================================
    // validate_structure() tests
    // ========================================================================

    #[test]
    fn test_validate_well_formed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "s1.csv", b"age,response\n25,Yes\n,No\n40,Yes\n");
        assert_eq!(validate_structure(&path, "s1.csv").unwrap(), 3);
    }

    #[test]
    fn test_validate_ragged_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "bad.csv", b"age,response\n25,Yes\n30\n");
        let err = validate_structure(&path, "bad.csv").unwrap_err();

        assert_eq!(err.error_code(), "FILE_PARSE_ERROR");
        assert_eq!(err.file(), Some("bad.csv"));
        assert!(err.to_string().contains("inconsistent column count"));
    }

    #[test]
    fn test_validate_extra_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "bad.csv", b"age,response\n25,Yes,extra\n");
        assert!(validate_structure(&path, "bad.csv").is_err());
    }

    #[test]
    fn test_validate_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "latin1.csv", b"age,response\n25,Ja\xe4\n");
        let err = validate_structure(&path, "latin1.csv").unwrap_err();
        assert!(err.to_string().contains("UTF-8"));
    }

    #[test]
    fn test_validate_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "empty.csv", b"");
        let err = validate_structure(&path, "empty.csv").unwrap_err();
        assert!(err.to_string().contains("no header"));
    }

    #[test]
    fn test_validate_duplicate_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "dup.csv", b"age,age\n1,2\n");
        let err = validate_structure(&path, "dup.csv").unwrap_err();
        assert!(err.to_string().contains("duplicate column name 'age'"));
    }

    // ========================================================================
    // read_frame() tests
    // ========================================================================

    #[test]
    fn test_read_frame_infers_types() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "s1.csv", b"age,response,score\n25,Yes,1.5\n,No,2.0\n40,Yes,3.5\n");
        let df = read_frame(&path, "s1.csv").unwrap();

        assert_eq!(df.shape(), (3, 3));
        assert_eq!(df.column("age").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("age").unwrap().null_count(), 1);
        assert_eq!(df.column("response").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("score").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn test_read_frame_keeps_unparseable_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "s2.csv", b"age\n25\nN/A\n");
        let df = read_frame(&path, "s2.csv").unwrap();

        // "N/A" is text, not a missing-value marker
        assert_eq!(df.column("age").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("age").unwrap().null_count(), 0);
    }

    #[test]
    fn test_read_frame_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "h.csv", b"age,response\n");
        let df = read_frame(&path, "h.csv").unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 2);
    }

    #[test]
    fn test_read_frame_out_of_range_integer_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "ids.csv", b"age,id,response\n25,99999999999999999999,Yes\n,1,No\n");
        let df = read_frame(&path, "ids.csv").unwrap();

        assert_eq!(df.shape(), (2, 3));
        assert_eq!(df.column("age").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("age").unwrap().null_count(), 1);
        assert_ne!(df.column("id").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("response").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_read_frame_oversized_age_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "o.csv", b"age,response\n25,Yes\n9223372036854775808,No\n");
        let df = read_frame(&path, "o.csv").unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.column("age").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn test_blank_lines_are_not_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "gaps.csv", b"age\n25\n\n40\n");
        assert_eq!(validate_structure(&path, "gaps.csv").unwrap(), 2);
    }
}
