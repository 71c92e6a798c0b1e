//! CSV trajectory loader
//!
//! Reads a comma-separated file with a header row into a [`TimeSeriesTable`].
//! Every column is read as text first and the required columns are cast to
//! Float64 afterwards, so a bad cell is reported with its column, row and
//! token instead of surfacing as a schema inference failure.

use super::table::{Column, TimeSeriesTable};
use crate::error::{ReportError, Result};
use log::debug;
use polars::prelude::*;
use std::path::Path;

/// Load a trajectory table from a CSV file
///
/// Column order in the file is irrelevant and extra columns are ignored.
///
/// # Errors
/// - `NotFound` if `path` is not an existing file
/// - `SchemaError` if `time`, `position` or `velocity` is missing from the header
/// - `ParseError` if a required cell is empty, not a number or not finite, or
///   the CSV is malformed
/// - `EmptyData` if the file has no data rows
pub fn load_csv(path: &Path) -> Result<TimeSeriesTable> {
    if !path.is_file() {
        return Err(ReportError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_raise_if_empty(false)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(|source| read_error(path, source))?;

    debug!(
        "Read {} rows x {} columns from {}",
        df.height(),
        df.width(),
        path.display()
    );

    if df.width() == 0 {
        return Err(ReportError::EmptyData {
            path: path.to_path_buf(),
        });
    }

    let names = df.get_column_names_str();
    if let Some(missing) = Column::ALL
        .iter()
        .find(|column| !names.contains(&column.name()))
    {
        return Err(ReportError::Schema {
            path: path.to_path_buf(),
            column: missing.name().to_string(),
        });
    }

    if df.height() == 0 {
        return Err(ReportError::EmptyData {
            path: path.to_path_buf(),
        });
    }

    let time = numeric_column(&df, Column::Time, path)?;
    let position = numeric_column(&df, Column::Position, path)?;
    let velocity = numeric_column(&df, Column::Velocity, path)?;

    TimeSeriesTable::from_columns(time, position, velocity).ok_or_else(|| ReportError::Csv {
        path: path.to_path_buf(),
        source: polars_err!(ShapeMismatch: "required columns have different lengths"),
    })
}

/// Cast one text column to f64, reporting the first cell that is not a finite number
///
/// Surrounding whitespace is ignored (`0.0, 1.0` reads as two numbers); the
/// error still shows the cell as written.
fn numeric_column(df: &DataFrame, column: Column, path: &Path) -> Result<Vec<f64>> {
    let raw = df
        .column(column.name())
        .and_then(|c| c.str())
        .map_err(|_| ReportError::Schema {
            path: path.to_path_buf(),
            column: column.name().to_string(),
        })?;

    let trimmed = strip_chars(raw, &StringChunked::full_null(PlSmallStr::EMPTY, 1));
    let parsed = trimmed
        .cast(&DataType::Float64)
        .map_err(|source| read_error(path, source))?;
    let values = parsed.f64().map_err(|source| read_error(path, source))?;

    let mut out = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        match value {
            Some(v) if v.is_finite() => out.push(v),
            _ => {
                return Err(ReportError::Parse {
                    path: path.to_path_buf(),
                    column: column.name().to_string(),
                    row: index + 1,
                    token: raw.get(index).unwrap_or("").to_string(),
                });
            }
        }
    }

    Ok(out)
}

fn read_error(path: &Path, source: PolarsError) -> ReportError {
    match &source {
        PolarsError::IO { error, .. } if error.kind() == std::io::ErrorKind::NotFound => {
            ReportError::NotFound {
                path: path.to_path_buf(),
            }
        }
        PolarsError::NoData(_) => ReportError::EmptyData {
            path: path.to_path_buf(),
        },
        _ => ReportError::Csv {
            path: path.to_path_buf(),
            source,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("trajectory.csv");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_valid_file() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "time,position,velocity\n0,1.0,0.0\n0.5,0.5,-0.75\n1.0,-1e-1,-1.25\n",
        );

        let table = load_csv(&path).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.column(Column::Time), &[0.0, 0.5, 1.0]);
        assert_eq!(table.column(Column::Position), &[1.0, 0.5, -0.1]);
        assert_eq!(table.column(Column::Velocity), &[0.0, -0.75, -1.25]);
    }

    #[test]
    fn test_column_order_and_extra_columns() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "velocity,step,position,time\n2.0,a,1.0,0.0\n3.0,b,4.0,1.0\n",
        );

        let table = load_csv(&path).unwrap();
        assert_eq!(table.column(Column::Time), &[0.0, 1.0]);
        assert_eq!(table.column(Column::Position), &[1.0, 4.0]);
        assert_eq!(table.column(Column::Velocity), &[2.0, 3.0]);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = load_csv(&dir.path().join("nope.csv")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_missing_velocity_column() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "time,position\n0.0,1.0\n");

        let err = load_csv(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SchemaError);
        match err {
            ReportError::Schema { column, .. } => assert_eq!(column, "velocity"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_header_is_case_sensitive() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "Time,position,velocity\n0.0,1.0,0.0\n");

        let err = load_csv(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SchemaError);
    }

    #[test]
    fn test_non_numeric_position() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "time,position,velocity\n0.0,1.0,0.0\n1.0,abc,1.0\n",
        );

        let err = load_csv(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParseError);
        match err {
            ReportError::Parse {
                column, row, token, ..
            } => {
                assert_eq!(column, "position");
                assert_eq!(row, 2);
                assert_eq!(token, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_whitespace_around_numbers() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "time,position,velocity\n0.0, 1.0, 0.0\n 0.5 ,-0.5,\t2.5\n",
        );

        let table = load_csv(&path).unwrap();
        assert_eq!(table.column(Column::Time), &[0.0, 0.5]);
        assert_eq!(table.column(Column::Position), &[1.0, -0.5]);
        assert_eq!(table.column(Column::Velocity), &[0.0, 2.5]);
    }

    #[test]
    fn test_bad_token_reported_as_written() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "time,position,velocity\n0.0, x1 ,0.0\n");

        match load_csv(&path).unwrap_err() {
            ReportError::Parse { column, token, .. } => {
                assert_eq!(column, "position");
                assert_eq!(token, " x1 ");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_finite_cells_rejected() {
        let dir = TempDir::new().unwrap();
        for (contents, column, token) in [
            ("time,position,velocity\n0.0,nan,0.0\n", "position", "nan"),
            ("time,position,velocity\n0.0,1.0,0.0\n1.0,2.0,inf\n", "velocity", "inf"),
        ] {
            let path = write_csv(&dir, contents);
            match load_csv(&path).unwrap_err() {
                ReportError::Parse {
                    column: c, token: t, ..
                } => {
                    assert_eq!(c, column);
                    assert_eq!(t, token);
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_empty_cell_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "time,position,velocity\n0.0,,0.0\n");

        let err = load_csv(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParseError);
    }

    #[test]
    fn test_header_only_is_empty_data() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "time,position,velocity\n");

        let err = load_csv(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyData);
    }

    #[test]
    fn test_empty_file_is_empty_data() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "");

        let err = load_csv(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyData);
    }
}
