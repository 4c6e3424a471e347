//! Source adapter: streams the declared columns of a CSV input file.
//!
//! The header is resolved against the dataset [`Schema`] up front, so a
//! missing column fails before any row is read. Rows are then yielded
//! lazily, one [`RawRecord`] at a time, restricted to the declared columns
//! in schema order.

use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use crate::DatasetError;
use crate::schema::{ResolvedSchema, Schema};

/// One input row restricted to the declared columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based line number of the row in the input file.
    pub line: u64,
    /// Raw cell text in schema order. Cells past the end of a short row are
    /// empty.
    pub cells: Vec<String>,
}

/// An open CSV input whose header has been matched to a schema.
pub struct SourceReader {
    reader: csv::Reader<File>,
    resolved: ResolvedSchema,
}

impl SourceReader {
    /// Opens `path` and resolves its header against `schema`.
    ///
    /// # Errors
    ///
    /// * [`DatasetError::FileNotFound`] if the file does not exist
    /// * [`DatasetError::Io`] for any other open failure
    /// * [`DatasetError::TypeCoercion`] if the header row cannot be read
    /// * [`DatasetError::SchemaMismatch`] if a declared column is missing
    pub fn open(path: &Path, dataset: &str, schema: &Schema) -> Result<Self, DatasetError> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                DatasetError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                DatasetError::Io(e)
            }
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(file);

        let header = reader.headers().map_err(|e| DatasetError::TypeCoercion {
            message: format!("unreadable header in {}: {e}", path.display()),
        })?;

        let resolved = schema.resolve(dataset, header.iter())?;

        log::debug!(
            "[{dataset}] resolved {} declared column(s) in {}",
            resolved.positions().len(),
            path.display()
        );

        Ok(Self { reader, resolved })
    }

    /// Consumes the reader, yielding one [`RawRecord`] per data row.
    ///
    /// A structurally malformed row (e.g. invalid UTF-8) yields
    /// [`DatasetError::TypeCoercion`].
    pub fn records(self) -> impl Iterator<Item = Result<RawRecord, DatasetError>> {
        let Self { reader, resolved } = self;

        reader.into_records().map(move |result| {
            let row = result.map_err(|e| DatasetError::TypeCoercion {
                message: format!("malformed row: {e}"),
            })?;

            let line = row.position().map_or(0, csv::Position::line);
            let cells = resolved
                .positions()
                .iter()
                .map(|&pos| row.get(pos).unwrap_or("").to_string())
                .collect();

            Ok(RawRecord { line, cells })
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use climate_clean_dataset_models::{ColumnSpec, ColumnType};

    use super::*;

    fn schema() -> Schema {
        Schema::new(vec![
            ColumnSpec::new("Title", ColumnType::Text),
            ColumnSpec::new("Date", ColumnType::TextDate),
        ])
    }

    fn write_file(dir: &Path, contents: &[u8]) -> std::path::PathBuf {
        let path = dir.join("input.csv");
        let mut file = File::create(&path).unwrap();
        file.write_all(contents).unwrap();
        path
    }

    #[test]
    fn projects_declared_columns_in_schema_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            b"Date,Extra,Title\n2021-01-02,x,Storm\n2021-03-04,y,Fire\n",
        );

        let records: Vec<RawRecord> = SourceReader::open(&path, "t", &schema())
            .unwrap()
            .records()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].cells, vec!["Storm", "2021-01-02"]);
        assert_eq!(records[0].line, 2);
        assert_eq!(records[1].cells, vec!["Fire", "2021-03-04"]);
        assert_eq!(records[1].line, 3);
    }

    #[test]
    fn short_rows_yield_empty_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), b"Title,Date\nStorm\n");

        let records: Vec<RawRecord> = SourceReader::open(&path, "t", &schema())
            .unwrap()
            .records()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(records[0].cells, vec!["Storm", ""]);
    }

    #[test]
    fn missing_file_is_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = SourceReader::open(&dir.path().join("absent.csv"), "t", &schema());
        assert!(matches!(result, Err(DatasetError::FileNotFound { .. })));
    }

    #[test]
    fn missing_column_is_schema_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), b"Title,When\nStorm,2021-01-02\n");

        let result = SourceReader::open(&path, "t", &schema());
        match result {
            Err(DatasetError::SchemaMismatch { missing, .. }) => {
                assert_eq!(missing, vec!["Date".to_string()]);
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected schema mismatch"),
        }
    }

    #[test]
    fn invalid_utf8_row_is_type_coercion_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), b"Title,Date\n\xff\xfe,2021-01-02\n");

        let mut records = SourceReader::open(&path, "t", &schema()).unwrap().records();
        assert!(matches!(
            records.next(),
            Some(Err(DatasetError::TypeCoercion { .. }))
        ));
    }
}
