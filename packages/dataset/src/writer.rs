//! CSV writer for canonical records.
//!
//! Output is written to a hidden sibling file and renamed over the
//! destination once complete, so a failed run never leaves a partial file
//! and a previous output is replaced in one step. Dates serialize as
//! `YYYY-MM-DD` and floats as their shortest round-trip form (`68.0`), so
//! identical input produces byte-identical output.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use climate_clean_dataset_models::CanonicalRecord;

use crate::DatasetError;

/// Returns the temporary path used while writing `path`.
fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map_or_else(|| "output".into(), |n| n.to_string_lossy().into_owned());
    path.with_file_name(format!(".{name}.tmp"))
}

fn write_csv<R: CanonicalRecord>(path: &Path, records: &[R]) -> Result<(), DatasetError> {
    let file = File::create(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(BufWriter::new(file));

    // Written explicitly so an empty table still carries its header.
    writer.write_record(R::COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}

/// Replaces `path` with a CSV of `records` in canonical column order.
///
/// Creates the parent directory if needed.
///
/// # Errors
///
/// Returns [`DatasetError::Io`] or [`DatasetError::Csv`] if writing or
/// renaming fails. The destination is left untouched in that case.
pub fn write_records<R: CanonicalRecord>(path: &Path, records: &[R]) -> Result<(), DatasetError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent)?;
    }

    let staging = staging_path(path);
    if let Err(e) = write_csv(&staging, records) {
        fs::remove_file(&staging).ok();
        return Err(e);
    }

    if let Err(e) = fs::rename(&staging, path) {
        fs::remove_file(&staging).ok();
        return Err(e.into());
    }
    Ok(())
}
