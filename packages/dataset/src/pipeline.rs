//! Pipeline driver: runs one dataset through every cleaning stage.
//!
//! Rows are streamed from the input file and pass through coercion,
//! temporal normalization, projection, and the null filter one at a time.
//! Only surviving canonical records are buffered before the final write.
//! Any fatal error aborts the run before the output file is touched.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use climate_clean_dataset_models::ColumnType;

use crate::DatasetError;
use crate::coercion::coerce;
use crate::definition::{DatasetDefinition, FieldMapping};
use crate::filter::{Candidate, NullFilter};
use crate::progress::ProgressCallback;
use crate::reader::SourceReader;
use crate::schema::Schema;
use crate::transform::{
    DisasterContemporaryProjector, DisasterHistoricalProjector, Projector, TemperatureProjector,
};
use crate::writer::write_records;

/// Rows between progress updates.
const PROGRESS_BATCH: u64 = 1_000;

/// Where a run reads its input and writes its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Directory containing the input file.
    pub input_dir: PathBuf,
    /// Directory the output file is written to.
    pub output_dir: PathBuf,
}

impl PipelineOptions {
    /// Reads and writes in the same directory.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            input_dir: dir.to_path_buf(),
            output_dir: dir.to_path_buf(),
        }
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::in_dir(Path::new("."))
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    /// Dataset identifier.
    pub dataset_id: String,
    /// Data rows read from the input.
    pub rows_read: u64,
    /// Rows written to the output.
    pub rows_kept: u64,
    /// Rows dropped for a missing or invalid attribute.
    pub rows_dropped: u64,
    /// File that was written.
    pub output_path: PathBuf,
}

/// Cleans one dataset.
///
/// # Errors
///
/// Returns [`DatasetError`] if the field mapping references an undeclared
/// column, the input cannot be opened or lacks a declared column, a row is
/// structurally malformed, or the output cannot be written. No output is
/// written in any of these cases.
pub fn run_dataset(
    definition: &DatasetDefinition,
    options: &PipelineOptions,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<PipelineReport, DatasetError> {
    let schema = definition.schema();
    let date = definition.date.bind(&schema)?;

    match &definition.fields {
        FieldMapping::DisasterHistorical {
            region,
            disaster_type,
            disaster_subtype,
            disaster_subsubtype,
        } => {
            let projector = DisasterHistoricalProjector {
                date,
                region: schema.column(region, ColumnType::Text)?,
                disaster_type: schema.column(disaster_type, ColumnType::Text)?,
                disaster_subtype: schema.column(disaster_subtype, ColumnType::Text)?,
                disaster_subsubtype: schema.column(disaster_subsubtype, ColumnType::Text)?,
            };
            run_stages(definition, &schema, &projector, options, progress)
        }
        FieldMapping::Temperature {
            country,
            temperature_celsius,
            anomaly,
        } => {
            let projector = TemperatureProjector {
                date,
                country: schema.column(country, ColumnType::Text)?,
                temperature_celsius: schema.column(temperature_celsius, ColumnType::Number)?,
                anomaly: schema.column(anomaly, ColumnType::Number)?,
            };
            run_stages(definition, &schema, &projector, options, progress)
        }
        FieldMapping::DisasterContemporary {
            title,
            disaster_type,
        } => {
            let projector = DisasterContemporaryProjector {
                date,
                title: schema.column(title, ColumnType::Text)?,
                disaster_type: schema.column(disaster_type, ColumnType::Text)?,
            };
            run_stages(definition, &schema, &projector, options, progress)
        }
    }
}

fn run_stages<P: Projector>(
    definition: &DatasetDefinition,
    schema: &Schema,
    projector: &P,
    options: &PipelineOptions,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<PipelineReport, DatasetError> {
    let start = Instant::now();
    let id = definition.id();
    let input_path = options.input_dir.join(&definition.input_filename);
    let output_path = options.output_dir.join(&definition.output_filename);

    log::info!(
        "[{id}] Cleaning {} from {}",
        definition.name(),
        input_path.display()
    );
    progress.set_message(format!("[{id}] reading {}", definition.input_filename));

    let reader = SourceReader::open(&input_path, id, schema)?;
    let mut filter = NullFilter::new(id);
    let mut records: Vec<<P::Candidate as Candidate>::Output> = Vec::new();
    let mut rows_read: u64 = 0;

    for raw in reader.records() {
        let raw = raw?;
        rows_read += 1;

        let typed = coerce(&raw, schema);
        let candidate = projector.project(&typed);
        if let Some(record) = filter.apply(typed.line, candidate) {
            records.push(record);
        }

        if rows_read % PROGRESS_BATCH == 0 {
            progress.inc(PROGRESS_BATCH);
        }
    }
    progress.inc(rows_read % PROGRESS_BATCH);

    let stats = filter.stats();
    log::info!(
        "[{id}] {rows_read} rows read, {} kept, {} dropped",
        stats.kept,
        stats.dropped
    );

    write_records(&output_path, &records)?;

    log::info!(
        "[{id}] Wrote {} in {:.1}s",
        output_path.display(),
        start.elapsed().as_secs_f64()
    );
    progress.finish(format!(
        "[{id}] {} rows -> {}",
        stats.kept,
        output_path.display()
    ));

    Ok(PipelineReport {
        dataset_id: id.to_string(),
        rows_read,
        rows_kept: stats.kept,
        rows_dropped: stats.dropped,
        output_path,
    })
}

/// Cleans each dataset in turn. A failure is logged and recorded but does
/// not stop the remaining datasets.
///
/// `make_progress` is called once per dataset to obtain its progress
/// reporter.
pub fn run_datasets<F>(
    definitions: &[DatasetDefinition],
    options: &PipelineOptions,
    make_progress: F,
) -> Vec<(String, Result<PipelineReport, DatasetError>)>
where
    F: Fn(&DatasetDefinition) -> Arc<dyn ProgressCallback>,
{
    definitions
        .iter()
        .map(|definition| {
            let progress = make_progress(definition);
            let result = run_dataset(definition, options, &progress);
            if let Err(e) = &result {
                log::error!("[{}] {e}", definition.id());
                progress.finish(format!("[{}] failed", definition.id()));
            }
            (definition.id().to_string(), result)
        })
        .collect()
}
