#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the climate-clean toolchain.
//!
//! Running with no subcommand cleans every dataset found in the current
//! directory and writes the cleaned tables alongside the inputs.
//!
//! Uses `indicatif-log-bridge` (via [`climate_clean_cli_utils::init_logger`])
//! so log lines and progress spinners share the terminal.

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use climate_clean_analytics::{DEFAULT_TOP_TYPES, build_report, load_cleaned_disasters};
use climate_clean_cli_utils::{IndicatifProgress, MultiProgress};
use climate_clean_dataset::definition::DatasetDefinition;
use climate_clean_dataset::pipeline::{PipelineOptions, run_datasets};
use climate_clean_dataset::registry::{all_datasets, find_by_kind, find_dataset};
use climate_clean_dataset_models::DatasetKind;

#[derive(Parser)]
#[command(name = "climate_clean", about = "Climate and disaster dataset cleaner")]
struct Cli {
    /// Directory containing the raw input files
    #[arg(long, global = true, default_value = ".")]
    input_dir: PathBuf,
    /// Directory the cleaned tables are written to
    #[arg(long, global = true, default_value = ".")]
    output_dir: PathBuf,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean every configured dataset
    CleanAll {
        /// Comma-separated list of dataset IDs to clean
        #[arg(long)]
        datasets: Option<String>,
    },
    /// Clean a single dataset
    Clean {
        /// Dataset identifier (e.g., "`emdat_disasters`")
        dataset: String,
    },
    /// List all configured datasets
    Datasets,
    /// Print annual counts and statistics for the cleaned disaster table
    Summary {
        /// Number of detailed disaster types to report
        #[arg(long, default_value_t = DEFAULT_TOP_TYPES)]
        top: usize,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = climate_clean_cli_utils::init_logger();
    let cli = Cli::parse();

    let options = PipelineOptions {
        input_dir: cli.input_dir,
        output_dir: cli.output_dir,
    };

    match cli.command {
        None => clean(&multi, &options, &all_datasets()?),
        Some(Commands::CleanAll { datasets }) => {
            clean(&multi, &options, &selected_datasets(datasets.as_deref())?)
        }
        Some(Commands::Clean { dataset }) => {
            clean(&multi, &options, &[single_dataset(&dataset)?])
        }
        Some(Commands::Datasets) => {
            let datasets = all_datasets()?;
            println!("{:<22} {:<40} OUTPUT", "ID", "INPUT");
            println!("{}", "-".repeat(100));
            for def in &datasets {
                println!(
                    "{:<22} {:<40} {}",
                    def.id(),
                    def.input_filename,
                    def.output_filename
                );
            }
            Ok(())
        }
        Some(Commands::Summary { top }) => {
            let def = find_by_kind(DatasetKind::DisasterHistorical)?
                .ok_or("no historical disaster dataset is configured")?;
            let path = options.output_dir.join(&def.output_filename);
            let records = load_cleaned_disasters(&path)?;
            let report = build_report(&records, top);
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
    }
}

/// Resolves a comma-separated list of dataset IDs against the registry.
///
/// `None` selects every dataset. Unknown IDs are an error rather than
/// being silently skipped.
fn selected_datasets(
    filter: Option<&str>,
) -> Result<Vec<DatasetDefinition>, Box<dyn std::error::Error>> {
    let all = all_datasets()?;
    let Some(filter) = filter else {
        return Ok(all);
    };

    let mut selected = Vec::new();
    for id in filter.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let def = all
            .iter()
            .find(|d| d.id() == id)
            .ok_or_else(|| format!("unknown dataset: {id}"))?;
        selected.push(def.clone());
    }
    Ok(selected)
}

/// Looks up exactly one dataset by ID.
fn single_dataset(id: &str) -> Result<DatasetDefinition, Box<dyn std::error::Error>> {
    Ok(find_dataset(id)?.ok_or_else(|| format!("unknown dataset: {id}"))?)
}

/// Runs the pipeline over `datasets`, printing each cleaned file path.
///
/// Every dataset is attempted; the run fails if any one of them did.
fn clean(
    multi: &MultiProgress,
    options: &PipelineOptions,
    datasets: &[DatasetDefinition],
) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let results = run_datasets(datasets, options, |def| {
        IndicatifProgress::rows_spinner(multi, &format!("[{}]", def.id()))
    });

    let mut failed = Vec::new();
    for (id, result) in results {
        match result {
            Ok(report) => println!("{}", report.output_path.display()),
            Err(_) => failed.push(id),
        }
    }

    log::info!(
        "Cleaned {}/{} datasets in {:.2?}",
        datasets.len() - failed.len(),
        datasets.len(),
        start.elapsed()
    );

    if failed.is_empty() {
        Ok(())
    } else {
        Err(format!("failed datasets: {}", failed.join(", ")).into())
    }
}
