#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dataset definitions and the cleaning pipeline.
//!
//! Each input dataset is described by a [`definition::DatasetDefinition`]
//! loaded from an embedded TOML file. A single generic pipeline drives every
//! dataset through the same stages:
//!
//! 1. [`reader`] resolves the declared columns against the file header and
//!    streams raw rows.
//! 2. [`coercion`] parses each cell into its declared type.
//! 3. [`temporal`] rebuilds one composite date per row.
//! 4. [`transform`] maps typed rows onto the canonical shape.
//! 5. [`filter`] drops every row with a missing attribute.
//! 6. [`writer`] replaces the output file with the surviving rows.

pub mod coercion;
pub mod definition;
pub mod filter;
pub mod pipeline;
pub mod progress;
pub mod reader;
pub mod registry;
pub mod schema;
pub mod temporal;
pub mod transform;
pub mod writer;

use std::path::PathBuf;

/// Errors that abort a dataset run.
///
/// Unparsable values are never errors: they become missing cells and the
/// row is dropped by the filter stage.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// The input file does not exist.
    #[error("Input file not found: {}", path.display())]
    FileNotFound {
        /// Path that was opened.
        path: PathBuf,
    },

    /// I/O error (file read/write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// One or more declared columns are absent from the input header.
    #[error("Schema mismatch in {dataset}: missing column(s) {}", missing.join(", "))]
    SchemaMismatch {
        /// Dataset identifier.
        dataset: String,
        /// Declared column names not present in the header.
        missing: Vec<String>,
    },

    /// Structurally malformed input or a reference to an undeclared column.
    #[error("Type coercion error: {message}")]
    TypeCoercion {
        /// Description of what went wrong.
        message: String,
    },

    /// CSV serialization failed while writing output.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// An embedded dataset definition could not be parsed.
    #[error("Invalid dataset definition: {message}")]
    Definition {
        /// Description of what went wrong.
        message: String,
    },
}
