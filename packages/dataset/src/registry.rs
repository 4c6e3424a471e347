//! Dataset registry: loads every dataset definition from embedded TOML.
//!
//! Each `.toml` file in `packages/dataset/datasets/` is baked into the
//! binary at compile time via [`include_str!`].

use climate_clean_dataset_models::DatasetKind;

use crate::DatasetError;
use crate::definition::{DatasetDefinition, parse_dataset_toml};

/// TOML configs embedded at compile time.
const DATASET_TOMLS: &[(&str, &str)] = &[
    (
        "emdat_disasters",
        include_str!("../datasets/emdat_disasters.toml"),
    ),
    (
        "surface_temperature",
        include_str!("../datasets/surface_temperature.toml"),
    ),
    ("nasa_disasters", include_str!("../datasets/nasa_disasters.toml")),
];

/// Parses every embedded dataset definition.
///
/// # Errors
///
/// Returns [`DatasetError::Definition`] naming the first embedded file that
/// fails to parse or validate.
pub fn all_datasets() -> Result<Vec<DatasetDefinition>, DatasetError> {
    DATASET_TOMLS
        .iter()
        .map(|(file, toml_str)| {
            parse_dataset_toml(toml_str).map_err(|e| DatasetError::Definition {
                message: format!("{file}.toml: {e}"),
            })
        })
        .collect()
}

/// Returns the dataset with the given id, if any.
///
/// # Errors
///
/// Returns [`DatasetError::Definition`] if an embedded definition is
/// invalid.
pub fn find_dataset(id: &str) -> Result<Option<DatasetDefinition>, DatasetError> {
    Ok(all_datasets()?.into_iter().find(|d| d.id() == id))
}

/// Returns the first dataset cleaned into the given canonical shape.
///
/// # Errors
///
/// Returns [`DatasetError::Definition`] if an embedded definition is
/// invalid.
pub fn find_by_kind(kind: DatasetKind) -> Result<Option<DatasetDefinition>, DatasetError> {
    Ok(all_datasets()?.into_iter().find(|d| d.kind() == kind))
}
