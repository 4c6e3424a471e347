#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dataset kinds, declared column types, and the canonical cleaned record
//! formats.
//!
//! Every input dataset (EM-DAT historical disasters, country surface
//! temperatures, NASA contemporary disasters) is cleaned into exactly one of
//! the [`CanonicalRecord`] shapes defined here. The field order of each
//! record type is the column order of its output file.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use strum_macros::{AsRefStr, Display, EnumString};

/// The canonical shape a dataset is cleaned into.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DatasetKind {
    /// Historical disaster events with separate start year/month/day columns.
    DisasterHistorical,
    /// Monthly surface temperature readings per country.
    Temperature,
    /// Contemporary disaster events with a single `yyyy-MM-dd` date column.
    DisasterContemporary,
}

/// Semantic type of an input column, as declared in a dataset schema.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ColumnType {
    /// Integer or floating point value, coerced to `f64`.
    Number,
    /// Free text. Empty cells are missing.
    Text,
    /// Text holding a date in a fixed format, parsed by the temporal stage.
    TextDate,
}

/// One declared input column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Exact header name in the input file.
    pub name: String,
    /// Declared semantic type.
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl ColumnSpec {
    /// Creates a column declaration.
    #[must_use]
    pub fn new(name: &str, column_type: ColumnType) -> Self {
        Self {
            name: name.to_string(),
            column_type,
        }
    }
}

/// A fully-populated cleaned output row.
///
/// `COLUMNS` must list the serialized field names in declaration order; it
/// is written as the header row even when a dataset produces no records.
pub trait CanonicalRecord: Serialize + DeserializeOwned {
    /// Output header, in column order.
    const COLUMNS: &'static [&'static str];
}

/// A cleaned historical disaster event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DisasterHistoricalRecord {
    /// Start date rebuilt from year/month/day components.
    pub event_date: NaiveDate,
    /// World region (e.g. `"Southern Asia"`).
    pub region: String,
    /// Broad disaster type (e.g. `"Flood"`).
    pub disaster_type: String,
    /// Disaster subtype (e.g. `"Riverine flood"`).
    pub disaster_subtype: String,
    /// Most detailed disaster classification.
    pub disaster_subsubtype: String,
}

impl CanonicalRecord for DisasterHistoricalRecord {
    const COLUMNS: &'static [&'static str] = &[
        "EventDate",
        "Region",
        "DisasterType",
        "DisasterSubtype",
        "DisasterSubsubtype",
    ];
}

/// A cleaned monthly country temperature reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemperatureRecord {
    /// First day of the observed month.
    pub event_date: NaiveDate,
    /// Country name as given by the source.
    pub country: String,
    /// Observed temperature converted from Celsius.
    pub temperature_fahrenheit: f64,
    /// Deviation from the historical baseline, passed through unchanged.
    pub anomaly: f64,
}

impl CanonicalRecord for TemperatureRecord {
    const COLUMNS: &'static [&'static str] =
        &["EventDate", "Country", "TemperatureFahrenheit", "Anomaly"];
}

/// A cleaned contemporary disaster event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DisasterContemporaryRecord {
    /// Event title.
    pub title: String,
    /// Category of the event (from the source's `Category_title`).
    pub disaster_type: String,
    /// Event date.
    pub date: NaiveDate,
}

impl CanonicalRecord for DisasterContemporaryRecord {
    const COLUMNS: &'static [&'static str] = &["Title", "DisasterType", "Date"];
}
