//! Config-driven dataset definitions.
//!
//! A [`DatasetDefinition`] captures everything specific to one input
//! dataset: file names, the declared column schema, how the composite date
//! is built, and which columns feed each canonical field. The pipeline
//! itself is generic over all datasets.

use chrono::format::{Item, StrftimeItems};
use climate_clean_dataset_models::{ColumnSpec, ColumnType, DatasetKind};
use serde::Deserialize;

use crate::DatasetError;
use crate::schema::Schema;
use crate::temporal::DateSource;

// ── Top-level dataset definition ─────────────────────────────────────────

/// A complete dataset definition, loaded from an embedded TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetDefinition {
    /// Unique identifier (e.g., `"emdat_disasters"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Input file name, relative to the input directory.
    pub input_filename: String,
    /// Output file name, relative to the output directory.
    pub output_filename: String,
    /// Declared input columns. Only these are read.
    pub columns: Vec<ColumnSpec>,
    /// How to build the composite date.
    pub date: DatePolicy,
    /// Which declared columns feed the canonical fields.
    pub fields: FieldMapping,
}

// ── Date policy ──────────────────────────────────────────────────────────

const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

/// How to build a record's composite date.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DatePolicy {
    /// Separate numeric year/month/day columns. Missing month or day
    /// defaults to 1.
    ComponentFill {
        /// Year column name.
        year: String,
        /// Month column name, if the dataset has one.
        month: Option<String>,
        /// Day column name, if the dataset has one.
        day: Option<String>,
        /// Rows with an earlier year are rejected.
        min_year: Option<i32>,
    },
    /// A single text-date column parsed with a fixed format.
    Parse {
        /// Text-date column name.
        field: String,
        /// `chrono` format string. Defaults to `%Y-%m-%d`.
        #[serde(default = "default_date_format")]
        format: String,
    },
}

impl DatePolicy {
    /// Binds the policy's column names to positions in `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::TypeCoercion`] if a referenced column is not
    /// declared with the expected type.
    pub fn bind(&self, schema: &Schema) -> Result<DateSource, DatasetError> {
        Ok(match self {
            Self::ComponentFill {
                year,
                month,
                day,
                min_year,
            } => DateSource::ComponentFill {
                year: schema.column(year, ColumnType::Number)?,
                month: month
                    .as_deref()
                    .map(|m| schema.column(m, ColumnType::Number))
                    .transpose()?,
                day: day
                    .as_deref()
                    .map(|d| schema.column(d, ColumnType::Number))
                    .transpose()?,
                min_year: *min_year,
            },
            Self::Parse { field, format } => DateSource::Parse {
                field: schema.column(field, ColumnType::TextDate)?,
                format: format.clone(),
            },
        })
    }
}

// ── Field mapping ────────────────────────────────────────────────────────

/// Maps declared input columns to canonical fields. The variant selects
/// the canonical record shape.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldMapping {
    /// Produces `DisasterHistoricalRecord`s.
    DisasterHistorical {
        region: String,
        disaster_type: String,
        disaster_subtype: String,
        disaster_subsubtype: String,
    },
    /// Produces `TemperatureRecord`s.
    Temperature {
        country: String,
        /// Column holding degrees Celsius.
        temperature_celsius: String,
        anomaly: String,
    },
    /// Produces `DisasterContemporaryRecord`s.
    DisasterContemporary {
        title: String,
        disaster_type: String,
    },
}

impl FieldMapping {
    /// The canonical shape this mapping produces.
    #[must_use]
    pub const fn kind(&self) -> DatasetKind {
        match self {
            Self::DisasterHistorical { .. } => DatasetKind::DisasterHistorical,
            Self::Temperature { .. } => DatasetKind::Temperature,
            Self::DisasterContemporary { .. } => DatasetKind::DisasterContemporary,
        }
    }

    /// Every referenced column with the type it must be declared as.
    #[must_use]
    pub fn references(&self) -> Vec<(&str, ColumnType)> {
        match self {
            Self::DisasterHistorical {
                region,
                disaster_type,
                disaster_subtype,
                disaster_subsubtype,
            } => vec![
                (region.as_str(), ColumnType::Text),
                (disaster_type.as_str(), ColumnType::Text),
                (disaster_subtype.as_str(), ColumnType::Text),
                (disaster_subsubtype.as_str(), ColumnType::Text),
            ],
            Self::Temperature {
                country,
                temperature_celsius,
                anomaly,
            } => vec![
                (country.as_str(), ColumnType::Text),
                (temperature_celsius.as_str(), ColumnType::Number),
                (anomaly.as_str(), ColumnType::Number),
            ],
            Self::DisasterContemporary {
                title,
                disaster_type,
            } => vec![
                (title.as_str(), ColumnType::Text),
                (disaster_type.as_str(), ColumnType::Text),
            ],
        }
    }
}

// ── Accessors and validation ─────────────────────────────────────────────

impl DatasetDefinition {
    /// Returns the unique dataset identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the human-readable dataset name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the canonical shape this dataset is cleaned into.
    #[must_use]
    pub const fn kind(&self) -> DatasetKind {
        self.fields.kind()
    }

    /// Builds the declared input schema.
    #[must_use]
    pub fn schema(&self) -> Schema {
        Schema::new(self.columns.clone())
    }

    /// Checks that the definition is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Definition`] if the id or file names are
    /// empty, a column is declared twice, the date format is invalid, or
    /// the date policy or field mapping references a column that is not
    /// declared with the right type.
    pub fn validate(&self) -> Result<(), DatasetError> {
        let invalid = |message: String| DatasetError::Definition {
            message: format!("{}: {message}", self.id),
        };

        if self.id.trim().is_empty() {
            return Err(invalid("id must not be empty".to_string()));
        }
        if self.input_filename.trim().is_empty() || self.output_filename.trim().is_empty() {
            return Err(invalid("file names must not be empty".to_string()));
        }
        if self.input_filename == self.output_filename {
            return Err(invalid("output would overwrite the input file".to_string()));
        }

        for (i, column) in self.columns.iter().enumerate() {
            if self.columns[..i].iter().any(|c| c.name == column.name) {
                return Err(invalid(format!("column '{}' declared twice", column.name)));
            }
        }

        if let DatePolicy::Parse { format, .. } = &self.date
            && StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
        {
            return Err(invalid(format!("invalid date format '{format}'")));
        }

        let schema = self.schema();
        self.date
            .bind(&schema)
            .map_err(|e| invalid(e.to_string()))?;
        for (name, column_type) in self.fields.references() {
            schema
                .column(name, column_type)
                .map_err(|e| invalid(e.to_string()))?;
        }

        Ok(())
    }
}

/// Parses and validates a [`DatasetDefinition`] from a TOML string.
///
/// # Errors
///
/// Returns [`DatasetError::Definition`] if the TOML is malformed, missing
/// required fields, or fails [`DatasetDefinition::validate`].
pub fn parse_dataset_toml(toml_str: &str) -> Result<DatasetDefinition, DatasetError> {
    let definition: DatasetDefinition =
        toml::de::from_str(toml_str).map_err(|e| DatasetError::Definition {
            message: e.to_string(),
        })?;
    definition.validate()?;
    Ok(definition)
}
