//! Null/invalid filter.
//!
//! The transform stage produces candidates whose attributes are all
//! optional. A candidate becomes a canonical record only when every
//! attribute is present; otherwise the row is dropped and counted.
//! There is no other exclusion rule.

use chrono::NaiveDate;
use climate_clean_dataset_models::{
    CanonicalRecord, DisasterContemporaryRecord, DisasterHistoricalRecord, TemperatureRecord,
};

/// A partially-populated canonical record.
pub trait Candidate {
    /// The canonical record this candidate completes into.
    type Output: CanonicalRecord;

    /// Returns the canonical record, or the output column name of the first
    /// missing attribute.
    ///
    /// # Errors
    ///
    /// Returns the missing column name if any attribute is `None` or empty.
    fn complete(self) -> Result<Self::Output, &'static str>;
}

fn present<T>(value: Option<T>, column: &'static str) -> Result<T, &'static str> {
    value.ok_or(column)
}

fn present_text(value: Option<String>, column: &'static str) -> Result<String, &'static str> {
    value.filter(|s| !s.trim().is_empty()).ok_or(column)
}

/// Candidate for a [`DisasterHistoricalRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisasterHistoricalCandidate {
    /// Start date rebuilt from the year/month/day columns.
    pub event_date: Option<NaiveDate>,
    /// Geographic region.
    pub region: Option<String>,
    /// Broad disaster type.
    pub disaster_type: Option<String>,
    /// Disaster subtype.
    pub disaster_subtype: Option<String>,
    /// Most detailed disaster type.
    pub disaster_subsubtype: Option<String>,
}

impl Candidate for DisasterHistoricalCandidate {
    type Output = DisasterHistoricalRecord;

    fn complete(self) -> Result<Self::Output, &'static str> {
        Ok(DisasterHistoricalRecord {
            event_date: present(self.event_date, "EventDate")?,
            region: present_text(self.region, "Region")?,
            disaster_type: present_text(self.disaster_type, "DisasterType")?,
            disaster_subtype: present_text(self.disaster_subtype, "DisasterSubtype")?,
            disaster_subsubtype: present_text(self.disaster_subsubtype, "DisasterSubsubtype")?,
        })
    }
}

/// Candidate for a [`TemperatureRecord`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemperatureCandidate {
    /// First day of the reading's month.
    pub event_date: Option<NaiveDate>,
    /// Country name.
    pub country: Option<String>,
    /// Reading converted to degrees Fahrenheit.
    pub temperature_fahrenheit: Option<f64>,
    /// Temperature anomaly, as read.
    pub anomaly: Option<f64>,
}

impl Candidate for TemperatureCandidate {
    type Output = TemperatureRecord;

    fn complete(self) -> Result<Self::Output, &'static str> {
        Ok(TemperatureRecord {
            event_date: present(self.event_date, "EventDate")?,
            country: present_text(self.country, "Country")?,
            temperature_fahrenheit: present(
                self.temperature_fahrenheit.filter(|t| t.is_finite()),
                "TemperatureFahrenheit",
            )?,
            anomaly: present(self.anomaly.filter(|a| a.is_finite()), "Anomaly")?,
        })
    }
}

/// Candidate for a [`DisasterContemporaryRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisasterContemporaryCandidate {
    /// Event title.
    pub title: Option<String>,
    /// Event category.
    pub disaster_type: Option<String>,
    /// Parsed event date.
    pub date: Option<NaiveDate>,
}

impl Candidate for DisasterContemporaryCandidate {
    type Output = DisasterContemporaryRecord;

    fn complete(self) -> Result<Self::Output, &'static str> {
        Ok(DisasterContemporaryRecord {
            title: present_text(self.title, "Title")?,
            disaster_type: present_text(self.disaster_type, "DisasterType")?,
            date: present(self.date, "Date")?,
        })
    }
}

/// Running counts of kept and dropped rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    /// Rows that completed into canonical records.
    pub kept: u64,
    /// Rows dropped for a missing or invalid attribute.
    pub dropped: u64,
}

/// Applies the completeness check to candidates one at a time.
#[derive(Debug)]
pub struct NullFilter {
    dataset: String,
    stats: FilterStats,
}

impl NullFilter {
    /// Creates a filter for `dataset` with zeroed counts.
    #[must_use]
    pub fn new(dataset: &str) -> Self {
        Self {
            dataset: dataset.to_string(),
            stats: FilterStats::default(),
        }
    }

    /// Returns the completed record, or `None` if the row is dropped.
    pub fn apply<C: Candidate>(&mut self, line: u64, candidate: C) -> Option<C::Output> {
        match candidate.complete() {
            Ok(record) => {
                self.stats.kept += 1;
                Some(record)
            }
            Err(column) => {
                self.stats.dropped += 1;
                log::debug!(
                    "[{}] dropping line {line}: missing or invalid {column}",
                    self.dataset
                );
                None
            }
        }
    }

    /// Counts so far.
    #[must_use]
    pub const fn stats(&self) -> FilterStats {
        self.stats
    }
}
