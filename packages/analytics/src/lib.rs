#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Summaries over the cleaned historical disaster table.
//!
//! Reads `cleaned_Emdat_Disasters_Detailed.csv` back into canonical records
//! and derives annual event counts, summary statistics over those counts,
//! and the most common detailed disaster types.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Datelike as _;
use climate_clean_analytics_models::{DisasterReport, DisasterSummary, TypeCount, YearCount};
use climate_clean_dataset_models::DisasterHistoricalRecord;
use thiserror::Error;

/// First year included in annual and type counts.
pub const FIRST_YEAR: i32 = 1900;

/// Last year included in annual and type counts. Later years hold too few
/// events to be comparable.
pub const LAST_YEAR: i32 = 2022;

/// Number of detailed types reported by default.
pub const DEFAULT_TOP_TYPES: usize = 16;

/// Errors that can occur while loading a cleaned table.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// The cleaned file does not exist (the pipeline has not been run).
    #[error("Cleaned file not found: {}", path.display())]
    FileNotFound {
        /// Path that was opened.
        path: PathBuf,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a valid cleaned table.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Reads a cleaned historical disaster table.
///
/// # Errors
///
/// Returns [`AnalyticsError::FileNotFound`] if `path` does not exist, or
/// [`AnalyticsError::Csv`] if a row does not match the canonical format.
pub fn load_cleaned_disasters(path: &Path) -> Result<Vec<DisasterHistoricalRecord>, AnalyticsError> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            AnalyticsError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            AnalyticsError::Io(e)
        }
    })?;

    let records = csv::Reader::from_reader(file)
        .deserialize()
        .collect::<Result<Vec<DisasterHistoricalRecord>, _>>()?;

    log::info!("Loaded {} events from {}", records.len(), path.display());

    Ok(records)
}

/// Counts events per start year within [`FIRST_YEAR`]..=[`LAST_YEAR`],
/// ascending by year. Years without events are omitted.
#[must_use]
pub fn annual_counts(records: &[DisasterHistoricalRecord]) -> Vec<YearCount> {
    let mut by_year: BTreeMap<i32, u64> = BTreeMap::new();
    for record in records {
        let year = record.event_date.year();
        if (FIRST_YEAR..=LAST_YEAR).contains(&year) {
            *by_year.entry(year).or_default() += 1;
        }
    }

    by_year
        .into_iter()
        .map(|(year, disaster_count)| YearCount {
            year,
            disaster_count,
        })
        .collect()
}

/// Computes summary statistics over annual counts.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize(counts: &[YearCount]) -> DisasterSummary {
    let mut values: Vec<u64> = counts.iter().map(|c| c.disaster_count).collect();
    if values.is_empty() {
        return DisasterSummary::EMPTY;
    }
    values.sort_unstable();

    let n = values.len();
    let mean = values.iter().sum::<u64>() as f64 / n as f64;
    let median = if n % 2 == 0 {
        (values[n / 2 - 1] + values[n / 2]) as f64 / 2.0
    } else {
        values[n / 2] as f64
    };
    let std = if n < 2 {
        0.0
    } else {
        let squares: f64 = values.iter().map(|&v| (v as f64 - mean).powi(2)).sum();
        (squares / (n - 1) as f64).sqrt()
    };

    DisasterSummary {
        min: values[0],
        max: values[n - 1],
        mean,
        median,
        std,
        years_with_data: n as u64,
    }
}

/// Counts events per detailed disaster type within
/// [`FIRST_YEAR`]..=[`LAST_YEAR`], most common first.
///
/// Ties are ordered by type name. At most `top` entries are returned.
#[must_use]
pub fn type_counts(records: &[DisasterHistoricalRecord], top: usize) -> Vec<TypeCount> {
    let mut by_type: BTreeMap<&str, u64> = BTreeMap::new();
    for record in records {
        if (FIRST_YEAR..=LAST_YEAR).contains(&record.event_date.year()) {
            *by_type.entry(record.disaster_subsubtype.as_str()).or_default() += 1;
        }
    }

    let mut counts: Vec<TypeCount> = by_type
        .into_iter()
        .map(|(disaster_type, count)| TypeCount {
            disaster_type: disaster_type.to_string(),
            count,
        })
        .collect();
    // Stable sort keeps the BTreeMap's name order among equal counts.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(top);
    counts
}

/// Builds the full report for a cleaned table.
#[must_use]
pub fn build_report(records: &[DisasterHistoricalRecord], top: usize) -> DisasterReport {
    let annual_counts = annual_counts(records);
    let summary = summarize(&annual_counts);
    DisasterReport {
        annual_counts,
        summary,
        top_types: type_counts(records, top),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn event(year: i32, subsubtype: &str) -> DisasterHistoricalRecord {
        DisasterHistoricalRecord {
            event_date: NaiveDate::from_ymd_opt(year, 3, 1).unwrap(),
            region: "Asia".to_string(),
            disaster_type: "Storm".to_string(),
            disaster_subtype: "Convective storm".to_string(),
            disaster_subsubtype: subsubtype.to_string(),
        }
    }

    fn counts(pairs: &[(i32, u64)]) -> Vec<YearCount> {
        pairs
            .iter()
            .map(|&(year, disaster_count)| YearCount {
                year,
                disaster_count,
            })
            .collect()
    }

    #[test]
    fn counts_events_per_year_within_range() {
        let records = vec![
            event(1950, "Hail"),
            event(1950, "Tornado"),
            event(1901, "Hail"),
            event(2023, "Hail"),
        ];

        assert_eq!(annual_counts(&records), counts(&[(1901, 1), (1950, 2)]));
    }

    #[test]
    fn summarizes_even_number_of_years() {
        let summary = summarize(&counts(&[(1900, 2), (1901, 4), (1902, 4), (1903, 6)]));

        assert_eq!(summary.min, 2);
        assert_eq!(summary.max, 6);
        assert!((summary.mean - 4.0).abs() < f64::EPSILON);
        assert!((summary.median - 4.0).abs() < f64::EPSILON);
        // Sample variance: (4 + 0 + 0 + 4) / 3
        assert!((summary.std - (8.0_f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(summary.years_with_data, 4);
    }

    #[test]
    fn summarizes_odd_number_of_years() {
        let summary = summarize(&counts(&[(1900, 9), (1901, 1), (1902, 5)]));
        assert!((summary.median - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn single_year_has_zero_std() {
        let summary = summarize(&counts(&[(2000, 7)]));
        assert_eq!(summary.min, 7);
        assert!(summary.std.abs() < f64::EPSILON);
    }

    #[test]
    fn empty_table_summarizes_to_zero() {
        assert_eq!(summarize(&[]), DisasterSummary::EMPTY);
    }

    #[test]
    fn orders_types_by_count_then_name() {
        let records = vec![
            event(1950, "Tornado"),
            event(1951, "Hail"),
            event(1952, "Blizzard"),
            event(1953, "Tornado"),
            event(1954, "Hail"),
        ];

        let top = type_counts(&records, 2);

        assert_eq!(
            top,
            vec![
                TypeCount {
                    disaster_type: "Hail".to_string(),
                    count: 2
                },
                TypeCount {
                    disaster_type: "Tornado".to_string(),
                    count: 2
                },
            ]
        );
    }

    #[test]
    fn type_counts_skip_events_outside_year_range() {
        let records = vec![
            event(2030, "Hail"),
            event(2030, "Hail"),
            event(1950, "Tornado"),
        ];

        assert_eq!(
            type_counts(&records, DEFAULT_TOP_TYPES),
            vec![TypeCount {
                disaster_type: "Tornado".to_string(),
                count: 1
            }]
        );
    }

    #[test]
    fn loads_cleaned_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cleaned.csv");
        std::fs::write(
            &path,
            "EventDate,Region,DisasterType,DisasterSubtype,DisasterSubsubtype\n\
             1905-01-01,Asia,Flood,Riverine flood,Flash\n",
        )
        .unwrap();

        let records = load_cleaned_disasters(&path).unwrap();
        let report = build_report(&records, DEFAULT_TOP_TYPES);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].event_date, NaiveDate::from_ymd_opt(1905, 1, 1).unwrap());
        assert_eq!(report.annual_counts, counts(&[(1905, 1)]));
        assert_eq!(report.top_types.len(), 1);
    }

    #[test]
    fn missing_table_is_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_cleaned_disasters(&dir.path().join("absent.csv"));
        assert!(matches!(result, Err(AnalyticsError::FileNotFound { .. })));
    }
}
