//! Unit and field transforms.
//!
//! A [`Projector`] maps a coerced input row onto one dataset's canonical
//! field names, applying unit conversions along the way. Projectors are
//! pure and stateless; they never decide whether a row is kept.

use crate::coercion::TypedRecord;
use crate::filter::{
    Candidate, DisasterContemporaryCandidate, DisasterHistoricalCandidate, TemperatureCandidate,
};
use crate::schema::ColumnRef;
use crate::temporal::DateSource;

/// Maps typed input rows onto a dataset's canonical shape.
pub trait Projector {
    /// Candidate produced for each row.
    type Candidate: Candidate;

    /// Projects one row.
    fn project(&self, record: &TypedRecord) -> Self::Candidate;
}

/// Converts degrees Celsius to Fahrenheit.
///
/// Returns `None` if the result is not finite.
#[must_use]
pub fn celsius_to_fahrenheit(celsius: f64) -> Option<f64> {
    let fahrenheit = celsius * 9.0 / 5.0 + 32.0;
    fahrenheit.is_finite().then_some(fahrenheit)
}

fn owned_text(record: &TypedRecord, column: ColumnRef) -> Option<String> {
    record.text(column).map(String::from)
}

/// Historical disasters: date rebuilt from components, four text columns.
#[derive(Debug, Clone)]
pub struct DisasterHistoricalProjector {
    pub date: DateSource,
    pub region: ColumnRef,
    pub disaster_type: ColumnRef,
    pub disaster_subtype: ColumnRef,
    pub disaster_subsubtype: ColumnRef,
}

impl Projector for DisasterHistoricalProjector {
    type Candidate = DisasterHistoricalCandidate;

    fn project(&self, record: &TypedRecord) -> Self::Candidate {
        DisasterHistoricalCandidate {
            event_date: self.date.extract(record),
            region: owned_text(record, self.region),
            disaster_type: owned_text(record, self.disaster_type),
            disaster_subtype: owned_text(record, self.disaster_subtype),
            disaster_subsubtype: owned_text(record, self.disaster_subsubtype),
        }
    }
}

/// Country temperatures: Celsius readings converted to Fahrenheit.
#[derive(Debug, Clone)]
pub struct TemperatureProjector {
    pub date: DateSource,
    pub country: ColumnRef,
    pub temperature_celsius: ColumnRef,
    pub anomaly: ColumnRef,
}

impl Projector for TemperatureProjector {
    type Candidate = TemperatureCandidate;

    fn project(&self, record: &TypedRecord) -> Self::Candidate {
        TemperatureCandidate {
            event_date: self.date.extract(record),
            country: owned_text(record, self.country),
            temperature_fahrenheit: record
                .number(self.temperature_celsius)
                .and_then(celsius_to_fahrenheit),
            anomaly: record.number(self.anomaly),
        }
    }
}

/// Contemporary disasters: title, category, and a parsed date.
#[derive(Debug, Clone)]
pub struct DisasterContemporaryProjector {
    pub date: DateSource,
    pub title: ColumnRef,
    pub disaster_type: ColumnRef,
}

impl Projector for DisasterContemporaryProjector {
    type Candidate = DisasterContemporaryCandidate;

    fn project(&self, record: &TypedRecord) -> Self::Candidate {
        DisasterContemporaryCandidate {
            title: owned_text(record, self.title),
            disaster_type: owned_text(record, self.disaster_type),
            date: self.date.extract(record),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use climate_clean_dataset_models::{ColumnSpec, ColumnType};

    use super::*;
    use crate::coercion::coerce;
    use crate::reader::RawRecord;
    use crate::schema::Schema;

    #[test]
    fn converts_celsius_to_fahrenheit() {
        assert_eq!(celsius_to_fahrenheit(20.0), Some(68.0));
        assert_eq!(celsius_to_fahrenheit(-40.0), Some(-40.0));
        assert_eq!(celsius_to_fahrenheit(100.0), Some(212.0));
        assert_eq!(celsius_to_fahrenheit(0.0), Some(32.0));
    }

    #[test]
    fn conversion_matches_formula_within_tolerance() {
        for celsius in [-12.345, 0.1, 3.3, 27.81, 45.678] {
            let fahrenheit = celsius_to_fahrenheit(celsius).unwrap();
            assert!((fahrenheit - (celsius * 1.8 + 32.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn overflowing_conversion_is_missing() {
        assert_eq!(celsius_to_fahrenheit(f64::MAX), None);
    }

    #[test]
    fn projects_temperature_row() {
        let schema = Schema::new(vec![
            ColumnSpec::new("Years", ColumnType::Number),
            ColumnSpec::new("Month", ColumnType::Number),
            ColumnSpec::new("Country", ColumnType::Text),
            ColumnSpec::new("Temperature", ColumnType::Number),
            ColumnSpec::new("Anomaly", ColumnType::Number),
        ]);
        let projector = TemperatureProjector {
            date: DateSource::ComponentFill {
                year: schema.column("Years", ColumnType::Number).unwrap(),
                month: Some(schema.column("Month", ColumnType::Number).unwrap()),
                day: None,
                min_year: Some(1900),
            },
            country: schema.column("Country", ColumnType::Text).unwrap(),
            temperature_celsius: schema.column("Temperature", ColumnType::Number).unwrap(),
            anomaly: schema.column("Anomaly", ColumnType::Number).unwrap(),
        };
        let raw = RawRecord {
            line: 2,
            cells: ["2000", "6", "Peru", "20.0", "0.5"]
                .iter()
                .map(ToString::to_string)
                .collect(),
        };

        let candidate = projector.project(&coerce(&raw, &schema));

        assert_eq!(
            candidate,
            TemperatureCandidate {
                event_date: NaiveDate::from_ymd_opt(2000, 6, 1),
                country: Some("Peru".to_string()),
                temperature_fahrenheit: Some(68.0),
                anomaly: Some(0.5),
            }
        );
    }
}
