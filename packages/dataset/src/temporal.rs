//! Temporal normalization: one composite date per record.
//!
//! Two policies exist:
//!
//! * **Component fill** builds a date from numeric year/month/day columns.
//!   A missing month or day defaults to `1`. Components must be integral,
//!   and the resulting date must exist on the calendar: April 31 or month
//!   13 is rejected, never clamped.
//! * **Parse** reads a text date that must match a fixed format exactly.
//!
//! A rejected date is `None`, which the filter stage treats as missing.

use chrono::NaiveDate;

use crate::coercion::TypedRecord;
use crate::schema::ColumnRef;

/// A date policy bound to concrete schema columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateSource {
    /// Separate numeric year/month/day columns.
    ComponentFill {
        /// Year column.
        year: ColumnRef,
        /// Month column. When absent every date falls in January.
        month: Option<ColumnRef>,
        /// Day column. When absent every date falls on the 1st.
        day: Option<ColumnRef>,
        /// Years below this are rejected.
        min_year: Option<i32>,
    },
    /// A single text column parsed with a `chrono` format string.
    Parse {
        /// Text-date column.
        field: ColumnRef,
        /// `chrono` format string (e.g. `"%Y-%m-%d"`).
        format: String,
    },
}

impl DateSource {
    /// Extracts the record's date, or `None` if it is missing or invalid.
    #[must_use]
    pub fn extract(&self, record: &TypedRecord) -> Option<NaiveDate> {
        match self {
            Self::ComponentFill {
                year,
                month,
                day,
                min_year,
            } => from_components(
                record.number(*year),
                month.and_then(|m| record.number(m)),
                day.and_then(|d| record.number(d)),
                *min_year,
            ),
            Self::Parse { field, format } => parse_exact(record.text(*field)?, format),
        }
    }
}

/// Converts a numeric component to an integer, rejecting fractional or
/// out-of-range values.
fn integral(value: f64) -> Option<i64> {
    if !value.is_finite() || value.fract() != 0.0 {
        return None;
    }
    if value < f64::from(i32::MIN) || value > f64::from(i32::MAX) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    let n = value as i64;
    Some(n)
}

/// Builds a date from numeric components, filling a missing month or day
/// with `1`.
///
/// Returns `None` if the year is missing or below `min_year`, if any
/// component is not an integer, or if the date does not exist.
#[must_use]
pub fn from_components(
    year: Option<f64>,
    month: Option<f64>,
    day: Option<f64>,
    min_year: Option<i32>,
) -> Option<NaiveDate> {
    let year = i32::try_from(integral(year?)?).ok()?;
    if min_year.is_some_and(|floor| year < floor) {
        return None;
    }

    let month = u32::try_from(month.map_or(Some(1), integral)?).ok()?;
    let day = u32::try_from(day.map_or(Some(1), integral)?).ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parses `s` with `format`, accepting only strings that are exactly the
/// canonical rendering of the parsed date.
///
/// `chrono` tolerates unpadded fields such as `2021-3-4`; the round-trip
/// check rejects those so that only the fixed format is accepted.
#[must_use]
pub fn parse_exact(s: &str, format: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(s, format).ok()?;
    (date.format(format).to_string() == s).then_some(date)
}

#[cfg(test)]
mod tests {
    use climate_clean_dataset_models::{ColumnSpec, ColumnType};

    use super::*;
    use crate::coercion::coerce;
    use crate::reader::RawRecord;
    use crate::schema::Schema;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn fills_missing_month_and_day() {
        assert_eq!(
            from_components(Some(1905.0), None, None, Some(1900)),
            Some(ymd(1905, 1, 1))
        );
    }

    #[test]
    fn fills_missing_day_only() {
        assert_eq!(
            from_components(Some(2000.0), Some(6.0), None, None),
            Some(ymd(2000, 6, 1))
        );
    }

    #[test]
    fn rejects_years_below_floor() {
        assert_eq!(from_components(Some(1899.0), Some(5.0), Some(5.0), Some(1900)), None);
        assert_eq!(
            from_components(Some(1900.0), Some(5.0), Some(5.0), Some(1900)),
            Some(ymd(1900, 5, 5))
        );
    }

    #[test]
    fn rejects_missing_year() {
        assert_eq!(from_components(None, Some(5.0), Some(5.0), None), None);
    }

    #[test]
    fn rejects_day_past_end_of_month() {
        assert_eq!(from_components(Some(2001.0), Some(4.0), Some(31.0), None), None);
        assert_eq!(from_components(Some(2001.0), Some(2.0), Some(29.0), None), None);
        assert_eq!(
            from_components(Some(2000.0), Some(2.0), Some(29.0), None),
            Some(ymd(2000, 2, 29))
        );
    }

    #[test]
    fn rejects_out_of_range_month_and_day() {
        assert_eq!(from_components(Some(2001.0), Some(13.0), None, None), None);
        assert_eq!(from_components(Some(2001.0), Some(0.0), None, None), None);
        assert_eq!(from_components(Some(2001.0), Some(1.0), Some(-1.0), None), None);
    }

    #[test]
    fn rejects_fractional_components() {
        assert_eq!(from_components(Some(2001.5), None, None, None), None);
        assert_eq!(from_components(Some(2001.0), Some(6.5), None, None), None);
    }

    #[test]
    fn parses_exact_iso_dates() {
        assert_eq!(parse_exact("2021-08-02", "%Y-%m-%d"), Some(ymd(2021, 8, 2)));
    }

    #[test]
    fn rejects_malformed_dates() {
        assert_eq!(parse_exact("not-a-date", "%Y-%m-%d"), None);
        assert_eq!(parse_exact("2021-8-2", "%Y-%m-%d"), None);
        assert_eq!(parse_exact("2021-02-30", "%Y-%m-%d"), None);
        assert_eq!(parse_exact("02/08/2021", "%Y-%m-%d"), None);
        assert_eq!(parse_exact("2021-08-02 10:00:00", "%Y-%m-%d"), None);
    }

    #[test]
    fn extracts_from_typed_record() {
        let schema = Schema::new(vec![
            ColumnSpec::new("Start Year", ColumnType::Number),
            ColumnSpec::new("Start Month", ColumnType::Number),
            ColumnSpec::new("Start Day", ColumnType::Number),
        ]);
        let source = DateSource::ComponentFill {
            year: schema.column("Start Year", ColumnType::Number).unwrap(),
            month: Some(schema.column("Start Month", ColumnType::Number).unwrap()),
            day: Some(schema.column("Start Day", ColumnType::Number).unwrap()),
            min_year: Some(1900),
        };
        let raw = RawRecord {
            line: 2,
            cells: vec!["1950".to_string(), "7".to_string(), "n/a".to_string()],
        };

        assert_eq!(source.extract(&coerce(&raw, &schema)), Some(ymd(1950, 7, 1)));
    }
}
