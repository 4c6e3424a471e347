//! Type coercion: parses raw cell text into the declared column types.
//!
//! Coercion never fails on a bad value. Unparsable numbers and empty text
//! become missing cells, which the filter stage later drops. Non-empty text
//! is kept exactly as read; text dates are trimmed before parsing.

use climate_clean_dataset_models::ColumnType;

use crate::reader::RawRecord;
use crate::schema::{ColumnRef, Schema};

/// A coerced cell. `None` means missing.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A [`ColumnType::Number`] cell.
    Number(Option<f64>),
    /// A [`ColumnType::Text`] or [`ColumnType::TextDate`] cell.
    Text(Option<String>),
}

/// A row whose cells have been coerced to their declared types.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedRecord {
    /// 1-based line number in the input file.
    pub line: u64,
    values: Vec<Value>,
}

impl TypedRecord {
    /// Returns the numeric value of a column, or `None` if missing.
    #[must_use]
    pub fn number(&self, column: ColumnRef) -> Option<f64> {
        match self.values.get(column.index())? {
            Value::Number(n) => *n,
            Value::Text(_) => None,
        }
    }

    /// Returns the text value of a column, or `None` if missing.
    #[must_use]
    pub fn text(&self, column: ColumnRef) -> Option<&str> {
        match self.values.get(column.index())? {
            Value::Text(s) => s.as_deref(),
            Value::Number(_) => None,
        }
    }

    /// Coerced cells in schema order.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

/// Parses a numeric cell. Empty, unparsable, and non-finite values are
/// missing.
#[must_use]
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Reads a text cell unchanged. Whitespace-only values are missing.
#[must_use]
pub fn parse_text(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Reads a text-date cell, trimmed for the temporal stage. Whitespace-only
/// values are missing.
#[must_use]
pub fn parse_text_date(raw: &str) -> Option<String> {
    parse_text(raw.trim())
}

/// Coerces every cell of `raw` according to `schema`.
#[must_use]
pub fn coerce(raw: &RawRecord, schema: &Schema) -> TypedRecord {
    let values = schema
        .columns()
        .iter()
        .zip(&raw.cells)
        .map(|(column, cell)| match column.column_type {
            ColumnType::Number => Value::Number(parse_number(cell)),
            ColumnType::Text => Value::Text(parse_text(cell)),
            ColumnType::TextDate => Value::Text(parse_text_date(cell)),
        })
        .collect();

    TypedRecord {
        line: raw.line,
        values,
    }
}

#[cfg(test)]
mod tests {
    use climate_clean_dataset_models::ColumnSpec;

    use super::*;

    #[test]
    fn parses_integers_and_floats() {
        assert_eq!(parse_number("1905"), Some(1905.0));
        assert_eq!(parse_number(" 6.0 "), Some(6.0));
        assert_eq!(parse_number("-0.25"), Some(-0.25));
    }

    #[test]
    fn unparsable_numbers_are_missing() {
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn blank_text_is_missing() {
        assert_eq!(parse_text(""), None);
        assert_eq!(parse_text("  "), None);
        assert_eq!(parse_text_date(" \t"), None);
    }

    #[test]
    fn text_passes_through_unchanged() {
        assert_eq!(parse_text(" Asia "), Some(" Asia ".to_string()));
        assert_eq!(parse_text_date(" 2021-08-02 "), Some("2021-08-02".to_string()));
    }

    #[test]
    fn coerces_by_declared_type() {
        let schema = Schema::new(vec![
            ColumnSpec::new("Years", ColumnType::Number),
            ColumnSpec::new("Country", ColumnType::Text),
            ColumnSpec::new("Date", ColumnType::TextDate),
        ]);
        let raw = RawRecord {
            line: 7,
            cells: vec!["2000".to_string(), String::new(), "2020-01-01".to_string()],
        };

        let typed = coerce(&raw, &schema);

        assert_eq!(typed.line, 7);
        assert_eq!(
            typed.values(),
            &[
                Value::Number(Some(2000.0)),
                Value::Text(None),
                Value::Text(Some("2020-01-01".to_string())),
            ]
        );

        let years = schema.column("Years", ColumnType::Number).unwrap();
        let date = schema.column("Date", ColumnType::TextDate).unwrap();
        assert_eq!(typed.number(years), Some(2000.0));
        assert_eq!(typed.text(date), Some("2020-01-01"));
    }
}
