#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Result types for summaries computed over cleaned disaster tables.
//!
//! These are serialized as JSON by the CLI `summary` command.

use serde::{Deserialize, Serialize};

/// Number of disaster events starting in one calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearCount {
    /// Calendar year.
    pub year: i32,
    /// Events whose start date falls in `year`.
    pub disaster_count: u64,
}

/// Summary statistics over annual disaster counts.
///
/// Only years with at least one event contribute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisasterSummary {
    /// Smallest annual count.
    pub min: u64,
    /// Largest annual count.
    pub max: u64,
    /// Mean annual count.
    pub mean: f64,
    /// Median annual count.
    pub median: f64,
    /// Sample standard deviation (`n - 1` denominator). Zero when fewer
    /// than two years have data.
    pub std: f64,
    /// Number of years with at least one event.
    pub years_with_data: u64,
}

impl DisasterSummary {
    /// Summary of an empty table.
    pub const EMPTY: Self = Self {
        min: 0,
        max: 0,
        mean: 0.0,
        median: 0.0,
        std: 0.0,
        years_with_data: 0,
    };
}

/// Number of events of one detailed disaster type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCount {
    /// Detailed disaster type (the `DisasterSubsubtype` column).
    pub disaster_type: String,
    /// Events of this type.
    pub count: u64,
}

/// Everything the `summary` command reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisasterReport {
    /// Events per year, ascending by year.
    pub annual_counts: Vec<YearCount>,
    /// Statistics over `annual_counts`.
    pub summary: DisasterSummary,
    /// Most common detailed types, most frequent first.
    pub top_types: Vec<TypeCount>,
}
