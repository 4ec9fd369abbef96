//! Shared deterministic types for quakefetch core logic.
//!
//! These types define the contracts between the partitioner, the executor and
//! the artifact writer. They carry no I/O.

use std::fmt;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde_json::Value;

/// Output encoding requested from the catalog (`format=` query parameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    #[default]
    Geojson,
    Csv,
    Kml,
    Text,
    Xml,
    Quakeml,
}

impl Format {
    /// Wire value, also used as the artifact file extension.
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Geojson => "geojson",
            Format::Csv => "csv",
            Format::Kml => "kml",
            Format::Text => "text",
            Format::Xml => "xml",
            Format::Quakeml => "quakeml",
        }
    }

    /// Whether responses in this format are decoded into a JSON document.
    pub fn is_structured(self) -> bool {
        matches!(self, Format::Geojson)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive calendar-date interval (`start <= end`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Number of calendar days covered, counting both ends.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Body of a successful catalog response.
///
/// Structured formats are decoded once by the executor; everything else stays
/// opaque text so it can be merged or written verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Document(Value),
    Text(String),
}
