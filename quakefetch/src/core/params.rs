//! Ordered query-string parameters for catalog requests.

use std::fmt::Display;

use crate::core::types::{DateRange, Format};

pub const STARTTIME: &str = "starttime";
pub const ENDTIME: &str = "endtime";
pub const MINMAGNITUDE: &str = "minmagnitude";
pub const CALLBACK: &str = "callback";

/// Query parameters in insertion order.
///
/// `format` is always present and always serialized first. Setting a name
/// that already exists replaces its value in place.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryParams {
    format: Format,
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new(format: Format) -> Self {
        Self {
            format,
            pairs: Vec::new(),
        }
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Set `starttime`/`endtime` to the range bounds (`YYYY-MM-DD`).
    pub fn with_range(mut self, range: DateRange) -> Self {
        self.set(STARTTIME, range.start);
        self.set(ENDTIME, range.end);
        self
    }

    pub fn set(&mut self, name: &str, value: impl Display) {
        let value = value.to_string();
        match self.pairs.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value,
            None => self.pairs.push((name.to_string(), value)),
        }
    }

    /// Set `name` only when `value` is present.
    pub fn set_opt<T: Display>(&mut self, name: &str, value: Option<T>) {
        if let Some(value) = value {
            self.set(name, value);
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        if name == "format" {
            return Some(self.format.as_str());
        }
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Name/value pairs ready for query-string encoding, `format` first.
    pub fn to_pairs(&self) -> Vec<(&str, &str)> {
        std::iter::once(("format", self.format.as_str()))
            .chain(
                self.pairs
                    .iter()
                    .map(|(key, value)| (key.as_str(), value.as_str())),
            )
            .collect()
    }
}
