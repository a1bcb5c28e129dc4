//! Timestamp rendering for snapshots.

use chrono::{
    DateTime, Utc,
    format::{Item, StrftimeItems},
};

use crate::prelude::*;

/// ISO 8601 with milliseconds and numeric offset, e.g. `2024-05-01T10:00:00.000+0000`.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Renders instants with a `strftime` pattern validated up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormatter {
    pattern: String,
}

impl DateFormatter {
    /// Create a formatter, rejecting patterns chrono cannot render.
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
            return Err(Error::InvalidDateFormat(pattern));
        }
        Ok(Self { pattern })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn format(&self, instant: &DateTime<Utc>) -> String {
        instant.format(&self.pattern).to_string()
    }
}

impl Default for DateFormatter {
    fn default() -> Self {
        Self {
            pattern: String::from(DEFAULT_DATE_FORMAT),
        }
    }
}
