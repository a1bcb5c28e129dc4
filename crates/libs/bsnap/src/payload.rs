//! Envelope a snapshot is shipped in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{build_info::BuildSnapshot, formatter::DateFormatter, prelude::*};

/// Schema version of [`LogPayload`].
pub const PAYLOAD_VERSION: u32 = 1;

/// A snapshot wrapped together with log lines for a downstream indexer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogPayload {
    pub data: BuildSnapshot,
    pub message: Vec<String>,
    /// Kind of system emitting the payload, e.g. `ci`.
    pub source: String,
    /// Base URL of the emitting system.
    pub source_host: String,
    /// When the payload was produced.
    #[serde(rename = "@timestamp")]
    pub timestamp: String,
    /// When the build was scheduled, copied from the snapshot.
    #[serde(rename = "@buildTimestamp")]
    pub build_timestamp: String,
    #[serde(rename = "@version")]
    pub version: u32,
}

impl LogPayload {
    pub fn new(
        data: BuildSnapshot,
        message: Vec<String>,
        source: impl Into<String>,
        source_host: impl Into<String>,
        current_time: DateTime<Utc>,
        formatter: &DateFormatter,
    ) -> Self {
        Self {
            build_timestamp: data.timestamp.clone(),
            data,
            message,
            source: source.into(),
            source_host: source_host.into(),
            timestamp: formatter.format(&current_time),
            version: PAYLOAD_VERSION,
        }
    }

    /// Render the payload as a compact JSON document.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
