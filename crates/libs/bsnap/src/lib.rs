//! Build-info snapshots.
//!
//! Captures identity, timing, result, environment and the optional reports
//! attached to a single build execution into a [`BuildSnapshot`], and renders
//! it as a JSON document for log shipping.
//!
//! # Usage
//!
//! ```rust
//! use bsnap::{BuildSnapshot, DateFormatter, host::recorded::RecordedBuild};
//! use chrono::Utc;
//!
//! let build = RecordedBuild::from_json(r#"{
//!     "id": "42",
//!     "project": { "name": "my-job", "fullName": "folder/my-job" },
//!     "number": 42,
//!     "startTime": "2024-05-01T10:00:00Z",
//!     "environment": { "BRANCH": "main" }
//! }"#).unwrap();
//!
//! let mut snapshot = BuildSnapshot::direct(&build, Utc::now(), &DateFormatter::default());
//! // Later, once more reports are attached to the build:
//! snapshot.update_result(&build);
//! println!("{}", snapshot.to_json_string().unwrap());
//! ```

pub mod build_info;
pub mod error;
pub mod formatter;
pub mod host;
pub mod payload;
pub mod prelude;
pub mod report;
pub mod set_once;

pub use build_info::BuildSnapshot;
pub use formatter::DateFormatter;
pub use payload::LogPayload;
