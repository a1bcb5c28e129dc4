//! Summaries of the optional reports attached to a build.
//!
//! Every summary is built from an `Option<&Action>`. A missing handle and a
//! handle of another kind both produce the summary's empty value, so callers
//! never have to special-case absent reports.

pub mod dependency;
pub mod image_fingerprint;
pub mod source_control;
pub mod test_summary;

use serde::{Serialize, de::DeserializeOwned};

use crate::host::{Action, ActionKind};

pub use dependency::DependencySummary;
pub use image_fingerprint::ImageFingerprintSummary;
pub use source_control::SourceControlSummary;
pub use test_summary::{FailedTest, TestSummary};

/// A summary extracted from one kind of build report.
pub trait SubReport: Default + Serialize + DeserializeOwned {
    /// The report kind this summary reads.
    const KIND: ActionKind;

    /// Summarize `action`, degrading to [`Default`] when it is absent or of
    /// another kind.
    fn from_action(action: Option<&Action>) -> Self;
}
