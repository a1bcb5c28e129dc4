//! Container image summary.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::SubReport;
use crate::host::{Action, ActionKind};

/// Container images associated with a build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageFingerprintSummary {
    #[serde(rename = "imageIDs")]
    pub image_ids: BTreeSet<String>,
}

impl SubReport for ImageFingerprintSummary {
    const KIND: ActionKind = ActionKind::ImageFingerprint;

    fn from_action(action: Option<&Action>) -> Self {
        match action {
            Some(Action::ImageFingerprint(report)) => Self {
                image_ids: report.image_ids.clone(),
            },
            _ => Self::default(),
        }
    }
}
