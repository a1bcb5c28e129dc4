//! Source control summary.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::SubReport;
use crate::host::{Action, ActionKind};

/// SCM name, remotes and checked out revision of a build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceControlSummary {
    pub scm_name: Option<String>,
    /// Commit of the last recorded build, `None` when it cannot be resolved.
    pub revision: Option<String>,
    pub remote_urls: BTreeSet<String>,
}

impl SubReport for SourceControlSummary {
    const KIND: ActionKind = ActionKind::SourceControl;

    fn from_action(action: Option<&Action>) -> Self {
        let Some(Action::SourceControl(data)) = action else {
            return Self::default();
        };

        let revision = data
            .last_build
            .as_ref()
            .and_then(|build| build.revision.as_ref())
            .map(|revision| revision.sha1.clone());
        if revision.is_none() {
            debug!("No revision recorded for the last git build");
        }

        Self {
            scm_name: data.scm_name.clone(),
            revision,
            remote_urls: data.remote_urls.clone(),
        }
    }
}
