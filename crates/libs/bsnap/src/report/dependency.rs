//! Maven dependency summary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::SubReport;
use crate::host::{
    Action, ActionKind,
    action::{MavenArtifact, MavenDependency},
};

/// Artifacts and job relations of a Maven build.
///
/// Everything is copied out of the host report, so later changes on the host
/// side never leak into a captured snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencySummary {
    pub deployed_artifacts: Vec<MavenArtifact>,
    pub generated_artifacts: Vec<MavenArtifact>,
    pub downstream_jobs: Vec<String>,
    pub upstream_jobs: Vec<String>,
    pub dependencies: Vec<MavenDependency>,
    /// Keyed by [`MavenArtifact::id`].
    pub downstream_jobs_by_artifact: BTreeMap<String, Vec<String>>,
}

impl SubReport for DependencySummary {
    const KIND: ActionKind = ActionKind::Dependency;

    fn from_action(action: Option<&Action>) -> Self {
        let Some(Action::Dependency(report)) = action else {
            return Self::default();
        };

        let mut downstream_jobs_by_artifact: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for entry in &report.downstream_jobs_by_artifact {
            downstream_jobs_by_artifact
                .entry(entry.artifact.id())
                .or_default()
                .extend(entry.jobs.iter().cloned());
        }

        Self {
            deployed_artifacts: report.deployed_artifacts.clone(),
            generated_artifacts: report.generated_artifacts.clone(),
            downstream_jobs: report.downstream_jobs.clone(),
            upstream_jobs: report.upstream_builds.clone(),
            dependencies: report.dependencies.clone(),
            downstream_jobs_by_artifact,
        }
    }
}
