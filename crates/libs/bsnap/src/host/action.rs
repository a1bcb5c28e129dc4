//! Reports the host attaches to a build.
//!
//! The host hands reports out as a closed set of [`Action`] variants. A report
//! kind this crate cannot read is kept as [`Action::Unknown`] and never matches
//! any [`ActionKind`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// The report kinds a snapshot knows how to summarize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    TestResults,
    SourceControl,
    Dependency,
    ImageFingerprint,
}

/// A report attached to a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    /// Aggregated test results.
    TestResults(TestResultAction),
    /// Git data recorded by the checkout.
    SourceControl(GitBuildData),
    /// Maven artifacts and job dependencies.
    Dependency(MavenReport),
    /// Container images built or used by the build.
    ImageFingerprint(DockerFingerprintAction),
    /// Any other report.
    #[serde(other)]
    Unknown,
}

impl Action {
    /// The kind of report this is, `None` for reports nobody summarizes.
    pub fn kind(&self) -> Option<ActionKind> {
        match self {
            Action::TestResults(_) => Some(ActionKind::TestResults),
            Action::SourceControl(_) => Some(ActionKind::SourceControl),
            Action::Dependency(_) => Some(ActionKind::Dependency),
            Action::ImageFingerprint(_) => Some(ActionKind::ImageFingerprint),
            Action::Unknown => None,
        }
    }
}

/// Test counters and the failing cases of a build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResultAction {
    #[serde(default)]
    pub total_count: i32,
    #[serde(default)]
    pub skip_count: i32,
    #[serde(default)]
    pub fail_count: i32,
    #[serde(default)]
    pub failed_tests: Vec<CaseResult>,
}

/// A single test case outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseResult {
    /// Fully qualified test name, e.g. `com.acme.FooTest.testBar`.
    pub full_name: String,
    #[serde(default)]
    pub error_details: Option<String>,
}

/// Git data recorded for a build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitBuildData {
    #[serde(default)]
    pub scm_name: Option<String>,
    #[serde(default)]
    pub remote_urls: BTreeSet<String>,
    /// The most recent build recorded for this repository.
    #[serde(default)]
    pub last_build: Option<GitBuild>,
}

/// A build entry of the git history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitBuild {
    #[serde(default)]
    pub build_number: i32,
    #[serde(default)]
    pub revision: Option<Revision>,
}

/// A commit together with the branches pointing at it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Revision {
    pub sha1: String,
    #[serde(default)]
    pub branches: Vec<String>,
}

/// Maven artifacts produced and consumed by a build, and its job graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MavenReport {
    #[serde(default)]
    pub deployed_artifacts: Vec<MavenArtifact>,
    #[serde(default)]
    pub generated_artifacts: Vec<MavenArtifact>,
    #[serde(default)]
    pub downstream_jobs: Vec<String>,
    #[serde(default)]
    pub upstream_builds: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<MavenDependency>,
    #[serde(default)]
    pub downstream_jobs_by_artifact: Vec<ArtifactJobs>,
}

/// Jobs consuming a given artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactJobs {
    pub artifact: MavenArtifact,
    /// Full names of the consuming jobs.
    #[serde(default)]
    pub jobs: Vec<String>,
}

/// Maven coordinates of an artifact plus where it ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MavenArtifact {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    #[serde(default)]
    pub base_version: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub classifier: Option<String>,
    #[serde(default)]
    pub extension: Option<String>,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub snapshot: bool,
    #[serde(default)]
    pub repository_url: Option<String>,
}

impl MavenArtifact {
    /// `groupId:artifactId:type[:classifier]:version`, type defaulting to `jar`.
    pub fn id(&self) -> String {
        let kind = self.kind.as_deref().unwrap_or("jar");
        match self.classifier.as_deref() {
            Some(classifier) if !classifier.is_empty() => format!(
                "{}:{}:{}:{}:{}",
                self.group_id, self.artifact_id, kind, classifier, self.version
            ),
            _ => format!(
                "{}:{}:{}:{}",
                self.group_id, self.artifact_id, kind, self.version
            ),
        }
    }
}

/// An artifact the build depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MavenDependency {
    #[serde(flatten)]
    pub artifact: MavenArtifact,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub optional: bool,
}

/// Container images fingerprinted during a build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockerFingerprintAction {
    #[serde(default, rename = "imageIDs")]
    pub image_ids: BTreeSet<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(classifier: Option<&str>) -> MavenArtifact {
        MavenArtifact {
            group_id: String::from("com.acme"),
            artifact_id: String::from("core"),
            version: String::from("1.2.0"),
            base_version: None,
            kind: None,
            classifier: classifier.map(String::from),
            extension: None,
            file: None,
            snapshot: false,
            repository_url: None,
        }
    }

    #[test]
    fn artifact_id_defaults_to_jar() {
        assert_eq!(artifact(None).id(), "com.acme:core:jar:1.2.0");
        assert_eq!(artifact(Some("")).id(), "com.acme:core:jar:1.2.0");
        assert_eq!(
            artifact(Some("sources")).id(),
            "com.acme:core:jar:sources:1.2.0"
        );
    }

    #[test]
    fn unknown_reports_have_no_kind() -> Result<(), serde_json::Error> {
        let actions: Vec<Action> = serde_json::from_str(
            r#"[
                {"kind": "cause_action"},
                {"kind": "image_fingerprint", "imageIDs": ["sha256:abc"]}
            ]"#,
        )?;
        assert_eq!(actions[0], Action::Unknown);
        assert_eq!(actions[0].kind(), None);
        assert_eq!(actions[1].kind(), Some(ActionKind::ImageFingerprint));
        Ok(())
    }
}
