//! Snapshot of a single build execution.
//!
//! A [`BuildSnapshot`] is captured once, when a build starts or completes, and
//! enriched with [`BuildSnapshot::update_result`] as the build progresses.
//! Enrichment only ever fills fields that are still empty.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    formatter::DateFormatter,
    host::{Build, BuildResult, DirectBuild, EnvVars, Executor},
    prelude::*,
    report::{
        DependencySummary, ImageFingerprintSummary, SourceControlSummary, SubReport, TestSummary,
    },
    set_once::SetOnce,
};

/// Host and label reported when a build has no node to run on.
pub const MASTER: &str = "master";

/// Build identity, timing, environment and reports, ready to be shipped as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildSnapshot {
    pub id: String,
    #[serde(default)]
    result: SetOnce<BuildResult>,
    pub project_name: String,
    pub full_project_name: String,
    pub display_name: String,
    pub full_display_name: String,
    pub description: Option<String>,
    pub url: String,
    pub build_host: String,
    pub build_label: String,
    pub build_num: i32,
    /// Milliseconds between the build start and the capture time.
    pub build_duration: i64,
    pub timestamp: String,
    pub root_project_name: String,
    pub root_full_project_name: String,
    pub root_project_display_name: String,
    pub root_build_num: i32,
    /// Build environment, without any sensitive variable.
    pub build_variables: EnvVars,
    /// Names of the variables withheld from `build_variables`.
    pub sensitive_build_variables: BTreeSet<String>,
    #[serde(default)]
    test_results: SetOnce<TestSummary>,
    #[serde(default)]
    git_info: SetOnce<SourceControlSummary>,
    #[serde(default)]
    maven_info: SetOnce<DependencySummary>,
    #[serde(default)]
    docker_info: SetOnce<ImageFingerprintSummary>,
}

impl BuildSnapshot {
    /// Capture a build running directly on an executor.
    ///
    /// Root fields come from the top of the trigger chain. The environment is
    /// the build's own variables, then each contributor, then the resolved
    /// environment of the build; sensitive names are dropped last.
    pub fn direct(
        build: &dyn DirectBuild,
        current_time: DateTime<Utc>,
        formatter: &DateFormatter,
    ) -> Self {
        let mut snapshot = Self::capture(build, current_time, formatter);

        let root = root_build(build);
        snapshot.root_project_name = root.project().name.clone();
        snapshot.root_full_project_name = root.project().full_name.clone();
        snapshot.root_project_display_name = root.display_name().to_string();
        snapshot.root_build_num = root.number();

        let mut variables = build.build_variables();
        let mut contributed = EnvVars::new();
        for environment in build.environments().into_iter().flatten() {
            environment.build_env_vars(&mut contributed);
            // Moves every entry over, leaving `contributed` empty for the next one.
            variables.append(&mut contributed);
        }
        match build.environment() {
            Ok(mut environment) => variables.append(&mut environment),
            Err(e) => warn!(
                "Unable to update buildVariables with the environment of {}: {}",
                build.display_name(),
                e
            ),
        }

        snapshot.apply_environment(variables, build.sensitive_build_variables());
        snapshot
    }

    /// Capture a build that is not bound to an executor, e.g. a pipeline run.
    ///
    /// Root fields are the build's own identity.
    pub fn delegated<B: Build + ?Sized>(
        build: &B,
        current_time: DateTime<Utc>,
        formatter: &DateFormatter,
    ) -> Self {
        let mut snapshot = Self::capture(build, current_time, formatter);

        let variables = match build.environment() {
            Ok(environment) => environment,
            Err(e) => {
                warn!(
                    "Unable to get the environment of {}: {}",
                    build.display_name(),
                    e
                );
                EnvVars::new()
            }
        };

        snapshot.apply_environment(variables, build.sensitive_build_variables());
        snapshot
    }

    fn capture<B: Build + ?Sized>(
        build: &B,
        current_time: DateTime<Utc>,
        formatter: &DateFormatter,
    ) -> Self {
        let (build_host, build_label) = node_identity(build.executor());
        let project = build.project();

        let mut snapshot = Self {
            id: build.id().to_string(),
            result: SetOnce::new(),
            project_name: project.name.clone(),
            full_project_name: project.full_name.clone(),
            display_name: build.display_name().to_string(),
            full_display_name: build.full_display_name().to_string(),
            description: build.description().map(String::from),
            url: build.url().to_string(),
            build_host,
            build_label,
            build_num: build.number(),
            build_duration: (current_time - build.start_time()).num_milliseconds(),
            timestamp: formatter.format(&build.timestamp()),
            root_project_name: project.name.clone(),
            root_full_project_name: project.full_name.clone(),
            root_project_display_name: build.display_name().to_string(),
            root_build_num: build.number(),
            build_variables: EnvVars::new(),
            sensitive_build_variables: BTreeSet::new(),
            test_results: SetOnce::new(),
            git_info: SetOnce::new(),
            maven_info: SetOnce::new(),
            docker_info: SetOnce::new(),
        };
        snapshot.update_result(build);
        snapshot
    }

    fn apply_environment(&mut self, mut variables: EnvVars, sensitive: BTreeSet<String>) {
        for name in &sensitive {
            variables.remove(name);
        }
        self.build_variables = variables;
        self.sensitive_build_variables = sensitive;
    }

    /// Fill in whatever the build has produced since the last call.
    ///
    /// Sets the result once the host reports one and summarizes every report
    /// kind that was not captured yet. Values already captured are kept.
    pub fn update_result<B: Build + ?Sized>(&mut self, build: &B) {
        if self.result.fill_with(|| build.result()) {
            debug!("Captured result of {}", self.full_display_name);
        }
        fill_report(&mut self.test_results, build);
        fill_report(&mut self.git_info, build);
        fill_report(&mut self.maven_info, build);
        fill_report(&mut self.docker_info, build);
    }

    pub fn result(&self) -> Option<BuildResult> {
        self.result.get().copied()
    }

    /// Overwrite the result, bypassing first-write-wins.
    pub fn set_result(&mut self, result: BuildResult) {
        self.result.replace(Some(result));
    }

    pub fn test_results(&self) -> Option<&TestSummary> {
        self.test_results.get()
    }

    pub fn set_test_results(&mut self, test_results: Option<TestSummary>) {
        self.test_results.replace(test_results);
    }

    pub fn git_info(&self) -> Option<&SourceControlSummary> {
        self.git_info.get()
    }

    pub fn maven_info(&self) -> Option<&DependencySummary> {
        self.maven_info.get()
    }

    pub fn docker_info(&self) -> Option<&ImageFingerprintSummary> {
        self.docker_info.get()
    }

    /// Render the snapshot as a JSON value.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Render the snapshot as a compact JSON document.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a snapshot back from its JSON document.
    pub fn from_json(value: &str) -> Result<Self> {
        Ok(serde_json::from_str(value)?)
    }
}

fn fill_report<R, B>(slot: &mut SetOnce<R>, build: &B)
where
    R: SubReport,
    B: Build + ?Sized,
{
    let filled = slot.fill_with(|| {
        build
            .action(R::KIND)
            .map(|action| R::from_action(Some(action)))
    });
    if filled {
        debug!("Captured {:?} report of {}", R::KIND, build.full_display_name());
    }
}

fn root_build(build: &dyn DirectBuild) -> &dyn DirectBuild {
    let mut root = build;
    while let Some(parent) = root.parent() {
        root = parent;
    }
    root
}

fn node_identity(executor: Option<&dyn Executor>) -> (String, String) {
    match executor.and_then(|executor| executor.node()) {
        Some(node) => (
            non_blank_or_master(node.display_name()),
            non_blank_or_master(node.label_string()),
        ),
        None => (String::from(MASTER), String::from(MASTER)),
    }
}

fn non_blank_or_master(value: &str) -> String {
    if value.trim().is_empty() {
        String::from(MASTER)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{
        Action, Project,
        action::{CaseResult, GitBuild, GitBuildData, Revision, TestResultAction},
        recorded::{RecordedBuild, RecordedEnvironment, RecordedExecutor, RecordedNode},
    };
    use chrono::{Duration, TimeZone};
    use tracing_test::traced_test;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
    }

    fn build(id: &str, number: i32) -> RecordedBuild {
        let mut build =
            RecordedBuild::new(id, Project::new("my-job", "folder/my-job"), number, start());
        build.environment = Some(EnvVars::from([(
            String::from("BRANCH"),
            String::from("main"),
        )]));
        build
    }

    fn vars(pairs: &[(&str, &str)]) -> EnvVars {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn tests_action(total: i32) -> Action {
        Action::TestResults(TestResultAction {
            total_count: total,
            skip_count: 0,
            fail_count: 1,
            failed_tests: vec![CaseResult {
                full_name: String::from("app.Test.broken"),
                error_details: None,
            }],
        })
    }

    #[test]
    fn identity_and_timing() {
        let build = build("42", 42);
        let now = start() + Duration::milliseconds(12345);
        let snapshot = BuildSnapshot::delegated(&build, now, &DateFormatter::default());

        assert_eq!(snapshot.id, "42");
        assert_eq!(snapshot.project_name, "my-job");
        assert_eq!(snapshot.full_project_name, "folder/my-job");
        assert_eq!(snapshot.display_name, "#42");
        assert_eq!(snapshot.full_display_name, "folder/my-job #42");
        assert_eq!(snapshot.url, "job/folder/my-job/42/");
        assert_eq!(snapshot.build_num, 42);
        assert_eq!(snapshot.build_duration, 12345);
        assert_eq!(snapshot.timestamp, "2024-05-01T10:00:00.000+0000");
        assert_eq!(snapshot.result(), None);
    }

    #[test]
    fn no_executor_runs_on_master() {
        let snapshot = BuildSnapshot::direct(&build("7", 7), start(), &DateFormatter::default());
        assert_eq!(snapshot.build_host, MASTER);
        assert_eq!(snapshot.build_label, MASTER);
    }

    #[test]
    fn executor_without_node_runs_on_master() {
        let mut build = build("7", 7);
        build.executor = Some(RecordedExecutor { node: None });
        let snapshot = BuildSnapshot::direct(&build, start(), &DateFormatter::default());
        assert_eq!(snapshot.build_host, MASTER);
        assert_eq!(snapshot.build_label, MASTER);
    }

    #[test]
    fn blank_node_fields_fall_back_to_master() {
        let mut build = build("7", 7);
        build.executor = Some(RecordedExecutor {
            node: Some(RecordedNode {
                display_name: String::from("agent-3"),
                label_string: String::from("   "),
            }),
        });
        let snapshot = BuildSnapshot::direct(&build, start(), &DateFormatter::default());
        assert_eq!(snapshot.build_host, "agent-3");
        assert_eq!(snapshot.build_label, MASTER);
    }

    #[test]
    fn root_is_top_of_trigger_chain() {
        let mut grand_parent = build("1", 1);
        grand_parent.project = Project::new("release", "ops/release");
        let mut parent = build("5", 5);
        parent.parent = Some(Box::new(grand_parent));
        let mut child = build("9", 9);
        child.parent = Some(Box::new(parent));

        let snapshot = BuildSnapshot::direct(&child, start(), &DateFormatter::default());
        assert_eq!(snapshot.root_project_name, "release");
        assert_eq!(snapshot.root_full_project_name, "ops/release");
        assert_eq!(snapshot.root_project_display_name, "#1");
        assert_eq!(snapshot.root_build_num, 1);
    }

    #[test]
    fn top_level_build_is_its_own_root() {
        let build = build("3", 3);
        for snapshot in [
            BuildSnapshot::direct(&build, start(), &DateFormatter::default()),
            BuildSnapshot::delegated(&build, start(), &DateFormatter::default()),
        ] {
            assert_eq!(snapshot.root_project_name, snapshot.project_name);
            assert_eq!(snapshot.root_full_project_name, snapshot.full_project_name);
            assert_eq!(snapshot.root_project_display_name, snapshot.display_name);
            assert_eq!(snapshot.root_build_num, snapshot.build_num);
        }
    }

    #[test]
    fn delegated_root_ignores_parent() {
        let mut build = build("4", 4);
        build.parent = Some(Box::new(self::build("2", 2)));
        let snapshot = BuildSnapshot::delegated(&build, start(), &DateFormatter::default());
        assert_eq!(snapshot.root_build_num, 4);
    }

    #[test]
    fn direct_environment_merge_order() {
        let mut build = build("8", 8);
        build.build_variables = vars(&[("PARAM", "declared"), ("MODE", "declared")]);
        build.environments = vec![
            Some(RecordedEnvironment {
                vars: vars(&[("MODE", "first"), ("TOOL", "gcc")]),
            }),
            None,
            Some(RecordedEnvironment {
                vars: vars(&[("MODE", "second")]),
            }),
        ];
        build.environment = Some(vars(&[("TOOL", "clang"), ("BRANCH", "main")]));

        let snapshot = BuildSnapshot::direct(&build, start(), &DateFormatter::default());
        assert_eq!(
            snapshot.build_variables,
            vars(&[
                ("BRANCH", "main"),
                ("MODE", "second"),
                ("PARAM", "declared"),
                ("TOOL", "clang"),
            ])
        );
    }

    #[test]
    fn sensitive_names_are_removed_from_every_source() {
        let mut build = build("8", 8);
        build.sensitive_build_variables =
            BTreeSet::from([String::from("TOKEN"), String::from("PASSWORD")]);
        build.build_variables = vars(&[("TOKEN", "declared-secret")]);
        build.environments = vec![Some(RecordedEnvironment {
            vars: vars(&[("PASSWORD", "contributed-secret")]),
        })];
        build.environment = Some(vars(&[("TOKEN", "global-secret"), ("BRANCH", "main")]));

        for snapshot in [
            BuildSnapshot::direct(&build, start(), &DateFormatter::default()),
            BuildSnapshot::delegated(&build, start(), &DateFormatter::default()),
        ] {
            assert!(!snapshot.build_variables.contains_key("TOKEN"));
            assert!(!snapshot.build_variables.contains_key("PASSWORD"));
            assert_eq!(snapshot.build_variables.get("BRANCH").map(String::as_str), Some("main"));
        }
    }

    #[test]
    #[traced_test]
    fn direct_environment_failure_keeps_merged_variables() {
        let mut build = build("11", 11);
        build.environment = None;
        build.build_variables = vars(&[("PARAM", "1")]);
        build.environments = vec![Some(RecordedEnvironment {
            vars: vars(&[("TOOL", "gcc")]),
        })];

        let snapshot = BuildSnapshot::direct(&build, start(), &DateFormatter::default());
        assert_eq!(snapshot.build_variables, vars(&[("PARAM", "1"), ("TOOL", "gcc")]));
        assert!(logs_contain("Unable to update buildVariables"));
        assert!(logs_contain("#11"));
    }

    #[test]
    #[traced_test]
    fn delegated_environment_failure_is_empty() {
        let mut build = build("12", 12);
        build.environment = None;
        let snapshot = BuildSnapshot::delegated(&build, start(), &DateFormatter::default());
        assert!(snapshot.build_variables.is_empty());
        assert!(logs_contain("Unable to get the environment of #12"));
    }

    #[test]
    fn result_is_first_write_wins() {
        let mut build = build("5", 5);
        let mut snapshot = BuildSnapshot::delegated(&build, start(), &DateFormatter::default());
        assert_eq!(snapshot.result(), None);

        build.result = Some(BuildResult::Unstable);
        snapshot.update_result(&build);
        build.result = Some(BuildResult::Failure);
        snapshot.update_result(&build);
        assert_eq!(snapshot.result(), Some(BuildResult::Unstable));

        snapshot.set_result(BuildResult::Aborted);
        assert_eq!(snapshot.result(), Some(BuildResult::Aborted));
    }

    #[test]
    fn reports_are_captured_once() {
        let mut build = build("6", 6);
        let mut snapshot = BuildSnapshot::delegated(&build, start(), &DateFormatter::default());
        assert!(snapshot.test_results().is_none());
        assert!(snapshot.git_info().is_none());

        build.attach(tests_action(10));
        build.attach(Action::SourceControl(GitBuildData {
            scm_name: Some(String::from("origin")),
            remote_urls: BTreeSet::new(),
            last_build: Some(GitBuild {
                build_number: 6,
                revision: Some(Revision {
                    sha1: String::from("abc123"),
                    branches: Vec::new(),
                }),
            }),
        }));
        snapshot.update_result(&build);
        assert_eq!(snapshot.test_results().map(|t| t.total_count), Some(10));
        assert_eq!(
            snapshot.git_info().and_then(|g| g.revision.as_deref()),
            Some("abc123")
        );
        assert!(snapshot.maven_info().is_none());
        assert!(snapshot.docker_info().is_none());

        build.attach(tests_action(20));
        snapshot.update_result(&build);
        assert_eq!(snapshot.test_results().map(|t| t.total_count), Some(10));
        assert_eq!(snapshot.test_results().map(|t| t.pass_count), Some(9));
    }

    #[test]
    fn update_without_changes_is_idempotent() {
        let mut build = build("2", 2);
        build.result = Some(BuildResult::Success);
        build.attach(tests_action(3));
        let mut snapshot = BuildSnapshot::delegated(&build, start(), &DateFormatter::default());
        let captured = snapshot.clone();
        snapshot.update_result(&build);
        snapshot.update_result(&build);
        assert_eq!(snapshot, captured);
    }

    #[test]
    fn absent_sections_serialize_as_null() -> Result<()> {
        let snapshot = BuildSnapshot::delegated(&build("7", 7), start(), &DateFormatter::default());
        let json = snapshot.to_json()?;
        let document = json.as_object().expect("snapshot should render as an object");
        for key in ["result", "testResults", "gitInfo", "mavenInfo", "dockerInfo", "description"] {
            assert!(document.contains_key(key), "{} should be present", key);
            assert!(document[key].is_null(), "{} should be null", key);
        }
        assert_eq!(json["buildVariables"]["BRANCH"], "main");
        assert_eq!(json["sensitiveBuildVariables"], serde_json::json!([]));
        Ok(())
    }

    #[test]
    fn round_trip() -> Result<()> {
        let mut build = build("13", 13);
        build.result = Some(BuildResult::Success);
        build.description = Some(String::from("nightly"));
        build.attach(tests_action(4));
        let snapshot = BuildSnapshot::delegated(&build, start(), &DateFormatter::default());
        let parsed = BuildSnapshot::from_json(&snapshot.to_json_string()?)?;
        assert_eq!(parsed, snapshot);
        Ok(())
    }
}
