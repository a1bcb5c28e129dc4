//! In-memory host build, usually loaded from a JSON recording.

use std::{collections::BTreeSet, path::Path};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    Action, ActionKind, Build, BuildResult, DirectBuild, EnvVars, EnvironmentContributor,
    Executor, Node, Project,
};
use crate::prelude::*;

/// A node as recorded by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedNode {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub label_string: String,
}

/// An executor as recorded by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedExecutor {
    #[serde(default)]
    pub node: Option<RecordedNode>,
}

/// A fixed set of variables contributed to the build environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedEnvironment {
    #[serde(default)]
    pub vars: EnvVars,
}

/// A complete build as recorded by the host.
///
/// Missing optional fields default to "not available": no executor, no
/// reports, no trigger chain. A missing `environment` models a host that
/// fails to resolve the environment of the build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedBuild {
    pub id: String,
    pub project: Project,
    /// Defaults to `#<number>`.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Defaults to `<project full name> #<number>`.
    #[serde(default)]
    pub full_display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Defaults to `job/<project full name>/<number>/`.
    #[serde(default)]
    pub url: Option<String>,
    pub number: i32,
    pub start_time: DateTime<Utc>,
    /// Scheduling time, defaults to `start_time`.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub result: Option<BuildResult>,
    #[serde(default)]
    pub executor: Option<RecordedExecutor>,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub environment: Option<EnvVars>,
    #[serde(default)]
    pub build_variables: EnvVars,
    #[serde(default)]
    pub sensitive_build_variables: BTreeSet<String>,
    #[serde(default)]
    pub environments: Vec<Option<RecordedEnvironment>>,
    #[serde(default)]
    pub parent: Option<Box<RecordedBuild>>,
}

impl RecordedBuild {
    /// A running build with no executor, reports or environment.
    pub fn new(
        id: impl Into<String>,
        project: Project,
        number: i32,
        start_time: DateTime<Utc>,
    ) -> Self {
        let display_name = format!("#{}", number);
        let full_display_name = format!("{} {}", project.full_name, display_name);
        let url = format!("job/{}/{}/", project.full_name, number);
        Self {
            id: id.into(),
            project,
            display_name: Some(display_name),
            full_display_name: Some(full_display_name),
            description: None,
            url: Some(url),
            number,
            start_time,
            timestamp: None,
            result: None,
            executor: None,
            actions: Vec::new(),
            environment: None,
            build_variables: EnvVars::new(),
            sensitive_build_variables: BTreeSet::new(),
            environments: Vec::new(),
            parent: None,
        }
    }

    /// Load a recorded build from a JSON file.
    pub fn from_file(file_path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(file_path)?;
        Self::from_json(&contents)
    }

    /// Parse a recorded build from a JSON string.
    pub fn from_json(value: &str) -> Result<Self> {
        let mut build: Self = serde_json::from_str(value)?;
        build.fill_defaults();
        Ok(build)
    }

    fn fill_defaults(&mut self) {
        let display_name = self
            .display_name
            .get_or_insert_with(|| format!("#{}", self.number))
            .clone();
        if self.full_display_name.is_none() {
            self.full_display_name = Some(format!("{} {}", self.project.full_name, display_name));
        }
        if self.url.is_none() {
            self.url = Some(format!("job/{}/{}/", self.project.full_name, self.number));
        }
        if let Some(parent) = self.parent.as_mut() {
            parent.fill_defaults();
        }
    }

    /// Attach a report, replacing any report of the same kind.
    pub fn attach(&mut self, action: Action) {
        if let Some(kind) = action.kind() {
            self.actions.retain(|existing| existing.kind() != Some(kind));
        }
        self.actions.push(action);
    }
}

impl Node for RecordedNode {
    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn label_string(&self) -> &str {
        &self.label_string
    }
}

impl Executor for RecordedExecutor {
    fn node(&self) -> Option<&dyn Node> {
        self.node.as_ref().map(|node| node as &dyn Node)
    }
}

impl EnvironmentContributor for RecordedEnvironment {
    fn build_env_vars(&self, env: &mut EnvVars) {
        env.extend(self.vars.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
}

impl Build for RecordedBuild {
    fn id(&self) -> &str {
        &self.id
    }

    fn project(&self) -> &Project {
        &self.project
    }

    fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or_default()
    }

    fn full_display_name(&self) -> &str {
        self.full_display_name.as_deref().unwrap_or_default()
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn url(&self) -> &str {
        self.url.as_deref().unwrap_or_default()
    }

    fn number(&self) -> i32 {
        self.number
    }

    fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp.unwrap_or(self.start_time)
    }

    fn result(&self) -> Option<BuildResult> {
        self.result
    }

    fn executor(&self) -> Option<&dyn Executor> {
        self.executor
            .as_ref()
            .map(|executor| executor as &dyn Executor)
    }

    fn action(&self, kind: ActionKind) -> Option<&Action> {
        self.actions
            .iter()
            .find(|action| action.kind() == Some(kind))
    }

    fn environment(&self) -> Result<EnvVars> {
        self.environment.clone().ok_or_else(|| {
            Error::Host(format!(
                "environment of {} is unavailable",
                self.full_display_name()
            ))
        })
    }

    fn sensitive_build_variables(&self) -> BTreeSet<String> {
        self.sensitive_build_variables.clone()
    }
}

impl DirectBuild for RecordedBuild {
    fn parent(&self) -> Option<&dyn DirectBuild> {
        self.parent
            .as_deref()
            .map(|parent| parent as &dyn DirectBuild)
    }

    fn build_variables(&self) -> EnvVars {
        self.build_variables.clone()
    }

    fn environments(&self) -> Vec<Option<&dyn EnvironmentContributor>> {
        self.environments
            .iter()
            .map(|env| env.as_ref().map(|env| env as &dyn EnvironmentContributor))
            .collect()
    }
}
