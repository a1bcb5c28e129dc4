//! Interfaces to the build-orchestration host.
//!
//! The snapshot never talks to a host directly: it reads a build through the
//! [`Build`] trait (and [`DirectBuild`] when the build is bound to an executor).
//! [`recorded::RecordedBuild`] is an in-memory implementation of both.

pub mod action;
pub mod recorded;

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::prelude::*;

pub use action::{Action, ActionKind};

/// Environment variable name to value.
pub type EnvVars = BTreeMap<String, String>;

/// Outcome of a finished build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildResult {
    /// Build completed without errors.
    Success,
    /// Build completed but some checks (usually tests) failed.
    Unstable,
    /// Build failed.
    Failure,
    /// Build was never executed, e.g. skipped by a multi-stage job.
    NotBuilt,
    /// Build was interrupted.
    Aborted,
}

/// Job a build belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Short job name.
    pub name: String,
    /// Hierarchical job name, including enclosing folders.
    pub full_name: String,
}

impl Project {
    pub fn new(name: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            full_name: full_name.into(),
        }
    }
}

/// Machine a build is executed on.
pub trait Node {
    fn display_name(&self) -> &str;
    fn label_string(&self) -> &str;
}

/// Execution slot running a build.
pub trait Executor {
    /// The node owning this executor. `None` once the node went offline.
    fn node(&self) -> Option<&dyn Node>;
}

/// Something that adds variables to a build environment.
pub trait EnvironmentContributor {
    fn build_env_vars(&self, env: &mut EnvVars);
}

/// A build as exposed by the host.
pub trait Build {
    fn id(&self) -> &str;
    fn project(&self) -> &Project;
    fn display_name(&self) -> &str;
    fn full_display_name(&self) -> &str;
    fn description(&self) -> Option<&str>;
    fn url(&self) -> &str;
    fn number(&self) -> i32;
    /// When the build actually started running.
    fn start_time(&self) -> DateTime<Utc>;
    /// When the build was scheduled.
    fn timestamp(&self) -> DateTime<Utc>;
    /// `None` while the build is still running.
    fn result(&self) -> Option<BuildResult>;
    /// `None` when the build is not bound to an executor.
    fn executor(&self) -> Option<&dyn Executor>;
    /// The report of the given kind attached to this build, if any.
    fn action(&self, kind: ActionKind) -> Option<&Action>;
    /// Resolve the complete environment of this build.
    fn environment(&self) -> Result<EnvVars>;
    /// Variable names whose values must never leave the host.
    fn sensitive_build_variables(&self) -> BTreeSet<String> {
        BTreeSet::new()
    }
}

/// A build executed directly on an executor, with its own variables,
/// environment contributors and trigger chain.
pub trait DirectBuild: Build {
    /// The build that triggered this one, if any.
    fn parent(&self) -> Option<&dyn DirectBuild>;
    /// Variables declared on the build itself (parameters and the like).
    fn build_variables(&self) -> EnvVars;
    /// Contributors in application order. `None` entries are skipped.
    fn environments(&self) -> Vec<Option<&dyn EnvironmentContributor>>;
}

impl fmt::Display for BuildResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuildResult::Success => "SUCCESS",
            BuildResult::Unstable => "UNSTABLE",
            BuildResult::Failure => "FAILURE",
            BuildResult::NotBuilt => "NOT_BUILT",
            BuildResult::Aborted => "ABORTED",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_result_wire_names() -> Result<()> {
        for result in [
            BuildResult::Success,
            BuildResult::Unstable,
            BuildResult::Failure,
            BuildResult::NotBuilt,
            BuildResult::Aborted,
        ] {
            let json = serde_json::to_string(&result)?;
            assert_eq!(json, format!("\"{}\"", result));
            assert_eq!(serde_json::from_str::<BuildResult>(&json)?, result);
        }
        Ok(())
    }
}
