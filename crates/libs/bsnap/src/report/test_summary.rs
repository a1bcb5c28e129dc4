//! Test result summary.

use serde::{Deserialize, Serialize};

use super::SubReport;
use crate::host::{Action, ActionKind};

/// A failing test together with its error output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedTest {
    pub full_name: String,
    pub error_details: Option<String>,
}

/// Test counters of a build.
///
/// `pass_count` is `total_count - skip_count - fail_count` as reported, without
/// clamping, so inconsistent upstream counters show up as a negative value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSummary {
    pub total_count: i32,
    pub skip_count: i32,
    pub fail_count: i32,
    pub pass_count: i32,
    pub failed_tests_with_error_detail: Vec<FailedTest>,
    pub failed_tests: Vec<String>,
}

impl SubReport for TestSummary {
    const KIND: ActionKind = ActionKind::TestResults;

    fn from_action(action: Option<&Action>) -> Self {
        let Some(Action::TestResults(report)) = action else {
            return Self::default();
        };

        let (failed_tests, failed_tests_with_error_detail): (Vec<String>, Vec<FailedTest>) = report
            .failed_tests
            .iter()
            .map(|case| {
                (
                    case.full_name.clone(),
                    FailedTest {
                        full_name: case.full_name.clone(),
                        error_details: case.error_details.clone(),
                    },
                )
            })
            .unzip();

        Self {
            total_count: report.total_count,
            skip_count: report.skip_count,
            fail_count: report.fail_count,
            pass_count: report
                .total_count
                .wrapping_sub(report.skip_count)
                .wrapping_sub(report.fail_count),
            failed_tests_with_error_detail,
            failed_tests,
        }
    }
}
