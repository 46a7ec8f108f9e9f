use crate::ids;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Stable schema identifier for polcheck reports.
pub const SCHEMA_REPORT_V1: &str = "polcheck.report.v1";

/// Aggregate outcome of one policy check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CheckVerdict {
    Success,
    Fail,
    NotApplicable,
}

impl CheckVerdict {
    /// Conventional process exit code: 0 = success, 1 = fail, 2 = not applicable.
    pub fn exit_code(self) -> i32 {
        match self {
            CheckVerdict::Success => ids::EXIT_SUCCESS,
            CheckVerdict::Fail => ids::EXIT_FAIL,
            CheckVerdict::NotApplicable => ids::EXIT_NOT_APPLICABLE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CheckVerdict::Success => "success",
            CheckVerdict::Fail => "fail",
            CheckVerdict::NotApplicable => "not_applicable",
        }
    }
}

/// Per-rule tag assigned during a check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RuleStatus {
    Passed,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// The three caller-supplied inputs of a check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CheckSubject {
    pub file_path: String,
    pub file_id: String,
    pub sip_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RuleReport {
    pub rule_id: String,
    pub command: String,
    pub status: RuleStatus,
    pub exit_code: i32,

    /// Set only when the command output was interpreted and an event recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_outcome: Option<String>,

    /// Captured stderr of a command that exited non-zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CheckReport {
    pub schema: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub subject: CheckSubject,
    pub verdict: CheckVerdict,

    /// Why the check did not apply (`file_not_found`, `no_applicable_rules`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    /// Which lookup stage produced the rules (`format` or `default`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<String>,
    #[serde(default)]
    pub rules: Vec<RuleReport>,
}
