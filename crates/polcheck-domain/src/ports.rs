//! Collaborator interfaces consumed by the check pipeline.
//!
//! All of them are synchronous. Implementations own their own storage; the pipeline never
//! mutates repository data and only appends through [`EventStore`].

use crate::invocation::Invocation;
use crate::model::{FileRecord, FormatVersion, Purpose, Rule};
use polcheck_types::EventRecord;

/// File and format identification lookups (populated upstream).
pub trait FileRepository {
    /// `Ok(None)` when no file has this id.
    fn find_file(&self, file_id: &str) -> anyhow::Result<Option<FileRecord>>;

    /// The file's currently active format identification, if any.
    fn active_format(&self, file_id: &str) -> anyhow::Result<Option<FormatVersion>>;
}

/// Administrator-configured rules and their commands. Only active rules may be returned.
pub trait RuleRepository {
    fn active_rules_for_format(
        &self,
        format_id: &str,
        purpose: Purpose,
    ) -> anyhow::Result<Vec<Rule>>;

    fn active_rules_for_purpose(&self, purpose: Purpose) -> anyhow::Result<Vec<Rule>>;
}

/// Result of running one external command to completion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Spawns a command and blocks until it terminates.
///
/// A non-zero exit is a normal [`ProcessOutput`]; `Err` is reserved for failing to run at all.
pub trait ProcessRunner {
    fn run(&self, invocation: &Invocation) -> anyhow::Result<ProcessOutput>;
}

/// Durable, append-only audit log.
pub trait EventStore {
    fn append(&self, event: &EventRecord) -> anyhow::Result<()>;
}
