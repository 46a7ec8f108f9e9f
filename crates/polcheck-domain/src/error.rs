use thiserror::Error;

/// Conditions that abort a check. None of them is a policy verdict: they report a defect in the
/// tooling or its collaborators and must not be confused with a failed check.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("rule {rule_id} ({command}) produced malformed output: {reason}")]
    MalformedOutput {
        rule_id: String,
        command: String,
        reason: String,
    },

    #[error("repository lookup failed")]
    Repository(#[source] anyhow::Error),

    #[error("failed to run command for rule {rule_id}")]
    Process {
        rule_id: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to record event for rule {rule_id}")]
    EventStore {
        rule_id: String,
        #[source]
        source: anyhow::Error,
    },
}

impl CheckError {
    pub fn is_malformed_output(&self) -> bool {
        matches!(self, CheckError::MalformedOutput { .. })
    }
}
