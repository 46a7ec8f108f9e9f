//! Rule selection: which active rules apply to a file.
//!
//! Selection is an explicit two-stage lookup:
//! 1. rules scoped to the file's active format for its purpose;
//! 2. if there is no active format, or stage 1 found nothing, the `default_<purpose>` rules.
//!
//! An empty selection is not an error; it means no policy applies to the file.

use crate::model::{FileRecord, FormatVersion, Purpose, Rule};
use crate::ports::{FileRepository, RuleRepository};
use thiserror::Error;
use tracing::{debug, info};

/// Which stage of the lookup produced the rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionStage {
    FormatSpecific,
    Default,
    /// Neither stage matched anything.
    Empty,
}

impl SelectionStage {
    pub fn as_str(self) -> &'static str {
        match self {
            SelectionStage::FormatSpecific => "format",
            SelectionStage::Default => "default",
            SelectionStage::Empty => "none",
        }
    }
}

#[derive(Clone, Debug)]
pub struct RuleSelection {
    pub file: FileRecord,
    pub purpose: Purpose,
    pub format: Option<FormatVersion>,
    pub stage: SelectionStage,
    /// Sorted by rule id so audit events are written in a stable order.
    pub rules: Vec<Rule>,
}

impl RuleSelection {
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum SelectError {
    #[error("no file with id {0}")]
    NotFound(String),

    #[error("repository lookup failed")]
    Repository(#[source] anyhow::Error),
}

pub fn select_rules(
    file_id: &str,
    files: &dyn FileRepository,
    rules: &dyn RuleRepository,
) -> Result<RuleSelection, SelectError> {
    let file = files
        .find_file(file_id)
        .map_err(SelectError::Repository)?
        .ok_or_else(|| SelectError::NotFound(file_id.to_string()))?;

    let purpose = Purpose::for_role(file.role);
    info!(file_id, purpose = purpose.as_str(), "selecting policy rules");

    let format = files
        .active_format(file_id)
        .map_err(SelectError::Repository)?;

    let mut stage = SelectionStage::Empty;
    let mut selected: Vec<Rule> = Vec::new();

    match &format {
        Some(fmt) => {
            debug!(format_id = %fmt.id, description = ?fmt.description, "file has active format");
            selected = only_enabled(
                rules
                    .active_rules_for_format(&fmt.id, purpose)
                    .map_err(SelectError::Repository)?,
            );
            if selected.is_empty() {
                info!(
                    format_id = %fmt.id,
                    purpose = purpose.as_str(),
                    "no rules for format and purpose"
                );
            } else {
                stage = SelectionStage::FormatSpecific;
            }
        }
        None => info!(file_id, "file has no active format identification"),
    }

    if selected.is_empty() {
        let fallback = purpose.default_fallback();
        selected = only_enabled(
            rules
                .active_rules_for_purpose(fallback)
                .map_err(SelectError::Repository)?,
        );
        if !selected.is_empty() {
            stage = SelectionStage::Default;
        }
    }

    selected.sort_by(|a, b| a.id.cmp(&b.id));

    Ok(RuleSelection {
        file,
        purpose,
        format,
        stage,
        rules: selected,
    })
}

// Inactive rules never apply, whatever the repository hands back.
fn only_enabled(mut rules: Vec<Rule>) -> Vec<Rule> {
    rules.retain(|r| r.enabled);
    rules
}
