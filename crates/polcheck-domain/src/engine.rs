use crate::error::CheckError;
use crate::invocation::build_invocation;
use crate::model::Purpose;
use crate::outcome::interpret;
use crate::ports::{EventStore, FileRepository, ProcessRunner, RuleRepository};
use crate::record::record_event;
use crate::select::{SelectError, SelectionStage, select_rules};
use polcheck_types::{CheckVerdict, RuleStatus, ids};
use tracing::{debug, info, warn};

/// The three inputs of a check.
#[derive(Clone, Copy, Debug)]
pub struct CheckRequest<'a> {
    pub file_path: &'a str,
    pub file_id: &'a str,
    pub sip_id: &'a str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotApplicable {
    FileNotFound,
    NoApplicableRules,
}

impl NotApplicable {
    pub fn as_str(self) -> &'static str {
        match self {
            NotApplicable::FileNotFound => ids::REASON_FILE_NOT_FOUND,
            NotApplicable::NoApplicableRules => ids::REASON_NO_APPLICABLE_RULES,
        }
    }
}

/// What happened to one selected rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleRecord {
    pub rule_id: String,
    pub command: String,
    pub status: RuleStatus,
    pub exit_code: i32,
    pub event_id: Option<String>,
    pub event_outcome: Option<String>,
    pub diagnostic: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckResult {
    pub verdict: CheckVerdict,
    pub not_applicable: Option<NotApplicable>,
    pub purpose: Option<Purpose>,
    pub stage: Option<SelectionStage>,
    pub rules: Vec<RuleRecord>,
}

impl CheckResult {
    fn not_applicable(
        reason: NotApplicable,
        purpose: Option<Purpose>,
        stage: Option<SelectionStage>,
    ) -> Self {
        Self {
            verdict: CheckVerdict::NotApplicable,
            not_applicable: Some(reason),
            purpose,
            stage,
            rules: Vec::new(),
        }
    }
}

/// Drives one policy check: select rules, run each command, interpret, record, aggregate.
///
/// Rules run strictly in selection order, each blocking until its command exits. A command that
/// exits non-zero fails its rule without an event; malformed output from a command that exited
/// zero aborts the check, leaving events already recorded in place.
pub struct PolicyChecker<'a> {
    pub files: &'a dyn FileRepository,
    pub rules: &'a dyn RuleRepository,
    pub runner: &'a dyn ProcessRunner,
    pub events: &'a dyn EventStore,
    pub validator_description: &'a str,
}

impl PolicyChecker<'_> {
    pub fn check(&self, request: CheckRequest<'_>) -> Result<CheckResult, CheckError> {
        let selection = match select_rules(request.file_id, self.files, self.rules) {
            Ok(selection) => selection,
            Err(SelectError::NotFound(_)) => {
                info!(
                    file_id = request.file_id,
                    "not performing a policy check: no such file"
                );
                return Ok(CheckResult::not_applicable(
                    NotApplicable::FileNotFound,
                    None,
                    None,
                ));
            }
            Err(SelectError::Repository(e)) => return Err(CheckError::Repository(e)),
        };

        if selection.is_empty() {
            info!(
                file_id = request.file_id,
                purpose = selection.purpose.as_str(),
                "not performing a policy check: no applicable rules"
            );
            return Ok(CheckResult::not_applicable(
                NotApplicable::NoApplicableRules,
                Some(selection.purpose),
                Some(selection.stage),
            ));
        }

        let mut records = Vec::with_capacity(selection.rules.len());
        for rule in &selection.rules {
            let invocation =
                build_invocation(rule, request.file_path, request.file_id, request.sip_id);
            info!(rule_id = %rule.id, command = %rule.command.description, "running rule");
            debug!(
                kind = invocation.kind().as_str(),
                command = invocation.command(),
                args = ?invocation.args(),
                "invocation"
            );

            let output = self
                .runner
                .run(&invocation)
                .map_err(|source| CheckError::Process {
                    rule_id: rule.id.clone(),
                    source,
                })?;

            if !output.success() {
                warn!(
                    rule_id = %rule.id,
                    command = %rule.command.description,
                    exit_code = output.exit_code,
                    stderr = %output.stderr.trim_end(),
                    "command failed"
                );
                records.push(RuleRecord {
                    rule_id: rule.id.clone(),
                    command: rule.command.description.clone(),
                    status: RuleStatus::Failed,
                    exit_code: output.exit_code,
                    event_id: None,
                    event_outcome: None,
                    diagnostic: Some(format!(
                        "command {} failed with exit status {}; stderr: {}",
                        rule.command.description, output.exit_code, output.stderr
                    )),
                });
                continue;
            }

            debug!(rule_id = %rule.id, stdout = %output.stdout, "command completed");
            let outcome = interpret(rule, &output.stdout, self.validator_description).map_err(
                |malformed| CheckError::MalformedOutput {
                    rule_id: rule.id.clone(),
                    command: rule.command.description.clone(),
                    reason: malformed.reason,
                },
            )?;

            let event = record_event(
                self.events,
                request.file_id,
                &outcome.event_detail,
                outcome.outcome_information.as_deref(),
                outcome.detail_note.as_deref(),
            )
            .map_err(|source| CheckError::EventStore {
                rule_id: rule.id.clone(),
                source,
            })?;
            info!(
                rule_id = %rule.id,
                event_id = %event.event_id,
                outcome = ?event.event_outcome,
                status = ?outcome.status,
                "recorded validation event"
            );

            records.push(RuleRecord {
                rule_id: rule.id.clone(),
                command: rule.command.description.clone(),
                status: outcome.status,
                exit_code: output.exit_code,
                event_id: Some(event.event_id),
                event_outcome: event.event_outcome,
                diagnostic: None,
            });
        }

        let verdict = aggregate(&records);
        info!(
            file_id = request.file_id,
            verdict = verdict.as_str(),
            rules = records.len(),
            "policy check finished"
        );

        Ok(CheckResult {
            verdict,
            not_applicable: None,
            purpose: Some(selection.purpose),
            stage: Some(selection.stage),
            rules: records,
        })
    }
}

fn aggregate(records: &[RuleRecord]) -> CheckVerdict {
    if records.iter().any(|r| r.status == RuleStatus::Failed) {
        CheckVerdict::Fail
    } else {
        CheckVerdict::Success
    }
}
