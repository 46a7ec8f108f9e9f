//! The `check` use case: run the policy pipeline for one file and produce a report.

use anyhow::Context;
use polcheck_domain::{CheckRequest, PolicyChecker};
use polcheck_repo::{JsonlEventStore, SystemRunner, load_catalog};
use polcheck_settings::ResolvedConfig;
use polcheck_types::{
    CheckReport, CheckSubject, CheckVerdict, RuleReport, SCHEMA_REPORT_V1, ToolMeta,
};
use time::OffsetDateTime;

/// Input for the check use case.
#[derive(Clone, Debug)]
pub struct CheckInput<'a> {
    /// Resolved settings (catalog, event log, interpreters, validator description).
    pub settings: &'a ResolvedConfig,
    pub file_path: &'a str,
    pub file_id: &'a str,
    pub sip_id: &'a str,
}

/// Output from the check use case.
#[derive(Clone, Debug)]
pub struct CheckOutput {
    pub report: CheckReport,
}

impl CheckOutput {
    pub fn verdict(&self) -> CheckVerdict {
        self.report.verdict
    }
}

/// Run the check use case: load the catalog, run the pipeline, produce a report.
///
/// An `Err` means the check was aborted (malformed command output, unreadable catalog, event log
/// failure). It is never a policy verdict.
pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    let started_at = OffsetDateTime::now_utc();
    let settings = input.settings;

    let catalog = load_catalog(&settings.catalog).context("load catalog")?;
    let runner = SystemRunner::new(
        settings.interpreters.bash.as_str(),
        settings.interpreters.python.as_str(),
    );
    let events = JsonlEventStore::new(settings.events.clone());

    let checker = PolicyChecker {
        files: &catalog,
        rules: &catalog,
        runner: &runner,
        events: &events,
        validator_description: &settings.validator_description,
    };
    let result = checker
        .check(CheckRequest {
            file_path: input.file_path,
            file_id: input.file_id,
            sip_id: input.sip_id,
        })
        .with_context(|| format!("policy check aborted for file {}", input.file_id))?;

    let finished_at = OffsetDateTime::now_utc();

    let rules = result
        .rules
        .into_iter()
        .map(|r| RuleReport {
            rule_id: r.rule_id,
            command: r.command,
            status: r.status,
            exit_code: r.exit_code,
            event_id: r.event_id,
            event_outcome: r.event_outcome,
            diagnostic: r.diagnostic,
        })
        .collect();

    let report = CheckReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "polcheck".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at,
        finished_at,
        subject: CheckSubject {
            file_path: input.file_path.to_string(),
            file_id: input.file_id.to_string(),
            sip_id: input.sip_id.to_string(),
        },
        verdict: result.verdict,
        reason: result.not_applicable.map(|r| r.as_str().to_string()),
        purpose: result.purpose.map(|p| p.as_str().to_string()),
        selection: result.stage.map(|s| s.as_str().to_string()),
        rules,
    };

    Ok(CheckOutput { report })
}

/// Map verdict to exit code: 0 = success, 1 = fail, 2 = not applicable.
pub fn verdict_exit_code(verdict: CheckVerdict) -> i32 {
    verdict.exit_code()
}

/// Pretty JSON with a trailing newline.
pub fn serialize_report(report: &CheckReport) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(report).context("serialize report")?;
    json.push('\n');
    Ok(json)
}
