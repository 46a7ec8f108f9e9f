use crate::invocation::Invocation;
use crate::model::{Command, FileRecord, FileRole, FormatVersion, Purpose, Rule, ScriptKind, Tool};
use crate::ports::{EventStore, FileRepository, ProcessOutput, ProcessRunner, RuleRepository};
use polcheck_types::{EventRecord, ids};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// A `command` rule whose template is `run <id> %fileUUID% %SIPUUID%`.
pub fn rule_for(id: &str, purpose: Purpose, format: Option<&str>) -> Rule {
    Rule {
        id: id.to_string(),
        purpose,
        format: format.map(str::to_string),
        command: Command {
            id: format!("cmd-{id}"),
            description: format!("Validate with {id}"),
            script_kind: ScriptKind::Command,
            template: format!("run {id} %fileUUID% %SIPUUID%"),
            tool: Tool {
                description: "Generic validator".to_string(),
                version: "1.0".to_string(),
            },
        },
        enabled: true,
    }
}

pub fn rule_with(id: &str, kind: ScriptKind, template: &str) -> Rule {
    let mut rule = rule_for(id, Purpose::Access, None);
    rule.command.script_kind = kind;
    rule.command.template = template.to_string();
    rule
}

pub fn rule_described(id: &str, description: &str) -> Rule {
    let mut rule = rule_for(id, Purpose::Access, Some("fmt-F"));
    rule.command.description = description.to_string();
    rule
}

pub fn validator_rule(id: &str) -> Rule {
    let mut rule = rule_described(id, ids::FORMAT_VALIDATOR_DESCRIPTION);
    rule.command.tool = Tool {
        description: "MediaConch".to_string(),
        version: "16.12".to_string(),
    };
    rule
}

#[derive(Default)]
pub struct InMemoryFiles {
    files: BTreeMap<String, (FileRole, Option<String>)>,
}

impl InMemoryFiles {
    pub fn with_file(mut self, id: &str, role: FileRole, format: Option<&str>) -> Self {
        self.files
            .insert(id.to_string(), (role, format.map(str::to_string)));
        self
    }
}

impl FileRepository for InMemoryFiles {
    fn find_file(&self, file_id: &str) -> anyhow::Result<Option<FileRecord>> {
        Ok(self.files.get(file_id).map(|(role, _)| FileRecord {
            id: file_id.to_string(),
            role: *role,
        }))
    }

    fn active_format(&self, file_id: &str) -> anyhow::Result<Option<FormatVersion>> {
        Ok(self
            .files
            .get(file_id)
            .and_then(|(_, format)| format.clone())
            .map(|id| FormatVersion {
                id,
                description: None,
            }))
    }
}

#[derive(Default)]
pub struct InMemoryRules {
    rules: Vec<Rule>,
    failure: Option<String>,
}

impl InMemoryRules {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self {
            rules,
            failure: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            rules: Vec::new(),
            failure: Some(message.to_string()),
        }
    }

    fn filtered(&self, keep: impl Fn(&Rule) -> bool) -> anyhow::Result<Vec<Rule>> {
        if let Some(message) = &self.failure {
            anyhow::bail!("{message}");
        }
        Ok(self.rules.iter().filter(|r| keep(r)).cloned().collect())
    }
}

// Mirrors a repository that does not filter on the active flag itself.
impl RuleRepository for InMemoryRules {
    fn active_rules_for_format(
        &self,
        format_id: &str,
        purpose: Purpose,
    ) -> anyhow::Result<Vec<Rule>> {
        self.filtered(|r| r.purpose == purpose && r.format.as_deref() == Some(format_id))
    }

    fn active_rules_for_purpose(&self, purpose: Purpose) -> anyhow::Result<Vec<Rule>> {
        self.filtered(|r| r.purpose == purpose)
    }
}

/// Answers by rule id, taken from the second word of the command (`run <id> ...`).
/// Unscripted rules print a passing outcome.
#[derive(Default)]
pub struct ScriptedRunner {
    responses: BTreeMap<String, Option<ProcessOutput>>,
    seen: RefCell<Vec<Invocation>>,
}

impl ScriptedRunner {
    pub fn respond(mut self, rule_id: &str, output: ProcessOutput) -> Self {
        self.responses.insert(rule_id.to_string(), Some(output));
        self
    }

    pub fn unavailable(mut self, rule_id: &str) -> Self {
        self.responses.insert(rule_id.to_string(), None);
        self
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.seen.borrow().clone()
    }
}

impl ProcessRunner for ScriptedRunner {
    fn run(&self, invocation: &Invocation) -> anyhow::Result<ProcessOutput> {
        self.seen.borrow_mut().push(invocation.clone());
        let rule_id = invocation
            .command()
            .split_whitespace()
            .nth(1)
            .unwrap_or_default();
        match self.responses.get(rule_id) {
            Some(Some(output)) => Ok(output.clone()),
            Some(None) => anyhow::bail!("no such program: run"),
            None => Ok(ProcessOutput::ok(r#"{"eventOutcomeInformation":"pass"}"#)),
        }
    }
}

#[derive(Default)]
pub struct RecordingEvents {
    events: RefCell<Vec<EventRecord>>,
    fail: bool,
}

impl RecordingEvents {
    pub fn failing() -> Self {
        Self {
            events: RefCell::default(),
            fail: true,
        }
    }

    pub fn events(&self) -> Vec<EventRecord> {
        self.events.borrow().clone()
    }
}

impl EventStore for RecordingEvents {
    fn append(&self, event: &EventRecord) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("event store is read-only");
        }
        self.events.borrow_mut().push(event.clone());
        Ok(())
    }
}
