//! Turning a rule's command into something a [`ProcessRunner`](crate::ports::ProcessRunner) can run.

use crate::model::{Rule, ScriptKind};
use polcheck_types::ids;

/// The concrete invocation of a command.
///
/// Templated commands (`bashScript`, `command`) carry everything in the substituted command
/// string. Direct commands (`pythonScript`, `as_is`) run the template verbatim with the file path
/// as their only argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Invocation {
    Templated {
        kind: ScriptKind,
        command: String,
    },
    Direct {
        kind: ScriptKind,
        command: String,
        args: Vec<String>,
    },
}

impl Invocation {
    pub fn kind(&self) -> ScriptKind {
        match self {
            Invocation::Templated { kind, .. } | Invocation::Direct { kind, .. } => *kind,
        }
    }

    pub fn command(&self) -> &str {
        match self {
            Invocation::Templated { command, .. } | Invocation::Direct { command, .. } => command,
        }
    }

    pub fn args(&self) -> &[String] {
        match self {
            Invocation::Templated { .. } => &[],
            Invocation::Direct { args, .. } => args,
        }
    }
}

pub fn build_invocation(rule: &Rule, file_path: &str, file_id: &str, sip_id: &str) -> Invocation {
    let command = &rule.command;
    if command.script_kind.is_templated() {
        Invocation::Templated {
            kind: command.script_kind,
            command: substitute_placeholders(&command.template, file_id, sip_id),
        }
    } else {
        Invocation::Direct {
            kind: command.script_kind,
            command: command.template.clone(),
            args: vec![file_path.to_string()],
        }
    }
}

/// Replace the file, SIP, and unit type placeholders in one left-to-right pass.
///
/// Substituted values are never rescanned. Unknown `%...%` tokens are left alone.
pub fn substitute_placeholders(template: &str, file_id: &str, sip_id: &str) -> String {
    let replacements = [
        (ids::PLACEHOLDER_FILE_UUID, file_id),
        (ids::PLACEHOLDER_SIP_UUID, sip_id),
        (ids::PLACEHOLDER_UNIT_TYPE, ids::UNIT_TYPE_FILE),
    ];

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match replacements
            .iter()
            .find(|(placeholder, _)| tail.starts_with(placeholder))
        {
            Some((placeholder, value)) => {
                out.push_str(value);
                rest = &tail[placeholder.len()..];
            }
            None => {
                out.push('%');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
