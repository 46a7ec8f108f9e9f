//! Interpreting a validation command's stdout.
//!
//! The wire contract is one JSON object with optional string fields `eventOutcomeInformation`
//! and `eventOutcomeDetailNote`; other keys are ignored. Exit code alone decides pass/fail for
//! every command except the format-policy validator, whose reported outcome must be `pass`.

use crate::model::Rule;
use polcheck_types::{RuleStatus, ids};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{reason}")]
pub struct MalformedOutput {
    pub reason: String,
}

impl MalformedOutput {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleOutcome {
    pub status: RuleStatus,
    pub outcome_information: Option<String>,
    pub detail_note: Option<String>,
    /// Tool provenance, `program="...";version="..."`.
    pub event_detail: String,
}

pub fn interpret(
    rule: &Rule,
    stdout: &str,
    validator_description: &str,
) -> Result<RuleOutcome, MalformedOutput> {
    let value: Value = serde_json::from_str(stdout)
        .map_err(|e| MalformedOutput::new(format!("stdout is not JSON: {e}")))?;
    let Value::Object(fields) = value else {
        return Err(MalformedOutput::new(format!(
            "expected a JSON object, got {}",
            json_kind(&value)
        )));
    };

    let outcome_information = optional_string(&fields, ids::KEY_OUTCOME_INFORMATION)?;
    let detail_note = optional_string(&fields, ids::KEY_OUTCOME_DETAIL_NOTE)?;

    let mut status = RuleStatus::Passed;
    if rule.command.description == validator_description
        && outcome_information.as_deref() != Some(ids::OUTCOME_PASS)
    {
        status = RuleStatus::Failed;
    }

    Ok(RuleOutcome {
        status,
        outcome_information,
        detail_note,
        event_detail: event_detail(rule),
    })
}

pub fn event_detail(rule: &Rule) -> String {
    format!(
        "program=\"{}\";version=\"{}\"",
        rule.command.tool.description, rule.command.tool.version
    )
}

fn optional_string(fields: &Map<String, Value>, key: &str) -> Result<Option<String>, MalformedOutput> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(MalformedOutput::new(format!(
            "`{key}` must be a string, got {}",
            json_kind(other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{rule_described, validator_rule};

    const VALIDATOR: &str = ids::FORMAT_VALIDATOR_DESCRIPTION;

    #[test]
    fn ordinary_command_passes_regardless_of_reported_outcome() {
        let rule = rule_described("r1", "Validate using JHOVE");
        let outcome = interpret(&rule, r#"{"eventOutcomeInformation":"fail"}"#, VALIDATOR)
            .expect("interpret");

        assert_eq!(outcome.status, RuleStatus::Passed);
        assert_eq!(outcome.outcome_information.as_deref(), Some("fail"));
    }

    #[test]
    fn validator_pass_requires_pass_outcome() {
        let rule = validator_rule("r1");
        let outcome = interpret(
            &rule,
            r#"{"eventOutcomeInformation":"pass","eventOutcomeDetailNote":"all good"}"#,
            VALIDATOR,
        )
        .expect("interpret");

        assert_eq!(outcome.status, RuleStatus::Passed);
        assert_eq!(outcome.outcome_information.as_deref(), Some("pass"));
        assert_eq!(outcome.detail_note.as_deref(), Some("all good"));
    }

    #[test]
    fn validator_fails_on_other_outcome_or_missing_field() {
        let rule = validator_rule("r1");

        let failed = interpret(&rule, r#"{"eventOutcomeInformation":"fail"}"#, VALIDATOR)
            .expect("interpret");
        assert_eq!(failed.status, RuleStatus::Failed);
        assert_eq!(failed.outcome_information.as_deref(), Some("fail"));

        let missing = interpret(&rule, r#"{"eventOutcomeDetailNote":"?"}"#, VALIDATOR)
            .expect("interpret");
        assert_eq!(missing.status, RuleStatus::Failed);
        assert_eq!(missing.outcome_information, None);

        let cased = interpret(&rule, r#"{"eventOutcomeInformation":"PASS"}"#, VALIDATOR)
            .expect("interpret");
        assert_eq!(cased.status, RuleStatus::Failed);
    }

    #[test]
    fn validator_description_is_configurable() {
        let rule = rule_described("r1", "In-house policy checker");
        let outcome = interpret(
            &rule,
            r#"{"eventOutcomeInformation":"fail"}"#,
            "In-house policy checker",
        )
        .expect("interpret");
        assert_eq!(outcome.status, RuleStatus::Failed);
    }

    #[test]
    fn event_detail_names_tool_provenance() {
        let rule = validator_rule("r1");
        let outcome =
            interpret(&rule, r#"{"eventOutcomeInformation":"pass"}"#, VALIDATOR).expect("interpret");
        assert_eq!(outcome.event_detail, r#"program="MediaConch";version="16.12""#);
    }

    #[test]
    fn non_json_is_malformed() {
        let rule = rule_described("r1", "Validate");
        let err = interpret(&rule, "Segmentation fault", VALIDATOR).unwrap_err();
        assert!(err.reason.contains("not JSON"), "{}", err.reason);
    }

    #[test]
    fn non_object_json_is_malformed() {
        let rule = rule_described("r1", "Validate");
        for stdout in ["[1,2]", "\"pass\"", "42", "null"] {
            let err = interpret(&rule, stdout, VALIDATOR).unwrap_err();
            assert!(err.reason.contains("expected a JSON object"), "{}", err.reason);
        }
    }

    #[test]
    fn non_string_outcome_is_malformed() {
        let rule = rule_described("r1", "Validate");
        let err = interpret(&rule, r#"{"eventOutcomeInformation":true}"#, VALIDATOR).unwrap_err();
        assert!(err.reason.contains("eventOutcomeInformation"), "{}", err.reason);
    }

    #[test]
    fn empty_object_is_well_formed() {
        let rule = rule_described("r1", "Validate");
        let outcome = interpret(&rule, " {}\n", VALIDATOR).expect("interpret");
        assert_eq!(outcome.status, RuleStatus::Passed);
        assert_eq!(outcome.outcome_information, None);
        assert_eq!(outcome.detail_note, None);
    }
}
