//! Use case orchestration for polcheck.
//!
//! This crate provides the application layer: it resolves settings, builds the filesystem
//! adapters, and hands them to the domain pipeline. It is intentionally thin.
//!
//! The CLI crate depends on this; it only handles argument parsing, logging setup, and exit codes.

#![forbid(unsafe_code)]

mod check;
mod rules;

pub use check::{CheckInput, CheckOutput, run_check, serialize_report, verdict_exit_code};
pub use rules::{RulesInput, RulesOutput, SelectedRule, format_rules, run_rules};
