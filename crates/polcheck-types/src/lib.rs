//! Stable DTOs and IDs used across the polcheck workspace.
//!
//! This crate is intentionally boring:
//! - stable string IDs, wire keys, and exit codes
//! - the audit event record appended for each interpreted rule
//! - the JSON check report emitted by the CLI

#![forbid(unsafe_code)]

pub mod event;
pub mod ids;
pub mod report;

pub use event::EventRecord;
pub use report::{
    CheckReport, CheckSubject, CheckVerdict, RuleReport, RuleStatus, ToolMeta, SCHEMA_REPORT_V1,
};
