//! Policy check pipeline (no direct IO).
//!
//! Input: a file id plus the repositories, process runner, and event store it should use.
//! Output: one of success / fail / not applicable, with a record per executed rule.
//!
//! Every collaborator is reached through the traits in [`ports`], so the pipeline can be driven
//! by the filesystem adapters in `polcheck-repo` or by in-memory fakes.

#![forbid(unsafe_code)]

pub mod error;
pub mod invocation;
pub mod model;
pub mod outcome;
pub mod ports;
pub mod record;
pub mod select;

mod engine;

#[cfg(test)]
mod test_support;

pub use engine::{CheckRequest, CheckResult, NotApplicable, PolicyChecker, RuleRecord};
pub use error::CheckError;
