//! Config parsing and override resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod resolve;

pub use model::{InterpreterConfig, PolcheckConfigV1};
pub use resolve::{Interpreters, Overrides, ResolvedConfig};

/// Default location of the rule/file catalog, relative to the working directory.
pub const DEFAULT_CATALOG_PATH: &str = "polcheck-catalog.toml";
/// Default location of the JSON Lines event log.
pub const DEFAULT_EVENTS_PATH: &str = "polcheck-events.jsonl";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Parse `polcheck.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<PolcheckConfigV1> {
    let cfg: PolcheckConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective settings (file values, then CLI overrides, then defaults).
pub fn resolve_config(
    cfg: PolcheckConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}

/// Parse and resolve in one step; blank text means "no config file".
pub fn load(config_text: &str, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    let cfg = if config_text.trim().is_empty() {
        PolcheckConfigV1::default()
    } else {
        parse_config_toml(config_text)?
    };
    resolve_config(cfg, overrides)
}
