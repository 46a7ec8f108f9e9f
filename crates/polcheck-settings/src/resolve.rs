use crate::model::PolcheckConfigV1;
use crate::{DEFAULT_CATALOG_PATH, DEFAULT_EVENTS_PATH, DEFAULT_LOG_LEVEL};
use anyhow::Context;
use camino::Utf8PathBuf;
use polcheck_types::ids;

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub catalog: Option<String>,
    pub events: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interpreters {
    pub bash: String,
    pub python: String,
}

impl Default for Interpreters {
    fn default() -> Self {
        Self {
            bash: "bash".to_string(),
            python: "python3".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub catalog: Utf8PathBuf,
    pub events: Utf8PathBuf,
    pub log_level: String,
    pub validator_description: String,
    pub interpreters: Interpreters,
}

pub fn resolve_config(
    cfg: PolcheckConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    if let Some(schema) = cfg.schema.as_deref()
        && schema != "polcheck.config.v1"
    {
        anyhow::bail!("unsupported config schema: {schema} (expected polcheck.config.v1)");
    }

    let catalog = overrides
        .catalog
        .or(cfg.catalog)
        .unwrap_or_else(|| DEFAULT_CATALOG_PATH.to_string());
    let events = overrides
        .events
        .or(cfg.events)
        .unwrap_or_else(|| DEFAULT_EVENTS_PATH.to_string());

    let log_level = overrides
        .log_level
        .or(cfg.log_level)
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
    let log_level = parse_log_level(&log_level).context("invalid log_level")?;

    let validator_description = match cfg.validator_description {
        Some(d) if d.trim().is_empty() => anyhow::bail!("validator_description must not be empty"),
        Some(d) => d,
        None => ids::FORMAT_VALIDATOR_DESCRIPTION.to_string(),
    };

    let defaults = Interpreters::default();
    let interpreters = Interpreters {
        bash: cfg.interpreters.bash.unwrap_or(defaults.bash),
        python: cfg.interpreters.python.unwrap_or(defaults.python),
    };

    Ok(ResolvedConfig {
        catalog: Utf8PathBuf::from(catalog),
        events: Utf8PathBuf::from(events),
        log_level,
        validator_description,
        interpreters,
    })
}

fn parse_log_level(v: &str) -> anyhow::Result<String> {
    let lower = v.to_ascii_lowercase();
    match lower.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" | "off" => Ok(lower),
        "warning" => Ok("warn".to_string()),
        other => anyhow::bail!("unknown log level: {other} (expected trace|debug|info|warn|error|off)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{load, parse_config_toml};

    #[test]
    fn empty_config_uses_defaults() {
        let resolved = load("", Overrides::default()).expect("resolve");

        assert_eq!(resolved.catalog, "polcheck-catalog.toml");
        assert_eq!(resolved.events, "polcheck-events.jsonl");
        assert_eq!(resolved.log_level, "info");
        assert_eq!(
            resolved.validator_description,
            "Check against policy using MediaConch"
        );
        assert_eq!(resolved.interpreters, Interpreters::default());
    }

    #[test]
    fn file_values_apply() {
        let cfg = parse_config_toml(
            r#"
schema = "polcheck.config.v1"
catalog = "fpr/catalog.json"
events = "var/events.jsonl"
log_level = "DEBUG"
validator_description = "Policy check"

[interpreters]
python = "/usr/bin/python3.12"
"#,
        )
        .expect("parse");
        let resolved = resolve_config(cfg, Overrides::default()).expect("resolve");

        assert_eq!(resolved.catalog, "fpr/catalog.json");
        assert_eq!(resolved.events, "var/events.jsonl");
        assert_eq!(resolved.log_level, "debug");
        assert_eq!(resolved.validator_description, "Policy check");
        assert_eq!(resolved.interpreters.python, "/usr/bin/python3.12");
        assert_eq!(resolved.interpreters.bash, "bash");
    }

    #[test]
    fn overrides_win_over_file_values() {
        let cfg = parse_config_toml("catalog = \"a.toml\"\nlog_level = \"warn\"\n").expect("parse");
        let overrides = Overrides {
            catalog: Some("b.toml".to_string()),
            events: Some("out/events.jsonl".to_string()),
            log_level: Some("trace".to_string()),
        };
        let resolved = resolve_config(cfg, overrides).expect("resolve");

        assert_eq!(resolved.catalog, "b.toml");
        assert_eq!(resolved.events, "out/events.jsonl");
        assert_eq!(resolved.log_level, "trace");
    }

    #[test]
    fn rejects_unknown_keys_and_values() {
        assert!(parse_config_toml("catalgo = \"typo.toml\"\n").is_err());
        assert!(load("log_level = \"loud\"\n", Overrides::default()).is_err());
        assert!(load("schema = \"polcheck.config.v9\"\n", Overrides::default()).is_err());
        assert!(load("validator_description = \"  \"\n", Overrides::default()).is_err());
    }
}
