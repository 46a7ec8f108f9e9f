use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `polcheck.toml` schema v1.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PolcheckConfigV1 {
    /// Optional schema string for tooling (`polcheck.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Path to the rule/file catalog (`.toml` or `.json`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,

    /// Path to the JSON Lines event log that validation events are appended to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<String>,

    /// `trace`, `debug`, `info`, `warn` or `error`. `RUST_LOG` takes precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Command description that marks the format-policy validator whose output decides pass/fail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validator_description: Option<String>,

    #[serde(default)]
    pub interpreters: InterpreterConfig,
}

/// Interpreter binaries used per script kind.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct InterpreterConfig {
    /// Runs `bashScript` commands (default `bash`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bash: Option<String>,

    /// Runs `pythonScript` commands (default `python3`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub python: Option<String>,
}
