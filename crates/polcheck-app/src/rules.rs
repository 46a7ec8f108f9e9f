//! The `rules` use case: show which rules a check would run, without running them.

use anyhow::Context;
use polcheck_domain::select::{SelectError, select_rules};
use polcheck_repo::load_catalog;
use polcheck_settings::ResolvedConfig;
use std::fmt::Write as _;

#[derive(Clone, Debug)]
pub struct RulesInput<'a> {
    pub settings: &'a ResolvedConfig,
    pub file_id: &'a str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedRule {
    pub id: String,
    pub purpose: String,
    pub format: Option<String>,
    pub command: String,
    pub script_type: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RulesOutput {
    FileNotFound {
        file_id: String,
    },
    Selected {
        file_id: String,
        purpose: String,
        format: Option<String>,
        /// `format`, `default` or `none`.
        stage: String,
        rules: Vec<SelectedRule>,
    },
}

pub fn run_rules(input: RulesInput<'_>) -> anyhow::Result<RulesOutput> {
    let catalog = load_catalog(&input.settings.catalog).context("load catalog")?;

    let selection = match select_rules(input.file_id, &catalog, &catalog) {
        Ok(selection) => selection,
        Err(SelectError::NotFound(file_id)) => return Ok(RulesOutput::FileNotFound { file_id }),
        Err(err) => return Err(err).context("select rules"),
    };

    let rules = selection
        .rules
        .iter()
        .map(|r| SelectedRule {
            id: r.id.clone(),
            purpose: r.purpose.as_str().to_string(),
            format: r.format.clone(),
            command: r.command.description.clone(),
            script_type: r.command.script_kind.as_str().to_string(),
        })
        .collect();

    Ok(RulesOutput::Selected {
        file_id: selection.file.id,
        purpose: selection.purpose.as_str().to_string(),
        format: selection.format.map(|f| f.id),
        stage: selection.stage.as_str().to_string(),
        rules,
    })
}

/// Plain-text listing, one rule per line.
pub fn format_rules(output: &RulesOutput) -> String {
    let mut out = String::new();
    match output {
        RulesOutput::FileNotFound { file_id } => {
            let _ = writeln!(out, "no file with id {file_id}; policy check not applicable");
        }
        RulesOutput::Selected {
            file_id,
            purpose,
            format,
            stage,
            rules,
        } => {
            let _ = writeln!(
                out,
                "file {file_id}: purpose={purpose} format={} selection={stage}",
                format.as_deref().unwrap_or("-")
            );
            if rules.is_empty() {
                let _ = writeln!(out, "no applicable rules; policy check not applicable");
            }
            for rule in rules {
                let _ = writeln!(
                    out,
                    "  {} [{}] {} ({})",
                    rule.id, rule.purpose, rule.command, rule.script_type
                );
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use polcheck_settings::Overrides;

    const CATALOG: &str = r#"
[[commands]]
id = "c"
description = "Validate with JHOVE"
script_type = "as_is"
command = "/usr/bin/jhove"
tool = { description = "JHOVE", version = "1.26" }

[[formats]]
id = "fmt-tif"

[[rules]]
id = "p1"
purpose = "checkingPreservationPolicy"
command = "c"
format = "fmt-tif"

[[files]]
id = "file-tif"
group_use = "original"
format = "fmt-tif"

[[files]]
id = "file-access"
group_use = "access"
"#;

    fn settings(dir: &tempfile::TempDir) -> ResolvedConfig {
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 path");
        std::fs::write(root.join("catalog.toml"), CATALOG).expect("write catalog");
        polcheck_settings::load(
            "",
            Overrides {
                catalog: Some(root.join("catalog.toml").to_string()),
                ..Overrides::default()
            },
        )
        .expect("settings")
    }

    #[test]
    fn lists_selected_rules_without_running_them() {
        let dir = tempfile::tempdir().expect("tempdir");
        let settings = settings(&dir);

        let output = run_rules(RulesInput {
            settings: &settings,
            file_id: "file-tif",
        })
        .expect("rules");

        let RulesOutput::Selected { stage, rules, .. } = &output else {
            panic!("expected a selection, got {output:?}");
        };
        assert_eq!(stage, "format");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].purpose, "preservation");
        assert_eq!(rules[0].script_type, "as_is");

        let text = format_rules(&output);
        assert!(text.contains("p1 [preservation] Validate with JHOVE (as_is)"), "{text}");
    }

    #[test]
    fn reports_missing_file_and_empty_selection() {
        let dir = tempfile::tempdir().expect("tempdir");
        let settings = settings(&dir);

        let missing = run_rules(RulesInput {
            settings: &settings,
            file_id: "nope",
        })
        .expect("rules");
        assert!(format_rules(&missing).contains("no file with id nope"));

        let empty = run_rules(RulesInput {
            settings: &settings,
            file_id: "file-access",
        })
        .expect("rules");
        assert!(format_rules(&empty).contains("no applicable rules"));
    }
}
