use anyhow::Context;
use camino::Utf8Path;
use polcheck_domain::model::{
    Command, FileRecord, FileRole, FormatVersion, Purpose, Rule, ScriptKind, Tool,
};
use polcheck_domain::ports::{FileRepository, RuleRepository};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// On-disk catalog schema v1: commands, rules, format versions, and identified files.
///
/// The catalog is read-only input. Rules and commands are maintained by administrators and
/// files by the identification step upstream.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CatalogV1 {
    /// Optional schema string for tooling (`polcheck.catalog.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(default)]
    pub commands: Vec<CommandEntry>,

    #[serde(default)]
    pub rules: Vec<RuleEntry>,

    #[serde(default)]
    pub formats: Vec<FormatEntry>,

    #[serde(default)]
    pub files: Vec<FileEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CommandEntry {
    pub id: String,
    pub description: String,
    /// `bashScript`, `command`, `pythonScript` or `as_is`.
    pub script_type: String,
    /// Command text. Templated kinds may use `%fileUUID%`, `%SIPUUID%` and `%unitType%`.
    pub command: String,
    pub tool: ToolEntry,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ToolEntry {
    pub description: String,
    pub version: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RuleEntry {
    pub id: String,
    /// `access`, `preservation`, `default_access`, `default_preservation`
    /// (or the `checking*Policy` registry spellings).
    pub purpose: String,
    /// Command id.
    pub command: String,
    /// Format version id; omitted for rules that apply regardless of format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct FormatEntry {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct FileEntry {
    pub id: String,
    /// File group use; exactly `access` marks an access copy.
    #[serde(alias = "filegrpuse")]
    pub group_use: String,
    /// Identified format version id, if identification ran and matched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

fn enabled_by_default() -> bool {
    true
}

/// Parse a catalog written as TOML.
pub fn parse_catalog_toml(input: &str) -> anyhow::Result<CatalogV1> {
    let catalog: CatalogV1 = toml::from_str(input)?;
    Ok(catalog)
}

/// Parse a catalog written as JSON.
pub fn parse_catalog_json(input: &str) -> anyhow::Result<CatalogV1> {
    let catalog: CatalogV1 = serde_json::from_str(input)?;
    Ok(catalog)
}

/// Read, parse (by extension: `.json` is JSON, anything else TOML), and validate a catalog.
pub fn load_catalog(path: &Utf8Path) -> anyhow::Result<Catalog> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read catalog: {path}"))?;
    let raw = match path.extension() {
        Some("json") => parse_catalog_json(&text),
        _ => parse_catalog_toml(&text),
    }
    .with_context(|| format!("parse catalog: {path}"))?;
    Catalog::from_v1(raw).with_context(|| format!("validate catalog: {path}"))
}

/// A validated catalog serving both repository ports.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    rules: Vec<Rule>,
    formats: BTreeMap<String, FormatEntry>,
    files: BTreeMap<String, FileEntry>,
}

impl Catalog {
    /// Resolve command references and enum strings; rejects duplicate ids and dangling refs.
    pub fn from_v1(raw: CatalogV1) -> anyhow::Result<Self> {
        if let Some(schema) = raw.schema.as_deref()
            && schema != "polcheck.catalog.v1"
        {
            anyhow::bail!("unsupported catalog schema: {schema} (expected polcheck.catalog.v1)");
        }

        let mut commands: BTreeMap<String, Command> = BTreeMap::new();
        for entry in raw.commands {
            let script_kind = ScriptKind::parse(&entry.script_type).with_context(|| {
                format!(
                    "command {}: unknown script_type {} (expected bashScript|command|pythonScript|as_is)",
                    entry.id, entry.script_type
                )
            })?;
            let command = Command {
                id: entry.id.clone(),
                description: entry.description,
                script_kind,
                template: entry.command,
                tool: Tool {
                    description: entry.tool.description,
                    version: entry.tool.version,
                },
            };
            if commands.insert(entry.id.clone(), command).is_some() {
                anyhow::bail!("duplicate command id: {}", entry.id);
            }
        }

        let mut formats: BTreeMap<String, FormatEntry> = BTreeMap::new();
        for entry in raw.formats {
            let id = entry.id.clone();
            if formats.insert(id.clone(), entry).is_some() {
                anyhow::bail!("duplicate format id: {id}");
            }
        }

        let mut rule_ids = BTreeSet::new();
        let mut rules = Vec::with_capacity(raw.rules.len());
        for entry in raw.rules {
            if !rule_ids.insert(entry.id.clone()) {
                anyhow::bail!("duplicate rule id: {}", entry.id);
            }
            let purpose = Purpose::parse(&entry.purpose).with_context(|| {
                format!("rule {}: unknown purpose {}", entry.id, entry.purpose)
            })?;
            let command = commands.get(&entry.command).cloned().with_context(|| {
                format!("rule {}: unknown command {}", entry.id, entry.command)
            })?;
            if let Some(format) = entry.format.as_deref()
                && !formats.contains_key(format)
            {
                anyhow::bail!("rule {}: unknown format {}", entry.id, format);
            }
            rules.push(Rule {
                id: entry.id,
                purpose,
                format: entry.format,
                command,
                enabled: entry.enabled,
            });
        }

        let mut files: BTreeMap<String, FileEntry> = BTreeMap::new();
        for entry in raw.files {
            let id = entry.id.clone();
            if files.insert(id.clone(), entry).is_some() {
                anyhow::bail!("duplicate file id: {id}");
            }
        }

        debug!(
            commands = commands.len(),
            rules = rules.len(),
            formats = formats.len(),
            files = files.len(),
            "catalog loaded"
        );

        Ok(Self {
            rules,
            formats,
            files,
        })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

impl FileRepository for Catalog {
    fn find_file(&self, file_id: &str) -> anyhow::Result<Option<FileRecord>> {
        Ok(self.files.get(file_id).map(|f| FileRecord {
            id: f.id.clone(),
            role: FileRole::from_group_use(&f.group_use),
        }))
    }

    /// An identification only counts when its format version exists and is enabled.
    fn active_format(&self, file_id: &str) -> anyhow::Result<Option<FormatVersion>> {
        let format = self
            .files
            .get(file_id)
            .and_then(|f| f.format.as_deref())
            .and_then(|id| self.formats.get(id))
            .filter(|fmt| fmt.enabled)
            .map(|fmt| FormatVersion {
                id: fmt.id.clone(),
                description: fmt.description.clone(),
            });
        Ok(format)
    }
}

impl RuleRepository for Catalog {
    fn active_rules_for_format(
        &self,
        format_id: &str,
        purpose: Purpose,
    ) -> anyhow::Result<Vec<Rule>> {
        Ok(self
            .rules
            .iter()
            .filter(|r| r.enabled && r.purpose == purpose && r.format.as_deref() == Some(format_id))
            .cloned()
            .collect())
    }

    fn active_rules_for_purpose(&self, purpose: Purpose) -> anyhow::Result<Vec<Rule>> {
        Ok(self
            .rules
            .iter()
            .filter(|r| r.enabled && r.purpose == purpose)
            .cloned()
            .collect())
    }
}
