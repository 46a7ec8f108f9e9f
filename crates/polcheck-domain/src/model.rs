use polcheck_types::ids;

/// Why a file is being checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileRole {
    Access,
    Preservation,
}

impl FileRole {
    /// Only the exact group use `access` makes an access copy; anything else is preservation.
    pub fn from_group_use(group_use: &str) -> Self {
        if group_use == ids::GROUP_USE_ACCESS {
            FileRole::Access
        } else {
            FileRole::Preservation
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Purpose {
    Access,
    Preservation,
    DefaultAccess,
    DefaultPreservation,
}

impl Purpose {
    pub fn for_role(role: FileRole) -> Self {
        match role {
            FileRole::Access => Purpose::Access,
            FileRole::Preservation => Purpose::Preservation,
        }
    }

    /// The `default_<purpose>` counterpart; defaults map to themselves.
    pub fn default_fallback(self) -> Self {
        match self {
            Purpose::Access | Purpose::DefaultAccess => Purpose::DefaultAccess,
            Purpose::Preservation | Purpose::DefaultPreservation => Purpose::DefaultPreservation,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Purpose::Access => ids::PURPOSE_ACCESS,
            Purpose::Preservation => ids::PURPOSE_PRESERVATION,
            Purpose::DefaultAccess => ids::PURPOSE_DEFAULT_ACCESS,
            Purpose::DefaultPreservation => ids::PURPOSE_DEFAULT_PRESERVATION,
        }
    }

    /// Accepts both the short names and the legacy registry spellings.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            ids::PURPOSE_ACCESS | ids::LEGACY_PURPOSE_ACCESS => Some(Purpose::Access),
            ids::PURPOSE_PRESERVATION | ids::LEGACY_PURPOSE_PRESERVATION => {
                Some(Purpose::Preservation)
            }
            ids::PURPOSE_DEFAULT_ACCESS | ids::LEGACY_PURPOSE_DEFAULT_ACCESS => {
                Some(Purpose::DefaultAccess)
            }
            ids::PURPOSE_DEFAULT_PRESERVATION | ids::LEGACY_PURPOSE_DEFAULT_PRESERVATION => {
                Some(Purpose::DefaultPreservation)
            }
            _ => None,
        }
    }
}

/// How a command's invocation is constructed and which interpreter runs it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScriptKind {
    BashScript,
    Command,
    PythonScript,
    AsIs,
}

impl ScriptKind {
    /// Templated kinds get placeholder substitution and no positional arguments.
    pub fn is_templated(self) -> bool {
        matches!(self, ScriptKind::BashScript | ScriptKind::Command)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScriptKind::BashScript => ids::SCRIPT_BASH,
            ScriptKind::Command => ids::SCRIPT_COMMAND,
            ScriptKind::PythonScript => ids::SCRIPT_PYTHON,
            ScriptKind::AsIs => ids::SCRIPT_AS_IS,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            ids::SCRIPT_BASH => Some(ScriptKind::BashScript),
            ids::SCRIPT_COMMAND => Some(ScriptKind::Command),
            ids::SCRIPT_PYTHON => Some(ScriptKind::PythonScript),
            ids::SCRIPT_AS_IS => Some(ScriptKind::AsIs),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tool {
    pub description: String,
    pub version: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command {
    pub id: String,
    pub description: String,
    pub script_kind: ScriptKind,
    /// Command text; may embed `%fileUUID%`, `%SIPUUID%` and `%unitType%`.
    pub template: String,
    pub tool: Tool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    pub id: String,
    pub purpose: Purpose,
    /// `None` for rules not scoped to a format (typically the defaults).
    pub format: Option<String>,
    pub command: Command,
    pub enabled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatVersion {
    pub id: String,
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileRecord {
    pub id: String,
    pub role: FileRole,
}
