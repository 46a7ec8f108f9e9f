//! Stable identifiers for purposes, wire keys, placeholders, and exit codes.
//!
//! Purpose names follow the format policy registry vocabulary; the legacy
//! spellings are accepted when reading a catalog.

// Purposes
pub const PURPOSE_ACCESS: &str = "access";
pub const PURPOSE_PRESERVATION: &str = "preservation";
pub const PURPOSE_DEFAULT_ACCESS: &str = "default_access";
pub const PURPOSE_DEFAULT_PRESERVATION: &str = "default_preservation";

pub const LEGACY_PURPOSE_ACCESS: &str = "checkingAccessPolicy";
pub const LEGACY_PURPOSE_PRESERVATION: &str = "checkingPreservationPolicy";
pub const LEGACY_PURPOSE_DEFAULT_ACCESS: &str = "default_checkingAccessPolicy";
pub const LEGACY_PURPOSE_DEFAULT_PRESERVATION: &str = "default_checkingPreservationPolicy";

/// File group use that marks a file as an access copy.
pub const GROUP_USE_ACCESS: &str = "access";

// Script kinds
pub const SCRIPT_BASH: &str = "bashScript";
pub const SCRIPT_COMMAND: &str = "command";
pub const SCRIPT_PYTHON: &str = "pythonScript";
pub const SCRIPT_AS_IS: &str = "as_is";

// Command template placeholders
pub const PLACEHOLDER_FILE_UUID: &str = "%fileUUID%";
pub const PLACEHOLDER_SIP_UUID: &str = "%SIPUUID%";
pub const PLACEHOLDER_UNIT_TYPE: &str = "%unitType%";
pub const UNIT_TYPE_FILE: &str = "file";

// Validation command stdout
pub const KEY_OUTCOME_INFORMATION: &str = "eventOutcomeInformation";
pub const KEY_OUTCOME_DETAIL_NOTE: &str = "eventOutcomeDetailNote";
pub const OUTCOME_PASS: &str = "pass";

/// Description of the embedded format-policy validator whose stdout decides pass/fail.
pub const FORMAT_VALIDATOR_DESCRIPTION: &str = "Check against policy using MediaConch";

// Events (PREMIS controlled vocabulary)
pub const EVENT_TYPE_VALIDATION: &str = "validation";

// Not-applicable reasons
pub const REASON_FILE_NOT_FOUND: &str = "file_not_found";
pub const REASON_NO_APPLICABLE_RULES: &str = "no_applicable_rules";

// Process exit codes
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAIL: i32 = 1;
pub const EXIT_NOT_APPLICABLE: i32 = 2;
pub const EXIT_TOOL_ERROR: i32 = 3;
