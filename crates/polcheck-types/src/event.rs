use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// One append-only audit record, written per interpreted rule execution.
///
/// Field names mirror the PREMIS event vocabulary used by the validation tools.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    #[serde(rename = "eventIdentifierUUID")]
    pub event_id: String,
    #[serde(rename = "fileUUID")]
    pub file_id: String,
    pub event_type: String,
    pub event_detail: String,
    #[serde(default)]
    pub event_outcome: Option<String>,
    #[serde(default)]
    pub event_outcome_detail_note: Option<String>,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub event_datetime: OffsetDateTime,
}
