//! Building and appending validation events.

use crate::ports::EventStore;
use polcheck_types::{EventRecord, ids};
use time::OffsetDateTime;
use uuid::Uuid;

/// Append one immutable `validation` event for `file_id` and return what was written.
pub fn record_event(
    store: &dyn EventStore,
    file_id: &str,
    detail: &str,
    outcome: Option<&str>,
    outcome_note: Option<&str>,
) -> anyhow::Result<EventRecord> {
    let event = EventRecord {
        event_id: Uuid::new_v4().to_string(),
        file_id: file_id.to_string(),
        event_type: ids::EVENT_TYPE_VALIDATION.to_string(),
        event_detail: detail.to_string(),
        event_outcome: outcome.map(str::to_string),
        event_outcome_detail_note: outcome_note.map(str::to_string),
        event_datetime: OffsetDateTime::now_utc(),
    };
    store.append(&event)?;
    Ok(event)
}
